//! Positional template interpolation.
//!
//! Catalog templates use `{0}`, `{1}`, ... placeholders filled from a
//! structured error's dynamic content, in order. `{{` and `}}` produce
//! literal braces. Arity is checked here and only here: every placeholder
//! must have a value and every value must be referenced.

use request_guard_catalog::StructuredError;
use serde_json::Value;
use thiserror::Error;

/// Template and argument list disagree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A placeholder refers past the end of the argument list.
    #[error("placeholder {{{index}}} has no value; {provided} argument(s) supplied")]
    MissingArgument {
        /// Placeholder index.
        index: usize,
        /// Number of arguments supplied.
        provided: usize,
    },
    /// An argument is never referenced by the template.
    #[error("argument {index} is not referenced by the template")]
    UnusedArgument {
        /// Position of the unused argument.
        index: usize,
    },
    /// Unbalanced brace or non-numeric placeholder.
    #[error("malformed placeholder at byte {position}")]
    MalformedPlaceholder {
        /// Byte offset of the opening or stray brace.
        position: usize,
    },
}

/// Interpolate `args` into `template`.
pub fn render_template(template: &str, args: &[Value]) -> Result<String, RenderError> {
    let mut rendered = String::with_capacity(template.len());
    let mut used = vec![false; args.len()];
    let mut chars = template.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        match ch {
            '{' if chars.next_if(|(_, next)| *next == '{').is_some() => rendered.push('{'),
            '}' if chars.next_if(|(_, next)| *next == '}').is_some() => rendered.push('}'),
            '{' => {
                let mut digits = String::new();
                let mut closed = false;
                for (_, next) in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    digits.push(next);
                }
                if !closed || digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return Err(RenderError::MalformedPlaceholder { position });
                }
                let index: usize = digits
                    .parse()
                    .map_err(|_| RenderError::MalformedPlaceholder { position })?;
                let value = args.get(index).ok_or(RenderError::MissingArgument {
                    index,
                    provided: args.len(),
                })?;
                if let Some(flag) = used.get_mut(index) {
                    *flag = true;
                }
                push_value(&mut rendered, value);
            },
            '}' => return Err(RenderError::MalformedPlaceholder { position }),
            other => rendered.push(other),
        }
    }

    if let Some(index) = used.iter().position(|flag| !flag) {
        return Err(RenderError::UnusedArgument { index });
    }
    Ok(rendered)
}

/// Render a structured error's catalog template with its dynamic content.
pub fn render_structured_error(error: &StructuredError) -> Result<String, RenderError> {
    render_template(error.definition().template(), error.dynamic_content())
}

fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::String(text) => out.push_str(text),
        other => out.push_str(&other.to_string()),
    }
}
