//! Derive macro for `request_guard_validation::Operation`.

use proc_macro::TokenStream;
use proc_macro2::{Literal, Span};
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, Lit, LitStr, Path, Token};

/// Derive `request_guard_validation::Operation` from field-level rules.
///
/// Every named field becomes a declared parameter, in field order. Rules are
/// attached with `#[rule(...)]` and evaluated in the order written.
#[proc_macro_derive(Operation, attributes(operation, rule))]
pub fn derive_operation(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_operation(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_operation(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let operation_name =
        parse_operation_name(&input.attrs)?.unwrap_or_else(|| input.ident.to_string());
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Operation can only be derived for structs",
        ));
    };

    let fields = match &struct_data.fields {
        Fields::Named(fields) => &fields.named,
        Fields::Unit => return Ok(expand_impl(input, &operation_name, &[])),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                &struct_data.fields,
                "Operation requires named fields",
            ));
        },
    };

    let mut parameters = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let (field_name, rules) = parse_field_rules(&field.attrs, ident)?;
        let field_lit = LitStr::new(&field_name, Span::call_site());
        let spec = quote! { ::request_guard_validation::ParameterSpec::new(#field_lit) };
        if rules.is_empty() {
            parameters.push(spec);
            continue;
        }
        let rules = rules.iter().map(|rule| expand_rule(rule, &field_lit));
        parameters.push(quote! { #spec.with_rules([#(#rules),*]) });
    }

    Ok(expand_impl(input, &operation_name, &parameters))
}

fn expand_impl(
    input: &DeriveInput,
    operation_name: &str,
    parameters: &[proc_macro2::TokenStream],
) -> proc_macro2::TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let operation_lit = LitStr::new(operation_name, Span::call_site());
    quote! {
        impl #impl_generics ::request_guard_validation::Operation for #name #ty_generics #where_clause {
            const NAME: &'static str = #operation_lit;

            fn signature() -> ::core::result::Result<
                ::request_guard_validation::OperationSignature,
                ::request_guard_validation::SignatureError,
            > {
                ::request_guard_validation::OperationSignature::builder(#operation_lit)
                    #(.push(#parameters))*
                    .build()
            }
        }
    }
}

fn parse_operation_name(attrs: &[Attribute]) -> Result<Option<String>, syn::Error> {
    let mut name: Option<String> = None;
    for attr in attrs {
        if !attr.path().is_ident("operation") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if name.is_some() {
                    return Err(meta.error("duplicate operation(name = ...)"));
                }
                if value.value().trim().is_empty() {
                    return Err(meta.error("operation name must not be blank"));
                }
                name = Some(value.value().trim().to_string());
                return Ok(());
            }
            Err(meta.error("unsupported operation attribute on container"))
        })?;
    }
    Ok(name)
}

#[derive(Debug)]
enum RuleAttr {
    Required,
    NotBlank,
    Email,
    Pattern(LitStr),
    Range { min: Option<f64>, max: Option<f64> },
    Length { min: Option<usize>, max: Option<usize> },
    Custom(Path),
}

fn parse_field_rules(
    attrs: &[Attribute],
    ident: &Ident,
) -> Result<(String, Vec<RuleAttr>), syn::Error> {
    let mut rules = Vec::new();
    let mut field_name_override: Option<String> = None;
    for attr in attrs {
        if !attr.path().is_ident("rule") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("field") {
                let value: LitStr = meta.value()?.parse()?;
                if field_name_override.is_some() {
                    return Err(meta.error("duplicate rule(field = ...)"));
                }
                field_name_override = Some(value.value().trim().to_string());
                return Ok(());
            }
            if meta.path.is_ident("required") {
                rules.push(RuleAttr::Required);
                return Ok(());
            }
            if meta.path.is_ident("not_blank") {
                rules.push(RuleAttr::NotBlank);
                return Ok(());
            }
            if meta.path.is_ident("email") {
                rules.push(RuleAttr::Email);
                return Ok(());
            }
            if meta.path.is_ident("pattern") {
                let value: LitStr = meta.value()?.parse()?;
                rules.push(RuleAttr::Pattern(value));
                return Ok(());
            }
            if meta.path.is_ident("custom") {
                let value: LitStr = meta.value()?.parse()?;
                let path: Path = value.parse()?;
                rules.push(RuleAttr::Custom(path));
                return Ok(());
            }
            if meta.path.is_ident("range") {
                let mut min = None;
                let mut max = None;
                meta.parse_nested_meta(|nested| {
                    if nested.path.is_ident("min") {
                        min = Some(parse_float_bound(&nested)?);
                        return Ok(());
                    }
                    if nested.path.is_ident("max") {
                        max = Some(parse_float_bound(&nested)?);
                        return Ok(());
                    }
                    Err(nested.error("unsupported range attribute"))
                })?;
                if min.is_none() && max.is_none() {
                    return Err(meta.error("range requires min or max"));
                }
                rules.push(RuleAttr::Range { min, max });
                return Ok(());
            }
            if meta.path.is_ident("length") {
                let mut min = None;
                let mut max = None;
                meta.parse_nested_meta(|nested| {
                    if nested.path.is_ident("min") {
                        min = Some(parse_length_bound(&nested)?);
                        return Ok(());
                    }
                    if nested.path.is_ident("max") {
                        max = Some(parse_length_bound(&nested)?);
                        return Ok(());
                    }
                    Err(nested.error("unsupported length attribute"))
                })?;
                if min.is_none() && max.is_none() {
                    return Err(meta.error("length requires min or max"));
                }
                rules.push(RuleAttr::Length { min, max });
                return Ok(());
            }
            Err(meta.error("unsupported rule attribute on field"))
        })?;
    }
    let name = field_name_override.unwrap_or_else(|| ident.to_string());
    Ok((name, rules))
}

fn parse_float_bound(meta: &ParseNestedMeta<'_>) -> Result<f64, syn::Error> {
    let input = meta.value()?;
    let negative = input.parse::<Option<Token![-]>>()?.is_some();
    let lit: Lit = input.parse()?;
    let value = match &lit {
        Lit::Int(value) => value.base10_parse::<f64>()?,
        Lit::Float(value) => value.base10_parse::<f64>()?,
        _ => return Err(syn::Error::new_spanned(lit, "range bounds must be numeric")),
    };
    if !value.is_finite() {
        return Err(syn::Error::new_spanned(lit, "range bounds must be finite"));
    }
    Ok(if negative { -value } else { value })
}

fn parse_length_bound(meta: &ParseNestedMeta<'_>) -> Result<usize, syn::Error> {
    let value: syn::LitInt = meta.value()?.parse()?;
    value.base10_parse::<usize>()
}

fn expand_rule(rule: &RuleAttr, field: &LitStr) -> proc_macro2::TokenStream {
    let fallible = |construct: proc_macro2::TokenStream| {
        quote! {
            ::request_guard_validation::RuleSpec::new(#construct.map_err(|source| {
                ::request_guard_validation::SignatureError::Rule {
                    parameter: ::std::string::String::from(#field),
                    source,
                }
            })?)
        }
    };
    match rule {
        RuleAttr::Required => quote! {
            ::request_guard_validation::RuleSpec::new(::request_guard_validation::Required::new())
        },
        RuleAttr::NotBlank => quote! {
            ::request_guard_validation::RuleSpec::new(::request_guard_validation::NotBlank::new())
        },
        RuleAttr::Email => quote! {
            ::request_guard_validation::RuleSpec::new(::request_guard_validation::Email::new())
        },
        RuleAttr::Pattern(pattern) => {
            fallible(quote! { ::request_guard_validation::Pattern::new(#pattern) })
        },
        RuleAttr::Range { min, max } => {
            let min = optional_bound(min.map(float_literal));
            let max = optional_bound(max.map(float_literal));
            fallible(quote! { ::request_guard_validation::Range::new(#min, #max) })
        },
        RuleAttr::Length { min, max } => {
            let min = optional_bound(min.map(usize_literal));
            let max = optional_bound(max.map(usize_literal));
            fallible(quote! { ::request_guard_validation::Length::new(#min, #max) })
        },
        RuleAttr::Custom(path) => quote! { #path() },
    }
}

fn float_literal(value: f64) -> proc_macro2::TokenStream {
    let literal = Literal::f64_suffixed(value.abs());
    if value.is_sign_negative() {
        quote!(-#literal)
    } else {
        quote!(#literal)
    }
}

fn usize_literal(value: usize) -> proc_macro2::TokenStream {
    let literal = Literal::usize_suffixed(value);
    quote!(#literal)
}

fn optional_bound(bound: Option<proc_macro2::TokenStream>) -> proc_macro2::TokenStream {
    match bound {
        Some(tokens) => quote!(::core::option::Option::Some(#tokens)),
        None => quote!(::core::option::Option::None),
    }
}
