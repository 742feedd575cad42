//! The error catalog: code -> definition, immutable after load.
//!
//! A registry is built once (from a TOML/JSON catalog or an in-memory list),
//! validated as a whole, and then only read. Lookups take `&self` and hand
//! out `Arc`s, so concurrent readers need no locking.

use crate::definition::ErrorDefinition;
use crate::error::{CatalogError, UnknownErrorCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../catalog/default.toml");

static GLOBAL_REGISTRY: OnceLock<ErrorRegistry> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogFormat {
    Json,
    Toml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    errors: Vec<ErrorDefinition>,
}

/// Read-only catalog of error definitions keyed by code.
#[derive(Debug, Clone, Default)]
pub struct ErrorRegistry {
    definitions: BTreeMap<String, Arc<ErrorDefinition>>,
}

impl ErrorRegistry {
    /// Build a registry from definitions, rejecting blank, padded or duplicate
    /// codes.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = ErrorDefinition>,
    {
        let mut table = BTreeMap::new();
        for (index, definition) in definitions.into_iter().enumerate() {
            let code = definition.code();
            if code.trim().is_empty() {
                return Err(CatalogError::BlankCode { index });
            }
            if code.trim() != code {
                return Err(CatalogError::PaddedCode {
                    code: code.to_string(),
                });
            }
            if definition.template().trim().is_empty() {
                return Err(CatalogError::BlankTemplate {
                    code: code.to_string(),
                });
            }
            if table.contains_key(code) {
                return Err(CatalogError::DuplicateCode {
                    code: code.to_string(),
                });
            }
            table.insert(code.to_string(), Arc::new(definition));
        }

        tracing::info!(definitions = table.len(), "error catalog loaded");
        Ok(Self { definitions: table })
    }

    /// Parse a TOML catalog (`[[errors]]` tables).
    pub fn from_toml_str(input: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(input)?;
        Self::from_definitions(file.errors)
    }

    /// Parse a JSON catalog (`{"errors": [...]}`).
    pub fn from_json_str(input: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(input)?;
        Self::from_definitions(file.errors)
    }

    /// Load a catalog file; the format follows the extension.
    pub fn load_from_path(path: &Path) -> Result<Self, CatalogError> {
        let format = detect_catalog_format(path)?;
        let input = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match format {
            CatalogFormat::Json => Self::from_json_str(&input),
            CatalogFormat::Toml => Self::from_toml_str(&input),
        }
    }

    /// The catalog embedded in this crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Resolve a code to its definition.
    pub fn get_error(&self, code: &str) -> Result<Arc<ErrorDefinition>, UnknownErrorCode> {
        self.definitions
            .get(code)
            .map(Arc::clone)
            .ok_or_else(|| UnknownErrorCode::new(code))
    }

    /// Returns true when the code has an entry.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.definitions.contains_key(code)
    }

    /// Registered codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Registered definitions in code order.
    pub fn definitions(&self) -> impl Iterator<Item = &ErrorDefinition> {
        self.definitions.values().map(AsRef::as_ref)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true when the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Install the process-wide registry. Succeeds exactly once.
pub fn install_global(registry: ErrorRegistry) -> Result<&'static ErrorRegistry, CatalogError> {
    let mut fresh = false;
    let installed = GLOBAL_REGISTRY.get_or_init(|| {
        fresh = true;
        registry
    });
    if fresh {
        Ok(installed)
    } else {
        Err(CatalogError::AlreadyInstalled)
    }
}

/// The process-wide registry, if one was installed.
pub fn global() -> Option<&'static ErrorRegistry> {
    GLOBAL_REGISTRY.get()
}

fn detect_catalog_format(path: &Path) -> Result<CatalogFormat, CatalogError> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => Ok(CatalogFormat::Json),
        Some("toml") => Ok(CatalogFormat::Toml),
        other => Err(CatalogError::UnsupportedFormat {
            extension: other.unwrap_or_default().to_string(),
        }),
    }
}
