//! Secret resolution with environment variable indirection
//!
//! A secret value of the exact form `$NAME` is a reference to the
//! environment variable `NAME`; any other string is used verbatim.
//! References are decoded at parse time into a tagged value so the
//! resolution pass never re-scans raw strings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A single credential value from the deploy descriptor
///
/// There is no escape syntax for a literal value that legitimately starts
/// with `$`; such a value is always treated as a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SecretValue {
    /// Literal credential, used as-is
    Literal(String),
    /// Reference to an environment variable by name
    EnvRef(String),
}

impl From<String> for SecretValue {
    fn from(raw: String) -> Self {
        match raw.strip_prefix('$') {
            Some(name) => SecretValue::EnvRef(name.to_string()),
            None => SecretValue::Literal(raw),
        }
    }
}

impl From<SecretValue> for String {
    fn from(value: SecretValue) -> Self {
        match value {
            SecretValue::Literal(text) => text,
            SecretValue::EnvRef(name) => format!("${}", name),
        }
    }
}

impl SecretValue {
    /// Resolve to the actual credential value
    pub fn resolve(&self) -> Result<String> {
        match self {
            SecretValue::Literal(text) => Ok(text.clone()),
            SecretValue::EnvRef(name) => {
                std::env::var(name).map_err(|_| CoreError::MissingEnvVar { name: name.clone() })
            }
        }
    }
}

/// Resolve a whole secret map in one pass
///
/// Fails on the first unresolved reference; a missing environment variable
/// aborts the entire resolution rather than continuing with an empty
/// credential.
pub fn resolve_secrets(
    secrets: &IndexMap<String, SecretValue>,
) -> Result<IndexMap<String, String>> {
    let mut resolved = IndexMap::with_capacity(secrets.len());
    for (key, value) in secrets {
        resolved.insert(key.clone(), value.resolve()?);
    }
    Ok(resolved)
}
