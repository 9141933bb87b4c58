//! Error types for the sandbox core.

use std::fmt;

/// Errors that can occur when instantiating a named prefab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrefabError {
    /// No prefab is registered under the requested asset name.
    NotFound(String),
}

impl fmt::Display for PrefabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefabError::NotFound(name) => {
                write!(f, "no prefab registered under \"{}\"", name)
            }
        }
    }
}

impl std::error::Error for PrefabError {}
