//! Error types for configuration tree operations.
//!
//! Every failure the tree can report is a local condition the caller can
//! recover from. Nothing is retried internally and a failing operation leaves
//! the tree as it was before the call.

use thiserror::Error;

/// Structured error types for configuration tree operations.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// `get_value` was called on a node that holds a mapping
    #[error("Cannot get value of a non-leaf config node")]
    NotALeaf,

    /// Item lookup of a key the node does not have
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    /// Assignment to a key that does not exist, or a write that would discard
    /// an existing subtree
    #[error("Cannot set key '{key}': {reason}")]
    CannotSetValue { key: String, reason: String },

    /// A dotted path or cross-reference does not resolve
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    /// Type deduction against a null value with no fallback type
    #[error("Cannot deduce type of '{path}' from a null value")]
    CannotDeduceType { path: String },

    /// `restore` or `discard_backup` with an empty backup stack
    #[error("No backup to restore")]
    NoBackup,

    /// A textual literal could not be read as the requested type
    #[error("Invalid {expected} literal: {literal:?}")]
    InvalidLiteral { literal: String, expected: String },

    /// A `path=value` expression without the `=` separator
    #[error("Invalid path expression: {expression:?}")]
    InvalidExpression { expression: String },

    /// Attribute-style assignment of a name the node does not have
    #[error("No such settable attribute: {name}")]
    NoSuchAttribute { name: String },

    /// A typed accessor found a value of a different type
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// `set_parent` on a node that already has a parent
    #[error("Config node already has a parent")]
    ParentAlreadySet,

    /// Linking a node under itself or one of its own descendants
    #[error("Linking '{key}' would create a cycle")]
    CyclicLink { key: String },

    /// Chained reference resolution went deeper than the allowed bound
    #[error("Reference '{path}' exceeded the maximum resolution depth of {limit}")]
    ReferenceDepthExceeded { path: String, limit: usize },

    /// A raw value that has no representation in the tree
    #[error("Unsupported value: {reason}")]
    UnsupportedValue { reason: String },
}

impl ConfigError {
    pub(crate) fn key_not_found(key: impl Into<String>) -> Self {
        ConfigError::KeyNotFound { key: key.into() }
    }

    pub(crate) fn cannot_set(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::CannotSetValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_path(path: impl Into<String>) -> Self {
        ConfigError::InvalidPath { path: path.into() }
    }

    /// Check if this error indicates a missing key
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::KeyNotFound { .. })
    }

    /// Check if this error is related to path or reference resolution
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            ConfigError::InvalidPath { .. } | ConfigError::ReferenceDepthExceeded { .. }
        )
    }

    /// Check if this error was raised by a rejected write
    pub fn is_set_error(&self) -> bool {
        matches!(
            self,
            ConfigError::CannotSetValue { .. }
                | ConfigError::NoSuchAttribute { .. }
                | ConfigError::CyclicLink { .. }
        )
    }

    /// Check if this error is related to type deduction or typed access
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            ConfigError::CannotDeduceType { .. }
                | ConfigError::InvalidLiteral { .. }
                | ConfigError::TypeMismatch { .. }
        )
    }

    /// Get the key if this is a key-related error
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::KeyNotFound { key }
            | ConfigError::CannotSetValue { key, .. }
            | ConfigError::CyclicLink { key } => Some(key),
            _ => None,
        }
    }

    /// Get the path if this is a path-related error
    pub fn path(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidPath { path }
            | ConfigError::CannotDeduceType { path }
            | ConfigError::ReferenceDepthExceeded { path, .. } => Some(path),
            _ => None,
        }
    }
}

// Conversion from ConfigError to the main Error type
impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}
