//!
//! cfgtree: a hierarchical, mutable configuration tree for applications that
//! build their configuration programmatically rather than from a flat file.
//!
//! ## Core Concepts
//!
//! * **Nodes (`config::Config`)**: Handles to cells of the tree. A node is a leaf holding a
//!   [`config::Value`] or a mapping of named children. Raw leaf values are wrapped into nodes
//!   lazily, on first access, and the wrapped node is cached in place.
//! * **Raw input (`config::RawMap`)**: The plain nested mapping a loader produces, built with
//!   the [`raw_map!`] macro or from JSON.
//! * **References (`config::Ref`)**: Relative cross-references between entries, resolved on
//!   every read.
//! * **Merges (`Config::extend`, `Config::update`)**: Structural unions that refuse to discard
//!   existing subtrees.
//! * **Snapshots (`Config::backup`, `Config::restore`)**: A per-node stack of deep copies used
//!   to roll a subtree back.
//! * **Change tracking (`Config::is_dirty`, `Config::on_update`)**: Dirty flags that propagate
//!   upward on value changes, and hooks fired synchronously after each change.
//!
//! [`Config::extend`]: config::Config::extend
//! [`Config::update`]: config::Config::update

pub mod config;
pub mod constants;

/// Re-export the `Config` struct for easier access.
pub use config::Config;

/// Result type used throughout the cfgtree library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the cfgtree library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured configuration errors from the config module
    #[error(transparent)]
    Config(config::ConfigError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a key or path was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Config(config_err) => config_err.is_not_found() || config_err.is_path_error(),
            Error::Io(io_err) => io_err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error is config-related.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this error was raised by a rejected write.
    pub fn is_set_error(&self) -> bool {
        match self {
            Error::Config(config_err) => config_err.is_set_error(),
            _ => false,
        }
    }

    /// Check if this error is type-related.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Config(config_err) => config_err.is_type_error(),
            _ => false,
        }
    }
}
