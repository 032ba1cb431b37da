//! Typed error variants for the term-drawer-config crate.
//!
//! [`StoreError`] covers raw document I/O. [`ConfigError`] and
//! [`RegistryError`] wrap it for the two documents the store holds, so callers
//! can tell an invalid config apart from a broken pane registry.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading or writing a document in the [`StateStore`].
///
/// [`StateStore`]: crate::StateStore
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred reading or writing the document.
    #[error("I/O error on {path:?}")]
    Io {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document contained YAML that could not be parsed or produced.
    #[error("YAML error in {path:?}")]
    Yaml {
        /// Path of the document.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The document contained JSON that could not be parsed or produced.
    #[error("JSON error in {path:?}")]
    Json {
        /// Path of the document.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur when loading or saving the drawer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config document could not be read, decoded or written.
    #[error("config error")]
    Store(#[from] StoreError),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the invalid field and the accepted values.
    #[error("{0}")]
    Validation(String),
}

/// Errors that can occur when loading or saving the window → pane registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry document could not be read, decoded or written.
    #[error("pane registry error")]
    Store(#[from] StoreError),

    /// The registry document does not exist yet.
    #[error("pane registry not found at {0:?}")]
    Missing(PathBuf),
}
