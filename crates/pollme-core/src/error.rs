//! Core error types.

use thiserror::Error;

/// Catalog errors.
#[derive(Debug, Error)]
pub enum Error {
    /// An app with the same label is already registered.
    #[error("app label already registered: {0}")]
    DuplicateApp(String),

    /// An app declares the same model twice.
    #[error("model {model} declared twice in app {app}")]
    DuplicateModel {
        /// App label.
        app: String,
        /// Model name.
        model: String,
    },

    /// A relation points at a model that is not registered.
    #[error("relation to unknown model: {0}")]
    UnknownModel(String),
}
