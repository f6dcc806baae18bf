//! Block rendering errors.

/// Error returned by block services.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// No service registered for the block type.
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),
    /// A block setting is missing or has the wrong shape.
    #[error("Invalid block setting '{key}': {message}")]
    InvalidSetting {
        /// Setting key.
        key: String,
        /// What is wrong with it.
        message: String,
    },
    /// Template lookup or rendering failed.
    #[error("Template '{name}' failed: {message}")]
    Template {
        /// Template name.
        name: String,
        /// Engine error message.
        message: String,
    },
    /// The delegated sub-request failed.
    #[error("Sub-request '{action}' failed: {message}")]
    SubRequest {
        /// Action identifier.
        action: String,
        /// Failure message.
        message: String,
    },
    /// Building the rendering context failed.
    #[error("Context serialization error: {0}")]
    Context(#[from] serde_json::Error),
    /// I/O error while loading templates.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlockError {
    pub(crate) fn invalid_setting(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.to_owned(),
            message: message.into(),
        }
    }
}
