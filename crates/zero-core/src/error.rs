//! Error types shared across the pipeline.

/// Error raised while rendering a component or a shell.
///
/// Render errors never escape the boundary that catches them; they are
/// turned into an inline fallback by the composer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("{0}")]
    Failed(String),

    #[error("panicked while rendering: {0}")]
    Panicked(String),
}

impl RenderError {
    /// Create a render failure from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Error raised by an initial-data hook.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read data from {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid data: {0}")]
    Invalid(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
