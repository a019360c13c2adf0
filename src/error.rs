use thiserror::Error;

/// Library error type for photo library operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A lookup by identifier found nothing.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u32 },

    /// A date string could not be parsed.
    #[error("invalid date provided: {0}")]
    InvalidDate(String),

    /// Caller-supplied input was rejected (empty album name, bad email, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn not_found(kind: &'static str, id: u32) -> Self {
        Self::NotFound { kind, id }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
