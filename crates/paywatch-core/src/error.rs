use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaywatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Origin not allowed: {origin}")]
    OriginDenied { origin: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaywatchError {
    /// Short error code string included in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            PaywatchError::Config(_) => "CONFIG_ERROR",
            PaywatchError::OriginDenied { .. } => "ORIGIN_DENIED",
            PaywatchError::Serialization(_) => "SERIALIZATION_ERROR",
            PaywatchError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, PaywatchError>;
