use thiserror::Error;

/// Top-level error type for the Saathi client.
///
/// Covers configuration and profile handling. The API client and speech
/// bridge keep their own error types (`ClientError`, `SpeechError`) since
/// their callers branch on the variants.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SaathiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown profile field: {0}")]
    UnknownProfileField(String),
}

impl From<toml::de::Error> for SaathiError {
    fn from(err: toml::de::Error) -> Self {
        SaathiError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SaathiError {
    fn from(err: toml::ser::Error) -> Self {
        SaathiError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SaathiError {
    fn from(err: serde_json::Error) -> Self {
        SaathiError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Saathi operations.
pub type Result<T> = std::result::Result<T, SaathiError>;
