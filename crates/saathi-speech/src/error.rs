//! Error types for speech input and output.

use saathi_client::ClientError;

use crate::state::RecognitionState;

/// Errors from the speech bridge.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// The host has no speech capability. Expected and benign.
    #[error("speech unavailable: {0}")]
    Unavailable(String),
    #[error("speech recognition failed: {0}")]
    Recognition(String),
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("audio playback failed: {0}")]
    Playback(String),
    #[error("invalid recognition transition: {from} -> {to}")]
    InvalidTransition {
        from: RecognitionState,
        to: RecognitionState,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeechError {
    /// Unavailability disables controls silently; everything else is
    /// reported to the user.
    pub fn should_notify(&self) -> bool {
        !matches!(self, SpeechError::Unavailable(_))
    }
}

impl From<ClientError> for SpeechError {
    fn from(err: ClientError) -> Self {
        SpeechError::Synthesis(err.to_string())
    }
}
