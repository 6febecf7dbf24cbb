//! Saathi Speech crate - voice input and voice output for the chat session.
//!
//! Recognition runs through a strict state machine (Idle -> Listening ->
//! Stopped -> Listening) bound to one locale, streaming interim and final
//! transcripts into an injected sink. Synthesis fetches audio from the remote
//! TTS endpoint and plays it through an [`AudioPlayer`]. Both are best-effort:
//! runtime failures are reported through the notification slot.

pub mod error;
pub mod locale;
pub mod recognizer;
pub mod state;
pub mod synthesis;

pub use error::SpeechError;
pub use locale::{speech_locale, DEFAULT_SPEECH_LOCALE};
pub use recognizer::{
    MockRecognitionBackend, RecognitionBackend, RecognitionEvent, RecognitionSession,
    SpeechRecognizer, TranscriptSink, UnsupportedRecognition,
};
pub use state::{RecognitionState, StateMachine};
pub use synthesis::{AudioPlayer, CommandPlayer, Speaker, DEFAULT_RELEASE_AFTER};
