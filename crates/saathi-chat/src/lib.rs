//! Conversational workflow for Saathi.
//!
//! Owns the transcript and the displayed scheme set, and runs one
//! request/response round-trip per user turn against the remote chat API.

pub mod context;
pub mod session;

pub use context::history_window;
pub use session::{ChatSession, SubmitOutcome, ERROR_REPLY, FALLBACK_ANSWER};
