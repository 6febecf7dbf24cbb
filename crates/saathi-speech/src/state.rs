//! Recognition state machine with thread-safe transitions.
//!
//! Valid transitions for a recognizer bound to one locale:
//! - Idle -> Listening (first start)
//! - Listening -> Stopped (stop, end of input, or error)
//! - Stopped -> Listening (restart)

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::SpeechError;

/// Operational state of a speech recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognitionState {
    /// Freshly created for a locale, never started.
    Idle,
    /// Streaming transcriptions to the sink.
    Listening,
    /// Previously listened; can be restarted.
    Stopped,
}

impl fmt::Display for RecognitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionState::Idle => write!(f, "Idle"),
            RecognitionState::Listening => write!(f, "Listening"),
            RecognitionState::Stopped => write!(f, "Stopped"),
        }
    }
}

impl RecognitionState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &RecognitionState) -> bool {
        matches!(
            (self, target),
            (RecognitionState::Idle, RecognitionState::Listening)
                | (RecognitionState::Listening, RecognitionState::Stopped)
                | (RecognitionState::Stopped, RecognitionState::Listening)
        )
    }
}

/// Shared recognition state. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: Arc<Mutex<RecognitionState>>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RecognitionState::Idle)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RecognitionState> {
        // A poisoned lock still holds a valid Copy state.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the current state.
    pub fn current(&self) -> RecognitionState {
        *self.lock()
    }

    /// Attempt to transition to the target state.
    pub fn transition(&self, target: RecognitionState) -> Result<(), SpeechError> {
        let mut state = self.lock();
        if state.can_transition_to(&target) {
            tracing::debug!("Recognition state: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(SpeechError::InvalidTransition {
                from: *state,
                to: target,
            })
        }
    }

    /// Move to Stopped if currently Listening. Returns whether it moved.
    ///
    /// Used for end-of-input and error events, which may arrive after an
    /// explicit stop.
    pub fn settle(&self) -> bool {
        let mut state = self.lock();
        if *state == RecognitionState::Listening {
            tracing::debug!("Recognition state: Listening -> Stopped (settled)");
            *state = RecognitionState::Stopped;
            true
        } else {
            false
        }
    }

    /// Force the state machine back to Idle (new locale).
    pub fn reset(&self) {
        let mut state = self.lock();
        if *state != RecognitionState::Idle {
            tracing::debug!("Recognition state machine reset to Idle from {}", *state);
        }
        *state = RecognitionState::Idle;
    }
}

// =============================================================================
// Tests
// =============================================================================
