//! Chat session: transcript, displayed schemes, and the single-flight
//! request/response round-trip.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use saathi_client::{ChatApi, ChatRequest, ClientError};
use saathi_core::config::{ChatConfig, MAX_HISTORY_LIMIT};
use saathi_core::i18n::t;
use saathi_core::{ChatMessage, Notifier, ProfileRecord, SchemeMatch};
use saathi_speech::Speaker;

use crate::context::history_window;

/// Assistant text used when the backend replies without an answer.
pub const FALLBACK_ANSWER: &str = "Sorry, I could not generate an answer.";

/// Assistant text appended when a round-trip fails.
pub const ERROR_REPLY: &str = "Error: Unable to reach server. Please try again.";

/// What a call to [`ChatSession::submit`] did.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The input was empty after trimming; nothing happened.
    IgnoredEmpty,
    /// Another round-trip was in flight; nothing happened.
    IgnoredBusy,
    /// The backend answered.
    Answered { schemes_replaced: bool },
    /// The round-trip failed; an error reply was appended.
    Failed(ClientError),
}

impl SubmitOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, SubmitOutcome::IgnoredEmpty | SubmitOutcome::IgnoredBusy)
    }
}

/// Clears the pending flag when the round-trip ends, on every path.
struct PendingGuard<'a> {
    flag: &'a AtomicBool,
    watch: &'a watch::Sender<bool>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        self.watch.send_replace(false);
    }
}

/// Owns the transcript and the displayed scheme set for one conversation.
pub struct ChatSession {
    api: Arc<dyn ChatApi>,
    notifier: Notifier,
    transcript: Mutex<Vec<ChatMessage>>,
    schemes: Mutex<Vec<SchemeMatch>>,
    pending: AtomicBool,
    pending_tx: watch::Sender<bool>,
    speaker: Option<Arc<Speaker>>,
    speak_enabled: AtomicBool,
    history_limit: usize,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("messages", &self.lock_transcript().len())
            .field("pending", &self.is_pending())
            .field("history_limit", &self.history_limit)
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Start a conversation with the welcome message in `language`.
    pub fn new(api: Arc<dyn ChatApi>, notifier: Notifier, language: &str) -> Self {
        let (pending_tx, _) = watch::channel(false);
        Self {
            api,
            notifier,
            transcript: Mutex::new(vec![ChatMessage::assistant(t(language, "welcomeMessage"))]),
            schemes: Mutex::new(Vec::new()),
            pending: AtomicBool::new(false),
            pending_tx,
            speaker: None,
            speak_enabled: AtomicBool::new(true),
            history_limit: MAX_HISTORY_LIMIT,
        }
    }

    /// Apply the `[chat]` config section.
    pub fn with_config(mut self, config: &ChatConfig) -> Self {
        self.history_limit = config.effective_history_limit();
        self.speak_enabled = AtomicBool::new(config.speak_replies);
        self
    }

    /// Speak assistant answers through `speaker` while voice output is on.
    pub fn with_speaker(mut self, speaker: Arc<Speaker>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    fn lock_transcript(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.transcript.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_schemes(&self) -> MutexGuard<'_, Vec<SchemeMatch>> {
        self.schemes.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the transcript, oldest first.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock_transcript().clone()
    }

    pub fn len(&self) -> usize {
        self.lock_transcript().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_transcript().is_empty()
    }

    /// Snapshot of the currently displayed schemes.
    pub fn schemes(&self) -> Vec<SchemeMatch> {
        self.lock_schemes().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Observe the pending flag, e.g. to render a waiting indicator.
    pub fn subscribe_pending(&self) -> watch::Receiver<bool> {
        self.pending_tx.subscribe()
    }

    pub fn speak_enabled(&self) -> bool {
        self.speak_enabled.load(Ordering::SeqCst)
    }

    pub fn set_speak_enabled(&self, enabled: bool) {
        self.speak_enabled.store(enabled, Ordering::SeqCst);
        tracing::debug!(enabled, "Voice output toggled");
    }

    fn try_begin(&self) -> Option<PendingGuard<'_>> {
        self.pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        Some(PendingGuard {
            flag: &self.pending,
            watch: &self.pending_tx,
        })
    }

    fn append(&self, message: ChatMessage) {
        self.lock_transcript().push(message);
    }

    /// Send one user turn and record the reply.
    ///
    /// The user message is appended before the request goes out. Exactly one
    /// assistant message follows once the round-trip settles, whether it
    /// succeeded or failed. Calls made while another round-trip is in flight
    /// are ignored.
    pub async fn submit(
        &self,
        raw_text: &str,
        profile: &ProfileRecord,
        language: &str,
    ) -> SubmitOutcome {
        let text = raw_text.trim();
        if text.is_empty() {
            return SubmitOutcome::IgnoredEmpty;
        }
        let Some(_pending) = self.try_begin() else {
            tracing::debug!("Submit ignored: request already in flight");
            return SubmitOutcome::IgnoredBusy;
        };

        let history = {
            let mut transcript = self.lock_transcript();
            transcript.push(ChatMessage::user(text));
            history_window(&transcript, self.history_limit)
        };
        self.pending_tx.send_replace(true);

        let request = ChatRequest {
            message: text.to_string(),
            profile: profile.clone(),
            language: language.to_string(),
            history,
        };
        tracing::info!(
            language = %language,
            history = request.history.len(),
            "Sending chat request"
        );

        match self.api.chat(&request).await {
            Ok(reply) => {
                let answer = reply
                    .answer
                    .unwrap_or_else(|| FALLBACK_ANSWER.to_string());
                self.append(ChatMessage::assistant(answer.clone()));

                let schemes_replaced = !reply.schemes.is_empty();
                if schemes_replaced {
                    *self.lock_schemes() = reply.schemes;
                }
                tracing::info!(schemes_replaced, "Chat reply received");

                self.speak(&answer, language);
                SubmitOutcome::Answered { schemes_replaced }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                self.append(ChatMessage::assistant(ERROR_REPLY));
                self.notifier.notify(e.to_string(), None);
                SubmitOutcome::Failed(e)
            }
        }
    }

    fn speak(&self, answer: &str, language: &str) {
        if !self.speak_enabled() {
            return;
        }
        if let Some(speaker) = &self.speaker {
            speaker.spawn_speak(answer, language);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
