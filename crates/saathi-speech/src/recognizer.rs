//! Continuous speech recognition bound to one locale.
//!
//! The platform recognizer is an external collaborator behind
//! [`RecognitionBackend`]: it offers a capability check, opens a session for a
//! locale, and pushes [`RecognitionEvent`]s into a channel. [`SpeechRecognizer`]
//! owns the session, runs the [`StateMachine`], forwards transcripts to the
//! injected sink, and reports runtime failures through the [`Notifier`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use saathi_core::Notifier;

use crate::error::SpeechError;
use crate::locale::speech_locale;
use crate::state::{RecognitionState, StateMachine};

/// Events a recognition session emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Text recognized so far in the current utterance.
    Transcript { text: String, is_final: bool },
    /// The recognizer failed after starting.
    Error(String),
    /// The recognizer stopped on its own (silence, device released).
    End,
}

/// Receives `(text, is_final)` for every transcript event.
pub type TranscriptSink = Arc<dyn Fn(&str, bool) + Send + Sync>;

/// Platform speech recognition capability.
pub trait RecognitionBackend: Send + Sync {
    /// Whether the host can recognize speech at all.
    fn is_available(&self) -> bool;

    /// Create a recognizer for `locale`. Its events go to `events` until the
    /// returned session is dropped.
    fn open(
        &self,
        locale: &str,
        events: mpsc::UnboundedSender<RecognitionEvent>,
    ) -> Result<Box<dyn RecognitionSession>, SpeechError>;
}

/// One platform recognizer instance.
pub trait RecognitionSession: Send {
    fn start(&mut self) -> Result<(), SpeechError>;
    fn stop(&mut self);
}

struct ActiveSession {
    id: Uuid,
    session: Box<dyn RecognitionSession>,
    alive: Arc<AtomicBool>,
    pump: JoinHandle<()>,
}

/// Speech-to-text controller for a chat session.
pub struct SpeechRecognizer {
    backend: Arc<dyn RecognitionBackend>,
    sink: TranscriptSink,
    notifier: Notifier,
    state: StateMachine,
    locale: &'static str,
    active: Option<ActiveSession>,
}

impl std::fmt::Debug for SpeechRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechRecognizer")
            .field("locale", &self.locale)
            .field("state", &self.state.current())
            .field("session", &self.active.as_ref().map(|a| a.id))
            .finish()
    }
}

impl SpeechRecognizer {
    /// Create a recognizer for `language`.
    ///
    /// When the backend is unavailable (or there is no async runtime to pump
    /// events) the recognizer is created disabled; check
    /// [`SpeechRecognizer::is_available`] before enabling voice controls.
    pub fn new(
        backend: Arc<dyn RecognitionBackend>,
        language: &str,
        sink: TranscriptSink,
        notifier: Notifier,
    ) -> Self {
        let mut recognizer = Self {
            backend,
            sink,
            notifier,
            state: StateMachine::new(),
            locale: speech_locale(language),
            active: None,
        };
        recognizer.open();
        recognizer
    }

    pub fn is_available(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> RecognitionState {
        self.state.current()
    }

    pub fn is_listening(&self) -> bool {
        self.state.current() == RecognitionState::Listening
    }

    pub fn locale(&self) -> &'static str {
        self.locale
    }

    /// Begin streaming transcripts. No-op while already listening.
    pub fn start(&mut self) -> Result<(), SpeechError> {
        let Some(active) = self.active.as_mut() else {
            return Err(SpeechError::Unavailable(format!(
                "no speech recognizer for {}",
                self.locale
            )));
        };
        if self.state.current() == RecognitionState::Listening {
            return Ok(());
        }

        if let Err(e) = active.session.start() {
            tracing::warn!(session_id = %active.id, error = %e, "Speech recognition failed to start");
            if e.should_notify() {
                self.notifier
                    .notify(format!("Voice input failed: {}", e), Some("Info"));
            }
            return Err(e);
        }
        self.state.transition(RecognitionState::Listening)?;
        tracing::info!(session_id = %active.id, locale = self.locale, "Speech recognition started");
        Ok(())
    }

    /// Stop streaming. No-op when not listening.
    pub fn stop(&mut self) {
        if self.state.current() != RecognitionState::Listening {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.session.stop();
            tracing::info!(session_id = %active.id, "Speech recognition stopped");
        }
        self.state.settle();
    }

    /// Rebind to the locale for `language`, tearing down the current session
    /// first. No-op when the locale does not change.
    pub fn set_language(&mut self, language: &str) {
        let locale = speech_locale(language);
        if locale == self.locale && self.active.is_some() {
            return;
        }
        self.teardown();
        self.locale = locale;
        self.state.reset();
        self.open();
    }

    fn open(&mut self) {
        if !self.backend.is_available() {
            tracing::debug!(locale = self.locale, "Speech recognition not supported on this host");
            return;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("No async runtime; speech recognition disabled");
                return;
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let session = match self.backend.open(self.locale, tx) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(locale = self.locale, error = %e, "Failed to create speech recognizer");
                return;
            }
        };

        let id = Uuid::new_v4();
        let alive = Arc::new(AtomicBool::new(true));
        let pump = runtime.spawn(pump_events(
            id,
            rx,
            Arc::clone(&alive),
            Arc::clone(&self.sink),
            self.state.clone(),
            self.notifier.clone(),
        ));
        tracing::debug!(session_id = %id, locale = self.locale, "Speech recognizer created");

        self.active = Some(ActiveSession {
            id,
            session,
            alive,
            pump,
        });
    }

    fn teardown(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.alive.store(false, Ordering::SeqCst);
            if self.state.current() == RecognitionState::Listening {
                active.session.stop();
            }
            active.pump.abort();
            tracing::debug!(session_id = %active.id, "Speech recognizer torn down");
        }
    }
}

impl Drop for SpeechRecognizer {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn pump_events(
    session_id: Uuid,
    mut events: mpsc::UnboundedReceiver<RecognitionEvent>,
    alive: Arc<AtomicBool>,
    sink: TranscriptSink,
    state: StateMachine,
    notifier: Notifier,
) {
    while let Some(event) = events.recv().await {
        if !alive.load(Ordering::SeqCst) {
            break;
        }
        match event {
            RecognitionEvent::Transcript { text, is_final } => {
                tracing::trace!(%session_id, is_final, "Transcript received");
                sink(&text, is_final);
            }
            RecognitionEvent::Error(message) => {
                state.settle();
                tracing::warn!(%session_id, error = %message, "Speech recognition error");
                notifier.notify(format!("Voice input failed: {}", message), Some("Info"));
            }
            RecognitionEvent::End => {
                if state.settle() {
                    tracing::debug!(%session_id, "Speech recognition ended");
                }
            }
        }
    }
}

// =============================================================================
// Backends
// =============================================================================

/// Backend for hosts without speech recognition.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedRecognition;

impl RecognitionBackend for UnsupportedRecognition {
    fn is_available(&self) -> bool {
        false
    }

    fn open(
        &self,
        locale: &str,
        _events: mpsc::UnboundedSender<RecognitionEvent>,
    ) -> Result<Box<dyn RecognitionSession>, SpeechError> {
        Err(SpeechError::Unavailable(format!(
            "speech recognition is not supported here ({})",
            locale
        )))
    }
}

#[derive(Default)]
struct MockState {
    unavailable: bool,
    fail_start: bool,
    opened: Vec<String>,
    starts: usize,
    stops: usize,
    sender: Option<mpsc::UnboundedSender<RecognitionEvent>>,
}

/// Scriptable backend for tests and demos.
///
/// Records every open/start/stop and lets the caller inject events into the
/// most recently opened session.
#[derive(Clone, Default)]
pub struct MockRecognitionBackend {
    inner: Arc<Mutex<MockState>>,
}

impl MockRecognitionBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose capability check is negative.
    pub fn unavailable() -> Self {
        let backend = Self::default();
        backend.with(|s| s.unavailable = true);
        backend
    }

    /// A backend whose sessions refuse to start.
    pub fn failing_start() -> Self {
        let backend = Self::default();
        backend.with(|s| s.fail_start = true);
        backend
    }

    fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// Push an event to the latest session. Returns false if none is open.
    pub fn emit(&self, event: RecognitionEvent) -> bool {
        self.with(|s| match &s.sender {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        })
    }

    /// Sender of the latest session, for simulating late events.
    pub fn sender(&self) -> Option<mpsc::UnboundedSender<RecognitionEvent>> {
        self.with(|s| s.sender.clone())
    }

    pub fn opened_locales(&self) -> Vec<String> {
        self.with(|s| s.opened.clone())
    }

    pub fn starts(&self) -> usize {
        self.with(|s| s.starts)
    }

    pub fn stops(&self) -> usize {
        self.with(|s| s.stops)
    }
}

struct MockSession {
    inner: Arc<Mutex<MockState>>,
}

impl RecognitionSession for MockSession {
    fn start(&mut self) -> Result<(), SpeechError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if state.fail_start {
            return Err(SpeechError::Recognition(
                "microphone permission denied".to_string(),
            ));
        }
        state.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.stops += 1;
    }
}

impl RecognitionBackend for MockRecognitionBackend {
    fn is_available(&self) -> bool {
        self.with(|s| !s.unavailable)
    }

    fn open(
        &self,
        locale: &str,
        events: mpsc::UnboundedSender<RecognitionEvent>,
    ) -> Result<Box<dyn RecognitionSession>, SpeechError> {
        self.with(|s| {
            if s.unavailable {
                return Err(SpeechError::Unavailable("mock disabled".to_string()));
            }
            s.opened.push(locale.to_string());
            s.sender = Some(events);
            Ok(())
        })?;
        Ok(Box::new(MockSession {
            inner: Arc::clone(&self.inner),
        }))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Harness {
        backend: MockRecognitionBackend,
        notifier: Notifier,
        transcripts: mpsc::UnboundedReceiver<(String, bool)>,
        recognizer: SpeechRecognizer,
    }

    fn harness(backend: MockRecognitionBackend, language: &str) -> Harness {
        let notifier = Notifier::new(Duration::from_secs(10));
        let (tx, transcripts) = mpsc::unbounded_channel();
        let sink: TranscriptSink = Arc::new(move |text: &str, is_final: bool| {
            let _ = tx.send((text.to_string(), is_final));
        });
        let recognizer = SpeechRecognizer::new(
            Arc::new(backend.clone()),
            language,
            sink,
            notifier.clone(),
        );
        Harness {
            backend,
            notifier,
            transcripts,
            recognizer,
        }
    }

    async fn wait_until(mut cond: impl FnMut() -> bool) {
        for _ in 0..100 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached in time");
    }

    async fn next_transcript(h: &mut Harness) -> (String, bool) {
        tokio::time::timeout(Duration::from_secs(1), h.transcripts.recv())
            .await
            .expect("transcript in time")
            .expect("sink alive")
    }

    #[tokio::test]
    async fn test_unavailable_backend_disables_controls() {
        let mut h = harness(MockRecognitionBackend::unavailable(), "en");
        assert!(!h.recognizer.is_available());

        let err = h.recognizer.start().unwrap_err();
        assert!(matches!(err, SpeechError::Unavailable(_)));
        assert!(h.notifier.current().is_none());
        assert_eq!(h.recognizer.state(), RecognitionState::Idle);
    }

    #[tokio::test]
    async fn test_unsupported_backend() {
        let notifier = Notifier::default();
        let mut recognizer = SpeechRecognizer::new(
            Arc::new(UnsupportedRecognition),
            "hi",
            Arc::new(|_: &str, _: bool| {}),
            notifier.clone(),
        );
        assert!(!recognizer.is_available());
        assert!(recognizer.start().is_err());
        recognizer.stop();
        assert!(notifier.current().is_none());
    }

    #[tokio::test]
    async fn test_start_stop_cycle() {
        let mut h = harness(MockRecognitionBackend::new(), "en");
        assert!(h.recognizer.is_available());
        assert_eq!(h.recognizer.locale(), "en-IN");

        h.recognizer.start().unwrap();
        assert!(h.recognizer.is_listening());
        h.recognizer.stop();
        assert_eq!(h.recognizer.state(), RecognitionState::Stopped);

        h.recognizer.start().unwrap();
        assert!(h.recognizer.is_listening());
        assert_eq!(h.backend.starts(), 2);
        assert_eq!(h.backend.stops(), 1);
    }

    #[tokio::test]
    async fn test_start_while_listening_is_noop() {
        let mut h = harness(MockRecognitionBackend::new(), "en");
        h.recognizer.start().unwrap();
        h.recognizer.start().unwrap();
        assert_eq!(h.backend.starts(), 1);
        assert!(h.recognizer.is_listening());
    }

    #[tokio::test]
    async fn test_stop_when_not_listening_is_noop() {
        let mut h = harness(MockRecognitionBackend::new(), "en");
        h.recognizer.stop();
        h.recognizer.stop();
        assert_eq!(h.backend.stops(), 0);
        assert_eq!(h.recognizer.state(), RecognitionState::Idle);
    }

    #[tokio::test]
    async fn test_transcripts_stream_to_sink() {
        let mut h = harness(MockRecognitionBackend::new(), "en");
        h.recognizer.start().unwrap();

        h.backend.emit(RecognitionEvent::Transcript {
            text: "I am".into(),
            is_final: false,
        });
        h.backend.emit(RecognitionEvent::Transcript {
            text: "I am a farmer".into(),
            is_final: true,
        });

        assert_eq!(next_transcript(&mut h).await, ("I am".to_string(), false));
        assert_eq!(
            next_transcript(&mut h).await,
            ("I am a farmer".to_string(), true)
        );
    }

    #[tokio::test]
    async fn test_error_event_stops_and_notifies() {
        let mut h = harness(MockRecognitionBackend::new(), "en");
        h.recognizer.start().unwrap();
        h.backend
            .emit(RecognitionEvent::Error("network".into()));

        let notifier = h.notifier.clone();
        wait_until(|| notifier.current().is_some()).await;
        assert_eq!(h.recognizer.state(), RecognitionState::Stopped);
        assert!(h
            .notifier
            .current()
            .unwrap()
            .message
            .contains("network"));
    }

    #[tokio::test]
    async fn test_end_event_stops_without_notification() {
        let mut h = harness(MockRecognitionBackend::new(), "en");
        h.recognizer.start().unwrap();
        h.backend.emit(RecognitionEvent::End);

        let state = h.recognizer.state.clone();
        wait_until(|| state.current() == RecognitionState::Stopped).await;
        assert!(h.notifier.current().is_none());

        // Restart after the platform ended the session
        h.recognizer.start().unwrap();
        assert!(h.recognizer.is_listening());
    }

    #[tokio::test]
    async fn test_start_failure_notifies_and_stays_idle() {
        let mut h = harness(MockRecognitionBackend::failing_start(), "en");
        let err = h.recognizer.start().unwrap_err();
        assert!(matches!(err, SpeechError::Recognition(_)));
        assert_eq!(h.recognizer.state(), RecognitionState::Idle);
        assert!(h.notifier.current().is_some());
    }

    #[tokio::test]
    async fn test_language_change_recreates_recognizer() {
        let mut h = harness(MockRecognitionBackend::new(), "en");
        h.recognizer.start().unwrap();

        h.recognizer.set_language("hi");
        assert_eq!(h.recognizer.locale(), "hi-IN");
        assert_eq!(h.recognizer.state(), RecognitionState::Idle);
        assert_eq!(h.backend.opened_locales(), vec!["en-IN", "hi-IN"]);
        // The listening session was stopped before the new one was created
        assert_eq!(h.backend.stops(), 1);
    }

    #[tokio::test]
    async fn test_same_locale_does_not_recreate() {
        let mut h = harness(MockRecognitionBackend::new(), "en");
        h.recognizer.set_language("fr");
        assert_eq!(h.backend.opened_locales(), vec!["en-IN"]);
    }

    #[tokio::test]
    async fn test_events_from_old_session_are_ignored() {
        let mut h = harness(MockRecognitionBackend::new(), "en");
        let stale = h.backend.sender().unwrap();

        h.recognizer.set_language("hi");
        h.recognizer.start().unwrap();

        let _ = stale.send(RecognitionEvent::Transcript {
            text: "stale".into(),
            is_final: true,
        });
        h.backend.emit(RecognitionEvent::Transcript {
            text: "fresh".into(),
            is_final: true,
        });

        assert_eq!(next_transcript(&mut h).await, ("fresh".to_string(), true));
    }
}
