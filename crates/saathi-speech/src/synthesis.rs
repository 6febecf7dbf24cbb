//! Text-to-speech: remote synthesis, temporary audio file, local playback.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use saathi_client::TtsApi;
use saathi_core::Notifier;

use crate::error::SpeechError;

/// How long a temporary audio file outlives the start of playback.
pub const DEFAULT_RELEASE_AFTER: Duration = Duration::from_secs(30);

/// Plays an audio file to completion.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, path: &Path) -> Result<(), SpeechError>;
}

/// Plays audio by running an external program with the file path appended.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a whitespace-separated command line such as `"mpv --really-quiet"`.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, path: &Path) -> Result<(), SpeechError> {
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| SpeechError::Playback(format!("{}: {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Playback(format!(
                "{} exited with {}",
                self.program, status
            )))
        }
    }
}

/// Pick a file extension from the audio payload's magic bytes.
fn audio_extension(audio: &[u8]) -> &'static str {
    match audio {
        [b'R', b'I', b'F', b'F', ..] => ".wav",
        [b'O', b'g', b'g', b'S', ..] => ".ogg",
        [b'I', b'D', b'3', ..] | [0xFF, ..] => ".mp3",
        _ => ".mp3",
    }
}

/// Speaks assistant replies. Best-effort: failures become notifications.
pub struct Speaker {
    api: Arc<dyn TtsApi>,
    player: Arc<dyn AudioPlayer>,
    notifier: Notifier,
    release_after: Duration,
}

impl std::fmt::Debug for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Speaker")
            .field("release_after", &self.release_after)
            .finish_non_exhaustive()
    }
}

impl Speaker {
    pub fn new(
        api: Arc<dyn TtsApi>,
        player: Arc<dyn AudioPlayer>,
        notifier: Notifier,
        release_after: Duration,
    ) -> Self {
        Self {
            api,
            player,
            notifier,
            release_after,
        }
    }

    /// Synthesize and play `text`, returning any failure.
    ///
    /// The temporary file is removed once playback finishes or
    /// `release_after` elapses, whichever comes first. Playback that outlives
    /// the deadline keeps running detached.
    pub async fn try_speak(&self, text: &str, language: &str) -> Result<(), SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let audio = self.api.synthesize(text, language).await?;
        let file = tempfile::Builder::new()
            .prefix("saathi-tts-")
            .suffix(audio_extension(&audio))
            .tempfile()?;
        tokio::fs::write(file.path(), &audio).await?;
        tracing::debug!(bytes = audio.len(), path = %file.path().display(), "Audio written");

        let path: PathBuf = file.path().to_path_buf();
        let player = Arc::clone(&self.player);
        let mut playback = tokio::spawn(async move { player.play(&path).await });

        let outcome = tokio::time::timeout(self.release_after, &mut playback).await;
        if let Err(e) = file.close() {
            tracing::warn!(error = %e, "Failed to remove temporary audio file");
        }

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(SpeechError::Playback(join.to_string())),
            Err(_) => {
                tracing::debug!(
                    after_secs = self.release_after.as_secs_f64(),
                    "Audio released while playback continues"
                );
                Ok(())
            }
        }
    }

    /// Speak `text`; failures go to the notification slot.
    pub async fn speak(&self, text: &str, language: &str) {
        if let Err(e) = self.try_speak(text, language).await {
            tracing::warn!(error = %e, "Voice output failed");
            if e.should_notify() {
                self.notifier
                    .notify(format!("Voice output failed: {}", e), Some("Info"));
            }
        }
    }

    /// Fire-and-forget [`Speaker::speak`] on the current runtime.
    pub fn spawn_speak(
        self: &Arc<Self>,
        text: impl Into<String>,
        language: impl Into<String>,
    ) -> Option<JoinHandle<()>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("No async runtime; skipping voice output");
                return None;
            }
        };
        let speaker = Arc::clone(self);
        let text = text.into();
        let language = language.into();
        Some(handle.spawn(async move { speaker.speak(&text, &language).await }))
    }
}

// =============================================================================
// Tests
// =============================================================================
