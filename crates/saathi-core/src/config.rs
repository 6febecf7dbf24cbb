use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SaathiError};
use crate::types::DEFAULT_LANGUAGE;

/// Upper bound on the number of transcript entries sent as chat history.
pub const MAX_HISTORY_LIMIT: usize = 10;

/// Top-level configuration for the Saathi client.
///
/// Loaded from `~/.saathi/config.toml` by default. Each section corresponds
/// to one component of the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaathiConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl SaathiConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SaathiConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    /// or unusable.
    ///
    /// Nothing is logged here so callers can load before tracing is set up.
    /// A missing file yields defaults with no error; any other failure is
    /// handed back alongside the defaults for the caller to report.
    pub fn load_or_fallback(path: &Path) -> (Self, Option<SaathiError>) {
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(SaathiError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                (Self::default(), None)
            }
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let base = self.api.base_url.trim();
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(SaathiError::Config(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_ms == 0 {
            return Err(SaathiError::Config(
                "api.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.chat.history_limit == 0 {
            return Err(SaathiError::Config(
                "chat.history_limit must be greater than 0".to_string(),
            ));
        }
        if self.notify.dismiss_after_ms == 0 {
            return Err(SaathiError::Config(
                "notify.dismiss_after_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// General client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Initial UI language code ("en", "hi").
    pub language: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Remote API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the scheme navigator backend.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 15_000,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Chat workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of trailing transcript entries sent with each request (max 10).
    pub history_limit: usize,
    /// Whether assistant replies are spoken through remote TTS.
    pub speak_replies: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: MAX_HISTORY_LIMIT,
            speak_replies: true,
        }
    }
}

impl ChatConfig {
    /// History limit clamped to the protocol maximum.
    pub fn effective_history_limit(&self) -> usize {
        self.history_limit.clamp(1, MAX_HISTORY_LIMIT)
    }
}

/// Speech input/output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Temporary audio files are released after this many seconds even if
    /// playback has not finished.
    pub release_after_secs: u64,
    /// External command used to play synthesized audio. The file path is
    /// appended as the last argument. `None` disables local playback.
    pub player_command: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            release_after_secs: 30,
            player_command: None,
        }
    }
}

impl SpeechConfig {
    pub fn release_after(&self) -> Duration {
        Duration::from_secs(self.release_after_secs)
    }
}

/// Notification slot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Auto-dismiss delay in milliseconds.
    pub dismiss_after_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: 3_000,
        }
    }
}

impl NotifyConfig {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }
}

// =============================================================================
// Tests
// =============================================================================
