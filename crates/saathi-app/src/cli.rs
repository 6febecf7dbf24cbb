//! CLI argument definitions for the Saathi terminal client.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use saathi_core::types::{is_supported_language, DEFAULT_LANGUAGE};

/// Saathi - chat with a government scheme navigator from the terminal.
#[derive(Parser, Debug)]
#[command(name = "saathi", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the scheme navigator API.
    #[arg(short = 'u', long = "api-url")]
    pub api_url: Option<String>,

    /// UI language code (en, hi).
    #[arg(short = 'L', long = "lang")]
    pub lang: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Start with voice output off.
    #[arg(long = "no-voice")]
    pub no_voice: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SAATHI_CONFIG env var > platform default (~/.saathi/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("SAATHI_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the API base URL.
    ///
    /// Priority: --api-url flag > SAATHI_API_BASE_URL env var > config file value.
    pub fn resolve_api_url(&self, config_url: &str) -> String {
        if let Some(ref url) = self.api_url {
            return url.clone();
        }
        if let Ok(url) = std::env::var("SAATHI_API_BASE_URL") {
            if !url.trim().is_empty() {
                return url;
            }
        }
        config_url.to_string()
    }

    /// Resolve the UI language, ignoring unsupported codes.
    ///
    /// Priority: --lang flag > config file value > English.
    pub fn resolve_language(&self, config_lang: &str) -> String {
        self.lang
            .as_deref()
            .into_iter()
            .chain(std::iter::once(config_lang))
            .find(|code| is_supported_language(code))
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string()
    }

    /// Resolve the log filter directive.
    ///
    /// Priority: --log-level flag > RUST_LOG > config file value.
    pub fn resolve_log_filter(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(filter) = std::env::var("RUST_LOG") {
            if !filter.trim().is_empty() {
                return filter;
            }
        }
        config_level.to_string()
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".saathi").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".saathi").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "saathi",
            "--config",
            "/tmp/saathi.toml",
            "--api-url",
            "http://10.0.0.2:9000",
            "--lang",
            "hi",
            "--no-voice",
        ]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/saathi.toml"));
        assert_eq!(args.resolve_api_url("http://ignored"), "http://10.0.0.2:9000");
        assert_eq!(args.resolve_language("en"), "hi");
        assert!(args.no_voice);
    }

    #[test]
    fn test_unsupported_language_flag_falls_back() {
        let args = CliArgs::parse_from(["saathi", "-L", "xx"]);
        assert_eq!(args.resolve_language("en"), "en");
        assert_eq!(args.resolve_language("hi"), "hi");
    }

    #[test]
    fn test_unsupported_config_language_uses_default() {
        let args = CliArgs::parse_from(["saathi"]);
        assert_eq!(args.resolve_language("fr"), DEFAULT_LANGUAGE);

        let args = CliArgs::parse_from(["saathi", "-L", "xx"]);
        assert_eq!(args.resolve_language("fr"), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_log_level_flag_wins() {
        let args = CliArgs::parse_from(["saathi", "-l", "debug"]);
        assert_eq!(args.resolve_log_filter("warn"), "debug");
    }
}
