//! Saathi application binary - composition root.
//!
//! Ties together the Saathi crates into a terminal client:
//! 1. Parse CLI arguments and read configuration from TOML
//! 2. Initialize tracing, then report how the configuration was loaded
//! 3. Build the HTTP client, notification slot, and optional voice output
//! 4. Run the interactive read loop until /quit or end of input

mod app;
mod cli;
mod commands;
mod render;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use saathi_client::HttpClient;
use saathi_core::{Notifier, SaathiConfig};
use saathi_speech::{CommandPlayer, Speaker, UnsupportedRecognition};

use app::{AppSession, Flow, Services};
use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. It carries the log level, so load errors are held until the
    // subscriber is up.
    let config_file = args.resolve_config_path();
    let (mut config, load_error) = SaathiConfig::load_or_fallback(&config_file);

    // Tracing. Logs go to stderr so they do not interleave with the chat.
    let filter = args.resolve_log_filter(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Saathi v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        Some(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config, using defaults"
        ),
        None if config_file.exists() => {
            tracing::info!(path = %config_file.display(), "Configuration loaded")
        }
        None => tracing::info!(path = %config_file.display(), "No config file, using defaults"),
    }

    config.api.base_url = args.resolve_api_url(&config.api.base_url);
    if args.no_voice {
        config.chat.speak_replies = false;
    }
    config.validate()?;

    let language = args.resolve_language(&config.general.language);
    let notifier = Notifier::new(config.notify.dismiss_after());
    let client = Arc::new(HttpClient::new(&config.api)?);

    let speaker = match config
        .speech
        .player_command
        .as_deref()
        .and_then(CommandPlayer::from_command_line)
    {
        Some(player) => {
            tracing::info!(player = %player.program(), "Voice output enabled");
            Some(Arc::new(Speaker::new(
                client.clone(),
                Arc::new(player),
                notifier.clone(),
                config.speech.release_after(),
            )))
        }
        None => {
            tracing::info!("No audio player configured; voice output disabled");
            None
        }
    };

    let services = Services {
        chat: client.clone(),
        catalog: client.clone(),
        speaker,
        recognition: Arc::new(UnsupportedRecognition),
    };
    let mut app = AppSession::new(&config, &language, services, notifier.clone());

    let mut out = std::io::stdout();
    app.greet(&mut out)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut notes = notifier.subscribe();

    let mut prompt = true;
    loop {
        if prompt {
            print!("> ");
            out.flush()?;
            prompt = false;
        }

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                prompt = true;
                match commands::parse(&line) {
                    Ok(command) => {
                        if app.handle(command, &mut out).await? == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => writeln!(out, "{}", e)?,
                }
            }
            changed = notes.changed() => {
                if changed.is_err() {
                    break;
                }
                let note = notes.borrow_and_update().clone();
                if let Some(text) = render::notification_change(note.as_ref(), app.language()) {
                    writeln!(out, "{}", text)?;
                    prompt = true;
                }
            }
        }
    }

    tracing::info!("Saathi exiting");
    Ok(())
}
