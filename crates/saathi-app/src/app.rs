//! Root session for the terminal front end.
//!
//! `AppSession` owns the language selection, the profile form, the chat
//! session, the speech recognizer, and the voice draft, and dispatches parsed
//! [`Command`]s against them.

use std::io::Write;
use std::sync::{Arc, Mutex};

use saathi_chat::{ChatSession, SubmitOutcome};
use saathi_client::{CatalogApi, ChatApi, SchemeQuery};
use saathi_core::i18n::t;
use saathi_core::types::is_supported_language;
use saathi_core::{Notifier, ProfileForm, SaathiConfig};
use saathi_speech::{RecognitionBackend, Speaker, SpeechRecognizer, TranscriptSink};

use crate::commands::{Command, HELP};
use crate::render;

/// Whether the read loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// External collaborators the session talks to.
pub struct Services {
    pub chat: Arc<dyn ChatApi>,
    pub catalog: Arc<dyn CatalogApi>,
    pub speaker: Option<Arc<Speaker>>,
    pub recognition: Arc<dyn RecognitionBackend>,
}

pub struct AppSession {
    language: String,
    profile: ProfileForm,
    chat: ChatSession,
    recognizer: SpeechRecognizer,
    draft: Arc<Mutex<String>>,
    catalog: Arc<dyn CatalogApi>,
    notifier: Notifier,
}

impl AppSession {
    pub fn new(config: &SaathiConfig, language: &str, services: Services, notifier: Notifier) -> Self {
        let mut chat = ChatSession::new(services.chat, notifier.clone(), language)
            .with_config(&config.chat);
        if let Some(speaker) = services.speaker {
            chat = chat.with_speaker(speaker);
        }

        let draft = Arc::new(Mutex::new(String::new()));
        let recognizer = SpeechRecognizer::new(
            services.recognition,
            language,
            draft_sink(Arc::clone(&draft)),
            notifier.clone(),
        );

        Self {
            language: language.to_string(),
            profile: ProfileForm::default(),
            chat,
            recognizer,
            draft,
            catalog: services.catalog,
            notifier,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn take_draft(&self) -> String {
        std::mem::take(&mut *self.draft.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Banner and transcript shown at startup.
    pub fn greet(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "{} - {}", t(&self.language, "title"), t(&self.language, "subtitle"))?;
        for msg in self.chat.transcript() {
            writeln!(out, "{}", render::message(&msg, &self.language))?;
        }
        if !self.recognizer.is_available() {
            writeln!(out, "{}", t(&self.language, "voiceUnsupported"))?;
        }
        writeln!(out, "Type /help for commands.")
    }

    pub async fn handle(&mut self, command: Command, out: &mut impl Write) -> std::io::Result<Flow> {
        let lang = self.language.clone();
        match command {
            Command::Send(text) => {
                self.take_draft();
                self.send(&text, out).await?;
            }
            Command::SendDraft => {
                let text = self.take_draft();
                if !text.trim().is_empty() {
                    self.send(&text, out).await?;
                }
            }
            Command::SetProfile { field, value } => {
                self.profile.set(field, value);
                writeln!(
                    out,
                    "{}: {}",
                    t(&lang, field.label_key()),
                    self.profile.get(field).trim()
                )?;
            }
            Command::ShowProfile => {
                writeln!(out, "{}", render::profile(&self.profile, &lang))?;
            }
            Command::ResetProfile => {
                self.profile.reset();
                writeln!(out, "{}", render::profile(&self.profile, &lang))?;
            }
            Command::Language(code) => {
                if is_supported_language(&code) {
                    self.set_language(&code);
                    writeln!(out, "{}: {}", t(&code, "language"), code)?;
                } else {
                    writeln!(out, "unsupported language: {}", code)?;
                }
            }
            Command::Voice(enabled) => {
                self.chat.set_speak_enabled(enabled);
                writeln!(
                    out,
                    "{}: {}",
                    t(&lang, "voiceOut"),
                    if enabled { "ON" } else { "OFF" }
                )?;
            }
            Command::Listen => {
                if !self.recognizer.is_available() {
                    writeln!(out, "{}", t(&lang, "voiceUnsupported"))?;
                } else if self.recognizer.start().is_ok() {
                    writeln!(out, "{}", t(&lang, "listening"))?;
                }
            }
            Command::Stop => {
                self.recognizer.stop();
                writeln!(out, "{}", t(&lang, "notListening"))?;
            }
            Command::Clear => {
                self.take_draft();
            }
            Command::Health => match self.catalog.health().await {
                Ok(status) => writeln!(
                    out,
                    "server: {} ({} schemes)",
                    status.status.as_deref().unwrap_or("ok"),
                    status
                        .schemes_loaded
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "?".to_string())
                )?,
                Err(e) => writeln!(out, "server unreachable: {}", e)?,
            },
            Command::Schemes(category) => {
                let query = SchemeQuery {
                    category,
                    language: Some(lang.clone()),
                };
                match self.catalog.list_schemes(&query).await {
                    Ok(catalog) => writeln!(out, "{}", render::scheme_list(&catalog.schemes, &lang))?,
                    Err(e) => self.notifier.notify(e.to_string(), None),
                }
            }
            Command::Scheme(id) => match self.catalog.get_scheme(&id, &lang).await {
                Ok(scheme) => writeln!(out, "{}", render::scheme_card(&scheme, &lang))?,
                Err(e) => self.notifier.notify(e.to_string(), None),
            },
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => {
                self.recognizer.stop();
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn set_language(&mut self, code: &str) {
        if self.language == code {
            return;
        }
        tracing::info!(from = %self.language, to = %code, "Language changed");
        self.language = code.to_string();
        self.recognizer.set_language(code);
    }

    async fn send(&mut self, text: &str, out: &mut impl Write) -> std::io::Result<()> {
        let before = self.chat.len();
        let record = self.profile.normalize();
        writeln!(out, "{}", t(&self.language, "thinking"))?;

        let outcome = self.chat.submit(text, &record, &self.language).await;
        if outcome.is_ignored() {
            return Ok(());
        }
        for msg in self.chat.transcript().iter().skip(before) {
            writeln!(out, "{}", render::message(msg, &self.language))?;
        }
        if let SubmitOutcome::Answered {
            schemes_replaced: true,
        } = outcome
        {
            writeln!(out, "{}", render::scheme_list(&self.chat.schemes(), &self.language))?;
        }
        Ok(())
    }
}

/// Recognized speech replaces the draft.
fn draft_sink(draft: Arc<Mutex<String>>) -> TranscriptSink {
    Arc::new(move |text: &str, is_final: bool| {
        *draft.lock().unwrap_or_else(|e| e.into_inner()) = text.to_string();
        if is_final {
            println!("(voice) {}  [press Enter to send, /clear to discard]", text);
        }
    })
}

// =============================================================================
// Tests
// =============================================================================
