use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of tags rendered on a scheme card.
pub const MAX_DISPLAY_TAGS: usize = 6;

// =============================================================================
// Enums
// =============================================================================

/// Author of a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transcript
// =============================================================================

/// A single transcript entry. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Wire form sent as chat history: role and content, timestamp stripped.
    pub fn to_history(&self) -> HistoryEntry {
        HistoryEntry {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// A transcript entry as sent to the chat endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

// =============================================================================
// Schemes
// =============================================================================

/// A government scheme suggested by the backend.
///
/// The backend has shipped two field naming conventions (`title`/`summary`
/// and `name`/`description`); both are accepted, and `title`/`summary` win
/// when a body carries both.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SchemeMatchWire")]
pub struct SchemeMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Deserialize)]
struct SchemeMatchWire {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    tags: Vec<String>,
    #[serde(default)]
    url: Option<String>,
}

impl From<SchemeMatchWire> for SchemeMatch {
    fn from(wire: SchemeMatchWire) -> Self {
        Self {
            id: wire.id,
            title: wire.title.or(wire.name),
            summary: wire.summary.or(wire.description),
            tags: wire.tags,
            url: wire.url,
        }
    }
}

impl SchemeMatch {
    /// Identity key: the id when present, the title otherwise.
    pub fn key(&self) -> Option<&str> {
        non_blank(self.id.as_deref()).or_else(|| non_blank(self.title.as_deref()))
    }

    /// A scheme without an id or a title cannot be displayed or keyed.
    pub fn is_identifiable(&self) -> bool {
        self.key().is_some()
    }

    /// Tags in order, capped at [`MAX_DISPLAY_TAGS`].
    pub fn display_tags(&self) -> &[String] {
        let end = self.tags.len().min(MAX_DISPLAY_TAGS);
        &self.tags[..end]
    }

    /// Heading for a scheme card: title, falling back to the id.
    pub fn display_title(&self) -> &str {
        non_blank(self.title.as_deref())
            .or_else(|| non_blank(self.id.as_deref()))
            .unwrap_or_default()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Language
// =============================================================================

/// Language codes the UI offers, with their native labels.
pub const LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("hi", "हिंदी")];

/// Default UI language code.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Whether `code` is one of the offered UI languages.
pub fn is_supported_language(code: &str) -> bool {
    LANGUAGES.iter().any(|(c, _)| *c == code)
}

// =============================================================================
// Tests
// =============================================================================
