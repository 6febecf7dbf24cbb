//! Request and response bodies for the backend endpoints.

use serde::{Deserialize, Serialize};

use saathi_core::{HistoryEntry, ProfileRecord, SchemeMatch};

/// Body of `POST /chat`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub profile: ProfileRecord,
    pub language: String,
    pub history: Vec<HistoryEntry>,
}

/// Decoded reply from `POST /chat`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatReply {
    /// `None` when the backend omitted the answer (or sent `null`).
    pub answer: Option<String>,
    /// Identifiable schemes, in response order. Empty when the field was
    /// absent, not a list, or empty.
    pub schemes: Vec<SchemeMatch>,
}

/// Raw `/chat` body. The backend has used both `answer`/`schemes` and
/// `response`/`matched_schemes`, sometimes in the same body; `answer` and
/// `schemes` win when both are present.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatReplyWire {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub schemes: Option<serde_json::Value>,
    #[serde(default)]
    pub matched_schemes: Option<serde_json::Value>,
}

impl From<ChatReplyWire> for ChatReply {
    fn from(wire: ChatReplyWire) -> Self {
        let raw = match wire.schemes {
            Some(serde_json::Value::Null) | None => wire.matched_schemes,
            present => present,
        };
        let schemes = match raw {
            Some(serde_json::Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<SchemeMatch>(item) {
                    Ok(scheme) if scheme.is_identifiable() => Some(scheme),
                    Ok(_) => {
                        tracing::debug!("Dropping scheme without id or title");
                        None
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Dropping undecodable scheme");
                        None
                    }
                })
                .collect(),
            Some(serde_json::Value::Null) | None => Vec::new(),
            Some(other) => {
                tracing::debug!(kind = %json_kind(&other), "Ignoring non-list schemes field");
                Vec::new()
            }
        };
        ChatReply {
            answer: wire.answer.or(wire.response),
            schemes,
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Body of `POST /tts`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    pub language: String,
}

/// Reply from `GET /health`. Any success status means healthy; the body is
/// informational.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub schemes_loaded: Option<u64>,
}

/// Filter for `GET /schemes`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemeQuery {
    pub category: Option<String>,
    pub language: Option<String>,
}

/// Reply from `GET /schemes`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemeCatalog {
    #[serde(default)]
    pub schemes: Vec<SchemeMatch>,
    #[serde(default)]
    pub count: usize,
}
