//! reqwest implementation of the endpoint traits.

use async_trait::async_trait;
use reqwest::{Method, Response, Url};
use serde::de::DeserializeOwned;

use saathi_core::config::ApiConfig;
use saathi_core::SchemeMatch;

use crate::api::{CatalogApi, ChatApi, TtsApi};
use crate::error::ClientError;
use crate::types::{
    ChatReply, ChatReplyWire, ChatRequest, HealthStatus, SchemeCatalog, SchemeQuery, TtsRequest,
};

/// HTTP client for the scheme navigator backend.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| ClientError::Config(format!("invalid base url '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base url '{}' cannot carry paths",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build http client: {}", e)))?;

        tracing::info!(base_url = %base_url, timeout_ms = config.timeout_ms, "API client ready");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&(impl serde::Serialize + Sync)>,
    ) -> Result<Response, ClientError> {
        let method_name = method_name(&method);
        let path = url.path().to_string();

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(method = method_name, path = %path, "Sending API request");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = method_name, path = %path, error = %e, "API request failed");
            ClientError::Network {
                method: method_name,
                path: path.clone(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("").to_string()
            } else {
                text
            };
            tracing::warn!(
                method = method_name,
                path = %path,
                status = status.as_u16(),
                "API returned error status"
            );
            return Err(ClientError::Status {
                method: method_name,
                path,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&(impl serde::Serialize + Sync)>,
    ) -> Result<T, ClientError> {
        let method_name = method_name(&method);
        let path = url.path().to_string();
        let response = self.send(method, url, body).await?;

        let bytes = response.bytes().await.map_err(|e| ClientError::Network {
            method: method_name,
            path: path.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Malformed {
            method: method_name,
            path,
            message: e.to_string(),
        })
    }
}

fn method_name(method: &Method) -> &'static str {
    if *method == Method::GET {
        "GET"
    } else if *method == Method::POST {
        "POST"
    } else if *method == Method::PUT {
        "PUT"
    } else if *method == Method::DELETE {
        "DELETE"
    } else {
        "OTHER"
    }
}

/// Placeholder body type for requests without one.
const NO_BODY: Option<&()> = None;

#[async_trait]
impl ChatApi for HttpClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        let url = self.endpoint(&["chat"]);
        let wire: ChatReplyWire = self.send_json(Method::POST, url, Some(request)).await?;
        let reply = ChatReply::from(wire);
        tracing::debug!(
            has_answer = reply.answer.is_some(),
            schemes = reply.schemes.len(),
            "Chat reply received"
        );
        Ok(reply)
    }
}

#[async_trait]
impl TtsApi for HttpClient {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, ClientError> {
        let url = self.endpoint(&["tts"]);
        let path = url.path().to_string();
        let body = TtsRequest {
            text: text.to_string(),
            language: language.to_string(),
        };
        let response = self.send(Method::POST, url, Some(&body)).await?;
        let audio = response.bytes().await.map_err(|e| ClientError::Network {
            method: "POST",
            path: path.clone(),
            message: e.to_string(),
        })?;
        if audio.is_empty() {
            return Err(ClientError::Malformed {
                method: "POST",
                path,
                message: "empty audio payload".to_string(),
            });
        }
        tracing::debug!(bytes = audio.len(), "Synthesized audio received");
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl CatalogApi for HttpClient {
    async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.endpoint(&["health"]);
        let response = self.send(Method::GET, url, NO_BODY).await?;
        // Any 2xx is healthy; the body is informational only.
        let status = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => HealthStatus::default(),
        };
        Ok(status)
    }

    async fn list_schemes(&self, query: &SchemeQuery) -> Result<SchemeCatalog, ClientError> {
        let mut url = self.endpoint(&["schemes"]);
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
                pairs.append_pair("category", category.trim());
            }
            if let Some(language) = query.language.as_deref() {
                pairs.append_pair("language", language);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        let mut catalog: SchemeCatalog = self.send_json(Method::GET, url, NO_BODY).await?;
        if catalog.count == 0 {
            catalog.count = catalog.schemes.len();
        }
        Ok(catalog)
    }

    async fn get_scheme(&self, id: &str, language: &str) -> Result<SchemeMatch, ClientError> {
        let mut url = self.endpoint(&["schemes", id]);
        url.query_pairs_mut().append_pair("language", language);
        self.send_json(Method::GET, url, NO_BODY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(&ApiConfig {
            base_url: base.to_string(),
            timeout_ms: 1_000,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://127.0.0.1:8000");
        assert_eq!(c.endpoint(&["chat"]).as_str(), "http://127.0.0.1:8000/chat");

        let c = client("https://api.example.org/v1/");
        assert_eq!(
            c.endpoint(&["schemes", "pm kisan"]).as_str(),
            "https://api.example.org/v1/schemes/pm%20kisan"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpClient::new(&ApiConfig {
            base_url: "not a url".to_string(),
            timeout_ms: 1_000,
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(method_name(&Method::GET), "GET");
        assert_eq!(method_name(&Method::POST), "POST");
        assert_eq!(method_name(&Method::PATCH), "OTHER");
    }
}
