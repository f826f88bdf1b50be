//! Short generated "fun facts" about an element.
//!
//! Every call is a fresh request to a hosted text model: no retries and no
//! caching. The model is asked for JSON matching `{"fact": string}`; anything
//! else is reported as one [`FactError`].

use crate::language::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactRequest {
    pub element_name: String,
    pub element_symbol: String,
    pub element_summary: String,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub fact: String,
}

#[derive(Debug, Error)]
pub enum FactError {
    #[error("fact generation is not configured (no API key)")]
    NotConfigured,
    #[error("request to fact provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("fact provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("fact provider response was malformed: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait FactGenerator: Send + Sync {
    async fn generate_fact(&self, request: &FactRequest) -> Result<Fact, FactError>;
}

pub fn render_prompt(request: &FactRequest) -> String {
    format!(
        "You are a chemistry expert and a great science communicator.\n\
         Generate a surprising, interesting, or little-known fun fact about the chemical element provided.\n\
         The fact should be concise and easy to understand for a general audience.\n\
         Respond in the following language: {}.\n\
         \n\
         Element Information:\n\
         Name: {} ({})\n\
         Summary: {}\n",
        request.language.english_name(),
        request.element_name,
        request.element_symbol,
        request.element_summary,
    )
}

/// Google Gemini `generateContent` with a JSON response schema.
#[derive(Debug, Clone)]
pub struct GeminiFactGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiFactGenerator {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        GeminiFactGenerator {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    fn body(request: &FactRequest) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": render_prompt(request) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "fact": {
                            "type": "STRING",
                            "description": "An interesting, little-known, or surprising fact about the element."
                        }
                    },
                    "required": ["fact"]
                }
            }
        })
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Pulls `{"fact": ...}` out of a `generateContent` response body.
pub fn parse_generate_response(body: &str) -> Result<Fact, FactError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| FactError::Malformed(format!("envelope: {e}")))?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .ok_or_else(|| FactError::Malformed("no candidates".to_string()))?;
    let fact: Fact = serde_json::from_str(text.trim())
        .map_err(|e| FactError::Malformed(format!("output: {e}")))?;
    if fact.fact.trim().is_empty() {
        return Err(FactError::Malformed("empty fact".to_string()));
    }
    Ok(Fact {
        fact: fact.fact.trim().to_string(),
    })
}

#[async_trait]
impl FactGenerator for GeminiFactGenerator {
    async fn generate_fact(&self, request: &FactRequest) -> Result<Fact, FactError> {
        let api_key = self.api_key.as_deref().ok_or(FactError::NotConfigured)?;
        debug!(symbol = %request.element_symbol, language = %request.language, model = %self.model, "requesting fact");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&Self::body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FactError::Provider {
                status: status.as_u16(),
                body,
            });
        }
        parse_generate_response(&body)
    }
}
