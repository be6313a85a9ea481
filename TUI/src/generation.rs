// Text generation against the Gemini generateContent REST endpoint

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, trace, warn};

use crate::config::Config;

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const GENERATION_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Reasoning parts are not part of the answer
    #[serde(default, skip_serializing)]
    pub thought: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateResponse {
    /// Concatenated answer text of the first candidate.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    MissingCredential,
    Network(String),
    Service { status: u16, body: String },
    MalformedResponse(String),
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::MissingCredential => write!(f, "API_KEY is not set"),
            GenerationError::Network(e) => write!(f, "Network error: {}", e),
            GenerationError::Service { status, body } => {
                write!(f, "Generation service error {}: {}", status, body)
            }
            GenerationError::MalformedResponse(e) => write!(f, "Malformed response: {}", e),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Network(e.to_string())
    }
}

/// Build the body for a single-turn request.
pub fn build_request(prompt: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(prompt.to_string()),
                thought: false,
            }],
            role: None,
        }],
    }
}

/// Extract the answer text from a raw response body.
pub fn parse_generation_response(raw: &str) -> Result<String, GenerationError> {
    let response: GenerateResponse = serde_json::from_str(raw)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    if response.candidates.is_empty() {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("no candidates (blocked: {})", r))
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(GenerationError::MalformedResponse(reason));
    }

    response.text().ok_or_else(|| {
        let finish = response.candidates[0]
            .finish_reason
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        GenerationError::MalformedResponse(format!("empty text (finish reason: {})", finish))
    })
}

#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GenerationClient {
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: GENERATION_MODEL.to_string(),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send one prompt and return the generated text. Never retried.
    #[instrument(level = "trace", skip(self, prompt))]
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;
        let url = self.endpoint();

        debug!(url = %url, model = %self.model, "sending generateContent request");

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&build_request(prompt))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "generation service error");
            return Err(GenerationError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let raw = resp.text().await?;
        trace!(raw = %raw, "generateContent response");
        parse_generation_response(&raw)
    }
}
