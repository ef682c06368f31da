//! Generative-text service backends
//!
//! [`GenerativeBackend`] is the seam between the insight pipeline and the
//! outside world; [`HttpGenerativeBackend`] talks to a Gemini-style
//! `generateContent` endpoint over HTTPS with a hard client timeout.

use crate::config::InsightConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// A service that turns a prompt into generated text.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate text for a prompt. One attempt; implementations bound the
    /// call themselves.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// HTTP backend for a Gemini-style generateContent API.
pub struct HttpGenerativeBackend {
    client: reqwest::Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpGenerativeBackend {
    /// Build a backend from configuration. The API key is resolved from
    /// the configured environment variable; a missing key is not fatal
    /// here, calls simply fail and get downgraded.
    pub fn new(config: &InsightConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_ref).ok();
        if api_key.is_none() {
            tracing::warn!(
                env_var = %config.api_key_ref,
                "Generative API key not set; insight requests will degrade"
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl GenerativeBackend for HttpGenerativeBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            Error::ExternalService("generative API key not configured".to_string())
        })?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_url, self.model, api_key
        );
        let payload = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("generative call failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::ExternalService(format!(
                "generative API returned {}",
                response.status()
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::ExternalService(format!("malformed generative response: {}", e)))?;

        let text = result
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::ExternalService(
                "generative response contained no text".to_string(),
            ));
        }

        Ok(text)
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GenerateCandidate>,
}

#[derive(Debug, Deserialize)]
struct GenerateCandidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}
