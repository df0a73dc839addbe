//! Advisory security-risk annotation for new applications.
//!
//! The annotator is an opaque external collaborator: it receives the visit
//! purpose, location, and headcount, and returns a short free-text advisory.
//! Failures of any kind degrade to a fixed placeholder string; nothing in the
//! application lifecycle ever waits on or fails because of this call.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::config::RiskConfig;

/// Advisory text used whenever the annotation call is unavailable or fails.
pub const FALLBACK_ADVISORY: &str = "AI analysis unavailable.";

#[async_trait::async_trait]
pub trait RiskAnalyzer: Send + Sync {
    /// Produce an advisory string. Must not fail; degrade to a placeholder
    /// instead.
    async fn analyze(&self, purpose: &str, location: &str, visitor_count: usize) -> String;
}

/// Analyzer used when no API key is configured and in tests.
#[derive(Debug, Default, Clone)]
pub struct NoopRiskAnalyzer;

#[async_trait::async_trait]
impl RiskAnalyzer for NoopRiskAnalyzer {
    async fn analyze(&self, _purpose: &str, _location: &str, _visitor_count: usize) -> String {
        FALLBACK_ADVISORY.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    #[error("risk endpoint returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("risk endpoint returned no text candidate")]
    EmptyResponse,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Calls a Gemini-style `generateContent` endpoint.
pub struct GeminiRiskAnalyzer {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiRiskAnalyzer {
    /// Build an analyzer from config; `None` when no API key is present.
    pub fn from_config(config: &RiskConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .ok()?;
        Some(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }

    fn prompt(purpose: &str, location: &str, visitor_count: usize) -> String {
        format!(
            "You are a facility security assistant. Analyze the following visitor \
             application details:\n\n\
             Purpose of Visit: \"{purpose}\"\n\
             Location: \"{location}\"\n\
             Number of Visitors: {visitor_count}\n\n\
             Assess the security risk. If the purpose seems legitimate (e.g. parent \
             meeting, delivery, maintenance), reply with a \"Low Risk\" assessment and \
             a brief, polite summary. If there are red flags (vague reasons, aggressive \
             language, unusual locations for visitors), label it \"Medium\" or \"High \
             Risk\" and explain why. Keep the response under 50 words."
        )
    }

    async fn request(&self, prompt: &str) -> Result<String, RiskError> {
        let url = format!("{}?key={}", self.endpoint, self.api_key);
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(RiskError::Status(response.status()));
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or(RiskError::EmptyResponse)
    }
}

#[async_trait::async_trait]
impl RiskAnalyzer for GeminiRiskAnalyzer {
    async fn analyze(&self, purpose: &str, location: &str, visitor_count: usize) -> String {
        let prompt = Self::prompt(purpose, location, visitor_count);
        match self.request(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "risk annotation failed, using placeholder");
                FALLBACK_ADVISORY.to_string()
            }
        }
    }
}
