use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

/// Model-call failures, split by whether another attempt can help.
/// Transport errors and 429/5xx statuses are retryable; anything the
/// endpoint rejects outright is fatal.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transient model-call failure: {0}")]
    Retryable(String),
    #[error("model call failed: {0}")]
    Fatal(String),
}

impl LlmError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::Retryable(_))
    }
}

/// Fixed retry budget with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_millis(10000),
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self {
            base_url,
            model,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single generateContent call; returns the first candidate's text.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Retryable(format!("request failed: {e}")))?;

        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            return Err(LlmError::Retryable(format!(
                "model endpoint returned {status}"
            )));
        }
        if !status.is_success() {
            return Err(LlmError::Fatal(format!(
                "model endpoint returned {status}"
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Retryable(format!("unreadable model reply: {e}")))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| LlmError::Retryable("model reply carried no candidates".to_string()))?;

        Ok(text.trim().to_string())
    }

    /// Generate with a bounded retry loop. Only retryable failures burn
    /// attempts; a fatal error returns immediately.
    pub async fn generate_with_retry(
        &self,
        prompt: &str,
        policy: &RetryPolicy,
    ) -> Result<String, LlmError> {
        let mut backoff = policy.initial_backoff;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.generate(prompt).await {
                Ok(reply) => {
                    if attempt > 1 {
                        info!(attempts = attempt, "model call succeeded after retries");
                    }
                    return Ok(reply);
                }
                Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = policy.max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "model call failed, retrying"
                    );
                    sleep(backoff).await;
                    backoff = std::cmp::min(backoff * 2, policy.max_backoff);
                }
                Err(e) => {
                    warn!(attempts = attempt, error = %e, "model call failed");
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(LlmError::Retryable("x".into()).is_retryable());
        assert!(!LlmError::Fatal("x".into()).is_retryable());
    }

    #[test]
    fn response_body_deserializes() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Aspirin - [DRUG]"}]}}]}"#;
        let body: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.candidates[0].content.parts[0].text, "Aspirin - [DRUG]");
    }

    #[test]
    fn missing_candidates_field_defaults_to_empty() {
        let body: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(body.candidates.is_empty());
    }
}
