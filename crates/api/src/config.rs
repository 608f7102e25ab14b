use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub retry: RetryConfig,
    pub render: RenderLimits,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderLimits {
    pub max_markup_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                base_url: "https://generativelanguage.googleapis.com".to_string(),
                model: "gemini-1.5-flash".to_string(),
                request_timeout_secs: 60,
            },
            retry: RetryConfig {
                max_attempts: 3,
                initial_backoff_ms: 1000,
                max_backoff_ms: 10000,
            },
            render: RenderLimits {
                max_markup_len: highlight::render::DEFAULT_MAX_MARKUP_LEN,
            },
            cache: CacheConfig {
                enabled: true,
                max_entries: 10000,
            },
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides: GEMINI_BASE_URL and GEMINI_MODEL.
    /// The API key itself is read separately from GEMINI_API_KEY in main.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.llm.model = model;
        }
        config
    }

    pub fn retry_policy(&self) -> extract::RetryPolicy {
        extract::RetryPolicy {
            max_attempts: self.retry.max_attempts,
            initial_backoff: Duration::from_millis(self.retry.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.retry.max_backoff_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retry_budget_is_three_attempts() {
        let config = AppConfig::default();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry_policy().max_attempts, 3);
    }
}
