//! Boundary adapter between the analysis core and an AI provider.
//!
//! Every provider outcome, including timeouts and missing credentials, is
//! folded into [`AiResponse`] so callers never see a raw provider error.

use std::time::Duration;

use lexis_core::config::AiConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::prompts::SYSTEM_PROMPT;
use crate::provider::{LlmError, LlmProvider, Message};
use crate::providers::create_provider;

/// Confidence a successful completion starts from before heuristics apply.
pub const SUCCESS_CONFIDENCE_HINT: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AiResponse {
    Success { text: String, confidence_hint: f64 },
    Failure { reason: String },
}

impl AiResponse {
    pub fn failure(reason: impl Into<String>) -> Self {
        AiResponse::Failure { reason: reason.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AiResponse::Success { .. })
    }
}

pub struct AiClient {
    provider: Option<Box<dyn LlmProvider>>,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl AiClient {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            provider: Some(provider),
            temperature,
            max_tokens,
            timeout,
        }
    }

    /// A client with no provider; every call yields `Failure`.
    pub fn unconfigured() -> Self {
        Self {
            provider: None,
            temperature: 0.0,
            max_tokens: 0,
            timeout: Duration::from_secs(0),
        }
    }

    /// Build from config. Missing credentials produce an unconfigured client
    /// rather than an error.
    pub fn from_config(ai_config: &AiConfig) -> Self {
        match create_provider(ai_config) {
            Ok(provider) => Self::new(
                provider,
                ai_config.temperature,
                ai_config.max_tokens,
                Duration::from_secs(ai_config.timeout_secs),
            ),
            Err(e) => {
                warn!("AI provider unavailable, fallback mode only: {}", e);
                Self::unconfigured()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.as_ref().map_or("fallback", |p| p.name())
    }

    /// Run one completion under the configured timeout.
    ///
    /// Dropping the returned future aborts the in-flight HTTP request.
    pub async fn generate(&self, prompt: &str) -> AiResponse {
        let Some(provider) = self.provider.as_ref() else {
            return AiResponse::failure("AI provider not configured");
        };

        let messages = vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)];
        debug!(
            "AI request via {} ({} prompt chars)",
            provider.name(),
            prompt.chars().count()
        );

        let result = tokio::time::timeout(
            self.timeout,
            provider.complete(messages, self.temperature, self.max_tokens),
        )
        .await
        .unwrap_or_else(|_| Err(LlmError::Timeout(self.timeout.as_secs())));

        match result {
            Ok(text) => AiResponse::Success {
                text,
                confidence_hint: SUCCESS_CONFIDENCE_HINT,
            },
            Err(e) => {
                warn!("AI call via {} failed: {}", provider.name(), e);
                AiResponse::failure(e.to_string())
            }
        }
    }
}
