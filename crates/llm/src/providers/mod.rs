pub mod gemini;
pub mod openai;

use lexis_core::config::AiConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the appropriate LLM provider based on config.
pub fn create_provider(ai_config: &AiConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    match ai_config.provider.as_str() {
        "gemini" | "google" => {
            let api_key = ai_config
                .gemini_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY not set".into()))?;
            Ok(Box::new(gemini::GeminiProvider::new(
                api_key.clone(),
                ai_config.gemini_model.clone(),
            )))
        }
        "openai" => {
            let api_key = ai_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = ai_config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                ai_config.openai_model.clone(),
                base_url.to_string(),
            )))
        }
        other => Err(LlmError::NotConfigured(format!(
            "unknown AI provider: '{}'",
            other
        ))),
    }
}
