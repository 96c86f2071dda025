use std::env;

use serde::{Deserialize, Serialize};

use crate::error::LexisError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub ai: AiConfig,
    pub analysis: AnalysisConfig,
    pub cache: CacheConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `LEXIS_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("LEXIS_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            ai: AiConfig::from_env_profiled(p),
            analysis: AnalysisConfig::from_env_profiled(p),
            cache: CacheConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Fail when the selected AI provider has no credentials.
    ///
    /// Meant for startup only; request handling degrades to fallback output instead.
    pub fn require_ai(&self) -> Result<(), LexisError> {
        if self.ai.is_configured() {
            Ok(())
        } else {
            Err(LexisError::ConfigurationMissing(format!(
                "no API key configured for AI provider '{}'",
                self.ai.provider
            )))
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:    {}:{}", self.server.host, self.server.port);
        tracing::info!(
            "  ai:        provider={}, configured={}, timeout={}s",
            self.ai.provider,
            self.ai.is_configured(),
            self.ai.timeout_secs
        );
        tracing::info!(
            "  analysis:  max_text_chars={}, chunk_size={}, top_k={}",
            self.analysis.max_text_chars,
            self.analysis.chunk_size,
            self.analysis.top_k
        );
        tracing::info!(
            "  cache:     capacity={}, ttl={}s",
            self.cache.capacity,
            self.cache.ttl_secs
        );
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "server": { "host": self.server.host, "port": self.server.port },
            "ai": {
                "provider": self.ai.provider,
                "model": self.ai.active_model(),
                "configured": self.ai.is_configured(),
                "timeout_secs": self.ai.timeout_secs,
            },
            "analysis": {
                "max_text_chars": self.analysis.max_text_chars,
                "chunk_size": self.analysis.chunk_size,
                "top_k": self.analysis.top_k,
            },
            "cache": { "capacity": self.cache.capacity, "ttl_secs": self.cache.ttl_secs },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_parse(p, "PORT", 4004),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
            max_upload_bytes: profiled_env_parse::<usize>(p, "MAX_UPLOAD_MB", 10) * 1024 * 1024,
        }
    }
}

// ── Generative AI (Gemini / OpenAI) ───────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// "gemini", "openai"
    pub provider: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on a single completion call.
    pub timeout_secs: u64,
}

impl AiConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "AI_PROVIDER", "gemini").to_lowercase(),
            gemini_api_key: profiled_env_opt(p, "GEMINI_API_KEY"),
            gemini_model: profiled_env_or(p, "GEMINI_MODEL", "gemini-1.5-flash-latest"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-3.5-turbo"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            temperature: profiled_env_parse(p, "AI_TEMPERATURE", 0.2),
            max_tokens: profiled_env_parse(p, "AI_MAX_TOKENS", 2048),
            timeout_secs: profiled_env_parse(p, "AI_TIMEOUT_SECS", 30),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "gemini" => self.gemini_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            _ => false,
        }
    }

    pub fn active_model(&self) -> &str {
        match self.provider.as_str() {
            "openai" => &self.openai_model,
            _ => &self.gemini_model,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash-latest".to_string(),
            openai_api_key: None,
            openai_model: "gpt-3.5-turbo".to_string(),
            openai_base_url: None,
            temperature: 0.2,
            max_tokens: 2048,
            timeout_secs: 30,
        }
    }
}

// ── Analysis pipeline ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Hard ceiling applied by the text normalizer.
    pub max_text_chars: usize,
    /// Maximum characters per chunk (single oversized sentences excepted).
    pub chunk_size: usize,
    /// Number of chunks handed to a question prompt.
    pub top_k: usize,
}

impl AnalysisConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            max_text_chars: profiled_env_parse(p, "MAX_TEXT_CHARS", defaults.max_text_chars),
            chunk_size: profiled_env_parse(p, "CHUNK_SIZE", defaults.chunk_size).max(1),
            top_k: profiled_env_parse(p, "RETRIEVAL_TOP_K", defaults.top_k),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_text_chars: 50_000,
            chunk_size: 1000,
            top_k: 3,
        }
    }
}

// ── Answer cache ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttl_secs: u64,
}

impl CacheConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            capacity: profiled_env_parse(p, "ANSWER_CACHE_CAPACITY", defaults.capacity),
            ttl_secs: profiled_env_parse(p, "ANSWER_CACHE_TTL_SECS", defaults.ttl_secs),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            ttl_secs: 3600,
        }
    }
}
