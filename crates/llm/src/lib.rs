pub mod client;
pub mod prompts;
pub mod provider;
pub mod providers;

pub use client::{AiClient, AiResponse};
pub use prompts::AnalysisType;
pub use provider::{LlmError, LlmProvider, Message, Role};
