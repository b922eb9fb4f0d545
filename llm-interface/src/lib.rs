pub mod claude;
pub mod insights;

pub use claude::ClaudeProvider;
pub use insights::{build_digest, build_prompt, extract_insights, parse_model_reply, ModelReply};

use trendscout_core::CoreError;

/// A text-completion backend: one prompt in, the model's raw reply out.
pub trait LlmProvider {
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, CoreError>;
}
