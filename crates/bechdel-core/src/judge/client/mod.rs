pub mod fake;
pub mod ollama;

pub use fake::FakeClient;
pub use ollama::OllamaClient;

use async_trait::async_trait;

/// A single completion from the judgment model.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}

/// Transport toward the external judgment service. Implementations are
/// expected to be unreliable; callers route failures into their documented
/// fallbacks.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;
}
