use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::cli::ProviderKind;

pub mod openai;

/// One round trip to the text-generation service: a system/user instruction
/// pair, the model id for this stage, and an optional output-token cap.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub model: String,
    pub max_tokens: Option<u32>,
}

#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<String>;
}

pub type DynCompletion = Box<dyn Completion + Send + Sync>;

pub fn make_provider(kind: ProviderKind, timeout_secs: u64) -> Result<DynCompletion> {
    match kind {
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::new(timeout_secs)?)),

        // Keep these as explicit errors for now so the binary compiles even if
        // Anthropic/Ollama adapters are not implemented in your workspace.
        ProviderKind::Anthropic => Err(anyhow!("Anthropic provider not implemented in this build")),
        ProviderKind::Ollama => Err(anyhow!("Ollama provider not implemented in this build")),
    }
}
