use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::errors::DepromptError;
use super::CompletionRequest;

/// OpenAI chat-completions adapter. Sends one system + one user message per
/// stage and returns the assistant text verbatim; all structured decoding
/// happens at the call site, per stage.
pub struct OpenAIProvider {
    api_key: String,
    client: Client,
    timeout_secs: u64,
}

impl OpenAIProvider {
    /// Fails up front when the credential is missing so every later request
    /// doesn't fail the same way.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let api_key = std::env::var("API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                DepromptError::Config("API_KEY environment variable is not set".into())
            })?;
        Ok(Self {
            api_key,
            client: Client::new(),
            timeout_secs,
        })
    }
}

#[async_trait]
impl super::Completion for OpenAIProvider {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<String> {
        let mut body = json!({
            "model": req.model,
            "messages": [
                { "role": "system", "content": req.system },
                { "role": "user", "content": req.user }
            ]
        });
        if let Some(max) = req.max_tokens {
            body["max_tokens"] = json!(max);
        }

        if debug {
            eprintln!(
                "debug[openai]: HTTP POST /v1/chat/completions body:\n{}",
                serde_json::to_string_pretty(&body)?
            );
        }

        let resp = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| DepromptError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| DepromptError::Transport(e.to_string()))?;

        if debug {
            eprintln!("debug[openai]: raw status: {}", status);
            eprintln!("debug[openai]: raw response:\n{}", &text);
        }

        if !status.is_success() {
            return Err(DepromptError::Transport(format!(
                "OpenAI API error ({}): {}",
                status, text
            ))
            .into());
        }

        // Minimal structs to parse the chat response
        #[derive(Deserialize)]
        struct ChatMessage {
            content: String,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChatMessage,
        }
        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            DepromptError::Malformed(format!("failed to parse OpenAI response: {e}\nRaw: {text}"))
        })?;

        parsed
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| anyhow!(DepromptError::Malformed("response had no choices".into())))
    }
}
