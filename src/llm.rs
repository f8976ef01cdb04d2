//! llm.rs: chat-completion client for any OpenAI-compatible endpoint
//! (Groq by default, OpenRouter or a local Ollama `/v1` work the same way).
//!
//! One request per call, no retries, no streaming.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::LlmConfig;
use crate::error::{ChatError, Result};

/// A language model that turns a system instruction plus one user turn
/// into a text completion.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Short provider/model label for logs.
    fn label(&self) -> String {
        "chat-model".into()
    }
}

// ── Request types (OpenAI-compatible) ────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model:       &'a str,
    messages:    [Message<'a>; 2],
    max_tokens:  u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role:    &'static str,
    content: &'a str,
}

// ── Client ───────────────────────────────────────────

pub struct OpenAiCompatClient {
    http:        reqwest::Client,
    endpoint:    String,
    api_key:     String,
    model:       String,
    max_tokens:  u32,
    temperature: f32,
}

impl OpenAiCompatClient {
    pub fn from_config(cfg: &LlmConfig) -> Result<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ChatError::Config("LLM API key not set (GROQ_KEY)".into()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(concat!("mongo-chat/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let client = Self {
            http,
            endpoint: format!("{}/chat/completions", cfg.base_url.trim_end_matches('/')),
            api_key,
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        };
        info!(target: "llm", "LLM client ready: {}", client.label());
        Ok(client)
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let payload = ChatRequest {
            model: &self.model,
            messages: [
                Message { role: "system", content: system },
                Message { role: "user", content: user },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(target: "llm", "LLM HTTP request failed: {}", e);
                ChatError::Http(e)
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let truncated: String = body.chars().take(300).collect();
            error!(target: "llm", "LLM HTTP error {}: {}", status, truncated);
            return Err(ChatError::Llm(format!("HTTP {status}: {truncated}")));
        }

        let data: serde_json::Value = resp.json().await?;
        let text = completion_text(&data)?;
        debug!(target: "llm", "LLM response received (text_len={})", text.len());
        Ok(text)
    }

    fn label(&self) -> String {
        format!("{} ({})", self.model, self.endpoint)
    }
}

/// Pull `choices[0].message.content` out of a completion response.
fn completion_text(data: &serde_json::Value) -> Result<String> {
    data["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ChatError::Llm("response has no choices[0].message.content".into()))
}
