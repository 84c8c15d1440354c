use crate::traits::{LlmClient, LlmResponse};
use async_trait::async_trait;
use linkscout_common::{GenerationConfig, Result, ScoutError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Azure OpenAI chat-completions client.
///
/// The endpoint is a full deployment URL; authentication is the `api-key`
/// header. Requests are one-shot: a failed call is reported to the caller,
/// never retried here.
pub struct AzureChatClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatTurn,
}

#[derive(Debug, Deserialize)]
struct ChatTurn {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    total_tokens: u32,
}

impl AzureChatClient {
    /// Create a new client for the configured endpoint and credential.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ScoutError::Generation(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl LlmClient for AzureChatClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let req = ChatRequest {
            messages,
            temperature,
            max_tokens,
        };

        tracing::debug!(endpoint = %self.endpoint, "sending chat completion request");

        let resp = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| ScoutError::Generation(format!("chat request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScoutError::Generation(format!(
                "chat endpoint returned HTTP {status}"
            )));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ScoutError::Generation(format!("failed to decode chat response: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ScoutError::Generation("chat response contained no choices".into()))?;

        Ok(LlmResponse {
            text: text.trim().to_string(),
            model: parsed.model,
            tokens_used: parsed.usage.map(|u| u.total_tokens),
        })
    }
}
