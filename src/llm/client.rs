// src/llm/client.rs
use super::response::LlmReply;
use super::types::{ChatMessage, ChatTurn, ToolDefinition};
use crate::core::LlmConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

/// Chat-capable language model.
#[rocket::async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Result<ChatTurn>;

    /// Single-prompt completion, always normalized.
    async fn complete(&self, prompt: &str) -> LlmReply {
        match self.chat(&[ChatMessage::user(prompt)], &[]).await {
            Ok(turn) => turn.reply,
            Err(e) => LlmReply::error(format!("{:#}", e)),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

/// Azure OpenAI chat completions client.
pub struct LlmClient {
    client: Client,
    url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("AZURE_OPENAI_API_KEY environment variable not set")?;

        if config.endpoint.is_empty() {
            anyhow::bail!("AZURE_OPENAI_ENDPOINT environment variable not set");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: completions_url(config),
            api_key,
        })
    }

    async fn post(&self, request: &ChatRequest<'_>) -> Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .context("Failed to send request to language model")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read language model response")?;

        if !status.is_success() {
            error!("Language model error {}: {}", status, body);
            // Error bodies still carry a usable `error.message`.
            if let Some(message) = LlmReply::from_body(&body).error {
                anyhow::bail!("Language model returned error {}: {}", status, message);
            }
            anyhow::bail!("Language model returned error {}: {}", status, body);
        }

        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

#[rocket::async_trait]
impl ChatModel for LlmClient {
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Result<ChatTurn> {
        info!(
            "Sending {} message(s) to language model with {} tool(s)",
            messages.len(),
            tools.len()
        );

        let request = ChatRequest {
            messages,
            tools,
            tool_choice: (!tools.is_empty()).then_some("auto"),
        };

        let value = self.post(&request).await?;
        Ok(ChatTurn::from_value(&value))
    }
}

pub fn completions_url(config: &LlmConfig) -> String {
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        config.endpoint.trim_end_matches('/'),
        config.deployment,
        config.api_version
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        let config = LlmConfig {
            endpoint: "https://example.openai.azure.com/".to_string(),
            deployment: "gpt-41".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(
            completions_url(&config),
            "https://example.openai.azure.com/openai/deployments/gpt-41/chat/completions?api-version=2024-02-01"
        );
    }

    #[test]
    fn test_new_requires_credentials() {
        assert!(LlmClient::new(&LlmConfig::default()).is_err());

        let config = LlmConfig {
            api_key: Some("secret".to_string()),
            ..LlmConfig::default()
        };
        assert!(LlmClient::new(&config).is_err());
    }

    #[test]
    fn test_request_omits_empty_tools() {
        let messages = [ChatMessage::user("oi")];
        let request = ChatRequest {
            messages: &messages,
            tools: &[],
            tool_choice: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
        assert_eq!(value["messages"][0]["content"], "oi");
    }

    struct Failing;

    #[rocket::async_trait]
    impl ChatModel for Failing {
        async fn chat(&self, _: &[ChatMessage], _: &[ToolDefinition]) -> Result<ChatTurn> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_complete_turns_failures_into_error_reply() {
        let reply = Failing.complete("hello").await;
        assert!(reply.text.is_none());
        assert_eq!(reply.error.as_deref(), Some("connection refused"));
    }
}
