//! OpenAI-Compatible Chat Client
//!
//! Speaks `POST <baseURL>/chat/completions` with a Bearer key. Used for
//! OpenAI, DeepSeek, Ollama and Anthropic models behind a proxy.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::{ChatClient, ChatRequest, WireProtocol, decode_body, join_url};
use crate::types::{CodeIntelError, Result};

/// OpenAI-compatible client with secure API key handling
pub struct OpenAiCompatibleClient {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiCompatibleClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CodeIntelError::AiTransport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key.to_string()),
            endpoint: join_url(base_url, "chat/completions"),
            model: model.to_string(),
            client,
        })
    }

    fn build_request(&self, request: &ChatRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiCompatibleClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        debug!(
            model = %self.model,
            system_prompt_len = request.system.len(),
            user_prompt_len = request.user.len(),
            temperature = request.temperature,
            "Sending chat completion request"
        );

        let start_time = Instant::now();
        let body = self.build_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("API call failed ({}): {}", status.as_u16(), body);
            return Err(CodeIntelError::AiCall {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let response_body: ChatCompletionResponse = decode_body(&raw)?;

        let content = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CodeIntelError::ResponseParse {
                message: "No content in chat completion response".to_string(),
                raw,
            })?;

        info!(
            "AI call succeeded ({} ms, model: {})",
            start_time.elapsed().as_millis(),
            self.model
        );
        Ok(content)
    }

    fn protocol(&self) -> WireProtocol {
        WireProtocol::OpenAiCompatible
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let client = OpenAiCompatibleClient::new(
            "https://api.deepseek.com/",
            "sk-test",
            "deepseek-chat",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.endpoint(), "https://api.deepseek.com/chat/completions");

        let body = client.build_request(&ChatRequest {
            system: "sys".to_string(),
            user: "usr".to_string(),
            temperature: 0.7,
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "deepseek-chat");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_debug_redacts_key() {
        let client =
            OpenAiCompatibleClient::new("http://localhost", "sk-secret", "m", Duration::from_secs(1))
                .unwrap();
        assert!(!format!("{:?}", client).contains("sk-secret"));
    }

    #[test]
    fn test_parse_first_choice() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hi"}},{"message":{"content":"second"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hi"));
    }
}
