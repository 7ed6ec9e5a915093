//! AI Invocation
//!
//! `call_ai` resolves a model, builds its client and sends one system + user
//! exchange. Transient failures (HTTP 429/5xx, transport errors, timeouts)
//! are retried with exponential backoff up to `llm.max_retries` times.
//! `call_ai_for_json` additionally strips a Markdown fence and parses.

use backon::{ExponentialBuilder, Retryable};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::json::parse_json_response;
use super::provider::{ChatRequest, ProviderDispatcher};
use super::timeout::with_timeout;
use crate::config::{LlmSettings, ModelSelector, ProvidersStore, ServiceSettings};
use crate::types::{CodeIntelError, Result};

/// Arguments for a single AI call
#[derive(Debug, Clone, PartialEq)]
pub struct AiCallOptions {
    pub system_prompt: String,
    pub user_prompt: String,
    /// `None` uses the configured default (0.7)
    pub temperature: Option<f32>,
    /// `None` uses the default model
    pub model_name: Option<String>,
}

impl AiCallOptions {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: None,
            model_name: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }
}

/// Sends prompts to the configured models
#[derive(Debug, Clone)]
pub struct AiCaller {
    selector: ModelSelector,
    dispatcher: ProviderDispatcher,
    llm: LlmSettings,
}

impl AiCaller {
    pub fn new(store: Arc<ProvidersStore>, settings: &ServiceSettings) -> Self {
        Self {
            selector: ModelSelector::new(Arc::clone(&store)),
            dispatcher: ProviderDispatcher::new(store, settings),
            llm: settings.llm.clone(),
        }
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    /// Send the prompts and return the model's raw text answer.
    pub async fn call_ai(&self, options: &AiCallOptions) -> Result<String> {
        let model_name = match &options.model_name {
            Some(name) => name.clone(),
            None => self.selector.default_model()?,
        };
        info!("Using model: {}", model_name);

        if self.selector.model_info(&model_name)?.is_none() {
            return Err(CodeIntelError::ModelConfigNotFound(model_name));
        }

        let client = self.dispatcher.client_for_model(&model_name)?;
        let request = ChatRequest {
            system: options.system_prompt.clone(),
            user: options.user_prompt.clone(),
            temperature: options.temperature.unwrap_or(self.llm.temperature),
        };
        debug!(
            model = %model_name,
            endpoint = client.endpoint(),
            temperature = request.temperature,
            "Dispatching AI call"
        );

        let timeout = self.llm.timeout();
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.llm.retry_base_delay())
            .with_max_delay(self.llm.retry_max_delay())
            .with_max_times(self.llm.max_retries);

        let client = &client;
        let request = &request;
        (move || async move { with_timeout(timeout, client.complete(request), "AI call").await })
            .retry(backoff)
            .when(CodeIntelError::is_retryable)
            .notify(|err: &CodeIntelError, delay| {
                warn!("AI call failed, retrying in {:?}: {}", delay, err);
            })
            .await
    }

    /// Send the prompts and parse the answer as JSON.
    ///
    /// Parse failures are never retried and keep the raw text.
    pub async fn call_ai_for_json<T: DeserializeOwned>(&self, options: &AiCallOptions) -> Result<T> {
        let raw = self.call_ai(options).await?;
        parse_json_response(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedServer, Reply, fast_settings, openai_store};
    use serde_json::Value;

    fn caller_for(base_url: &str, max_retries: usize) -> AiCaller {
        AiCaller::new(openai_store(base_url), &fast_settings(max_retries))
    }

    #[tokio::test]
    async fn test_http_500_surfaces_status_and_body() {
        let server =
            CannedServer::start(vec![Reply::new("500 Internal Server Error", "rate limited")]).await;

        let caller = caller_for(&server.base_url, 0);
        let err = caller
            .call_ai(&AiCallOptions::new("system", "user"))
            .await
            .unwrap_err();

        match &err {
            CodeIntelError::AiCall { status, body } => {
                assert_eq!(*status, 500);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected AiCall, got {:?}", other),
        }
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("rate limited"));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let server = CannedServer::start(vec![
            Reply::new("503 Service Unavailable", "busy"),
            Reply::completion("hello"),
        ])
        .await;

        let caller = caller_for(&server.base_url, 2);
        let text = caller
            .call_ai(&AiCallOptions::new("system", "user"))
            .await
            .unwrap();
        assert_eq!(text, "hello");
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = CannedServer::start(vec![Reply::new("401 Unauthorized", "bad key")]).await;

        let caller = caller_for(&server.base_url, 3);
        let err = caller
            .call_ai(&AiCallOptions::new("s", "u"))
            .await
            .unwrap_err();
        assert!(matches!(err, CodeIntelError::AiCall { status: 401, .. }));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_success_body_not_retried() {
        let server =
            CannedServer::start(vec![Reply::new("200 OK", "<html>gateway page</html>")]).await;

        let caller = caller_for(&server.base_url, 2);
        let err = caller
            .call_ai(&AiCallOptions::new("s", "u"))
            .await
            .unwrap_err();
        assert!(matches!(err, CodeIntelError::ResponseParse { .. }), "{:?}", err);
        assert_eq!(err.raw_response(), Some("<html>gateway page</html>"));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_empty_choices_keep_body() {
        let server = CannedServer::start(vec![Reply::new("200 OK", r#"{"choices":[]}"#)]).await;

        let caller = caller_for(&server.base_url, 2);
        let err = caller
            .call_ai(&AiCallOptions::new("s", "u"))
            .await
            .unwrap_err();
        assert_eq!(err.raw_response(), Some(r#"{"choices":[]}"#));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_call_ai_for_json_strips_fence() {
        let server = CannedServer::start(vec![Reply::completion(
            "```json\n{\"optimizedPrompt\":\"p\"}\n```",
        )])
        .await;

        let caller = caller_for(&server.base_url, 0);
        let value: Value = caller
            .call_ai_for_json(&AiCallOptions::new("s", "u").with_temperature(0.2))
            .await
            .unwrap();
        assert_eq!(value["optimizedPrompt"], "p");
    }

    #[tokio::test]
    async fn test_call_ai_for_json_keeps_raw_on_failure() {
        let server = CannedServer::start(vec![Reply::completion("I cannot answer in JSON")]).await;

        let caller = caller_for(&server.base_url, 0);
        let err = caller
            .call_ai_for_json::<Value>(&AiCallOptions::new("s", "u"))
            .await
            .unwrap_err();
        assert_eq!(err.raw_response(), Some("I cannot answer in JSON"));
    }

    #[tokio::test]
    async fn test_unknown_explicit_model() {
        let caller = caller_for("http://127.0.0.1:9", 0);
        let err = caller
            .call_ai(&AiCallOptions::new("s", "u").with_model("missing-model"))
            .await
            .unwrap_err();
        assert!(matches!(err, CodeIntelError::ModelConfigNotFound(name) if name == "missing-model"));
    }
}
