//! Chat Provider Abstraction
//!
//! Every configured model is reached through one of two wire protocols:
//!
//! - OpenAI-compatible `POST <baseURL>/chat/completions` (OpenAI, DeepSeek,
//!   Ollama, and Anthropic behind a proxy)
//! - Native Anthropic Messages API (`POST <baseURL>/v1/messages`)
//!
//! [`ProviderDispatcher`] looks up the model in the providers document and
//! builds the matching [`ChatClient`].

mod anthropic;
mod openai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiCompatibleClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::config::{
    AnthropicSettings, ModelConfig, ProviderKind, ProvidersStore, ServiceSettings,
};
use crate::constants::llm;
use crate::types::{CodeIntelError, Result};

// =============================================================================
// Client Trait
// =============================================================================

/// One system + one user message
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Wire format a client speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireProtocol {
    OpenAiCompatible,
    AnthropicNative,
}

/// A chat model endpoint returning plain text
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send the request and return the first answer's text
    async fn complete(&self, request: &ChatRequest) -> Result<String>;

    fn protocol(&self) -> WireProtocol;

    /// Model name sent on the wire (never rewritten)
    fn model(&self) -> &str;

    /// Full URL requests are posted to
    fn endpoint(&self) -> &str;
}

pub type SharedChatClient = Arc<dyn ChatClient>;

// =============================================================================
// Dispatcher
// =============================================================================

/// Builds chat clients from the providers document
#[derive(Debug, Clone)]
pub struct ProviderDispatcher {
    store: Arc<ProvidersStore>,
    anthropic: AnthropicSettings,
    timeout: Duration,
}

impl ProviderDispatcher {
    pub fn new(store: Arc<ProvidersStore>, settings: &ServiceSettings) -> Self {
        Self {
            store,
            anthropic: settings.anthropic.clone(),
            timeout: settings.llm.timeout(),
        }
    }

    /// Client for `model_name` under `provider`.
    ///
    /// The provider/model pair is looked up first (`ProviderNotFound`,
    /// `ModelNotFound`); the identifier is then matched against the known
    /// providers (`UnsupportedProvider`).
    pub fn client(&self, provider: &str, model_name: &str) -> Result<SharedChatClient> {
        let document = self.store.load(false)?;

        let provider_config = document
            .find_provider(provider)
            .ok_or_else(|| CodeIntelError::ProviderNotFound(provider.to_string()))?;

        let model = provider_config
            .find_model(model_name)
            .ok_or_else(|| CodeIntelError::model_not_found_for(model_name, provider))?;

        let kind: ProviderKind = provider.parse()?;
        info!("Creating {} client for model: {}", kind, model_name);
        debug!("Using baseURL: {}", model.base_url);

        self.build(kind, model)
    }

    /// Client for the first provider that lists `model_name`
    pub fn client_for_model(&self, model_name: &str) -> Result<SharedChatClient> {
        let document = self.store.load(false)?;
        let (provider, _) = document
            .find_model(model_name)
            .ok_or_else(|| CodeIntelError::model_not_found(model_name))?;

        info!(
            "Found model {} in provider {}",
            model_name, provider.provider
        );
        self.client(&provider.provider, model_name)
    }

    fn build(&self, kind: ProviderKind, model: &ModelConfig) -> Result<SharedChatClient> {
        let client: SharedChatClient = match kind {
            ProviderKind::OpenAi | ProviderKind::DeepSeek => Arc::new(
                OpenAiCompatibleClient::new(&model.base_url, &model.api_key, &model.model, self.timeout)?,
            ),
            ProviderKind::Ollama => {
                let key = if model.api_key.trim().is_empty() {
                    llm::OLLAMA_PLACEHOLDER_KEY
                } else {
                    model.api_key.as_str()
                };
                Arc::new(OpenAiCompatibleClient::new(
                    &model.base_url,
                    key,
                    &model.model,
                    self.timeout,
                )?)
            }
            ProviderKind::Anthropic => {
                if is_anthropic_proxy(&model.base_url, &self.anthropic) {
                    info!("Using OpenAI-compatible mode for proxy service");
                    Arc::new(OpenAiCompatibleClient::new(
                        &model.base_url,
                        &model.api_key,
                        &model.model,
                        self.timeout,
                    )?)
                } else {
                    info!("Using native Anthropic API");
                    let base = if model.base_url.trim().is_empty() {
                        format!("https://{}", self.anthropic.official_host)
                    } else {
                        model.base_url.clone()
                    };
                    Arc::new(AnthropicClient::new(
                        &base,
                        &model.api_key,
                        &model.model,
                        self.timeout,
                    )?)
                }
            }
        };
        Ok(client)
    }
}

/// Whether an Anthropic base URL points at an OpenAI-compatible proxy.
///
/// A URL is a proxy when its host contains a configured proxy host or does
/// not contain the official host. An empty base URL means the official API.
pub fn is_anthropic_proxy(base_url: &str, settings: &AnthropicSettings) -> bool {
    let base_url = base_url.trim();
    if base_url.is_empty() {
        return false;
    }

    let host = Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| base_url.to_lowercase());

    let matches_proxy = settings
        .proxy_hosts
        .iter()
        .any(|proxy| host.contains(&proxy.to_lowercase()));

    matches_proxy || !host.contains(&settings.official_host.to_lowercase())
}

/// Decode a successful response body.
///
/// A 2xx body that is not the expected document is a `ResponseParse` error
/// carrying the raw text; it is never retried.
pub(crate) fn decode_body<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| CodeIntelError::ResponseParse {
        message: format!("Unexpected provider response: {}", e),
        raw: raw.to_string(),
    })
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersDocument;
    use crate::test_support::{CannedServer, Reply};

    const DOCUMENT: &str = r#"{"providers":[
        {"provider":"openai","models":[
            {"model":"gpt-4o","title":"GPT-4o","baseURL":"https://api.openai.com/v1","apiKey":"k"}]},
        {"provider":"anthropic","models":[
            {"model":"claude-3-5-sonnet","title":"Claude","baseURL":"https://api.anthropic.com","apiKey":"k"},
            {"model":"claude-proxy","title":"Claude via OpenRouter","baseURL":"https://openrouter.ai/api/v1","apiKey":"k"},
            {"model":"claude-elsewhere","title":"Claude elsewhere","baseURL":"https://llm.internal.example/v1","apiKey":"k"}]},
        {"provider":"ollama","models":[
            {"model":"llama3","title":"Llama 3","baseURL":"http://localhost:11434/v1"}]},
        {"provider":"gemini","models":[
            {"model":"gemini-pro","title":"Gemini","baseURL":"https://example.com","apiKey":"k"}]}
    ]}"#;

    fn dispatcher() -> ProviderDispatcher {
        let document: ProvidersDocument = serde_json::from_str(DOCUMENT).unwrap();
        ProviderDispatcher::new(
            Arc::new(ProvidersStore::from_document(document)),
            &ServiceSettings::default(),
        )
    }

    #[test]
    fn test_anthropic_official_is_native() {
        let client = dispatcher().client("anthropic", "claude-3-5-sonnet").unwrap();
        assert_eq!(client.protocol(), WireProtocol::AnthropicNative);
        assert_eq!(client.endpoint(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_anthropic_proxy_keeps_model_name() {
        let d = dispatcher();
        for name in ["claude-proxy", "claude-elsewhere"] {
            let client = d.client("anthropic", name).unwrap();
            assert_eq!(client.protocol(), WireProtocol::OpenAiCompatible);
            assert_eq!(client.model(), name);
        }
        let proxy = d.client("anthropic", "claude-proxy").unwrap();
        assert_eq!(proxy.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn test_openai_and_ollama_are_compatible() {
        let d = dispatcher();
        let openai = d.client_for_model("gpt-4o").unwrap();
        assert_eq!(openai.protocol(), WireProtocol::OpenAiCompatible);
        assert_eq!(openai.endpoint(), "https://api.openai.com/v1/chat/completions");

        let ollama = d.client_for_model("llama3").unwrap();
        assert_eq!(ollama.protocol(), WireProtocol::OpenAiCompatible);
        assert_eq!(ollama.model(), "llama3");
    }

    #[tokio::test]
    async fn test_ollama_sends_placeholder_key() {
        let server = CannedServer::start(vec![Reply::completion("pong")]).await;
        let document: ProvidersDocument = serde_json::from_str(&format!(
            r#"{{"providers":[{{"provider":"ollama","models":[
                {{"model":"llama3","title":"Llama 3","baseURL":"{}"}}]}}]}}"#,
            server.base_url
        ))
        .unwrap();
        let d = ProviderDispatcher::new(
            Arc::new(ProvidersStore::from_document(document)),
            &ServiceSettings::default(),
        );

        let client = d.client_for_model("llama3").unwrap();
        let answer = client
            .complete(&ChatRequest {
                system: "s".to_string(),
                user: "ping".to_string(),
                temperature: 0.7,
            })
            .await
            .unwrap();
        assert_eq!(answer, "pong");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("POST /v1/chat/completions "));
        assert!(
            requests[0]
                .lines()
                .any(|l| l.eq_ignore_ascii_case("authorization: Bearer ollama"))
        );
        assert!(requests[0].contains(r#""model":"llama3""#));
    }

    #[test]
    fn test_lookup_failures() {
        let d = dispatcher();
        assert!(matches!(
            d.client("deepseek", "deepseek-chat"),
            Err(CodeIntelError::ProviderNotFound(_))
        ));
        assert!(matches!(
            d.client("openai", "gpt-5"),
            Err(CodeIntelError::ModelNotFound { provider: Some(_), .. })
        ));
        assert!(matches!(
            d.client_for_model("gpt-5"),
            Err(CodeIntelError::ModelNotFound { provider: None, .. })
        ));
        assert!(matches!(
            d.client_for_model("gemini-pro"),
            Err(CodeIntelError::UnsupportedProvider(p)) if p == "gemini"
        ));
    }

    #[test]
    fn test_proxy_detection() {
        let settings = AnthropicSettings::default();
        assert!(!is_anthropic_proxy("https://api.anthropic.com", &settings));
        assert!(!is_anthropic_proxy("https://API.anthropic.com/v1/", &settings));
        assert!(!is_anthropic_proxy("", &settings));
        assert!(is_anthropic_proxy("https://api.302.ai/v1", &settings));
        assert!(is_anthropic_proxy("https://openrouter.ai/api/v1", &settings));
        assert!(is_anthropic_proxy("https://gateway.example.com", &settings));

        let custom = AnthropicSettings {
            official_host: "api.anthropic.com".to_string(),
            proxy_hosts: vec!["api.anthropic.com.mirror".to_string()],
        };
        assert!(is_anthropic_proxy("https://api.anthropic.com.mirror/v1", &custom));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a/v1/", "/chat/completions"), "https://a/v1/chat/completions");
        assert_eq!(join_url("https://a/v1", "chat/completions"), "https://a/v1/chat/completions");
    }
}
