//! Unified Error Type System
//!
//! Centralized error types for the entire service.
//!
//! ## Taxonomy
//!
//! - **Resolution**: `ConfigNotFound`, `DataFileNotFound`
//! - **Shape**: `ConfigParse`, `Settings`
//! - **Lookup**: `ProviderNotFound`, `ModelNotFound`, `ModelConfigNotFound`,
//!   `NoModelsConfigured`, `UnsupportedProvider`
//! - **Invocation**: `AiCall`, `AiTransport`, `Timeout`, `ResponseParse`
//!
//! Only invocation errors caused by the remote side are retryable; see
//! [`CodeIntelError::is_retryable`].

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeIntelError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Resolution Errors
    // -------------------------------------------------------------------------
    /// Every candidate location for the providers configuration was missing
    #[error("Could not find {file} in any of the expected locations: {}", format_paths(.searched))]
    ConfigNotFound { file: String, searched: Vec<PathBuf> },

    /// Every candidate location for a knowledge-base file was missing
    #[error("Could not find data file {file} in any of the expected locations: {}", format_paths(.searched))]
    DataFileNotFound { file: String, searched: Vec<PathBuf> },

    #[error("Failed to parse configuration {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Settings error: {0}")]
    Settings(String),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Provider \"{0}\" not found")]
    ProviderNotFound(String),

    #[error("Model \"{model}\" not found {}", model_scope(.provider))]
    ModelNotFound {
        model: String,
        provider: Option<String>,
    },

    #[error("Model configuration not found: {0}")]
    ModelConfigNotFound(String),

    #[error("No AI models configured")]
    NoModelsConfigured,

    #[error("Unsupported AI provider: {0}. Supported: openai, anthropic, deepseek, ollama")]
    UnsupportedProvider(String),

    // -------------------------------------------------------------------------
    // Invocation Errors
    // -------------------------------------------------------------------------
    /// Provider endpoint answered with a non-success status
    #[error("API call failed: {status} - {body}")]
    AiCall { status: u16, body: String },

    /// Request never produced an HTTP response (DNS, connect, TLS, body read)
    #[error("API request failed: {0}")]
    AiTransport(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Model output was not valid JSON after fence stripping
    #[error("Failed to parse JSON response: {message}")]
    ResponseParse { message: String, raw: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, CodeIntelError>;

fn model_scope(provider: &Option<String>) -> String {
    match provider {
        Some(p) => format!("for provider \"{p}\""),
        None => "in any provider".to_string(),
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Helper Functions
// =============================================================================

impl CodeIntelError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn model_not_found(model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model: model.into(),
            provider: None,
        }
    }

    pub fn model_not_found_for(model: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model: model.into(),
            provider: Some(provider.into()),
        }
    }

    /// Check if a failed AI call may succeed when repeated.
    ///
    /// Rate limits, server-side failures, transport errors and timeouts are
    /// transient. Client errors, parse failures and configuration errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::AiCall { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::AiTransport(_) | Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Raw model output carried by a parse failure
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::ResponseParse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CodeIntelError {
    fn from(err: reqwest::Error) -> Self {
        CodeIntelError::AiTransport(err.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_call_message_embeds_status_and_body() {
        let err = CodeIntelError::AiCall {
            status: 500,
            body: "rate limited".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("rate limited"));
    }

    #[test]
    fn test_retryable_classification() {
        let server = CodeIntelError::AiCall {
            status: 503,
            body: String::new(),
        };
        let rate_limit = CodeIntelError::AiCall {
            status: 429,
            body: String::new(),
        };
        let bad_request = CodeIntelError::AiCall {
            status: 400,
            body: String::new(),
        };
        assert!(server.is_retryable());
        assert!(rate_limit.is_retryable());
        assert!(!bad_request.is_retryable());
        assert!(CodeIntelError::AiTransport("reset".into()).is_retryable());
        assert!(CodeIntelError::timeout("call", Duration::from_secs(1)).is_retryable());
        assert!(!CodeIntelError::NoModelsConfigured.is_retryable());
        assert!(
            !CodeIntelError::ResponseParse {
                message: "eof".into(),
                raw: "{".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_model_not_found_display() {
        assert_eq!(
            CodeIntelError::model_not_found("gpt-x").to_string(),
            "Model \"gpt-x\" not found in any provider"
        );
        assert_eq!(
            CodeIntelError::model_not_found_for("gpt-x", "openai").to_string(),
            "Model \"gpt-x\" not found for provider \"openai\""
        );
    }

    #[test]
    fn test_config_not_found_lists_paths() {
        let err = CodeIntelError::ConfigNotFound {
            file: "config.json".into(),
            searched: vec![PathBuf::from("/a/config.json"), PathBuf::from("/b/config.json")],
        };
        assert_eq!(
            err.to_string(),
            "Could not find config.json in any of the expected locations: /a/config.json, /b/config.json"
        );
    }

    #[test]
    fn test_raw_response_preserved() {
        let err = CodeIntelError::ResponseParse {
            message: "expected value".into(),
            raw: "not json".into(),
        };
        assert_eq!(err.raw_response(), Some("not json"));
        assert_eq!(CodeIntelError::NoModelsConfigured.raw_response(), None);
    }
}
