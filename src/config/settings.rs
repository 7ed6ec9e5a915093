//! Service Settings (Figment-based)
//!
//! Runtime knobs that are not part of the providers document:
//! 1. Built-in defaults (Serialized)
//! 2. Settings file (`CODE_INTEL_SETTINGS`, `<data dir>/settings.toml`, `./data/settings.toml`)
//! 3. Environment variables (`CODE_INTEL_` prefix, `__` separates sections,
//!    e.g. `CODE_INTEL_LLM__TIMEOUT_SECS=30`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::paths::{Candidate, Environment, resolve_candidates};
use crate::constants::{env as env_names, files, llm};
use crate::types::{CodeIntelError, Result};

/// Root settings structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Outbound LLM call behavior
    pub llm: LlmSettings,
    /// Anthropic endpoint classification
    pub anthropic: AnthropicSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the first attempt for transient failures (0 = single shot)
    pub max_retries: usize,
    /// Base delay for exponential backoff in milliseconds
    pub retry_base_delay_ms: u64,
    /// Upper bound for a single backoff delay in seconds
    pub retry_max_delay_secs: u64,
    /// Temperature used when a caller does not pass one
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            timeout_secs: llm::DEFAULT_TIMEOUT_SECS,
            max_retries: llm::DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: llm::BASE_DELAY_MS,
            retry_max_delay_secs: llm::MAX_DELAY_SECS,
            temperature: llm::DEFAULT_TEMPERATURE,
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_secs(self.retry_max_delay_secs)
    }
}

/// Host heuristics deciding between the native Anthropic API and an
/// OpenAI-compatible proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicSettings {
    /// Host of the official Messages API
    pub official_host: String,
    /// Hosts that re-expose Anthropic models over the OpenAI wire format
    pub proxy_hosts: Vec<String>,
}

impl Default for AnthropicSettings {
    fn default() -> Self {
        Self {
            official_host: llm::ANTHROPIC_OFFICIAL_HOST.to_string(),
            proxy_hosts: llm::ANTHROPIC_PROXY_HOSTS
                .iter()
                .map(|h| h.to_string())
                .collect(),
        }
    }
}

/// Same key mapping as figment's `Env::prefixed(..).split("__")`, reading
/// from an injected environment instead of the process.
fn merge_env_overrides(figment: Figment, env: &Environment) -> Figment {
    env.prefixed_vars(env_names::SETTINGS_PREFIX)
        .into_iter()
        .fold(figment, |figment, (name, raw)| {
            let key = name.to_lowercase().replace("__", ".");
            let value: Value = raw.parse().unwrap_or_else(|never| match never {});
            debug!("Settings override from environment: {}", key);
            figment.merge(Serialized::default(&key, value))
        })
}

impl ServiceSettings {
    /// Load settings with full resolution chain: defaults → file → env vars
    pub fn load(env: &Environment) -> Result<Self> {
        let path = Self::resolve_path(env);
        Self::load_from(path.as_deref(), Some(env))
    }

    /// Load settings from an optional file, merging `CODE_INTEL_*` overrides
    /// from `env` when given.
    pub fn load_from(path: Option<&Path>, env: Option<&Environment>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(ServiceSettings::default()));

        if let Some(path) = path {
            debug!("Loading service settings from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        if let Some(env) = env {
            figment = if env.is_process() {
                figment.merge(Env::prefixed(env_names::SETTINGS_PREFIX).split("__"))
            } else {
                merge_env_overrides(figment, env)
            };
        }

        let settings: ServiceSettings = figment
            .extract()
            .map_err(|e| CodeIntelError::Settings(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Candidate locations for the settings file
    pub fn candidates(env: &Environment) -> Vec<Candidate> {
        let mut candidates = vec![
            Candidate::env_file(env_names::SETTINGS_FILE),
            Candidate::env_dir(env_names::DATA_DIR, files::SETTINGS),
            Candidate::env_dir(env_names::legacy::DATA_DIR, files::SETTINGS),
        ];
        if let Some(cwd) = env.current_dir() {
            candidates.push(Candidate::Path(
                cwd.join(files::DATA_DIR).join(files::SETTINGS),
            ));
        }
        candidates
    }

    pub fn resolve_path(env: &Environment) -> Option<PathBuf> {
        resolve_candidates(&Self::candidates(env), env)
    }

    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(CodeIntelError::Settings(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(CodeIntelError::Settings(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.anthropic.official_host.trim().is_empty() {
            return Err(CodeIntelError::Settings(
                "anthropic.official_host must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
