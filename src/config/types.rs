//! Configuration Types
//!
//! Shape of the providers document (`config.json`) and the model metadata
//! derived from it.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::types::CodeIntelError;

// =============================================================================
// Providers
// =============================================================================

/// Known AI providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    DeepSeek,
    Ollama,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::DeepSeek,
        ProviderKind::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = CodeIntelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(CodeIntelError::UnsupportedProvider(s.to_string())),
        }
    }
}

/// One model entry under a provider.
///
/// The API key is never serialized and is redacted in debug output.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub model: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("model", &self.model)
            .field("title", &self.title)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Provider block: identifier plus its models.
///
/// The identifier stays a string so an unknown provider fails at dispatch
/// with `UnsupportedProvider` instead of rejecting the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: String,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

impl ProviderConfig {
    pub fn kind(&self) -> Result<ProviderKind, CodeIntelError> {
        self.provider.parse()
    }

    pub fn find_model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.iter().find(|m| m.model == name)
    }
}

// =============================================================================
// Purposes
// =============================================================================

/// Semantic task tag used to pick the best-fit model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModelPurpose {
    /// Requirement and complexity analysis
    Analysis,
    /// Component design and strategy generation
    Design,
    /// Component lookup and documentation retrieval
    Query,
    /// Design integration and composition
    Integration,
}

impl ModelPurpose {
    /// Purpose assumed for models without an explicit `modelPurposes` entry
    pub const FALLBACK: ModelPurpose = ModelPurpose::Analysis;

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelPurpose::Analysis => "ANALYSIS",
            ModelPurpose::Design => "DESIGN",
            ModelPurpose::Query => "QUERY",
            ModelPurpose::Integration => "INTEGRATION",
        }
    }
}

impl fmt::Display for ModelPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ANALYSIS" => Ok(ModelPurpose::Analysis),
            "DESIGN" => Ok(ModelPurpose::Design),
            "QUERY" => Ok(ModelPurpose::Query),
            "INTEGRATION" => Ok(ModelPurpose::Integration),
            _ => Err(format!(
                "Unknown model purpose: {}. Valid values: ANALYSIS, DESIGN, QUERY, INTEGRATION",
                s
            )),
        }
    }
}

// =============================================================================
// Providers Document
// =============================================================================

/// Root of `config.json`.
///
/// Purpose maps are keyed by plain strings so an unrecognized purpose tag in
/// the file is ignored rather than fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_models: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "ModelPurposes::is_empty")]
    pub model_purposes: ModelPurposes,
    pub providers: Vec<ProviderConfig>,
}

impl ProvidersDocument {
    /// Every (provider, model) pair in declaration order
    pub fn models(&self) -> impl Iterator<Item = (&ProviderConfig, &ModelConfig)> {
        self.providers
            .iter()
            .flat_map(|p| p.models.iter().map(move |m| (p, m)))
    }

    /// First provider/model pair whose model name matches
    pub fn find_model(&self, name: &str) -> Option<(&ProviderConfig, &ModelConfig)> {
        self.models().find(|(_, m)| m.model == name)
    }

    pub fn has_model(&self, name: &str) -> bool {
        self.find_model(name).is_some()
    }

    pub fn find_provider(&self, provider: &str) -> Option<&ProviderConfig> {
        self.providers
            .iter()
            .find(|p| p.provider.eq_ignore_ascii_case(provider))
    }

    /// First model of the first provider that has any
    pub fn first_model(&self) -> Option<&ModelConfig> {
        self.models().next().map(|(_, m)| m)
    }

    /// Purposes explicitly declared for a model, unknown tags skipped
    pub fn declared_purposes(&self, model: &str) -> Option<Vec<ModelPurpose>> {
        self.model_purposes
            .get(model)
            .map(|tags| tags.iter().filter_map(|t| t.parse().ok()).collect())
    }
}

/// `modelPurposes` map (model → purpose tags) in file order.
///
/// Purpose lookups scan it front to back, so the first model declared for a
/// purpose wins. A repeated key replaces the earlier tags in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPurposes(Vec<(String, Vec<String>)>);

impl ModelPurposes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, model: &str) -> Option<&Vec<String>> {
        self.0.iter().find(|(m, _)| m == model).map(|(_, tags)| tags)
    }

    pub fn insert(&mut self, model: String, tags: Vec<String>) {
        match self.0.iter_mut().find(|(m, _)| *m == model) {
            Some(entry) => entry.1 = tags,
            None => self.0.push((model, tags)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter().map(|(model, tags)| (model, tags))
    }
}

impl FromIterator<(String, Vec<String>)> for ModelPurposes {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut purposes = Self::new();
        for (model, tags) in iter {
            purposes.insert(model, tags);
        }
        purposes
    }
}

impl Serialize for ModelPurposes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for ModelPurposes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PurposesVisitor;

        impl<'de> Visitor<'de> for PurposesVisitor {
            type Value = ModelPurposes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of model name to purpose tags")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut purposes = ModelPurposes::new();
                while let Some((model, tags)) = access.next_entry::<String, Vec<String>>()? {
                    purposes.insert(model, tags);
                }
                Ok(purposes)
            }
        }

        deserializer.deserialize_map(PurposesVisitor)
    }
}

/// Model listing entry returned by `ModelSelector::available_models`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableModel {
    pub model: String,
    pub title: String,
    pub provider: String,
    pub purposes: Vec<ModelPurpose>,
    /// True when no `modelPurposes` entry existed and the fallback was used
    pub purposes_inferred: bool,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "defaultModel": "gpt-4o",
        "defaultModels": { "DESIGN": "claude-sonnet" },
        "modelPurposes": { "gpt-4o": ["ANALYSIS", "QUERY", "BOGUS"] },
        "providers": [
            { "provider": "openai", "models": [
                { "model": "gpt-4o", "title": "GPT-4o", "baseURL": "https://api.openai.com/v1", "apiKey": "sk-secret" }
            ]},
            { "provider": "anthropic", "models": [
                { "model": "claude-sonnet", "title": "Claude", "baseURL": "https://api.anthropic.com", "apiKey": "k" }
            ]}
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let doc: ProvidersDocument = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(doc.default_model.as_deref(), Some("gpt-4o"));
        assert_eq!(doc.providers.len(), 2);
        assert_eq!(doc.providers[0].models[0].base_url, "https://api.openai.com/v1");
        assert_eq!(doc.providers[1].kind().unwrap(), ProviderKind::Anthropic);
    }

    #[test]
    fn test_minimal_document() {
        let doc: ProvidersDocument = serde_json::from_str(r#"{"providers": []}"#).unwrap();
        assert!(doc.default_model.is_none());
        assert!(doc.default_models.is_empty());
        assert!(doc.first_model().is_none());
    }

    #[test]
    fn test_missing_providers_is_error() {
        assert!(serde_json::from_str::<ProvidersDocument>(r#"{"defaultModel": "x"}"#).is_err());
    }

    #[test]
    fn test_declared_purposes_skip_unknown() {
        let doc: ProvidersDocument = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(
            doc.declared_purposes("gpt-4o"),
            Some(vec![ModelPurpose::Analysis, ModelPurpose::Query])
        );
        assert_eq!(doc.declared_purposes("claude-sonnet"), None);
    }

    #[test]
    fn test_api_key_redacted_and_not_serialized() {
        let doc: ProvidersDocument = serde_json::from_str(SAMPLE).unwrap();
        let model = &doc.providers[0].models[0];
        assert!(!format!("{:?}", model).contains("sk-secret"));
        assert!(!serde_json::to_string(model).unwrap().contains("sk-secret"));
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("ollama".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert!(matches!(
            "gemini".parse::<ProviderKind>(),
            Err(CodeIntelError::UnsupportedProvider(p)) if p == "gemini"
        ));
    }

    #[test]
    fn test_model_purpose_roundtrip_names() {
        for purpose in [
            ModelPurpose::Analysis,
            ModelPurpose::Design,
            ModelPurpose::Query,
            ModelPurpose::Integration,
        ] {
            assert_eq!(purpose.as_str().parse::<ModelPurpose>().unwrap(), purpose);
        }
        assert!("unknown".parse::<ModelPurpose>().is_err());
    }
}
