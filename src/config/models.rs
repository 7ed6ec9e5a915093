//! Model Selection
//!
//! Picks model names from the providers document. Every name returned here is
//! guaranteed to exist in some provider's model list; a stale `defaultModel`
//! or purpose mapping is skipped, never returned.

use std::sync::Arc;

use tracing::{debug, info};

use super::loader::ProvidersStore;
use super::types::{AvailableModel, ModelConfig, ModelPurpose, ProvidersDocument};
use crate::types::{CodeIntelError, Result};

/// Model lookups backed by a [`ProvidersStore`]
#[derive(Debug, Clone)]
pub struct ModelSelector {
    store: Arc<ProvidersStore>,
}

impl ModelSelector {
    pub fn new(store: Arc<ProvidersStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ProvidersStore> {
        &self.store
    }

    fn document(&self) -> Result<Arc<ProvidersDocument>> {
        self.store.load(false)
    }

    /// `defaultModel` when it exists, else the first configured model.
    pub fn default_model(&self) -> Result<String> {
        let document = self.document()?;
        let name = default_model_in(&document)?;
        debug!("Default model: {}", name);
        Ok(name)
    }

    /// Best model for a purpose.
    ///
    /// Order: `defaultModels[purpose]` → any model whose `modelPurposes`
    /// entry lists the purpose → first configured model.
    pub fn recommended_model(&self, purpose: ModelPurpose) -> Result<String> {
        let document = self.document()?;
        let name = recommended_model_in(&document, purpose)?;
        info!("Recommended model for {}: {}", purpose, name);
        Ok(name)
    }

    pub fn validate_model(&self, name: &str) -> Result<bool> {
        Ok(self.document()?.has_model(name))
    }

    pub fn model_info(&self, name: &str) -> Result<Option<ModelConfig>> {
        Ok(self.document()?.find_model(name).map(|(_, m)| m.clone()))
    }

    /// Provider identifier of the first provider listing `name`
    pub fn provider_by_model(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .document()?
            .find_model(name)
            .map(|(p, _)| p.provider.clone()))
    }

    /// Every configured model with its purposes.
    ///
    /// Models without a `modelPurposes` entry get [`ModelPurpose::FALLBACK`]
    /// and `purposes_inferred = true`.
    pub fn available_models(&self) -> Result<Vec<AvailableModel>> {
        let document = self.document()?;
        Ok(available_models_in(&document))
    }
}

// =============================================================================
// Document-level resolution
// =============================================================================

fn default_model_in(document: &ProvidersDocument) -> Result<String> {
    if let Some(name) = &document.default_model {
        if document.has_model(name) {
            return Ok(name.clone());
        }
        debug!("Configured defaultModel {} is not in any provider", name);
    }
    first_model_in(document)
}

fn recommended_model_in(document: &ProvidersDocument, purpose: ModelPurpose) -> Result<String> {
    let mapped = document
        .default_models
        .iter()
        .find(|(key, _)| key.parse::<ModelPurpose>().ok() == Some(purpose))
        .map(|(_, model)| model);

    if let Some(name) = mapped {
        if document.has_model(name) {
            return Ok(name.clone());
        }
        debug!("defaultModels[{}] = {} is not in any provider", purpose, name);
    }

    let tagged = document.model_purposes.iter().find(|(model, tags)| {
        tags.iter()
            .any(|t| t.parse::<ModelPurpose>().ok() == Some(purpose))
            && document.has_model(model)
    });
    if let Some((name, _)) = tagged {
        return Ok(name.clone());
    }

    first_model_in(document)
}

fn first_model_in(document: &ProvidersDocument) -> Result<String> {
    document
        .first_model()
        .map(|m| m.model.clone())
        .ok_or(CodeIntelError::NoModelsConfigured)
}

fn available_models_in(document: &ProvidersDocument) -> Vec<AvailableModel> {
    document
        .models()
        .map(|(provider, model)| {
            let declared = document.declared_purposes(&model.model);
            let purposes_inferred = declared.is_none();
            AvailableModel {
                model: model.model.clone(),
                title: model.title.clone(),
                provider: provider.provider.clone(),
                purposes: declared.unwrap_or_else(|| vec![ModelPurpose::FALLBACK]),
                purposes_inferred,
            }
        })
        .collect()
}
