//! Configuration Check
//!
//! Static checks over a providers document. Errors make every AI-backed tool
//! fail; warnings flag entries that are silently skipped at selection time.

use std::collections::HashMap;

use serde::Serialize;
use url::Url;

use super::types::{ModelPurpose, ProviderKind, ProvidersDocument};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ConfigReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn check_document(document: &ProvidersDocument) -> ConfigReport {
    let mut report = ConfigReport::default();

    if document.first_model().is_none() {
        report.errors.push("No AI models configured".to_string());
    }

    let mut seen: HashMap<&str, &str> = HashMap::new();

    for provider in &document.providers {
        let kind = match provider.kind() {
            Ok(kind) => Some(kind),
            Err(e) => {
                report.errors.push(e.to_string());
                None
            }
        };

        if provider.models.is_empty() {
            report
                .warnings
                .push(format!("Provider \"{}\" has no models", provider.provider));
        }

        for model in &provider.models {
            // Native Anthropic falls back to the official host
            let implicit_url =
                kind == Some(ProviderKind::Anthropic) && model.base_url.trim().is_empty();
            if !implicit_url && let Err(e) = Url::parse(&model.base_url) {
                report.errors.push(format!(
                    "Model \"{}\" has an invalid baseURL \"{}\": {}",
                    model.model, model.base_url, e
                ));
            }

            if model.api_key.trim().is_empty() && kind != Some(ProviderKind::Ollama) {
                report.warnings.push(format!(
                    "Model \"{}\" ({}) has no apiKey",
                    model.model, provider.provider
                ));
            }

            if let Some(first) = seen.insert(&model.model, &provider.provider) {
                report.warnings.push(format!(
                    "Model \"{}\" is declared by both \"{}\" and \"{}\"; name lookups use \"{}\"",
                    model.model, first, provider.provider, first
                ));
                // Keep the first declaration as the effective one.
                seen.insert(&model.model, first);
            }
        }
    }

    if let Some(default) = &document.default_model
        && !document.has_model(default)
    {
        report.warnings.push(format!(
            "defaultModel \"{}\" is not declared by any provider",
            default
        ));
    }

    for (purpose, model) in &document.default_models {
        if purpose.parse::<ModelPurpose>().is_err() {
            report
                .warnings
                .push(format!("defaultModels has unknown purpose \"{}\"", purpose));
        }
        if !document.has_model(model) {
            report.warnings.push(format!(
                "defaultModels[{}] = \"{}\" is not declared by any provider",
                purpose, model
            ));
        }
    }

    for (model, tags) in document.model_purposes.iter() {
        if !document.has_model(model) {
            report.warnings.push(format!(
                "modelPurposes lists \"{}\" which is not declared by any provider",
                model
            ));
        }
        for tag in tags {
            if tag.parse::<ModelPurpose>().is_err() {
                report.warnings.push(format!(
                    "modelPurposes[{}] has unknown purpose \"{}\"",
                    model, tag
                ));
            }
        }
    }

    report
}
