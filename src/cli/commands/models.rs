//! Models Command
//!
//! Lists every configured model with its purposes and marks the default.

use serde::Serialize;
use std::sync::Arc;

use crate::cli::Output;
use crate::config::{AvailableModel, Environment, ModelSelector, ProvidersStore};
use crate::types::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListing {
    pub default_model: String,
    pub models: Vec<AvailableModel>,
}

pub fn collect(selector: &ModelSelector) -> Result<ModelListing> {
    Ok(ModelListing {
        default_model: selector.default_model()?,
        models: selector.available_models()?,
    })
}

pub fn run(env: Environment, format: &str) -> Result<()> {
    let selector = ModelSelector::new(Arc::new(ProvidersStore::new(env)));
    let listing = collect(&selector)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let out = Output::new();
    out.header("Configured models");
    if let Some(path) = selector.store().source_path() {
        out.field("Source", &path.display().to_string());
    }
    out.field("Default", &listing.default_model);

    out.section("Models");
    for model in &listing.models {
        let purposes: Vec<&str> = model.purposes.iter().map(|p| p.as_str()).collect();
        let marker = if model.model == listing.default_model {
            " (default)"
        } else {
            ""
        };
        let inferred = if model.purposes_inferred {
            " [inferred]"
        } else {
            ""
        };
        println!(
            "  {}{} - {} via {} [{}]{}",
            model.model,
            marker,
            model.title,
            model.provider,
            purposes.join(", "),
            inferred
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersDocument;

    #[test]
    fn test_collect_listing() {
        let document: ProvidersDocument = serde_json::from_str(
            r#"{"defaultModel":"b","modelPurposes":{"a":["QUERY"]},"providers":[{"provider":"ollama","models":[
                {"model":"a","title":"A","baseURL":"http://localhost:11434/v1"},
                {"model":"b","title":"B","baseURL":"http://localhost:11434/v1"}]}]}"#,
        )
        .unwrap();
        let selector = ModelSelector::new(Arc::new(ProvidersStore::from_document(document)));

        let listing = collect(&selector).unwrap();
        assert_eq!(listing.default_model, "b");
        assert_eq!(listing.models.len(), 2);

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["defaultModel"], "b");
        assert_eq!(json["models"][0]["purposes"][0], "QUERY");
        assert_eq!(json["models"][1]["purposesInferred"], true);
    }
}
