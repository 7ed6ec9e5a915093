//! Utility suggestions for logic requirements
//!
//! Uses the model recommended for [`ModelPurpose::Design`] rather than the
//! plain default.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tracing::{info, warn};

use super::prompts::{UTILITY_SYSTEM_PROMPT, utility_user_message};
use super::{DocumentBuilder, RedesignedPrompt, require_prompt};
use crate::ai::{AiCallOptions, AiCaller};
use crate::config::ModelPurpose;
use crate::knowledge::UtilityKnowledgeBase;
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilitySuggestion {
    pub utility_name: String,
    #[serde(default)]
    pub reason: String,
}

/// Model answer for a utility request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilitySuggestionResult {
    pub suggested_utilities: Vec<UtilitySuggestion>,
    pub optimized_prompt: String,
}

const IMPLEMENTATION_STEPS: [&str; 5] = [
    "Import the recommended utilities",
    "Pass arguments as described by each parameter list",
    "Handle return values and add the necessary error handling",
    "Make sure each call fits the business logic",
    "Check the source file for detailed usage of a utility",
];

const CONFIRMATION: &str =
    "Do not output code yet; please confirm whether to adopt the utility suggestions above?";

#[derive(Debug, Clone)]
pub struct UtilitySuggester {
    caller: AiCaller,
    knowledge: Arc<UtilityKnowledgeBase>,
}

impl UtilitySuggester {
    pub fn new(caller: AiCaller, knowledge: Arc<UtilityKnowledgeBase>) -> Self {
        Self { caller, knowledge }
    }

    pub async fn suggest(&self, prompt: &str) -> Result<UtilitySuggestionResult> {
        require_prompt(prompt)?;
        let summary = self.knowledge.summary();
        info!(
            "Suggesting utilities for prompt ({} utilities in catalog)",
            summary.len()
        );

        let model = self
            .caller
            .selector()
            .recommended_model(ModelPurpose::Design)?;

        let options =
            AiCallOptions::new(UTILITY_SYSTEM_PROMPT, utility_user_message(prompt, &summary))
                .with_model(model);
        let result: UtilitySuggestionResult = self.caller.call_ai_for_json(&options).await?;

        info!(
            "Model suggested {} utility(ies)",
            result.suggested_utilities.len()
        );
        Ok(result)
    }

    pub async fn redesign(&self, prompt: &str) -> Result<RedesignedPrompt<UtilitySuggestionResult>> {
        let result = self.suggest(prompt).await?;
        let redesigned_prompt = format_utility_prompt(prompt, &result, &self.knowledge);
        Ok(RedesignedPrompt {
            original_prompt: prompt.to_string(),
            result,
            redesigned_prompt,
        })
    }
}

/// Render the Markdown document; names missing from the catalog are skipped.
pub fn format_utility_prompt(
    original: &str,
    result: &UtilitySuggestionResult,
    knowledge: &UtilityKnowledgeBase,
) -> String {
    let mut doc = DocumentBuilder::new(
        "Utility Suggestions",
        original,
        &result.optimized_prompt,
        "Recommended utilities",
    );

    let mut number = 0;
    for suggestion in &result.suggested_utilities {
        let Some(utility) = knowledge.get(&suggestion.utility_name) else {
            warn!(
                "Suggested utility not in knowledge base: {}",
                suggestion.utility_name
            );
            continue;
        };
        number += 1;
        doc.line(format!("### {}. {}", number, utility.name));
        doc.line(format!("- Description: {}", utility.description));
        doc.line(format!("- Reason: {}", suggestion.reason));
        doc.line(format!("- Import: `{}`", utility.import));
        if let Some(params) = &utility.params {
            doc.line(format!("- Parameters: {}", params));
        }
        if let Some(returns) = &utility.returns {
            doc.line(format!("- Returns: {}", returns));
        }
        if let Some(kind) = &utility.kind {
            doc.line(format!("- Type: {}", kind));
        }
        doc.line(format!("- File path: {}\n", utility.relative_path));
    }

    doc.finish(&IMPLEMENTATION_STEPS, CONFIRMATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProvidersDocument, ProvidersStore};
    use crate::knowledge::UtilityInfo;
    use crate::test_support::{CannedServer, Reply, fast_settings};

    fn knowledge() -> UtilityKnowledgeBase {
        UtilityKnowledgeBase::from_entries([
            UtilityInfo {
                name: "debounce".to_string(),
                description: "Delay calls".to_string(),
                import: "import { debounce } from '@/utils'".to_string(),
                relative_path: "./utils/debounce.ts".to_string(),
                params: Some("fn, wait".to_string()),
                returns: None,
                kind: Some("function".to_string()),
            },
        ])
    }

    #[test]
    fn test_format_includes_present_optional_fields() {
        let result = UtilitySuggestionResult {
            suggested_utilities: vec![UtilitySuggestion {
                utility_name: "debounce".to_string(),
                reason: "search box".to_string(),
            }],
            optimized_prompt: "Debounce search input".to_string(),
        };
        let doc = format_utility_prompt("debounce search", &result, &knowledge());
        assert!(doc.starts_with("# Utility Suggestions\n"));
        assert!(doc.contains("### 1. debounce"));
        assert!(doc.contains("- Parameters: fn, wait"));
        assert!(doc.contains("- Type: function"));
        assert!(!doc.contains("- Returns:"));
        assert!(doc.contains("- File path: ./utils/debounce.ts"));
    }

    #[tokio::test]
    async fn test_uses_design_model() {
        let design = CannedServer::start(vec![Reply::completion(
            r#"{"suggestedUtilities":[{"utilityName":"debounce","reason":"r"}],"optimizedPrompt":"p"}"#,
        )])
        .await;
        let default = CannedServer::start(vec![Reply::new("500 Internal Server Error", "wrong model")]).await;

        let document: ProvidersDocument = serde_json::from_str(&format!(
            r#"{{"defaultModels":{{"DESIGN":"designer"}},"providers":[{{"provider":"openai","models":[
                {{"model":"general","title":"General","baseURL":"{}","apiKey":"k"}},
                {{"model":"designer","title":"Designer","baseURL":"{}","apiKey":"k"}}]}}]}}"#,
            default.base_url, design.base_url
        ))
        .unwrap();
        let caller = AiCaller::new(
            Arc::new(ProvidersStore::from_document(document)),
            &fast_settings(0),
        );

        let suggester = UtilitySuggester::new(caller, Arc::new(knowledge()));
        let redesigned = suggester.redesign("debounce search").await.unwrap();
        assert_eq!(redesigned.result.optimized_prompt, "p");
        assert_eq!(design.hits(), 1);
        assert_eq!(default.hits(), 0);
    }
}
