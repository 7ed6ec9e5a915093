//! Component suggestions for UI requirements

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tracing::{info, warn};

use super::prompts::{COMPONENT_SYSTEM_PROMPT, component_user_message};
use super::{DocumentBuilder, RedesignedPrompt, require_prompt};
use crate::ai::{AiCallOptions, AiCaller};
use crate::knowledge::ComponentKnowledgeBase;
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSuggestion {
    pub component_name: String,
    #[serde(default)]
    pub reason: String,
}

/// Model answer for a component request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSuggestionResult {
    pub suggested_components: Vec<ComponentSuggestion>,
    pub optimized_prompt: String,
}

const IMPLEMENTATION_STEPS: [&str; 5] = [
    "Import the recommended components",
    "Configure component props and events for the requirement",
    "Write styles in Less following BEM naming",
    "Make sure the components support responsive layouts",
    "Use the query_component tool for detailed usage of a component",
];

const CONFIRMATION: &str =
    "Do not output code yet; please confirm whether to adopt the component suggestions above?";

#[derive(Debug, Clone)]
pub struct ComponentSuggester {
    caller: AiCaller,
    knowledge: Arc<ComponentKnowledgeBase>,
}

impl ComponentSuggester {
    pub fn new(caller: AiCaller, knowledge: Arc<ComponentKnowledgeBase>) -> Self {
        Self { caller, knowledge }
    }

    /// Ask the default model for matching components.
    pub async fn suggest(&self, prompt: &str) -> Result<ComponentSuggestionResult> {
        require_prompt(prompt)?;
        let summary = self.knowledge.summary();
        info!(
            "Suggesting components for prompt ({} components in catalog)",
            summary.len()
        );

        let options =
            AiCallOptions::new(COMPONENT_SYSTEM_PROMPT, component_user_message(prompt, &summary));
        let result: ComponentSuggestionResult = self.caller.call_ai_for_json(&options).await?;

        info!(
            "Model suggested {} component(s)",
            result.suggested_components.len()
        );
        Ok(result)
    }

    pub async fn redesign(
        &self,
        prompt: &str,
    ) -> Result<RedesignedPrompt<ComponentSuggestionResult>> {
        let result = self.suggest(prompt).await?;
        let redesigned_prompt = format_component_prompt(prompt, &result, &self.knowledge);
        Ok(RedesignedPrompt {
            original_prompt: prompt.to_string(),
            result,
            redesigned_prompt,
        })
    }
}

/// Render the Markdown document; names missing from the catalog are skipped.
pub fn format_component_prompt(
    original: &str,
    result: &ComponentSuggestionResult,
    knowledge: &ComponentKnowledgeBase,
) -> String {
    let mut doc = DocumentBuilder::new(
        "Component Suggestions",
        original,
        &result.optimized_prompt,
        "Recommended components",
    );

    let mut number = 0;
    for suggestion in &result.suggested_components {
        let Some(component) = knowledge.get(&suggestion.component_name) else {
            warn!(
                "Suggested component not in knowledge base: {}",
                suggestion.component_name
            );
            continue;
        };
        number += 1;
        doc.line(format!("### {}. {}", number, component.name));
        doc.line(format!("- Description: {}", component.description));
        doc.line(format!("- Reason: {}", suggestion.reason));
        doc.line(format!("- Import: `{}`", component.import));
        doc.line(format!("- File path: {}\n", component.relative_path));
    }

    doc.finish(&IMPLEMENTATION_STEPS, CONFIRMATION)
}
