//! Suggestion Pipeline
//!
//! Sends a requirement plus the knowledge-base summary to the model, parses
//! the suggested names, and formats a "redesigned prompt" document that joins
//! each suggestion with its full local record.
//!
//! ## Flow
//!
//! ```text
//! prompt ─► summary() ─► call_ai_for_json ─► SuggestionResult
//!                                              │
//!                      KnowledgeBase::get ◄────┘
//!                              │
//!                              ▼
//!                      RedesignedPrompt { originalPrompt, result, redesignedPrompt }
//! ```

mod components;
pub mod prompts;
mod utilities;

pub use components::{
    ComponentSuggester, ComponentSuggestion, ComponentSuggestionResult, format_component_prompt,
};
pub use utilities::{
    UtilitySuggester, UtilitySuggestion, UtilitySuggestionResult, format_utility_prompt,
};

use serde::{Deserialize, Serialize};

use crate::types::{CodeIntelError, Result};

/// Final document returned by the suggest tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedesignedPrompt<R> {
    pub original_prompt: String,
    /// Parsed model answer, including names with no local record
    pub result: R,
    /// Markdown document for the user
    pub redesigned_prompt: String,
}

fn require_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(CodeIntelError::InvalidArgument(
            "prompt must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Markdown assembly shared by both document kinds
struct DocumentBuilder {
    parts: Vec<String>,
}

impl DocumentBuilder {
    fn new(title: &str, original: &str, optimized: &str, section: &str) -> Self {
        Self {
            parts: vec![
                format!("# {}\n", title),
                format!("Original requirement: \"{}\"\n", original),
                format!("Optimized requirement: \"{}\"\n", optimized),
                format!("## {}\n", section),
            ],
        }
    }

    fn line(&mut self, line: impl Into<String>) {
        self.parts.push(line.into());
    }

    fn finish(mut self, steps: &[&str], confirmation: &str) -> String {
        self.parts.push("## Implementation suggestions\n".to_string());
        for (i, step) in steps.iter().enumerate() {
            if i + 1 == steps.len() {
                self.parts.push(format!("{}. {}\n", i + 1, step));
            } else {
                self.parts.push(format!("{}. {}", i + 1, step));
            }
        }
        self.parts.push("---\n".to_string());
        self.parts.push(format!("**{}**\n", confirmation));
        self.parts.join("\n")
    }
}
