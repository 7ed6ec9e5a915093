//! Prompt Templates
//!
//! Only names and descriptions are sent to the model. Import statements and
//! file paths stay local and are re-attached when formatting the answer.

use crate::knowledge::EntrySummary;

pub const COMPONENT_SYSTEM_PROMPT: &str = r#"You are a frontend component recommendation assistant. Your tasks:

1. **Recommend the most suitable components from the provided knowledge base**
   - Only recommend components that exist in the knowledge base
   - Choose the components most relevant to the user's requirement
   - Give a brief, clear reason for each recommendation

2. **Improve the user's prompt**
   - Only improve the wording so it is clearer and more precise
   - Do not add features the user did not mention
   - Do not expand the scope of the requirement
   - Keep the original intent

Notes:
- Recommend strictly from the knowledge base
- Keep reasons short
- Do not embellish the optimized prompt
- Response format: { "suggestedComponents": [{ "componentName": "name", "reason": "why" }], "optimizedPrompt": "improved prompt" }
- Return only component names and reasons, not descriptions"#;

pub const UTILITY_SYSTEM_PROMPT: &str = r#"You are a frontend utility function recommendation assistant. Your tasks:

1. **Recommend the most suitable utility functions from the provided knowledge base**
   - Only recommend utilities that exist in the knowledge base
   - Choose the utilities most relevant to the user's requirement
   - Give a brief, clear reason for each recommendation
   - Prefer utilities that can be reused directly over new code

2. **Improve the user's logic requirement**
   - Only improve the wording so it is clearer and more precise
   - Do not add features the user did not mention
   - Do not expand the scope of the requirement
   - Keep the original intent

Notes:
- Recommend strictly from the knowledge base
- Keep reasons short
- Do not embellish the optimized prompt
- Response format: { "suggestedUtilities": [{ "utilityName": "name", "reason": "why" }], "optimizedPrompt": "improved prompt" }
- Return only utility names and reasons, not descriptions"#;

const COMPONENT_JSON_INSTRUCTION: &str =
    "Respond in JSON with a suggestedComponents array and an optimizedPrompt string.";

const UTILITY_JSON_INSTRUCTION: &str =
    "Respond in JSON with a suggestedUtilities array and an optimizedPrompt string.";

/// `- name: description` lines
pub fn render_catalog(summary: &[EntrySummary]) -> String {
    summary
        .iter()
        .map(|entry| format!("- {}: {}", entry.name, entry.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn component_user_message(prompt: &str, summary: &[EntrySummary]) -> String {
    format!(
        "User requirement: {}\n\nAvailable component knowledge base:\n{}\n\n\
         Recommend suitable components from the library above for this requirement, \
         and improve the user's prompt.\n\n{}",
        prompt,
        render_catalog(summary),
        COMPONENT_JSON_INSTRUCTION
    )
}

pub fn utility_user_message(prompt: &str, summary: &[EntrySummary]) -> String {
    format!(
        "User logic requirement: {}\n\nAvailable utility knowledge base:\n{}\n\n\
         Recommend suitable utilities from the library above so the user avoids \
         re-implementing them, and improve the requirement description.\n\n{}",
        prompt,
        render_catalog(summary),
        UTILITY_JSON_INSTRUCTION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> Vec<EntrySummary> {
        vec![
            EntrySummary {
                name: "Button".to_string(),
                description: "Clickable button".to_string(),
            },
            EntrySummary {
                name: "Modal".to_string(),
                description: "Dialog overlay".to_string(),
            },
        ]
    }

    #[test]
    fn test_render_catalog() {
        assert_eq!(
            render_catalog(&summary()),
            "- Button: Clickable button\n- Modal: Dialog overlay"
        );
        assert_eq!(render_catalog(&[]), "");
    }

    #[test]
    fn test_user_messages_embed_prompt_and_catalog() {
        let message = component_user_message("a login form", &summary());
        assert!(message.starts_with("User requirement: a login form"));
        assert!(message.contains("- Modal: Dialog overlay"));
        assert!(message.ends_with(COMPONENT_JSON_INSTRUCTION));

        let message = utility_user_message("debounce search", &summary());
        assert!(message.contains("User logic requirement: debounce search"));
        assert!(message.ends_with(UTILITY_JSON_INSTRUCTION));
    }
}
