//! Readable MCP resources: the component catalog and a static usage guide.

use serde::Serialize;

use crate::constants::server::{COMPONENT_LIBRARY_URI, USAGE_GUIDE_URI};
use crate::knowledge::{ComponentInfo, ComponentKnowledgeBase};
use crate::types::Result;

/// Static description of one listed resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

pub const RESOURCES: [ResourceSpec; 2] = [
    ResourceSpec {
        uri: COMPONENT_LIBRARY_URI,
        name: "Component library",
        description: "Every component in the private component library",
        mime_type: "application/json",
    },
    ResourceSpec {
        uri: USAGE_GUIDE_URI,
        name: "Usage guide",
        description: "How to use the suggestion tools, with best practices",
        mime_type: "text/markdown",
    },
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComponentLibrary<'a> {
    description: &'static str,
    total_components: usize,
    components: &'a [ComponentInfo],
}

/// Pretty JSON catalog of every component
pub fn component_library(knowledge: &ComponentKnowledgeBase) -> Result<String> {
    let library = ComponentLibrary {
        description: "Private component library",
        total_components: knowledge.len(),
        components: knowledge.all(),
    };
    Ok(serde_json::to_string_pretty(&library)?)
}

pub const USAGE_GUIDE: &str = r#"# Code Intelligence Usage Guide

## Overview

This MCP service analyzes UI and logic requirements, picks the best matches
from the private component and utility libraries, and rewrites the request
into a prompt that names concrete building blocks.

## Tools

### 1. suggest_components - UI component suggestions
Analyzes a UI requirement and recommends matching private components.

**Input:**
- prompt (string): the UI requirement

**Returns:**
- the original and optimized requirement
- recommended components with reasons
- import statements and file paths
- implementation suggestions

**Use for:** pages, forms, screens and other UI work

### 2. query_component - Component details
Looks up one component by exact name.

**Input:**
- componentName (string): component name, e.g. 'das-button'

**Returns:** the full component record

### 3. suggest_utilities - Utility function suggestions
Analyzes a logic requirement and recommends reusable utility functions.

**Input:**
- prompt (string): the logic requirement

**Returns:**
- the original and optimized requirement
- recommended utilities with reasons
- import statements, parameters, return values and file paths
- implementation suggestions

**Use for:** data processing, formatting, conversion, encryption and validation

### 4. query_utility - Utility details
Looks up one utility by exact name.

**Input:**
- utilityName (string): utility name, e.g. 'formatNumber'

**Returns:** the full utility record

## Workflow

1. The user describes a requirement (e.g. "a user list page with search, paging and editing")
2. The service sends the requirement and the library summary to the configured model
3. The model picks matching entries and rewrites the requirement
4. The service attaches import statements and file paths from the local library
5. The AI IDE uses the rewritten prompt to generate code that follows house conventions

## Best practices

1. Describe concrete functionality
2. Either Chinese or English keywords work
3. Spell out interactions and what data is displayed
4. Split complex requirements into steps
"#;

/// Text for a resource URI; `None` for unknown URIs
pub fn read(uri: &str, knowledge: &ComponentKnowledgeBase) -> Option<Result<String>> {
    match uri {
        COMPONENT_LIBRARY_URI => Some(component_library(knowledge)),
        USAGE_GUIDE_URI => Some(Ok(USAGE_GUIDE.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn knowledge() -> ComponentKnowledgeBase {
        ComponentKnowledgeBase::from_entries([ComponentInfo {
            name: "Button".to_string(),
            description: "d".to_string(),
            import: "import Button".to_string(),
            relative_path: "./Button.vue".to_string(),
        }])
    }

    #[test]
    fn test_component_library_shape() {
        let text = component_library(&knowledge()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["totalComponents"], 1);
        assert_eq!(value["components"][0]["name"], "Button");
        assert_eq!(value["components"][0]["relativePath"], "./Button.vue");
    }

    #[test]
    fn test_read_known_and_unknown() {
        let kb = knowledge();
        assert!(read(USAGE_GUIDE_URI, &kb).unwrap().unwrap().contains("query_utility"));
        assert!(read(COMPONENT_LIBRARY_URI, &kb).unwrap().is_ok());
        assert!(read("code-intelligence://nope", &kb).is_none());
    }

    #[test]
    fn test_listed_uris_are_readable() {
        let kb = ComponentKnowledgeBase::empty();
        for spec in RESOURCES {
            assert!(read(spec.uri, &kb).is_some(), "{}", spec.uri);
        }
    }
}
