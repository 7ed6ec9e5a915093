//! code-intel - Component and Utility Recommendations over MCP
//!
//! An MCP server that helps an AI IDE reuse a private component library and a
//! shared utility library. Given a natural-language requirement, it asks a
//! configured LLM to pick matching entries from a local catalog and rewrites
//! the requirement into a prompt that names concrete imports and file paths.
//!
//! ## Core Features
//!
//! - **Provider Config**: JSON document with OpenAI, Anthropic, DeepSeek and Ollama models
//! - **Purpose Routing**: per-purpose default models (`ANALYSIS`, `DESIGN`, ...)
//! - **Retrying Calls**: bounded exponential backoff on transient failures
//! - **Knowledge Bases**: component and utility catalogs loaded from JSON
//!
//! ## Quick Start
//!
//! ```ignore
//! use code_intel::{CodeIntelService, Environment, ServiceSettings};
//!
//! let env = Environment::system();
//! let settings = ServiceSettings::load(&env)?;
//! let service = CodeIntelService::from_environment(env, &settings);
//! ```
//!
//! ## Modules
//!
//! - [`config`]: path resolution, providers document, model selection, settings
//! - [`ai`]: provider clients and the retrying AI caller
//! - [`knowledge`]: component and utility catalogs
//! - [`suggest`]: suggestion requests and Markdown prompt rendering
//! - [`server`]: MCP tools and resources

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod knowledge;
pub mod server;
pub mod suggest;
pub mod types;

#[cfg(test)]
mod test_support;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{
    AvailableModel, Environment, ModelPurpose, ModelSelector, ProvidersDocument, ProvidersStore,
    ServiceSettings,
};

// Error Types
pub use types::{CodeIntelError, Result};

// =============================================================================
// Service Re-exports
// =============================================================================

pub use ai::{AiCallOptions, AiCaller};
pub use knowledge::{ComponentInfo, ComponentKnowledgeBase, UtilityInfo, UtilityKnowledgeBase};
pub use server::CodeIntelService;
pub use suggest::{ComponentSuggester, UtilitySuggester};
