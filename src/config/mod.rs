//! Configuration Management
//!
//! Two layers:
//! 1. Providers document (`config.json`) located through an ordered search
//!    path of environment variables and fallback directories
//! 2. Service settings (timeouts, retries, proxy hosts) merged by Figment from
//!    defaults, an optional TOML file and `CODE_INTEL_*` variables

mod loader;
mod models;
pub mod paths;
mod settings;
mod types;
mod validation;

pub use loader::ProvidersStore;
pub use models::ModelSelector;
pub use paths::{Candidate, DataFile, Environment, expand_path};
pub use settings::{AnthropicSettings, LlmSettings, ServiceSettings};
pub use types::*;
pub use validation::{ConfigReport, check_document};
