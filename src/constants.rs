//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! Environment variable names and data file names live here so the
//! resolution chains in `config` and `knowledge` stay in one place.

/// Environment variable names
pub mod env {
    /// Direct path to the providers configuration file
    pub const CONFIG_FILE: &str = "CODE_INTEL_CONFIG";
    /// Direct path to the components knowledge base
    pub const COMPONENTS_FILE: &str = "CODE_INTEL_COMPONENTS";
    /// Direct path to the utilities knowledge base
    pub const UTILS_FILE: &str = "CODE_INTEL_UTILS";
    /// Directory holding config.json, components.json and utils.json
    pub const DATA_DIR: &str = "CODE_INTEL_DATA_DIR";
    /// Direct path to the service settings TOML file
    pub const SETTINGS_FILE: &str = "CODE_INTEL_SETTINGS";
    /// Prefix for service settings overrides (`CODE_INTEL_LLM__TIMEOUT_SECS`)
    pub const SETTINGS_PREFIX: &str = "CODE_INTEL_";

    /// Legacy names kept for existing deployments
    pub mod legacy {
        pub const CONFIG_FILE: &str = "GAREN_MCP_CONFIG";
        pub const COMPONENTS_FILE: &str = "GAREN_MCP_COMPONENTS";
        pub const UTILS_FILE: &str = "GAREN_MCP_UTILS";
        pub const DATA_DIR: &str = "GAREN_MCP_DATA_DIR";
    }

    /// Generic fallback for the providers configuration only
    pub const GENERIC_CONFIG_PATH: &str = "CONFIG_PATH";
}

/// Data file names
pub mod files {
    pub const CONFIG: &str = "config.json";
    pub const COMPONENTS: &str = "components.json";
    pub const UTILS: &str = "utils.json";
    pub const SETTINGS: &str = "settings.toml";
    /// Directory (relative to cwd or the executable) holding the data files
    pub const DATA_DIR: &str = "data";
}

/// LLM call constants
pub mod llm {
    /// Default sampling temperature for suggestion calls
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Default number of retries for transient failures
    pub const DEFAULT_MAX_RETRIES: usize = 2;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (seconds)
    pub const MAX_DELAY_SECS: u64 = 10;

    /// Placeholder key sent to Ollama endpoints that need no authentication
    pub const OLLAMA_PLACEHOLDER_KEY: &str = "ollama";

    /// Max tokens requested from the native Anthropic Messages API
    pub const ANTHROPIC_MAX_TOKENS: u32 = 4096;

    /// Anthropic Messages API version header value
    pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

    /// Official Anthropic API host
    pub const ANTHROPIC_OFFICIAL_HOST: &str = "api.anthropic.com";

    /// Third-party hosts known to re-expose Anthropic models over the OpenAI wire format
    pub const ANTHROPIC_PROXY_HOSTS: &[&str] = &["302.ai", "openrouter.ai"];

    /// Characters of raw model output kept in log previews
    pub const LOG_PREVIEW_CHARS: usize = 200;
}

/// MCP server constants
pub mod server {
    pub const NAME: &str = "code-intelligence-service";
    pub const COMPONENT_LIBRARY_URI: &str = "code-intelligence://component-library";
    pub const USAGE_GUIDE_URI: &str = "code-intelligence://usage-guide";
}
