//! MCP server surface
//!
//! ## Tools
//!
//! - `suggest_components` - recommend UI components for a requirement
//! - `query_component` - look up one component by name
//! - `suggest_utilities` - recommend utility functions for a logic requirement
//! - `query_utility` - look up one utility by name
//!
//! ## Resources
//!
//! - `code-intelligence://component-library` - JSON catalog of every component
//! - `code-intelligence://usage-guide` - Markdown usage guide
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "code-intelligence": {
//!       "command": "code-intel",
//!       "env": { "CODE_INTEL_DATA_DIR": "/path/to/data" }
//!     }
//!   }
//! }
//! ```

pub mod resources;
mod tools;

pub use tools::{
    CodeIntelService, QueryComponentRequest, QueryUtilityRequest, SuggestComponentsRequest,
    SuggestUtilitiesRequest,
};
