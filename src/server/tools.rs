//! MCP Service
//!
//! Four tools (`suggest_components`, `query_component`, `suggest_utilities`,
//! `query_utility`) and two resources. Every tool failure is logged and
//! returned as an `isError` result; nothing is raised across the protocol
//! boundary except unknown resource URIs.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
    PaginatedRequestParam, RawResource, ReadResourceRequestParam, ReadResourceResult,
    ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::schemars;
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, tool, tool_handler, tool_router};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;

use tracing::{error, info};

use super::resources::{self, RESOURCES};
use crate::ai::AiCaller;
use crate::config::{Environment, ProvidersStore, ServiceSettings};
use crate::knowledge::{ComponentKnowledgeBase, UtilityKnowledgeBase};
use crate::suggest::{ComponentSuggester, UtilitySuggester};

/// Code intelligence MCP service
#[derive(Clone)]
pub struct CodeIntelService {
    components: Arc<ComponentKnowledgeBase>,
    utilities: Arc<UtilityKnowledgeBase>,
    component_suggester: ComponentSuggester,
    utility_suggester: UtilitySuggester,
    /// Tool router
    tool_router: ToolRouter<Self>,
}

impl CodeIntelService {
    pub fn new(
        store: Arc<ProvidersStore>,
        settings: &ServiceSettings,
        components: Arc<ComponentKnowledgeBase>,
        utilities: Arc<UtilityKnowledgeBase>,
    ) -> Self {
        let caller = AiCaller::new(store, settings);
        Self {
            component_suggester: ComponentSuggester::new(caller.clone(), Arc::clone(&components)),
            utility_suggester: UtilitySuggester::new(caller, Arc::clone(&utilities)),
            components,
            utilities,
            tool_router: Self::tool_router(),
        }
    }

    /// Build from the environment: providers config is loaded lazily, the
    /// knowledge bases eagerly (empty when their files are missing).
    pub fn from_environment(env: Environment, settings: &ServiceSettings) -> Self {
        let components = Arc::new(ComponentKnowledgeBase::load(&env));
        let utilities = Arc::new(UtilityKnowledgeBase::load(&env));
        let store = Arc::new(ProvidersStore::new(env));
        Self::new(store, settings, components, utilities)
    }
}

#[tool_handler]
impl ServerHandler for CodeIntelService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Code intelligence for UI and logic work. Use 'suggest_components' before building pages, forms or screens, 'suggest_utilities' before writing data processing or formatting logic, and the 'query_*' tools to look up one entry by exact name.".into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let resources = RESOURCES
            .iter()
            .map(|spec| {
                let mut raw = RawResource::new(spec.uri, spec.name);
                raw.description = Some(spec.description.to_string());
                raw.mime_type = Some(spec.mime_type.to_string());
                raw.no_annotation()
            })
            .collect();

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self.resource_text(&request.uri)?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}

impl CodeIntelService {
    fn resource_text(&self, uri: &str) -> Result<String, McpError> {
        info!("Reading resource: {}", uri);
        match resources::read(uri, &self.components) {
            Some(Ok(text)) => Ok(text),
            Some(Err(e)) => {
                error!("Failed to render resource {}: {}", uri, e);
                Err(McpError::internal_error(e.to_string(), None))
            }
            None => Err(McpError::invalid_request(
                format!("Unknown resource: {}", uri),
                None,
            )),
        }
    }
}

// ============================================================================
// Tool Input Schemas
// ============================================================================

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SuggestComponentsRequest {
    /// The user's UI requirement
    #[schemars(
        description = "The user's original requirement, e.g. \"build a login page\", \"create a user list\""
    )]
    pub prompt: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct QueryComponentRequest {
    #[serde(rename = "componentName")]
    #[schemars(description = "Exact component name, e.g. \"das-button\"")]
    pub component_name: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct SuggestUtilitiesRequest {
    /// The user's logic requirement
    #[schemars(
        description = "The user's logic requirement, e.g. \"format numbers with thousands separators\""
    )]
    pub prompt: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct QueryUtilityRequest {
    #[serde(rename = "utilityName")]
    #[schemars(description = "Exact utility name, e.g. \"formatNumber\"")]
    pub utility_name: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

fn tool_error(tool: &str, err: impl Display) -> CallToolResult {
    error!(tool, "Tool call failed: {}", err);
    CallToolResult::error(vec![Content::text(format!("Error: {}", err))])
}

fn pretty<T: Serialize>(tool: &str, value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => tool_error(tool, e),
    }
}

#[tool_router]
impl CodeIntelService {
    #[tool(
        description = "USE WHEN the user wants to create or build pages, components, forms or screens. Recommends the best-fitting components from the private component library and returns an optimized prompt with concrete implementation guidance."
    )]
    pub async fn suggest_components(
        &self,
        Parameters(request): Parameters<SuggestComponentsRequest>,
    ) -> Result<CallToolResult, McpError> {
        info!("Tool call: suggest_components");
        match self.component_suggester.redesign(&request.prompt).await {
            Ok(redesigned) => Ok(pretty("suggest_components", &redesigned)),
            Err(e) => Ok(tool_error("suggest_components", e)),
        }
    }

    #[tool(
        description = "Look up one component by exact name. Returns its description, import statement and file path."
    )]
    pub async fn query_component(
        &self,
        Parameters(request): Parameters<QueryComponentRequest>,
    ) -> Result<CallToolResult, McpError> {
        info!("Tool call: query_component ({})", request.component_name);
        if request.component_name.trim().is_empty() {
            return Ok(tool_error("query_component", "componentName must not be empty"));
        }

        match self.components.get(&request.component_name) {
            Some(component) => Ok(pretty("query_component", component)),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                "Component not found: {}",
                request.component_name
            ))])),
        }
    }

    #[tool(
        description = "USE WHEN the user needs logic such as data processing, formatting, conversion, encryption, time handling or validation. Recommends reusable utility functions so nothing is re-implemented, and returns an optimized prompt."
    )]
    pub async fn suggest_utilities(
        &self,
        Parameters(request): Parameters<SuggestUtilitiesRequest>,
    ) -> Result<CallToolResult, McpError> {
        info!("Tool call: suggest_utilities");
        match self.utility_suggester.redesign(&request.prompt).await {
            Ok(redesigned) => Ok(pretty("suggest_utilities", &redesigned)),
            Err(e) => Ok(tool_error("suggest_utilities", e)),
        }
    }

    #[tool(
        description = "Look up one utility function by exact name. Returns its description, import statement, parameters, return value and file path."
    )]
    pub async fn query_utility(
        &self,
        Parameters(request): Parameters<QueryUtilityRequest>,
    ) -> Result<CallToolResult, McpError> {
        info!("Tool call: query_utility ({})", request.utility_name);
        if request.utility_name.trim().is_empty() {
            return Ok(tool_error("query_utility", "utilityName must not be empty"));
        }

        match self.utilities.get(&request.utility_name) {
            Some(utility) => Ok(pretty("query_utility", utility)),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                "Utility not found: {}",
                request.utility_name
            ))])),
        }
    }
}
