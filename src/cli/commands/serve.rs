//! Serve Command
//!
//! Runs the MCP server over stdio until the client disconnects. All logging
//! must go to stderr while this runs.

use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::info;

use crate::config::{Environment, ServiceSettings};
use crate::server::CodeIntelService;

pub async fn run(env: Environment, settings: ServiceSettings) -> anyhow::Result<()> {
    let service = CodeIntelService::from_environment(env, &settings);
    info!("Starting {} on stdio", crate::constants::server::NAME);

    let server = service.serve(stdio()).await?;
    server.waiting().await?;

    info!("{} stopped", crate::constants::server::NAME);
    Ok(())
}
