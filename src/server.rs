//! MCP server initialization for the stdio transport.
//!
//! [`serve_stdio`] wires the config into the MCP tool handler and runs the
//! server until the client disconnects. The rmcp layer supplies the JSON-RPC
//! framing: initialize handshake, tools/list, tools/call dispatch, ping, and
//! structured parse/method-not-found errors.

use crate::config::MnemoConfig;
use crate::tools::MnemoTools;
use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::Arc;

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: MnemoConfig) -> Result<()> {
    tracing::info!(root = %config.resolved_root().display(), "starting mnemo MCP server on stdio");

    let tools = MnemoTools::new(Arc::new(config));
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}
