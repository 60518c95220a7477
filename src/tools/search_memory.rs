//! MCP `search_memory` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `search_memory` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchMemoryParams {
    /// The keyword to match.
    #[schemars(description = "Search keyword (case-insensitive, substring match).")]
    pub query: String,

    /// Project root whose store is searched.
    #[schemars(
        description = "Current working directory (project root). Defaults to the server process cwd."
    )]
    pub cwd: Option<String>,
}
