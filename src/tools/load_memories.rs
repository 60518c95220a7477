//! MCP `load_memories` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `load_memories` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LoadMemoriesParams {
    /// Project root the memories belong to.
    #[schemars(
        description = "Current working directory (project root). Defaults to the server process cwd."
    )]
    pub cwd: Option<String>,

    /// Widen the confidence gate from HIGH-only to HIGH+MEDIUM.
    #[schemars(
        description = "Include MEDIUM confidence memories. Defaults to false (HIGH only)."
    )]
    pub include_medium: Option<bool>,
}
