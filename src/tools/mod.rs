pub mod load_memories;
pub mod search_memory;

use load_memories::LoadMemoriesParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use search_memory::SearchMemoryParams;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::MnemoConfig;
use crate::memory::retrieve;

/// The mnemo MCP tool handler. Holds the shared config (storage root) and
/// exposes the two read operations via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct MnemoTools {
    tool_router: ToolRouter<Self>,
    config: Arc<MnemoConfig>,
}

#[tool_router]
impl MnemoTools {
    pub fn new(config: Arc<MnemoConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            config,
        }
    }

    /// Resolve the project directory a request refers to.
    fn request_cwd(cwd: Option<String>) -> PathBuf {
        cwd.map(PathBuf::from)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Load persistent memories for the current project.
    #[tool(description = "Load persistent memories for the current project. Call this at session start to restore context from previous sessions. Returns HIGH confidence memories by default; set include_medium=true for broader context.")]
    async fn load_memories(
        &self,
        Parameters(params): Parameters<LoadMemoriesParams>,
    ) -> Result<String, String> {
        let root = self.config.resolved_root();
        let cwd = Self::request_cwd(params.cwd);
        let include_medium = params.include_medium.unwrap_or(false);

        tracing::info!(cwd = %cwd.display(), include_medium, "load_memories called");

        // Store I/O is synchronous file access
        let response =
            tokio::task::spawn_blocking(move || retrieve::load_memories(&root, &cwd, include_medium))
                .await
                .map_err(|e| format!("load task failed: {e}"))?;

        tracing::info!(project = %response.project, count = response.count, "memories loaded");

        serde_json::to_string(&response).map_err(|e| format!("serialization failed: {e}"))
    }

    /// Search project memories by keyword.
    #[tool(description = "Search project memories by keyword. Matches against content, tags, and type. Returns up to 10 results sorted by recency. Use this to find specific decisions, errors, or patterns.")]
    async fn search_memory(
        &self,
        Parameters(params): Parameters<SearchMemoryParams>,
    ) -> Result<String, String> {
        let root = self.config.resolved_root();
        let cwd = Self::request_cwd(params.cwd);
        let query = params.query;

        tracing::info!(query = %query, cwd = %cwd.display(), "search_memory called");

        let response =
            tokio::task::spawn_blocking(move || retrieve::search_memories(&root, &cwd, &query))
                .await
                .map_err(|e| format!("search task failed: {e}"))?;

        tracing::info!(project = %response.project, count = response.count, "search finished");

        serde_json::to_string(&response).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for MnemoTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Mnemo serves persistent per-project memories. Call load_memories at \
                 session start to restore context, and search_memory to find specific \
                 decisions, errors, or patterns."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
