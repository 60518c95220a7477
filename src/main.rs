mod capture;
mod cli;
mod config;
mod memory;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mnemo", version, about = "Per-project persistent memory for AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP retrieval server (stdio transport)
    Serve,
    /// Run as an agent hook: read one hook-event JSON object from stdin
    Capture,
    /// List stored memories for a project
    List {
        /// Project root to list memories for (defaults to the current directory)
        #[arg(long)]
        cwd: Option<String>,
    },
    /// Search a project's memories by keyword
    Search {
        /// Search keyword (case-insensitive substring match)
        query: String,
        /// Project root to search in (defaults to the current directory)
        #[arg(long)]
        cwd: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level and storage root)
    let config = config::MnemoConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for MCP JSON-RPC and hook output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            server::serve_stdio(config).await?;
        }
        Command::Capture => {
            run_capture(&config)?;
        }
        Command::List { cwd } => {
            cli::list(&config, cwd.as_deref())?;
        }
        Command::Search { query, cwd } => {
            cli::search(&config, &query, cwd.as_deref())?;
        }
    }

    Ok(())
}

/// Read a hook event from stdin and print the response, if any.
///
/// Empty or malformed input exits quietly — a hook invocation must never
/// fail the workflow that triggered it.
fn run_capture(config: &config::MnemoConfig) -> Result<()> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(());
    }

    let Ok(input) = serde_json::from_str::<capture::HookInput>(raw) else {
        tracing::debug!("unparseable hook input, ignoring");
        return Ok(());
    };

    if let Some(output) = capture::run(&config.resolved_root(), &input) {
        println!("{}", serde_json::to_string(&output)?);
    }
    Ok(())
}
