//! Ingestion boundary — the agent-hook side of the memory system.
//!
//! `mnemo capture` reads one hook-event JSON object from stdin and dispatches
//! on `hook_event_name`:
//!
//! - `Stop`: run both extractors over the session's closing message and
//!   transcript, dedup-append into the project store, and report how many new
//!   memories were saved.
//! - `PostToolUse`: for significant file edits, inject a soft context note so
//!   the session-end extraction has file history to work with. Nothing is
//!   written to the store here.
//!
//! Every field is optional and every failure path degrades to "no output";
//! a hook must never break the surrounding workflow.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::memory::extract::{extract_from_message, extract_from_transcript};
use crate::memory::store::MemoryStore;
use crate::memory::types::project_slug;

/// Tools whose PostToolUse events are worth flagging.
const SIGNIFICANT_TOOLS: &[&str] = &["Write", "Edit", "Bash"];

/// Hook event payload. Fields default so partial input never errors.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub hook_event_name: String,
    #[serde(default)]
    pub cwd: String,
    #[serde(default)]
    pub last_assistant_message: String,
    #[serde(default)]
    pub transcript_path: String,
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: serde_json::Value,
}

/// Hook response: a context note for the agent, or nothing at all.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HookOutput {
    #[serde(rename = "additionalContext")]
    pub additional_context: String,
}

/// Dispatch a hook event. Unknown events produce no output.
pub fn run(root: &Path, input: &HookInput) -> Option<HookOutput> {
    match input.hook_event_name.as_str() {
        "PostToolUse" => handle_post_tool_use(input),
        "Stop" => handle_stop(root, input),
        _ => None,
    }
}

/// Flag significant Write/Edit events with a context note naming the file.
///
/// No store writes happen here — session-end extraction has better context
/// for deciding what is actually memory-worthy.
fn handle_post_tool_use(input: &HookInput) -> Option<HookOutput> {
    if !SIGNIFICANT_TOOLS.contains(&input.tool_name.as_str()) {
        return None;
    }

    if matches!(input.tool_name.as_str(), "Write" | "Edit") {
        let file_path = input.tool_input.get("file_path").and_then(|p| p.as_str())?;
        if !file_path.is_empty() {
            return Some(HookOutput {
                additional_context: format!(
                    "[mnemo] File modified this session: {file_path}"
                ),
            });
        }
    }

    None
}

/// Extract memories from the closing message and transcript, then persist
/// whatever survives validation and dedup.
fn handle_stop(root: &Path, input: &HookInput) -> Option<HookOutput> {
    let project = project_slug(Path::new(&input.cwd));

    let mut candidates = extract_from_message(&input.last_assistant_message, &project);
    if !input.transcript_path.is_empty() {
        candidates.extend(extract_from_transcript(
            Path::new(&input.transcript_path),
            &project,
        ));
    }

    if candidates.is_empty() {
        return None;
    }

    let mut store = MemoryStore::open(root, &project);
    let accepted = store.append_dedup(candidates);
    if accepted == 0 {
        return None;
    }

    if let Err(err) = store.save() {
        tracing::warn!(error = %err, "failed to persist captured memories");
        return None;
    }

    let noun = if accepted == 1 { "memory" } else { "memories" };
    Some(HookOutput {
        additional_context: format!(
            "[mnemo] Saved {accepted} new {noun} to {}. Run 'mnemo list' to review.",
            store.path().display()
        ),
    })
}
