//! Read operations over a project store.
//!
//! Both operations are read-mostly but not read-only: every returned record
//! gets its `last_used` refreshed and the store is rewritten. A failed
//! bookkeeping write is logged and swallowed; retrieval availability beats
//! strict recency accounting.

use serde::Serialize;
use std::path::Path;

use crate::memory::store::MemoryStore;
use crate::memory::types::{project_slug, Confidence, Memory};

/// Search results are capped at this many records, most recent first.
const SEARCH_RESULT_CAP: usize = 10;

/// Response from [`load_memories`].
#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub project: String,
    pub count: usize,
    pub memories: Vec<Memory>,
}

/// Response from [`search_memories`]; echoes the normalized query.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub project: String,
    pub query: String,
    pub count: usize,
    pub memories: Vec<Memory>,
}

/// Load the confidence-gated memories for the project at `cwd`.
///
/// Returns HIGH-confidence records, plus MEDIUM when `include_medium` is set;
/// LOW is never surfaced here. Sorted HIGH before MEDIUM, then `last_used`
/// descending; the sort is stable, so records tied on both keys keep store
/// insertion order.
pub fn load_memories(root: &Path, cwd: &Path, include_medium: bool) -> LoadResponse {
    let project = project_slug(cwd);
    let mut store = MemoryStore::open(root, &project);

    let mut kept: Vec<Memory> = store
        .doc
        .memories
        .iter()
        .filter(|m| match m.confidence {
            Confidence::High => true,
            Confidence::Medium => include_medium,
            Confidence::Low => false,
        })
        .cloned()
        .collect();

    kept.sort_by(|a, b| {
        a.confidence
            .rank()
            .cmp(&b.confidence.rank())
            .then_with(|| b.last_used.cmp(&a.last_used))
    });

    record_access(&mut store, &kept);

    LoadResponse {
        project,
        count: kept.len(),
        memories: kept,
    }
}

/// Case-insensitive substring search over content, tags, and type.
///
/// An empty query returns an empty result without touching the store.
/// Matches are sorted by `last_used` descending (no tier grouping) and capped
/// at [`SEARCH_RESULT_CAP`].
pub fn search_memories(root: &Path, cwd: &Path, query: &str) -> SearchResponse {
    let project = project_slug(cwd);
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return SearchResponse {
            project,
            query,
            count: 0,
            memories: Vec::new(),
        };
    }

    let mut store = MemoryStore::open(root, &project);
    let mut matches: Vec<Memory> = store
        .doc
        .memories
        .iter()
        .filter(|m| {
            m.content.to_lowercase().contains(&query)
                || m.tags.iter().any(|t| t.to_lowercase().contains(&query))
                || m.memory_type.as_str().contains(&query)
        })
        .cloned()
        .collect();

    matches.sort_by(|a, b| b.last_used.cmp(&a.last_used));
    matches.truncate(SEARCH_RESULT_CAP);

    record_access(&mut store, &matches);

    SearchResponse {
        project,
        count: matches.len(),
        query,
        memories: matches,
    }
}

/// Persist `last_used` bookkeeping for the returned set. The response keeps
/// the pre-touch timestamps; only the store on disk moves forward.
fn record_access(store: &mut MemoryStore, returned: &[Memory]) {
    let ids: Vec<String> = returned.iter().map(|m| m.id.clone()).collect();
    if let Err(err) = store.touch(&ids) {
        tracing::warn!(error = %err, "failed to persist memory access times");
    }
}
