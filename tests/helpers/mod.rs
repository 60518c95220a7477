#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use mnemo::memory::store::MemoryStore;
use mnemo::memory::types::{Confidence, Memory, MemoryType, Source};
use std::path::Path;
use tempfile::TempDir;

/// Create an isolated storage root for one test.
pub fn test_root() -> TempDir {
    TempDir::new().expect("temp storage root")
}

/// Build a valid memory with the given content and confidence.
pub fn test_memory(content: &str, confidence: Confidence) -> Memory {
    Memory::build(
        content,
        MemoryType::Decision,
        "test-project",
        vec!["general".into()],
        confidence,
        Source::SessionEnd,
    )
    .expect("valid test memory")
}

/// Build a memory with an explicit `last_used`, offset in seconds from `base`.
pub fn test_memory_used_at(
    content: &str,
    confidence: Confidence,
    base: DateTime<Utc>,
    offset_secs: i64,
) -> Memory {
    let mut mem = test_memory(content, confidence);
    mem.last_used = base + Duration::seconds(offset_secs);
    mem
}

/// Store memories for `project` under `root` and persist them.
pub fn seed_store(root: &Path, project: &str, memories: Vec<Memory>) {
    let mut store = MemoryStore::open(root, project);
    store.append_dedup(memories);
    store.save().expect("seed store save");
}

/// Read the raw persisted document back as JSON.
pub fn read_store_json(root: &Path, project: &str) -> serde_json::Value {
    let raw = std::fs::read_to_string(root.join(format!("{project}.json")))
        .expect("store file present");
    serde_json::from_str(&raw).expect("store file is valid JSON")
}
