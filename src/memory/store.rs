//! Durable per-project store — a single JSON document per project slug.
//!
//! [`MemoryStore::open`] never fails: a missing document means an empty store,
//! and a corrupt one is recovered by starting fresh. Every mutation rewrites
//! the whole document via a temp file plus atomic rename, so a reader never
//! observes a partial write. There is no cross-process lock; concurrent
//! writers race and the last save wins.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::memory::types::Memory;

/// Version tag carried through load/save. Unrecognized versions still load;
/// unknown fields pass through untouched.
pub const SCHEMA_VERSION: &str = "1.0";

/// The persisted document: store metadata plus the ordered memory list.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreDocument {
    pub project: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub memories: Vec<Memory>,
    /// Unknown top-level fields, preserved on rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl StoreDocument {
    fn empty(project: &str) -> Self {
        let now = Utc::now();
        Self {
            project: project.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            created_at: now,
            last_updated: now,
            memories: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A project store bound to its backing file.
#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
    pub doc: StoreDocument,
}

impl MemoryStore {
    /// Open the store for `project` under `root`.
    ///
    /// Missing file, unreadable file, and unparseable content all yield a
    /// fresh empty store — corruption is a recoverable event here, not an
    /// error the caller has to handle.
    pub fn open(root: &Path, project: &str) -> Self {
        let path = root.join(format!("{project}.json"));
        let doc = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "store document unreadable, starting fresh"
                    );
                    StoreDocument::empty(project)
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                StoreDocument::empty(project)
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "store document unreadable, starting fresh"
                );
                StoreDocument::empty(project)
            }
        };

        Self { path, doc }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append candidates whose content is not already present, comparing
    /// case-insensitively against existing records and earlier candidates in
    /// the same batch. Returns how many were accepted. Does not persist.
    pub fn append_dedup(&mut self, candidates: Vec<Memory>) -> usize {
        let mut seen: HashSet<String> = self
            .doc
            .memories
            .iter()
            .map(|m| m.content.to_lowercase())
            .collect();

        let mut accepted = 0;
        for mem in candidates {
            let key = mem.content.to_lowercase();
            if seen.contains(&key) {
                tracing::debug!(id = %mem.id, "duplicate content, skipped");
                continue;
            }
            seen.insert(key);
            self.doc.memories.push(mem);
            accepted += 1;
        }
        accepted
    }

    /// Persist the document: refresh `last_updated`, write a sibling temp
    /// file, then atomically rename it over the canonical path.
    pub fn save(&mut self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create store dir: {}", dir.display()))?;
        }

        self.doc.last_updated = Utc::now();
        let json = serde_json::to_string_pretty(&self.doc).context("failed to encode store")?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write temp store: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace store: {}", self.path.display()))?;
        Ok(())
    }

    /// Update `last_used` to now on the named records, persisting only when
    /// at least one record changed. Returns whether anything changed.
    pub fn touch(&mut self, ids: &[String]) -> Result<bool> {
        if ids.is_empty() {
            return Ok(false);
        }
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let now = Utc::now();

        let mut changed = false;
        for mem in &mut self.doc.memories {
            if ids.contains(mem.id.as_str()) {
                mem.last_used = now;
                changed = true;
            }
        }

        if changed {
            self.save()?;
        }
        Ok(changed)
    }
}
