//! Core memory type definitions.
//!
//! Defines [`MemoryType`] (the five memory categories), [`Confidence`]
//! (trust tiers that gate proactive surfacing), [`Source`] (which extractor
//! produced a record), and [`Memory`] (a full record as persisted in a
//! project store).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use thiserror::Error;

/// Maximum stored content length in characters, truncation marker included.
pub const MAX_CONTENT_CHARS: usize = 500;

/// Maximum number of tags on a single memory.
pub const MAX_TAGS: usize = 5;

/// What kind of fact a memory records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    /// A choice that was made and why. The default category.
    Decision,
    /// A recurring structure or convention in the codebase.
    Pattern,
    /// A failure mode and how it was resolved.
    Error,
    /// A standing instruction about how to work.
    Preference,
    /// A project-specific term and its meaning.
    Glossary,
}

impl MemoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decision => "decision",
            Self::Pattern => "pattern",
            Self::Error => "error",
            Self::Preference => "preference",
            Self::Glossary => "glossary",
        }
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decision" => Ok(Self::Decision),
            "pattern" => Ok(Self::Pattern),
            "error" => Ok(Self::Error),
            "preference" => Ok(Self::Preference),
            "glossary" => Ok(Self::Glossary),
            _ => Err(format!("unknown memory type: {s}")),
        }
    }
}

/// Trust tier assigned at extraction time.
///
/// HIGH memories are surfaced proactively, MEDIUM only on request, LOW is
/// retained for search but never returned by `load_memories`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Sort rank: lower sorts first (HIGH before MEDIUM before LOW).
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            _ => Err(format!("unknown confidence tier: {s}")),
        }
    }
}

/// Which extractor produced a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// Inferred from the assistant's closing message at session end.
    SessionEnd,
    /// Matched an explicit instruction in a user transcript message.
    Explicit,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionEnd => "session-end",
            Self::Explicit => "explicit",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session-end" => Ok(Self::SessionEnd),
            "explicit" => Ok(Self::Explicit),
            _ => Err(format!("unknown memory source: {s}")),
        }
    }
}

/// Why a candidate was refused by [`Memory::build`].
///
/// Rejections are silent at the pipeline level — a refused candidate is
/// dropped, not surfaced to the end user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Reject {
    #[error("content is empty after trimming")]
    Empty,
    #[error("content matches a credential pattern")]
    Credential,
}

/// A single stored memory record.
///
/// Unknown fields found in a persisted record are carried in `extra` and
/// written back verbatim, so newer schema versions survive a rewrite by an
/// older reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    /// `mem_<UTC timestamp>_<8 hex>` — timestamp prefix plus random suffix.
    pub id: String,
    /// Category of this memory. Unrecognized stored values decode as `decision`.
    #[serde(rename = "type", deserialize_with = "lossy_type")]
    pub memory_type: MemoryType,
    /// The fact itself, 1..=500 chars.
    pub content: String,
    /// Slug of the owning project.
    pub project: String,
    /// Up to 5 inferred tags, `["general"]` when nothing matched.
    pub tags: Vec<String>,
    /// Set once at creation, never mutated.
    pub created_at: DateTime<Utc>,
    /// Updated every time retrieval returns this record.
    pub last_used: DateTime<Utc>,
    /// Trust tier. Unrecognized stored values decode as `MEDIUM`.
    #[serde(deserialize_with = "lossy_confidence")]
    pub confidence: Confidence,
    /// Producing extractor. Unrecognized stored values decode as `session-end`.
    #[serde(deserialize_with = "lossy_source")]
    pub source: Source,
    /// Pass-through for fields this version does not know about.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Memory {
    /// Validate and construct a memory from a candidate.
    ///
    /// Trims content, refuses empty or credential-bearing candidates,
    /// truncates to [`MAX_CONTENT_CHARS`], and caps tags at [`MAX_TAGS`]
    /// preserving order. No side effects — nothing is persisted here.
    pub fn build(
        content: &str,
        memory_type: MemoryType,
        project: &str,
        mut tags: Vec<String>,
        confidence: Confidence,
        source: Source,
    ) -> Result<Self, Reject> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Reject::Empty);
        }
        if super::credentials::looks_like_credential(content) {
            return Err(Reject::Credential);
        }

        tags.truncate(MAX_TAGS);
        let now = Utc::now();

        Ok(Self {
            id: generate_id(now),
            memory_type,
            content: truncate_content(content),
            project: project.to_string(),
            tags,
            created_at: now,
            last_used: now,
            confidence,
            source,
            extra: serde_json::Map::new(),
        })
    }
}

/// Truncate to [`MAX_CONTENT_CHARS`] characters, the last one being an
/// ellipsis marker when anything was cut.
pub fn truncate_content(text: &str) -> String {
    if text.chars().count() <= MAX_CONTENT_CHARS {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(MAX_CONTENT_CHARS - 1).collect();
    truncated.push('…');
    truncated
}

/// Generate a memory id: UTC timestamp prefix plus 8 hex chars of a v4 UUID.
///
/// The timestamp keeps ids roughly sortable; the random suffix makes
/// collisions negligible across processes.
pub fn generate_id(now: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("mem_{}_{}", now.format("%Y%m%d_%H%M%S"), &suffix[..8])
}

/// Derive a filesystem-safe project slug from a working directory.
///
/// Last path component, lowercased, with runs of non-alphanumeric characters
/// collapsed to single hyphens and leading/trailing hyphens stripped.
pub fn project_slug(cwd: &Path) -> String {
    let name = cwd
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        "unknown-project".to_string()
    } else {
        slug
    }
}

fn lossy_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MemoryType, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or(MemoryType::Decision))
}

fn lossy_confidence<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Confidence, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or(Confidence::Medium))
}

fn lossy_source<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Source, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or(Source::SessionEnd))
}
