//! Extraction engine — turns raw conversational text into candidate memories.
//!
//! Two independent extractors share the [`Memory::build`] validation path:
//!
//! - [`extract_from_message`] scans the assistant's closing message for
//!   decision-signaling sentences. Conservative keyword heuristics, MEDIUM
//!   confidence.
//! - [`extract_from_transcript`] scans a JSONL session transcript for explicit
//!   user instructions ("remember that ...", "always use ...", "rule: ...").
//!   Explicit instructions are more trustworthy than inferred ones, so these
//!   get HIGH confidence.
//!
//! Both are pure functions of their input plus the target project slug, and
//! both pre-filter credentials before truncation so a secret buried in the
//! middle of an overlong sentence still vetoes the candidate.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::memory::credentials::looks_like_credential;
use crate::memory::types::{
    truncate_content, Confidence, Memory, MemoryType, Source, MAX_CONTENT_CHARS,
};

/// Noise ceiling for sentence-level extraction, in scan order.
const MESSAGE_MEMORY_CAP: usize = 5;

/// Cap on explicit-instruction memories per transcript.
const TRANSCRIPT_MEMORY_CAP: usize = 10;

/// Phrases that mark a sentence as decision-worthy.
const DECISION_KEYWORDS: &[&str] = &[
    "decided to",
    "we decided",
    "going to use",
    "will use",
    "chose to",
    "the reason is",
    "because",
    "instead of",
    "rather than",
    "the fix is",
    "the issue was",
    "fixed by",
    "non-negotiable",
    "always",
    "never",
    "pattern is",
    "rule:",
    "note:",
    "important:",
];

// Type classification vocabularies, checked in precedence order.
const ERROR_KEYWORDS: &[&str] = &["error", "bug", "issue", "fix", "fixed"];
const PREFERENCE_KEYWORDS: &[&str] = &["always", "never", "prefer", "style", "format"];
const PATTERN_KEYWORDS: &[&str] = &["pattern", "convention", "structure", "layout"];

/// Explicit-instruction patterns with the capture group that holds the
/// instruction body. Capture lengths bound how much of the message is taken.
static EXPLICIT_PATTERNS: LazyLock<Vec<(Regex, usize)>> = LazyLock::new(|| {
    [
        (r"(?i)remember (that |this |):?\s*(.{20,200})", 2),
        (r"(?i)always (use|do|prefer|run|start|check)\s+(.{10,150})", 2),
        (r"(?i)never (use|do|touch|modify)\s+(.{10,150})", 2),
        (r"(?i)rule:\s*(.{10,200})", 1),
        (r"(?i)non-negotiable:\s*(.{10,200})", 1),
    ]
    .iter()
    .map(|(p, g)| (Regex::new(p).expect("explicit pattern must compile"), *g))
    .collect()
});

/// Ordered keyword → tag mapping for [`infer_tags`]. First matching keyword
/// per tag wins; scanning stops once three tags are collected.
const TAG_RULES: &[(&str, &str)] = &[
    ("memory", "memory"),
    ("hook", "hooks"),
    ("sqlite", "storage"),
    ("postgres", "storage"),
    ("database", "storage"),
    ("json", "storage"),
    ("schema", "schema"),
    ("migration", "schema"),
    ("transcript", "transcript"),
    ("mcp", "mcp"),
    ("test", "testing"),
    ("architecture", "architecture"),
    ("import", "architecture"),
    ("dependency", "dependencies"),
    ("credential", "security"),
    ("api key", "security"),
    ("error", "error-handling"),
    ("config", "configuration"),
    ("deploy", "deployment"),
    ("agent", "agents"),
];

/// Scan an assistant's closing message for decision-worthy sentences.
///
/// Short inputs, short or overlong sentences, questions, and anything
/// credential-shaped are all skipped. At most
/// [`MESSAGE_MEMORY_CAP`] memories are returned, in scan order.
pub fn extract_from_message(message: &str, project: &str) -> Vec<Memory> {
    // Too short to carry a decision.
    if message.chars().count() < 20 {
        return Vec::new();
    }

    let mut memories = Vec::new();
    for sentence in split_sentences(message) {
        let len = sentence.chars().count();
        if len < 30 || len > MAX_CONTENT_CHARS {
            continue;
        }

        let lower = sentence.to_lowercase();
        if !DECISION_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            continue;
        }

        // Questions are not decisions.
        if sentence.ends_with('?') {
            continue;
        }

        if looks_like_credential(&sentence) {
            continue;
        }

        let memory_type = classify(&lower);
        match Memory::build(
            &sentence,
            memory_type,
            project,
            infer_tags(&sentence),
            Confidence::Medium,
            Source::SessionEnd,
        ) {
            Ok(mem) => memories.push(mem),
            Err(reason) => tracing::debug!(%reason, "candidate sentence rejected"),
        }

        if memories.len() >= MESSAGE_MEMORY_CAP {
            break;
        }
    }

    memories
}

/// Scan a JSONL session transcript for explicit user instructions.
///
/// A missing or unreadable transcript yields an empty list — the caller's
/// workflow must never fail because extraction could not run. Malformed lines
/// and non-user records are skipped silently.
pub fn extract_from_transcript(transcript_path: &Path, project: &str) -> Vec<Memory> {
    let raw = match std::fs::read_to_string(transcript_path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!(
                path = %transcript_path.display(),
                error = %err,
                "transcript unavailable, skipping explicit extraction"
            );
            return Vec::new();
        }
    };

    let mut memories = Vec::new();
    'lines: for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(entry) = serde_json::from_str::<serde_json::Value>(line) else {
            continue;
        };
        if entry.get("role").and_then(|r| r.as_str()) != Some("user") {
            continue;
        }
        let Some(text) = user_text(&entry) else {
            continue;
        };

        for (pattern, group) in EXPLICIT_PATTERNS.iter() {
            let Some(caps) = pattern.captures(&text) else {
                continue;
            };
            let Some(captured) = caps.get(*group) else {
                continue;
            };
            let captured = captured.as_str().trim();
            if looks_like_credential(captured) {
                continue;
            }
            match Memory::build(
                &truncate_content(captured),
                MemoryType::Preference,
                project,
                infer_tags(captured),
                Confidence::High,
                Source::Explicit,
            ) {
                Ok(mem) => memories.push(mem),
                Err(reason) => tracing::debug!(%reason, "explicit candidate rejected"),
            }

            if memories.len() >= TRANSCRIPT_MEMORY_CAP {
                break 'lines;
            }
        }
    }

    memories
}

/// Infer 1..=3 tags from content via the ordered keyword table.
///
/// Deterministic given the table's order; falls back to `["general"]` when
/// nothing matches.
pub fn infer_tags(content: &str) -> Vec<String> {
    let lower = content.to_lowercase();
    let mut tags: Vec<String> = Vec::new();

    for (keyword, tag) in TAG_RULES {
        if lower.contains(keyword) && !tags.iter().any(|t| t == tag) {
            tags.push((*tag).to_string());
        }
        if tags.len() >= 3 {
            break;
        }
    }

    if tags.is_empty() {
        tags.push("general".to_string());
    }
    tags
}

/// First-match-wins type classification over a lowercased sentence.
fn classify(lower: &str) -> MemoryType {
    if ERROR_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        MemoryType::Error
    } else if PREFERENCE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        MemoryType::Preference
    } else if PATTERN_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        MemoryType::Pattern
    } else {
        MemoryType::Decision
    }
}

/// Split text into sentence-like units on `.` / `!` / `?` followed by
/// whitespace. Punctuation stays attached to its sentence; a trailing
/// fragment without terminal punctuation is kept too.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |n| n.is_whitespace()) {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Pull the text of a user transcript record: either a plain string body or
/// the concatenation of its text-typed content blocks.
fn user_text(entry: &serde_json::Value) -> Option<String> {
    match entry.get("content") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Array(blocks)) => {
            let parts: Vec<&str> = blocks
                .iter()
                .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
                .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
                .collect();
            Some(parts.join(" "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_split_on_terminators_not_decimals() {
        let split = split_sentences("Use v3.14 of the lib. It works! Does it? yes");
        assert_eq!(
            split,
            vec!["Use v3.14 of the lib.", "It works!", "Does it?", "yes"]
        );
    }

    #[test]
    fn classification_precedence_is_error_first() {
        assert_eq!(classify("the fix is to always retry"), MemoryType::Error);
        assert_eq!(classify("always run fmt before commit"), MemoryType::Preference);
        assert_eq!(classify("the convention is snake_case"), MemoryType::Pattern);
        assert_eq!(classify("we chose sqlite because it is simple"), MemoryType::Decision);
    }

    #[test]
    fn tags_are_ordered_capped_and_fall_back() {
        assert_eq!(infer_tags("We decided to use SQLite here"), vec!["storage"]);
        assert_eq!(
            infer_tags("memory hook sqlite schema transcript"),
            vec!["memory", "hooks", "storage"]
        );
        assert_eq!(infer_tags("nothing relevant at all"), vec!["general"]);
    }
}
