//! Per-project persistent memory for AI agents.
//!
//! Mnemo gives a coding agent durable, cross-session memory with two halves:
//! a capture hook that ingests candidate facts at session end, and an MCP
//! server that serves them back with confidence-tiered filtering and
//! recency-based ranking.
//!
//! | Confidence | Origin | Surfaced |
//! |------------|--------|----------|
//! | **HIGH** | Explicit user instruction in the transcript | Proactively by `load_memories` |
//! | **MEDIUM** | Decision-worthy sentence inferred at session end | Only with `include_medium` |
//! | **LOW** | Reserved | Search only, never loaded |
//!
//! # Architecture
//!
//! - **Storage**: one JSON document per project slug under a configurable
//!   root (default `~/.mnemo/`), rewritten atomically on every mutation
//! - **Ingestion**: keyword-heuristic sentence extraction plus explicit
//!   instruction patterns, gated by a credential filter and case-insensitive
//!   content dedup
//! - **Retrieval**: lexical substring search and tiered load over MCP stdio
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from a TOML file and environment variables
//! - [`capture`] — Hook-event ingestion boundary (`Stop`, `PostToolUse`)
//! - [`memory`] — Core engine: types, credential filter, extractors, store, retrieval

pub mod capture;
pub mod config;
pub mod memory;
