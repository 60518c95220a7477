mod helpers;

use chrono::Utc;
use helpers::{seed_store, test_memory, test_memory_used_at, test_root};
use mnemo::memory::retrieve::{load_memories, search_memories};
use mnemo::memory::store::MemoryStore;
use mnemo::memory::types::Confidence;
use std::path::Path;

// Slug of this path is "test-project", matching the seeded store.
const CWD: &str = "/home/dev/test-project";

#[test]
fn load_returns_high_only_by_default() {
    let root = test_root();
    seed_store(
        root.path(),
        "test-project",
        vec![
            test_memory("a high confidence fact", Confidence::High),
            test_memory("a medium confidence fact", Confidence::Medium),
            test_memory("a low confidence fact", Confidence::Low),
        ],
    );

    let response = load_memories(root.path(), Path::new(CWD), false);
    assert_eq!(response.project, "test-project");
    assert_eq!(response.count, 1);
    assert_eq!(response.memories[0].confidence, Confidence::High);
}

#[test]
fn load_with_include_medium_orders_high_first_and_excludes_low() {
    let root = test_root();
    let base = Utc::now();
    seed_store(
        root.path(),
        "test-project",
        vec![
            // MEDIUM is most recently used, but HIGH must still come first.
            test_memory_used_at("medium tier fact", Confidence::Medium, base, 100),
            test_memory_used_at("low tier fact", Confidence::Low, base, 200),
            test_memory_used_at("high tier fact", Confidence::High, base, 0),
        ],
    );

    let response = load_memories(root.path(), Path::new(CWD), true);
    assert_eq!(response.count, 2);
    assert_eq!(response.memories[0].confidence, Confidence::High);
    assert_eq!(response.memories[1].confidence, Confidence::Medium);
}

#[test]
fn load_sorts_by_recency_within_a_tier() {
    let root = test_root();
    let base = Utc::now();
    seed_store(
        root.path(),
        "test-project",
        vec![
            test_memory_used_at("older high fact", Confidence::High, base, 0),
            test_memory_used_at("newer high fact", Confidence::High, base, 50),
        ],
    );

    let response = load_memories(root.path(), Path::new(CWD), false);
    assert_eq!(response.memories[0].content, "newer high fact");
    assert_eq!(response.memories[1].content, "older high fact");
}

#[test]
fn load_preserves_insertion_order_on_ties() {
    let root = test_root();
    let base = Utc::now();
    seed_store(
        root.path(),
        "test-project",
        vec![
            test_memory_used_at("first inserted", Confidence::High, base, 0),
            test_memory_used_at("second inserted", Confidence::High, base, 0),
            test_memory_used_at("third inserted", Confidence::High, base, 0),
        ],
    );

    let response = load_memories(root.path(), Path::new(CWD), false);
    let contents: Vec<&str> = response.memories.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first inserted", "second inserted", "third inserted"]);
}

#[test]
fn load_touches_returned_records() {
    let root = test_root();
    let base = Utc::now() - chrono::Duration::days(7);
    seed_store(
        root.path(),
        "test-project",
        vec![
            test_memory_used_at("stale high fact", Confidence::High, base, 0),
            test_memory_used_at("stale low fact", Confidence::Low, base, 0),
        ],
    );

    let response = load_memories(root.path(), Path::new(CWD), false);
    assert_eq!(response.count, 1);

    let store = MemoryStore::open(root.path(), "test-project");
    let high = store.doc.memories.iter().find(|m| m.confidence == Confidence::High).unwrap();
    let low = store.doc.memories.iter().find(|m| m.confidence == Confidence::Low).unwrap();
    assert!(high.last_used > base, "returned record must be touched");
    assert_eq!(low.last_used, base, "unreturned record must keep its timestamp");
}

#[test]
fn load_on_empty_project_returns_empty() {
    let root = test_root();
    let response = load_memories(root.path(), Path::new(CWD), true);
    assert_eq!(response.count, 0);
    assert!(response.memories.is_empty());
}

#[test]
fn search_empty_query_short_circuits() {
    let root = test_root();
    let response = search_memories(root.path(), Path::new(CWD), "   ");
    assert_eq!(response.count, 0);
    assert_eq!(response.query, "");
    // The store was never created, let alone touched.
    assert!(!root.path().join("test-project.json").exists());
}

#[test]
fn search_matches_content_tags_and_type() {
    let root = test_root();
    seed_store(
        root.path(),
        "test-project",
        vec![
            test_memory("We decided to use SQLite for the cache", Confidence::Medium),
            test_memory("An unrelated fact about the weather", Confidence::Medium),
        ],
    );

    // Content, case-insensitive
    let by_content = search_memories(root.path(), Path::new(CWD), "sqlite");
    assert_eq!(by_content.count, 1);
    assert!(by_content.memories[0].content.contains("SQLite"));

    // Tag (helpers tag everything "general")
    let by_tag = search_memories(root.path(), Path::new(CWD), "general");
    assert_eq!(by_tag.count, 2);

    // Type
    let by_type = search_memories(root.path(), Path::new(CWD), "decision");
    assert_eq!(by_type.count, 2);

    // No match
    let none = search_memories(root.path(), Path::new(CWD), "kubernetes");
    assert_eq!(none.count, 0);
}

#[test]
fn search_caps_at_ten_most_recent_first() {
    let root = test_root();
    let base = Utc::now();
    let memories = (0..15)
        .map(|i| {
            test_memory_used_at(
                &format!("matching fact number {i}"),
                Confidence::Medium,
                base,
                i,
            )
        })
        .collect();
    seed_store(root.path(), "test-project", memories);

    let response = search_memories(root.path(), Path::new(CWD), "matching fact");
    assert_eq!(response.count, 10);
    assert_eq!(
        response.memories[0].content, "matching fact number 14",
        "most recently used match comes first"
    );
    assert_eq!(response.memories[9].content, "matching fact number 5");
}

#[test]
fn search_touches_returned_records() {
    let root = test_root();
    let base = Utc::now() - chrono::Duration::days(1);
    seed_store(
        root.path(),
        "test-project",
        vec![test_memory_used_at("a searchable fact", Confidence::Low, base, 0)],
    );

    let response = search_memories(root.path(), Path::new(CWD), "searchable");
    assert_eq!(response.count, 1);

    let store = MemoryStore::open(root.path(), "test-project");
    assert!(store.doc.memories[0].last_used > base);
}

#[test]
fn medium_only_store_loads_empty_without_include_medium() {
    let root = test_root();
    seed_store(
        root.path(),
        "test-project",
        vec![test_memory("an inferred decision", Confidence::Medium)],
    );

    let response = load_memories(root.path(), Path::new(CWD), false);
    assert_eq!(response.count, 0);
}
