//! Terminal review commands — the human side of "run 'mnemo list' to review".

use anyhow::Result;
use std::path::PathBuf;

use crate::config::MnemoConfig;
use crate::memory::store::MemoryStore;
use crate::memory::types::{project_slug, Memory};

/// Print every stored memory for the project, newest first.
pub fn list(config: &MnemoConfig, cwd: Option<&str>) -> Result<()> {
    let cwd = resolve_cwd(cwd)?;
    let project = project_slug(&cwd);
    let store = MemoryStore::open(&config.resolved_root(), &project);

    if store.doc.memories.is_empty() {
        println!("No memories stored for project '{project}'.");
        return Ok(());
    }

    println!(
        "{} stored memory(ies) for project '{project}' ({})\n",
        store.doc.memories.len(),
        store.path().display()
    );

    let mut memories: Vec<&Memory> = store.doc.memories.iter().collect();
    memories.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    for (i, mem) in memories.iter().enumerate() {
        print_memory(i + 1, mem);
    }

    Ok(())
}

/// Run a keyword search from the terminal, same semantics as the MCP tool.
pub fn search(config: &MnemoConfig, query: &str, cwd: Option<&str>) -> Result<()> {
    let cwd = resolve_cwd(cwd)?;
    let response = crate::memory::retrieve::search_memories(&config.resolved_root(), &cwd, query);

    if response.memories.is_empty() {
        println!("No results for '{}' in project '{}'.", response.query, response.project);
        return Ok(());
    }

    println!(
        "Found {} result(s) for '{}' in project '{}'\n",
        response.count, response.query, response.project
    );

    for (i, mem) in response.memories.iter().enumerate() {
        print_memory(i + 1, mem);
    }

    Ok(())
}

fn resolve_cwd(cwd: Option<&str>) -> Result<PathBuf> {
    match cwd {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(std::env::current_dir()?),
    }
}

fn print_memory(index: usize, mem: &Memory) {
    println!(
        "  {index}. [{}/{}] {}",
        mem.memory_type,
        mem.confidence,
        preview(&mem.content)
    );
    println!(
        "     tags: {} | created: {} | last used: {}",
        mem.tags.join(", "),
        mem.created_at.format("%Y-%m-%d"),
        mem.last_used.format("%Y-%m-%d"),
    );
}

fn preview(content: &str) -> String {
    if content.chars().count() > 120 {
        let cut: String = content.chars().take(120).collect();
        format!("{cut}...")
    } else {
        content.to_string()
    }
}
