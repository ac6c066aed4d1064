//! Handlers for `rebuild`, `search` and `passages`.

use std::path::Path;

use passim_core::{EntityKind, Result};
use passim_query::{SearchBackend, SearchParams};
use passim_storage::{Dataset, Library};
use serde::Serialize;

use crate::cli::SearchArgs;
use crate::config::PassimConfig;

/// Opens an in-memory library, loading `data_path` when one is configured.
pub fn open_library(config: &PassimConfig) -> Result<Library> {
    let library = Library::in_memory(config.search.clone())?;
    if let Some(path) = &config.data_path {
        let dataset = Dataset::load(Path::new(path))?;
        let count = library.import(dataset)?;
        log::info!("Loaded {count} entities from {path}");
    }
    Ok(library)
}

/// Rebuilds the index and returns the summary lines.
pub fn cmd_rebuild(library: &Library) -> Result<String> {
    let stats = library.rebuild()?;
    Ok(stats.to_string())
}

/// Runs a search and returns the hits as pretty JSON.
pub async fn cmd_search(library: &Library, args: SearchArgs) -> Result<String> {
    let mut params = SearchParams::new(args.query);
    if let Some(language) = args.language {
        params = params.with_language(language);
    }
    if let Some(kind) = args.kind {
        params = params.with_kind(kind.parse::<EntityKind>()?);
    }
    if let Some(limit) = args.limit {
        params = params.with_limit(limit);
    }
    if args.no_expand {
        params = params.with_expansion(false);
    }

    let results = library.search(params).await?;
    log::debug!(
        "{} of {} hits from {}",
        results.len(),
        results.total,
        results.backend
    );
    Ok(serde_json::to_string_pretty(&results.items)?)
}

#[derive(Serialize)]
struct PassageRow {
    text: String,
}

/// Lists raw passages as a JSON array of `{"text": ...}` objects.
pub fn cmd_passages(library: &Library) -> Result<String> {
    let rows: Vec<PassageRow> = library
        .passages()?
        .into_iter()
        .map(|p| PassageRow { text: p.text })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

// ============================================================================
// Tests
// ============================================================================
