//! Search backend trait and request/response types.
//!
//! A [`SearchBackend`] answers [`SearchParams`] with ranked, highlighted
//! [`SearchHit`]s that carry the resolved entity.
//!
//! # Example
//!
//! ```rust,ignore
//! use passim_query::{SearchBackend, SearchParams};
//!
//! let params = SearchParams::new("moby dick").with_limit(10);
//! let results = library.search(params).await?;
//! println!("Found {} results", results.total);
//! ```

use async_trait::async_trait;
use passim_core::{Entity, EntityKind, Result, TaggedRef};
use serde::{Deserialize, Serialize};

/// Parameters for a search request.
///
/// Unset fields fall back on the engine's
/// [`SearchConfig`](passim_fts::SearchConfig).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Web-search style query string.
    pub query: String,

    /// Analyzer language for the query and the snippets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Entity kind to search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,

    /// Maximum results to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Attribute metadata hits to their passages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_metadata: Option<bool>,
}

impl SearchParams {
    /// Creates a request for `query` with every other field defaulted.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Sets the query language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the kind to search.
    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the result limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Enables or disables passage expansion.
    pub fn with_expansion(mut self, expand: bool) -> Self {
        self.expand_metadata = Some(expand);
        self
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Matched entity reference.
    pub entity_ref: TaggedRef,

    /// BM25 score, higher is better.
    pub rank_score: f32,

    /// Matched text with query words wrapped in selectors.
    pub highlighted_snippet: String,

    /// The resolved entity.
    pub entity: Entity,
}

/// Collection of search hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Hits in rank order.
    pub items: Vec<SearchHit>,

    /// Number of resolved matches before the limit was applied.
    pub total: usize,

    /// Backend that executed the search.
    pub backend: String,
}

impl SearchResults {
    /// Create empty results.
    pub fn empty(backend: &str) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            backend: backend.to_string(),
        }
    }

    /// Number of hits returned.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was returned.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Hit references in rank order.
    pub fn refs(&self) -> Vec<TaggedRef> {
        self.items.iter().map(|hit| hit.entity_ref).collect()
    }
}

/// Abstract search backend.
///
/// # Async
///
/// `search` is async so callers on an async runtime can share one backend
/// across tasks without blocking on its locks.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute a search query.
    ///
    /// Returns hits ordered by relevance (highest first).
    async fn search(&self, params: SearchParams) -> Result<SearchResults>;

    /// Get the backend name for diagnostics.
    fn name(&self) -> &str;

    /// Check if the backend is ready to handle queries.
    fn is_ready(&self) -> bool {
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
