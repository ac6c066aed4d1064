//! Full-text search infrastructure for Passim.
//!
//! This crate turns projected entity text into searchable index entries and
//! evaluates web-search style queries against them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      passim-fts                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchIndexStore trait                                     │
//! │  └── MemoryIndexStore (RAM tantivy index, body per kind)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Analyzer (tokenize → lowercase → stop words → stem)        │
//! │  QueryNode / CompiledQuery (parse → analyze → tantivy)      │
//! │  IndexSchema (fields)  ·  highlight (SnippetGenerator)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use passim_core::{EntityKind, Projection, TaggedRef};
//! use passim_fts::{MemoryIndexStore, SearchIndexStore, analyzer, query};
//!
//! # fn main() -> passim_core::Result<()> {
//! let store = MemoryIndexStore::new()?;
//! store.upsert(TaggedRef::passage(1), Projection::new("The quick brown fox"))?;
//!
//! let compiled = query::compile("foxes", &analyzer::analyzer("english")).unwrap();
//! let hits = store.query(EntityKind::Passage, &compiled)?;
//! assert_eq!(hits[0].tagged_ref, TaggedRef::passage(1));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod analyzer;
pub mod highlight;
pub mod query;
pub mod schema;
pub mod stopwords;
pub mod store;
pub mod types;

// Re-exports
pub use analyzer::{Analyzer, AnalyzerRegistry};
pub use highlight::{HighlightOptions, highlight};
pub use query::{CompiledQuery, QueryNode};
pub use schema::IndexSchema;
pub use stopwords::StopwordList;
pub use store::{
    IndexBatch, IndexEntry, IndexOp, MemoryIndexStore, RankedEntry, SearchIndexStore,
};
pub use types::SearchConfig;
