//! Passim library search: umbrella crate.
//!
//! Re-exports the Passim components and the types most callers need.
//! Enable the `cli` feature for the command-line handlers.
//!
//! ```rust
//! use passim::{Author, Library, Metadata, SearchBackend, SearchConfig, SearchParams, TaggedRef};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let library = Library::in_memory(SearchConfig::default()).unwrap();
//! let passage = library.create_passage("Call me Ishmael.").unwrap();
//! let author = library
//!     .create(Author::new("Herman").with_last_name("Melville"))
//!     .unwrap();
//! library
//!     .create(Metadata::new().with_passage(passage).with_author(author))
//!     .unwrap();
//!
//! let results = library.search(SearchParams::new("melville")).await.unwrap();
//! assert_eq!(results.refs(), vec![TaggedRef::passage(passage)]);
//! assert!(results.items[0].highlighted_snippet.contains("<b>Melville</b>"));
//! # });
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use passim_core as core;
pub use passim_fts as fts;
pub use passim_query as query;
pub use passim_storage as storage;
pub use passim_sync as sync;

#[cfg(feature = "cli")]
pub use passim_cli as cli;

pub use passim_core::{
    Author, Entity, EntityId, EntityKind, Error, Language, Metadata, Passage, Publisher, Result,
    TaggedRef, Title,
};
pub use passim_fts::SearchConfig;
pub use passim_query::{SearchBackend, SearchHit, SearchParams, SearchResults};
pub use passim_storage::{Dataset, Library};
