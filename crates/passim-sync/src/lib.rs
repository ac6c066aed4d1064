//! Index synchronization for Passim.
//!
//! Keeps the search index consistent with the entity graph as entities are
//! created, updated, deleted and re-associated.
//!
//! # Modules
//!
//! - [`refs`]: Reverse references from owners to metadata records
//! - [`synchronizer`]: Per-mutation sync with fan-out to dependents
//! - [`rebuild`]: Full rebuild from the entity store
//!
//! # Unit of work
//!
//! ```text
//! mutation ──► SyncUnit ──► IndexBatch ──► SearchIndexStore::apply
//!                 │                              │
//!                 └── RefJournal ◄── rollback ───┘ (on failure)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod rebuild;
pub mod refs;
pub mod synchronizer;

#[cfg(test)]
mod testing;

pub use rebuild::{RebuildStats, rebuild};
pub use refs::{RefChange, RefJournal, ReverseRefIndex};
pub use synchronizer::{Association, SyncUnit};
