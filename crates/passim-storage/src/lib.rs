//! # passim-storage
//!
//! Entity storage for Passim.
//!
//! This crate provides:
//! - [`MemoryEntityStore`]: constraint-checked in-memory tables with undo
//! - [`Library`]: the mutation service that keeps the search index in step
//! - [`Dataset`]: JSON snapshots for loading and exporting entities

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod dataset;
pub mod library;
pub mod memory;

pub use dataset::Dataset;
pub use library::Library;
pub use memory::{MemoryEntityStore, Undo};
