//! Passim Core: entity model, text projection, errors, and shared traits.
//!
//! This crate provides the foundational types used across all Passim crates.
//! It has no internal Passim dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`entity`]: Entity kinds, records, and tagged references
//! - [`projector`]: Flattening entities into searchable text
//! - [`store`]: Read-only entity store trait
//! - [`traits`]: Configuration trait shared by applications

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod entity;
pub mod error;
pub mod projector;
pub mod store;
pub mod traits;

// Re-export key types at crate root for convenience
pub use entity::{
    Author, Entity, EntityId, EntityKind, Language, Metadata, Passage, PublicationStatus,
    Publisher, TaggedRef, Title,
};
pub use error::{Error, Result};
pub use projector::{
    DEFAULT_LANGUAGE_TAG, EntityView, MetadataView, Projectable, Projection, project,
};
pub use store::EntityStore;
pub use traits::ConfigManager;
