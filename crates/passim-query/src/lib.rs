//! # passim-query
//!
//! Query engine for Passim.
//!
//! This crate implements:
//! - The async [`SearchBackend`] trait and its request/response types
//! - [`QueryEngine`]: parse, rank, expand, highlight, resolve

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod engine;

pub use backend::{SearchBackend, SearchHit, SearchParams, SearchResults};
pub use engine::QueryEngine;
