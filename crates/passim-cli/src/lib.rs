//! # passim-cli
//!
//! Admin CLI for Passim.
//!
//! This crate provides the `passim` binary and the handlers behind it:
//! - Rebuilding the search index from the entity store
//! - Searching and listing passages as JSON
//! - Configuration management (`config path|get|set|init|export`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use cli::{Cli, Command, ConfigAction, SearchArgs};
pub use config::PassimConfig;
