//! Common types for the FTS module.

use passim_core::{DEFAULT_LANGUAGE_TAG, EntityKind};
use serde::{Deserialize, Serialize};

/// Search configuration.
///
/// Supplies the defaults the query engine falls back on when a request
/// leaves a field unset, plus the snippet highlighting options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Analyzer language for queries that don't name one.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Entity kind searched when a request doesn't name one.
    #[serde(default = "default_kind")]
    pub default_kind: EntityKind,

    /// Default result limit. `None` returns every match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<usize>,

    /// Attribute metadata hits to their passages when searching passages.
    #[serde(default = "default_true")]
    pub expand_metadata: bool,

    /// Marker inserted before a highlighted word.
    #[serde(default = "default_start_sel")]
    pub start_sel: String,

    /// Marker inserted after a highlighted word.
    #[serde(default = "default_stop_sel")]
    pub stop_sel: String,

    /// Snippets longer than this many words are cut down to a window.
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Words of context kept before the first match when cutting.
    #[serde(default = "default_context_words")]
    pub context_words: usize,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE_TAG.to_string()
}

fn default_kind() -> EntityKind {
    EntityKind::Passage
}

fn default_true() -> bool {
    true
}

fn default_start_sel() -> String {
    "<b>".to_string()
}

fn default_stop_sel() -> String {
    "</b>".to_string()
}

fn default_max_words() -> usize {
    35
}

fn default_context_words() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            default_kind: default_kind(),
            default_limit: None,
            expand_metadata: default_true(),
            start_sel: default_start_sel(),
            stop_sel: default_stop_sel(),
            max_words: default_max_words(),
            context_words: default_context_words(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
