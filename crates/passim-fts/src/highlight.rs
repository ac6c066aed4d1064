//! Snippet highlighting.
//!
//! tantivy's [`SnippetGenerator`] re-analyzes the text under the query
//! language and reports the source words whose lexeme is a positive query
//! lexeme; those are wrapped in the start/stop selectors. Texts longer than
//! `max_words` words are cut to a window that opens `context_words` words
//! before the first match; cut ends are marked with `...`.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use tantivy::schema::Field;
use tantivy::snippet::SnippetGenerator;

use crate::analyzer::Analyzer;
use crate::types::SearchConfig;

const ELLIPSIS: &str = "...";

// Only `SnippetGenerator::snippet_from_doc` reads the field.
const TEXT_FIELD: Field = Field::from_field_id(0);

/// Highlighting options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Marker before a matched word.
    pub start_sel: String,
    /// Marker after a matched word.
    pub stop_sel: String,
    /// Word budget of a snippet.
    pub max_words: usize,
    /// Words of lead-in before the first match.
    pub context_words: usize,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for HighlightOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            start_sel: config.start_sel.clone(),
            stop_sel: config.stop_sel.clone(),
            max_words: config.max_words.max(1),
            context_words: config.context_words,
        }
    }
}

/// Byte spans of the whitespace-separated words of `text`.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Byte ranges of the words of `text` whose lexeme is in `lexemes`.
///
/// The generator is given no character budget, so its single fragment
/// starts at offset 0 and the ranges point straight into `text`.
fn matched_ranges(
    text: &str,
    lexemes: &BTreeSet<String>,
    analyzer: &Analyzer,
) -> Vec<Range<usize>> {
    if lexemes.is_empty() || text.is_empty() {
        return Vec::new();
    }
    let terms: BTreeMap<String, f32> = lexemes.iter().map(|l| (l.clone(), 1.0)).collect();
    let generator =
        SnippetGenerator::new(terms, analyzer.text_analyzer(), TEXT_FIELD, usize::MAX);
    generator.snippet(text).highlighted().to_vec()
}

/// Highlights `lexemes` in `text`.
pub fn highlight(
    text: &str,
    lexemes: &BTreeSet<String>,
    analyzer: &Analyzer,
    options: &HighlightOptions,
) -> String {
    let matches = matched_ranges(text, lexemes, analyzer);

    let words = word_spans(text);
    let max_words = options.max_words.max(1);
    let (window_start, window_end, cut_front, cut_back) = if words.len() > max_words {
        let first_match_word = matches
            .first()
            .and_then(|m| words.iter().position(|(_, end)| *end > m.start))
            .unwrap_or(0);
        let mut first = first_match_word.saturating_sub(options.context_words);
        let last = (first + max_words).min(words.len());
        first = last.saturating_sub(max_words);
        (
            words[first].0,
            words[last - 1].1,
            first > 0,
            last < words.len(),
        )
    } else {
        (0, text.len(), false, false)
    };

    let mut out = String::with_capacity(text.len() + matches.len() * 8);
    if cut_front {
        out.push_str(ELLIPSIS);
    }
    let mut cursor = window_start;
    for Range { start: from, end: to } in matches {
        if from < window_start || to > window_end {
            continue;
        }
        out.push_str(&text[cursor..from]);
        out.push_str(&options.start_sel);
        out.push_str(&text[from..to]);
        out.push_str(&options.stop_sel);
        cursor = to;
    }
    out.push_str(&text[cursor..window_end]);
    if cut_back {
        out.push_str(ELLIPSIS);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
