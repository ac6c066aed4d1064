//! Stop-word lists per analyzer language.
//!
//! Lists come from the `stop-words` crate, built with only its `nltk`
//! feature: the NLTK lists hold function words, while the larger ISO lists
//! also drop content words such as "research" or "young". They are applied by
//! the analyzer after lower-casing and before stemming, so a query term made
//! only of stop words analyzes to nothing and is dropped from the compiled
//! query.

use std::collections::HashSet;

use stop_words::{Language, lookup};

/// Stop words for one language.
pub struct StopwordList {
    language: &'static str,
    words: HashSet<String>,
}

impl StopwordList {
    /// Loads the list for an analyzer language tag, if one exists.
    pub fn for_language(tag: &str) -> Option<Self> {
        let (language, source) = match tag {
            "danish" => ("danish", Language::Danish),
            "dutch" => ("dutch", Language::Dutch),
            "english" => ("english", Language::English),
            "finnish" => ("finnish", Language::Finnish),
            "french" => ("french", Language::French),
            "german" => ("german", Language::German),
            "italian" => ("italian", Language::Italian),
            "portuguese" => ("portuguese", Language::Portuguese),
            "russian" => ("russian", Language::Russian),
            "spanish" => ("spanish", Language::Spanish),
            "swedish" => ("swedish", Language::Swedish),
            _ => return None,
        };
        let Some(source_words) = lookup(source) else {
            log::warn!("No stop-word list for '{language}', keeping every word");
            return None;
        };
        let words = source_words.iter().map(|w| w.to_lowercase()).collect();
        Some(Self { language, words })
    }

    /// Number of stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Consumes the list, yielding its words.
    pub fn into_words(self) -> Vec<String> {
        self.words.into_iter().collect()
    }
}

impl std::fmt::Debug for StopwordList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopwordList")
            .field("language", &self.language)
            .field("stopword_count", &self.words.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
