//! Language-aware text analysis.
//!
//! An [`Analyzer`] turns text into positioned lexemes using tantivy's
//! tokenizer pipeline:
//!
//! ```text
//! SimpleTokenizer → LowerCaser → StopWordFilter → Stemmer
//! ```
//!
//! Stop-word removal keeps the original token positions, so phrase matching
//! still sees the gap a removed word leaves behind. The `simple` tag and any
//! tag without a stemmer use tokenize + lowercase only; unknown tags are
//! reported once per tag at warn level.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock, Mutex, RwLock};

use tantivy::tokenizer::{
    Language as StemLanguage, LowerCaser, PreTokenizedString, SimpleTokenizer, Stemmer,
    StopWordFilter, TextAnalyzer, Token, TokenStream,
};

use crate::stopwords::StopwordList;

/// Language tag that disables stop words and stemming.
pub const SIMPLE_LANGUAGE_TAG: &str = "simple";

/// Language tags with a full stop-word + stemmer pipeline.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "danish",
    "dutch",
    "english",
    "finnish",
    "french",
    "german",
    "italian",
    "portuguese",
    "russian",
    "spanish",
    "swedish",
];

/// One analyzed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
    /// Normalized lexeme.
    pub lexeme: String,
    /// Token position in the source text (stop words keep their slot).
    pub position: u32,
    /// Byte offset where the source word starts.
    pub offset_from: usize,
    /// Byte offset one past the source word.
    pub offset_to: usize,
}

/// A configured analysis pipeline for one language tag.
#[derive(Clone)]
pub struct Analyzer {
    tag: String,
    stemmed: bool,
    inner: TextAnalyzer,
}

impl Analyzer {
    /// Builds the analyzer for `tag`. Unknown tags fall back to the simple
    /// pipeline.
    pub fn build(tag: &str) -> Self {
        let tag = normalize_tag(tag);
        match (stem_language(&tag), StopwordList::for_language(&tag)) {
            (Some(language), Some(stopwords)) => {
                let inner = TextAnalyzer::builder(SimpleTokenizer::default())
                    .filter(LowerCaser)
                    .filter(StopWordFilter::remove(stopwords.into_words()))
                    .filter(Stemmer::new(language))
                    .build();
                Self {
                    tag,
                    stemmed: true,
                    inner,
                }
            }
            _ => Self::simple_with_tag(tag),
        }
    }

    /// Tokenize + lowercase only.
    pub fn simple() -> Self {
        Self::simple_with_tag(SIMPLE_LANGUAGE_TAG.to_string())
    }

    fn simple_with_tag(tag: String) -> Self {
        let inner = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(LowerCaser)
            .build();
        Self {
            tag,
            stemmed: false,
            inner,
        }
    }

    /// Language tag this analyzer was built for.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether stop words and stemming are applied.
    pub fn is_stemmed(&self) -> bool {
        self.stemmed
    }

    /// Analyzes `text` into positioned tokens.
    pub fn tokens(&self, text: &str) -> Vec<AnalyzedToken> {
        let mut analyzer = self.inner.clone();
        let mut stream = analyzer.token_stream(text);
        let mut tokens = Vec::new();
        while stream.advance() {
            let token = stream.token();
            if token.text.is_empty() {
                continue;
            }
            tokens.push(AnalyzedToken {
                lexeme: token.text.clone(),
                position: token.position as u32,
                offset_from: token.offset_from,
                offset_to: token.offset_to,
            });
        }
        tokens
    }

    /// Analyzes `text` into lexemes, in order.
    pub fn lexemes(&self, text: &str) -> Vec<String> {
        self.tokens(text).into_iter().map(|t| t.lexeme).collect()
    }

    /// Analyzes `text` for indexing. Same text and tag, same tokens.
    pub fn pre_tokenize(&self, text: &str) -> PreTokenizedString {
        let tokens = self
            .tokens(text)
            .into_iter()
            .map(|t| Token {
                offset_from: t.offset_from,
                offset_to: t.offset_to,
                position: t.position as usize,
                text: t.lexeme,
                position_length: 1,
            })
            .collect();
        PreTokenizedString {
            text: text.to_string(),
            tokens,
        }
    }

    /// The underlying tantivy pipeline.
    pub fn text_analyzer(&self) -> TextAnalyzer {
        self.inner.clone()
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("tag", &self.tag)
            .field("stemmed", &self.stemmed)
            .finish()
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

fn stem_language(tag: &str) -> Option<StemLanguage> {
    let language = match tag {
        "danish" => StemLanguage::Danish,
        "dutch" => StemLanguage::Dutch,
        "english" => StemLanguage::English,
        "finnish" => StemLanguage::Finnish,
        "french" => StemLanguage::French,
        "german" => StemLanguage::German,
        "italian" => StemLanguage::Italian,
        "portuguese" => StemLanguage::Portuguese,
        "russian" => StemLanguage::Russian,
        "spanish" => StemLanguage::Spanish,
        "swedish" => StemLanguage::Swedish,
        _ => return None,
    };
    Some(language)
}

/// Whether `tag` gets the full pipeline.
pub fn is_supported(tag: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&normalize_tag(tag).as_str())
}

// ============================================================================
// Registry
// ============================================================================

/// Caches one [`Analyzer`] per language tag.
#[derive(Default)]
pub struct AnalyzerRegistry {
    analyzers: RwLock<HashMap<String, Arc<Analyzer>>>,
    warned: Mutex<HashSet<String>>,
}

impl AnalyzerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the analyzer for `tag`, building it on first use.
    pub fn get(&self, tag: &str) -> Arc<Analyzer> {
        let key = normalize_tag(tag);
        if let Ok(analyzers) = self.analyzers.read()
            && let Some(analyzer) = analyzers.get(&key)
        {
            return Arc::clone(analyzer);
        }

        if key != SIMPLE_LANGUAGE_TAG && !is_supported(&key) {
            self.warn_unknown(&key);
        }
        let analyzer = Arc::new(Analyzer::build(&key));
        if let Ok(mut analyzers) = self.analyzers.write() {
            analyzers
                .entry(key)
                .or_insert_with(|| Arc::clone(&analyzer));
        }
        analyzer
    }

    /// Number of cached analyzers.
    pub fn len(&self) -> usize {
        self.analyzers.read().map(|a| a.len()).unwrap_or(0)
    }

    /// Whether nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn warn_unknown(&self, tag: &str) {
        let first_time = self
            .warned
            .lock()
            .map(|mut warned| warned.insert(tag.to_string()))
            .unwrap_or(true);
        if first_time {
            log::warn!("No analyzer for language '{tag}', using simple analysis");
        }
    }
}

impl std::fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("cached", &self.len())
            .finish()
    }
}

static REGISTRY: LazyLock<AnalyzerRegistry> = LazyLock::new(AnalyzerRegistry::new);

/// Process-wide analyzer for `tag`.
pub fn analyzer(tag: &str) -> Arc<Analyzer> {
    REGISTRY.get(tag)
}

// ============================================================================
// Tests
// ============================================================================
