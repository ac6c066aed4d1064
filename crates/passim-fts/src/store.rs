//! The search index store.
//!
//! One [`IndexEntry`] is kept per [`TaggedRef`]. Writes arrive as an
//! [`IndexBatch`] that the store applies atomically: either every staged
//! operation becomes visible or none does.
//!
//! [`MemoryIndexStore`] keeps entries in a RAM tantivy index. Every kind has
//! its own body field and BM25 runs against that kind's statistics only, so
//! a query touches the partition of the kind it targets and nothing else.
//! A batch is one writer commit.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use passim_core::{EntityKind, Error, Projection, Result, TaggedRef};
use serde::{Deserialize, Serialize};
use tantivy::collector::{Count, DocSetCollector, TopDocs};
use tantivy::query::{AllQuery, Bm25StatisticsProvider, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::tokenizer::PreTokenizedString;
use tantivy::{
    DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, Term,
};

use crate::analyzer::AnalyzerRegistry;
use crate::query::CompiledQuery;
use crate::schema::IndexSchema;

// ============================================================================
// Entries and batches
// ============================================================================

/// A denormalized, searchable row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// The entity this row describes.
    pub tagged_ref: TaggedRef,
    /// Flattened text at the last sync.
    pub text_content: String,
    /// Analyzer language for `text_content`.
    pub language_tag: String,
    /// `text_content` analyzed under `language_tag`: positioned lexemes,
    /// stop words leaving their slot empty.
    pub search_repr: PreTokenizedString,
}

/// A staged write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOp {
    /// Insert or replace the entry.
    Upsert(Projection),
    /// Remove the entry if present.
    Delete,
}

/// Index writes staged by one unit of work.
///
/// At most one operation is kept per reference; staging again replaces the
/// earlier operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexBatch {
    clear_all: bool,
    ops: BTreeMap<TaggedRef, IndexOp>,
}

impl IndexBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a batch that empties the index before applying its ops.
    pub fn replacing_all() -> Self {
        Self {
            clear_all: true,
            ops: BTreeMap::new(),
        }
    }

    /// Stages an upsert.
    pub fn upsert(&mut self, tagged_ref: TaggedRef, projection: Projection) {
        self.ops.insert(tagged_ref, IndexOp::Upsert(projection));
    }

    /// Stages a delete.
    pub fn delete(&mut self, tagged_ref: TaggedRef) {
        self.ops.insert(tagged_ref, IndexOp::Delete);
    }

    /// The pending operation for `tagged_ref`.
    pub fn get(&self, tagged_ref: &TaggedRef) -> Option<&IndexOp> {
        self.ops.get(tagged_ref)
    }

    /// Whether the batch starts with a full clear.
    pub fn clears_all(&self) -> bool {
        self.clear_all
    }

    /// Number of staged operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        !self.clear_all && self.ops.is_empty()
    }

    /// Staged operations in reference order.
    pub fn iter(&self) -> impl Iterator<Item = (&TaggedRef, &IndexOp)> {
        self.ops.iter()
    }
}

impl IntoIterator for IndexBatch {
    type Item = (TaggedRef, IndexOp);
    type IntoIter = std::collections::btree_map::IntoIter<TaggedRef, IndexOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

/// One ranked match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Matched entity.
    pub tagged_ref: TaggedRef,
    /// BM25 score within the kind's documents.
    pub rank_score: f32,
    /// Stored text of the entry.
    pub text_content: String,
}

// ============================================================================
// SearchIndexStore trait
// ============================================================================

/// Storage for index entries.
pub trait SearchIndexStore: Send + Sync {
    /// Applies a batch atomically.
    fn apply(&self, batch: IndexBatch) -> Result<()>;

    /// Inserts or replaces one entry.
    fn upsert(&self, tagged_ref: TaggedRef, projection: Projection) -> Result<()> {
        let mut batch = IndexBatch::new();
        batch.upsert(tagged_ref, projection);
        self.apply(batch)
    }

    /// Removes one entry. Missing entries are not an error.
    fn delete(&self, tagged_ref: TaggedRef) -> Result<()> {
        let mut batch = IndexBatch::new();
        batch.delete(tagged_ref);
        self.apply(batch)
    }

    /// Fetches one entry.
    fn get(&self, tagged_ref: TaggedRef) -> Result<Option<IndexEntry>>;

    /// Total number of entries.
    fn len(&self) -> Result<usize>;

    /// Whether the index holds no entries.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Entries per kind. Kinds without entries are omitted.
    fn count_by_kind(&self) -> Result<BTreeMap<EntityKind, usize>>;

    /// Every reference with its stored text.
    fn snapshot(&self) -> Result<BTreeMap<TaggedRef, String>>;

    /// Ranked matches of `query` among entries of `kind`, by score
    /// descending then id ascending.
    fn query(&self, kind: EntityKind, query: &CompiledQuery) -> Result<Vec<RankedEntry>>;

    /// Store name for diagnostics.
    fn name(&self) -> &str;
}

// ============================================================================
// MemoryIndexStore
// ============================================================================

/// Index writer buffer size (20MB).
const WRITER_BUFFER_SIZE: usize = 20_000_000;

/// BM25 statistics restricted to the documents of one kind.
///
/// Body fields are per kind already, so only the document count needs
/// scoping.
struct KindStatistics<'a> {
    searcher: &'a Searcher,
    num_docs: u64,
}

impl<'a> KindStatistics<'a> {
    fn new(searcher: &'a Searcher, scope: &Term) -> tantivy::Result<Self> {
        Ok(Self {
            searcher,
            num_docs: searcher.doc_freq(scope)?,
        })
    }
}

impl Bm25StatisticsProvider for KindStatistics<'_> {
    fn total_num_tokens(&self, field: Field) -> tantivy::Result<u64> {
        Bm25StatisticsProvider::total_num_tokens(self.searcher, field)
    }

    fn total_num_docs(&self) -> tantivy::Result<u64> {
        Ok(self.num_docs)
    }

    fn doc_freq(&self, term: &Term) -> tantivy::Result<u64> {
        self.searcher.doc_freq(term)
    }
}

fn index_error(action: &str) -> impl FnOnce(tantivy::TantivyError) -> Error + '_ {
    move |e| Error::operation(format!("Failed to {action}: {e}"))
}

/// [`SearchIndexStore`] over a RAM tantivy index.
pub struct MemoryIndexStore {
    schema: IndexSchema,
    writer: Mutex<IndexWriter>,
    reader: IndexReader,
    analyzers: AnalyzerRegistry,
}

impl MemoryIndexStore {
    /// Creates an empty store.
    pub fn new() -> Result<Self> {
        let schema = IndexSchema::build();
        let index = Index::create_in_ram(schema.schema().clone());
        IndexSchema::register_tokenizers(&index);

        let writer = index
            .writer_with_num_threads(1, WRITER_BUFFER_SIZE)
            .map_err(index_error("create index writer"))?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(index_error("open index reader"))?;

        Ok(Self {
            schema,
            writer: Mutex::new(writer),
            reader,
            analyzers: AnalyzerRegistry::new(),
        })
    }

    fn writer(&self) -> Result<MutexGuard<'_, IndexWriter>> {
        self.writer
            .lock()
            .map_err(|_| Error::store_unavailable("search index writer lock poisoned"))
    }

    fn ref_term(&self, tagged_ref: TaggedRef) -> Term {
        Term::from_field_text(self.schema.tagged_ref, &tagged_ref.to_string())
    }

    fn kind_term(&self, kind: EntityKind) -> Term {
        Term::from_field_text(self.schema.kind, kind.name())
    }

    fn build_document(&self, tagged_ref: TaggedRef, projection: &Projection) -> TantivyDocument {
        let analyzer = self.analyzers.get(&projection.language_tag);
        let mut doc = TantivyDocument::new();
        doc.add_text(self.schema.tagged_ref, tagged_ref.to_string());
        doc.add_text(self.schema.kind, tagged_ref.kind.name());
        doc.add_u64(self.schema.id, tagged_ref.id.get());
        doc.add_text(self.schema.language, analyzer.tag());
        doc.add_pre_tokenized_text(
            self.schema.body(tagged_ref.kind),
            analyzer.pre_tokenize(&projection.text_content),
        );
        doc
    }

    /// Stages every write and commits them together.
    fn write(
        &self,
        writer: &mut IndexWriter,
        clear_all: bool,
        staged: Vec<(TaggedRef, Option<TantivyDocument>)>,
    ) -> tantivy::Result<()> {
        if clear_all {
            writer.delete_all_documents()?;
        }
        for (tagged_ref, doc) in staged {
            writer.delete_term(self.ref_term(tagged_ref));
            if let Some(doc) = doc {
                writer.add_document(doc)?;
            }
        }
        writer.commit()?;
        Ok(())
    }

    fn load(&self, searcher: &Searcher, address: DocAddress) -> Result<IndexEntry> {
        let doc: TantivyDocument = searcher
            .doc(address)
            .map_err(index_error("load index document"))?;

        let tagged_ref: TaggedRef = doc
            .get_first(self.schema.tagged_ref)
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::operation("Index document has no reference"))?
            .parse()?;
        let search_repr = doc
            .get_first(self.schema.body(tagged_ref.kind))
            .and_then(|v| v.as_pre_tokenized_text())
            .ok_or_else(|| Error::operation(format!("Index document {tagged_ref} has no body")))?;
        let language_tag = doc
            .get_first(self.schema.language)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(IndexEntry {
            tagged_ref,
            text_content: search_repr.text.clone(),
            language_tag,
            search_repr: *search_repr,
        })
    }
}

impl SearchIndexStore for MemoryIndexStore {
    fn apply(&self, batch: IndexBatch) -> Result<()> {
        let clear_all = batch.clears_all();
        let (mut upserts, mut deletes) = (0usize, 0usize);

        // Analysis happens before the writer is taken.
        let staged: Vec<(TaggedRef, Option<TantivyDocument>)> = batch
            .into_iter()
            .map(|(tagged_ref, op)| match op {
                IndexOp::Upsert(projection) => {
                    upserts += 1;
                    (tagged_ref, Some(self.build_document(tagged_ref, &projection)))
                }
                IndexOp::Delete => {
                    deletes += 1;
                    (tagged_ref, None)
                }
            })
            .collect();

        let mut writer = self.writer()?;
        if let Err(e) = self.write(&mut writer, clear_all, staged) {
            if let Err(rollback) = writer.rollback() {
                log::error!("Failed to roll back index batch: {rollback}");
            }
            return Err(index_error("commit index batch")(e));
        }
        self.reader.reload().map_err(index_error("reload index reader"))?;

        log::debug!(
            "Applied index batch: {upserts} upserted, {deletes} deleted{}",
            if clear_all { " (after clear)" } else { "" }
        );
        Ok(())
    }

    fn get(&self, tagged_ref: TaggedRef) -> Result<Option<IndexEntry>> {
        let searcher = self.reader.searcher();
        let query = TermQuery::new(self.ref_term(tagged_ref), IndexRecordOption::Basic);
        let hits = searcher
            .search(&query, &TopDocs::with_limit(1).order_by_score())
            .map_err(index_error("look up index entry"))?;
        hits.first()
            .map(|(_, address)| self.load(&searcher, *address))
            .transpose()
    }

    fn len(&self) -> Result<usize> {
        Ok(self.reader.searcher().num_docs() as usize)
    }

    fn count_by_kind(&self) -> Result<BTreeMap<EntityKind, usize>> {
        let searcher = self.reader.searcher();
        let mut counts = BTreeMap::new();
        for kind in EntityKind::ALL {
            let query = TermQuery::new(self.kind_term(kind), IndexRecordOption::Basic);
            let count = searcher
                .search(&query, &Count)
                .map_err(index_error("count index entries"))?;
            if count > 0 {
                counts.insert(kind, count);
            }
        }
        Ok(counts)
    }

    fn snapshot(&self) -> Result<BTreeMap<TaggedRef, String>> {
        let searcher = self.reader.searcher();
        let addresses = searcher
            .search(&AllQuery, &DocSetCollector)
            .map_err(index_error("scan index"))?;
        addresses
            .into_iter()
            .map(|address| {
                let entry = self.load(&searcher, address)?;
                Ok((entry.tagged_ref, entry.text_content))
            })
            .collect()
    }

    fn query(&self, kind: EntityKind, query: &CompiledQuery) -> Result<Vec<RankedEntry>> {
        let searcher = self.reader.searcher();
        let scope = self.kind_term(kind);
        let stats = KindStatistics::new(&searcher, &scope)
            .map_err(index_error("read index statistics"))?;
        if stats.num_docs == 0 {
            return Ok(Vec::new());
        }

        let tantivy_query = query.to_tantivy(self.schema.body(kind), &scope);
        let limit = usize::try_from(stats.num_docs).unwrap_or(usize::MAX);
        let top_docs = searcher
            .search_with_statistics_provider(
                &*tantivy_query,
                &TopDocs::with_limit(limit).order_by_score(),
                &stats,
            )
            .map_err(index_error("run query"))?;

        let mut ranked = top_docs
            .into_iter()
            .map(|(score, address)| {
                let entry = self.load(&searcher, address)?;
                Ok(RankedEntry {
                    tagged_ref: entry.tagged_ref,
                    rank_score: score,
                    text_content: entry.text_content,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        ranked.sort_by(|a, b| {
            b.rank_score
                .total_cmp(&a.rank_score)
                .then_with(|| a.tagged_ref.id.cmp(&b.tagged_ref.id))
        });
        Ok(ranked)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryIndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryIndexStore")
            .field("entries", &self.len().unwrap_or(0))
            .field("analyzers", &self.analyzers)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::query::compile;

    fn store_with(texts: &[(u64, &str)]) -> MemoryIndexStore {
        let store = MemoryIndexStore::new().unwrap();
        let mut batch = IndexBatch::new();
        for (id, text) in texts {
            batch.upsert(TaggedRef::passage(*id), Projection::new(*text));
        }
        store.apply(batch).unwrap();
        store
    }

    fn run(store: &MemoryIndexStore, kind: EntityKind, q: &str) -> Vec<RankedEntry> {
        let compiled = compile(q, &Analyzer::build("english")).unwrap();
        store.query(kind, &compiled).unwrap()
    }

    fn ids(hits: &[RankedEntry]) -> Vec<u64> {
        hits.iter().map(|h| h.tagged_ref.id.get()).collect()
    }

    fn lexemes(entry: &IndexEntry) -> Vec<&str> {
        entry.search_repr.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    // ------------------------------------------------------------------------
    // IndexBatch
    // ------------------------------------------------------------------------

    #[test]
    fn test_batch_last_write_wins() {
        let mut batch = IndexBatch::new();
        let r = TaggedRef::metadata(1);
        batch.upsert(r, Projection::new("first"));
        batch.upsert(r, Projection::new("second"));
        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch.get(&r),
            Some(&IndexOp::Upsert(Projection::new("second")))
        );

        batch.delete(r);
        assert_eq!(batch.get(&r), Some(&IndexOp::Delete));
    }

    #[test]
    fn test_batch_empty() {
        assert!(IndexBatch::new().is_empty());
        assert!(!IndexBatch::replacing_all().is_empty());
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    #[test]
    fn test_upsert_and_get() {
        let store = MemoryIndexStore::new().unwrap();
        let r = TaggedRef::passage(1);
        store.upsert(r, Projection::new("The quick brown fox")).unwrap();

        let entry = store.get(r).unwrap().unwrap();
        assert_eq!(entry.tagged_ref, r);
        assert_eq!(entry.text_content, "The quick brown fox");
        assert_eq!(entry.language_tag, "english");
        assert_eq!(lexemes(&entry), vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_get_missing() {
        let store = store_with(&[(1, "fox")]);
        assert!(store.get(TaggedRef::passage(2)).unwrap().is_none());
        assert!(store.get(TaggedRef::metadata(1)).unwrap().is_none());
    }

    #[test]
    fn test_repeated_upsert_is_identical() {
        let store = MemoryIndexStore::new().unwrap();
        let r = TaggedRef::passage(1);
        store.upsert(r, Projection::new("same text")).unwrap();
        let first = store.get(r).unwrap();
        store.upsert(r, Projection::new("same text")).unwrap();
        assert_eq!(store.get(r).unwrap(), first);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_upsert_replaces_terms() {
        let store = MemoryIndexStore::new().unwrap();
        let r = TaggedRef::passage(1);
        store.upsert(r, Projection::new("fox")).unwrap();
        store.upsert(r, Projection::new("dog")).unwrap();
        assert!(run(&store, EntityKind::Passage, "fox").is_empty());
        assert_eq!(run(&store, EntityKind::Passage, "dog").len(), 1);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let store = MemoryIndexStore::new().unwrap();
        store.delete(TaggedRef::passage(9)).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_delete_removes_entry() {
        let store = store_with(&[(1, "fox"), (2, "dog")]);
        store.delete(TaggedRef::passage(1)).unwrap();
        assert!(store.get(TaggedRef::passage(1)).unwrap().is_none());
        assert!(run(&store, EntityKind::Passage, "fox").is_empty());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_replacing_batch_clears_first() {
        let store = store_with(&[(1, "fox"), (2, "dog")]);
        let mut batch = IndexBatch::replacing_all();
        batch.upsert(TaggedRef::passage(3), Projection::new("cat"));
        store.apply(batch).unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[&TaggedRef::passage(3)], "cat");
    }

    #[test]
    fn test_batch_is_visible_at_once() {
        let store = MemoryIndexStore::new().unwrap();
        let mut batch = IndexBatch::new();
        batch.upsert(TaggedRef::passage(1), Projection::new("fox"));
        batch.upsert(TaggedRef::metadata(1), Projection::new("fox"));
        batch.delete(TaggedRef::passage(2));
        store.apply(batch).unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_unknown_language_is_stored_with_simple_analysis() {
        let store = MemoryIndexStore::new().unwrap();
        let r = TaggedRef::metadata(1);
        store
            .upsert(r, Projection::new("The Foxes").with_language("klingon"))
            .unwrap();
        let entry = store.get(r).unwrap().unwrap();
        assert_eq!(entry.language_tag, "klingon");
        assert_eq!(lexemes(&entry), vec!["the", "foxes"]);
    }

    #[test]
    fn test_count_by_kind() {
        let store = store_with(&[(1, "fox"), (2, "dog")]);
        store
            .upsert(TaggedRef::metadata(1), Projection::new("meta"))
            .unwrap();
        let counts = store.count_by_kind().unwrap();
        assert_eq!(counts[&EntityKind::Passage], 2);
        assert_eq!(counts[&EntityKind::Metadata], 1);
        assert!(!counts.contains_key(&EntityKind::Author));
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    #[test]
    fn test_query_restricted_to_kind() {
        let store = store_with(&[(1, "fox")]);
        store
            .upsert(TaggedRef::metadata(1), Projection::new("fox"))
            .unwrap();
        let hits = run(&store, EntityKind::Passage, "fox");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tagged_ref, TaggedRef::passage(1));
        assert_eq!(hits[0].text_content, "fox");
    }

    #[test]
    fn test_query_orders_by_score_then_id() {
        let store = store_with(&[
            (3, "fox bird"),
            (1, "fox bird"),
            (2, "fox fox fox"),
            (4, "bird"),
        ]);
        let hits = run(&store, EntityKind::Passage, "fox");
        assert_eq!(ids(&hits), vec![2, 1, 3]);
        assert!(hits[0].rank_score > hits[1].rank_score);
        assert_eq!(hits[1].rank_score, hits[2].rank_score);
    }

    #[test]
    fn test_scores_use_kind_statistics() {
        let store = store_with(&[(1, "fox"), (2, "dog")]);
        let before = run(&store, EntityKind::Passage, "fox")[0].rank_score;

        let mut batch = IndexBatch::new();
        for id in 1..=5 {
            batch.upsert(TaggedRef::metadata(id), Projection::new("fox fox fox fox"));
        }
        store.apply(batch).unwrap();

        let after = run(&store, EntityKind::Passage, "fox")[0].rank_score;
        assert_eq!(before, after);
        assert!(before > 0.0);
    }

    #[test]
    fn test_query_stems_across_inflections() {
        let store = store_with(&[(1, "The foxes were running")]);
        assert_eq!(ids(&run(&store, EntityKind::Passage, "fox run")), vec![1]);
    }

    #[test]
    fn test_query_and_not() {
        let store = store_with(&[(1, "The quick brown fox"), (2, "fox chases the dog")]);
        let hits = run(&store, EntityKind::Passage, "\"fox\" AND NOT \"dog\"");
        assert_eq!(ids(&hits), vec![1]);
    }

    #[test]
    fn test_query_or() {
        let store = store_with(&[(1, "a sleeping cat"), (2, "a barking dog"), (3, "a brown fox")]);
        let hits = run(&store, EntityKind::Passage, "cat or dog");
        let mut found = ids(&hits);
        found.sort_unstable();
        assert_eq!(found, vec![1, 2]);
    }

    #[test]
    fn test_query_or_with_negated_branch() {
        let store = store_with(&[(1, "fox"), (2, "dog"), (3, "cat")]);
        store
            .upsert(TaggedRef::metadata(1), Projection::new("cat"))
            .unwrap();
        let hits = run(&store, EntityKind::Passage, "dog or -cat");
        let mut found = ids(&hits);
        found.sort_unstable();
        assert_eq!(found, vec![1, 2]);
    }

    #[test]
    fn test_phrase_respects_order() {
        let store = store_with(&[(1, "the brown fox"), (2, "the fox is brown")]);
        assert_eq!(ids(&run(&store, EntityKind::Passage, "\"brown fox\"")), vec![1]);
    }

    #[test]
    fn test_phrase_keeps_stopword_gap() {
        let store = store_with(&[(1, "fox and dog"), (2, "fox dog")]);
        assert_eq!(
            ids(&run(&store, EntityKind::Passage, "\"fox and dog\"")),
            vec![1]
        );
    }

    #[test]
    fn test_pure_negation_scans_kind() {
        let store = store_with(&[(1, "fox"), (2, "dog")]);
        store
            .upsert(TaggedRef::metadata(7), Projection::new("fox"))
            .unwrap();
        let hits = run(&store, EntityKind::Passage, "-dog");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tagged_ref, TaggedRef::passage(1));
        assert_eq!(hits[0].rank_score, 0.0);
    }

    #[test]
    fn test_query_empty_kind() {
        let store = MemoryIndexStore::new().unwrap();
        assert!(run(&store, EntityKind::Author, "jane").is_empty());
    }
}
