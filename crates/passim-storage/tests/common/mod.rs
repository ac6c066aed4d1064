//! Common test utilities and harness for passim-storage integration tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use passim_core::{
    Author, EntityId, EntityKind, Error, Metadata, Result, TaggedRef,
};
use passim_fts::{
    CompiledQuery, IndexBatch, IndexEntry, MemoryIndexStore, RankedEntry, SearchConfig,
    SearchIndexStore,
};
use passim_query::{SearchParams, SearchResults};
use passim_storage::Library;

/// Index store that can be told to reject writes.
#[derive(Debug)]
pub struct FailingIndexStore {
    inner: MemoryIndexStore,
    failing: AtomicBool,
}

impl FailingIndexStore {
    /// Creates a store that accepts writes.
    pub fn new() -> Self {
        Self {
            inner: MemoryIndexStore::new().expect("index store should open"),
            failing: AtomicBool::new(false),
        }
    }

    /// Makes every following `apply` fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl SearchIndexStore for FailingIndexStore {
    fn apply(&self, batch: IndexBatch) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::store_unavailable("index store offline"));
        }
        self.inner.apply(batch)
    }

    fn get(&self, tagged_ref: TaggedRef) -> Result<Option<IndexEntry>> {
        self.inner.get(tagged_ref)
    }

    fn len(&self) -> Result<usize> {
        self.inner.len()
    }

    fn count_by_kind(&self) -> Result<BTreeMap<EntityKind, usize>> {
        self.inner.count_by_kind()
    }

    fn snapshot(&self) -> Result<BTreeMap<TaggedRef, String>> {
        self.inner.snapshot()
    }

    fn query(&self, kind: EntityKind, query: &CompiledQuery) -> Result<Vec<RankedEntry>> {
        self.inner.query(kind, query)
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Test harness around an in-memory library.
pub struct TestHarness {
    /// The library under test.
    pub library: Library,
}

impl TestHarness {
    /// Creates an empty harness.
    pub fn new() -> Self {
        Self {
            library: Library::in_memory(SearchConfig::default())
                .expect("library should open"),
        }
    }

    /// Passage "The quick brown fox jumps." (scenario 1).
    pub fn with_fox() -> (Self, EntityId) {
        let harness = Self::new();
        let id = harness
            .library
            .create_passage("The quick brown fox jumps.")
            .expect("fox passage should be created");
        (harness, id)
    }

    /// Author Jane Doe credited on "Annual Report 2021" (scenario 2).
    ///
    /// Returns (passage, author, metadata) ids.
    pub fn with_report(&self) -> (EntityId, EntityId, EntityId) {
        let passage = self
            .library
            .create_passage("Annual Report 2021")
            .expect("report passage should be created");
        let author = self
            .library
            .create(Author::new("Jane").with_last_name("Doe"))
            .expect("author should be created");
        let metadata = self
            .library
            .create(Metadata::new().with_passage(passage).with_author(author))
            .expect("metadata should be created");
        (passage, author, metadata)
    }

    /// Searches passages with default options.
    pub fn search(&self, query: &str) -> SearchResults {
        self.library
            .search_blocking(&SearchParams::new(query))
            .expect("search should succeed")
    }

    /// Hit references for `query`.
    pub fn refs(&self, query: &str) -> Vec<TaggedRef> {
        self.search(query).refs()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Renames an author, keeping its id.
pub fn renamed(id: EntityId, first_name: &str, last_name: &str) -> Author {
    let mut author = Author::new(first_name).with_last_name(last_name);
    author.id = id;
    author
}

/// Tagged reference of an author.
pub fn author_ref(id: EntityId) -> TaggedRef {
    TaggedRef::new(EntityKind::Author, id)
}
