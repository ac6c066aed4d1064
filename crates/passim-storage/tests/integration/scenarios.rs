//! End-to-end search scenarios.

use passim_core::{EntityKind, Language, Metadata, TaggedRef};
use passim_fts::{IndexBatch, SearchIndexStore};
use passim_query::{SearchBackend, SearchParams};

use crate::common::{TestHarness, renamed};

#[test]
fn test_passage_is_found_by_its_words() {
    let (harness, id) = TestHarness::with_fox();

    let results = harness.search("fox");
    assert_eq!(results.refs(), vec![TaggedRef::passage(id)]);
    assert!(results.items[0].highlighted_snippet.contains("<b>fox</b>"));
}

#[test]
fn test_passage_is_found_by_its_author() {
    let harness = TestHarness::new();
    let (passage, _, _) = harness.with_report();

    assert_eq!(harness.refs("Jane"), vec![TaggedRef::passage(passage)]);
}

#[test]
fn test_author_rename_moves_passage_between_queries() {
    let harness = TestHarness::new();
    let (passage, author, _) = harness.with_report();

    harness
        .library
        .update(renamed(author, "Janet", "Doe"))
        .unwrap();

    assert!(harness.refs("Jane").is_empty());
    assert_eq!(harness.refs("Janet"), vec![TaggedRef::passage(passage)]);
}

#[test]
fn test_deleted_passage_is_not_found() {
    let (harness, id) = TestHarness::with_fox();

    harness.library.delete(TaggedRef::passage(id)).unwrap();
    assert!(harness.refs("fox").is_empty());
}

#[test]
fn test_rebuild_recovers_cleared_index() {
    let (harness, fox) = TestHarness::with_fox();
    let (report, author, _) = harness.with_report();
    harness
        .library
        .update(renamed(author, "Janet", "Doe"))
        .unwrap();
    let expected = harness.library.index_snapshot().unwrap();

    harness
        .library
        .index()
        .apply(IndexBatch::replacing_all())
        .unwrap();
    assert!(harness.refs("fox").is_empty());

    let stats = harness.library.rebuild().unwrap();
    assert_eq!(stats.count(EntityKind::Passage), 2);
    assert_eq!(harness.library.index_snapshot().unwrap(), expected);

    assert_eq!(harness.refs("fox"), vec![TaggedRef::passage(fox)]);
    assert!(harness.refs("Jane").is_empty());
    assert_eq!(harness.refs("Janet"), vec![TaggedRef::passage(report)]);
}

#[test]
fn test_fox_and_not_dog() {
    let harness = TestHarness::new();
    let fox = harness.library.create_passage("A fox in the snow").unwrap();
    harness
        .library
        .create_passage("The fox chased the dog")
        .unwrap();
    harness.library.create_passage("A sleeping dog").unwrap();

    assert_eq!(
        harness.refs(r#""fox" AND NOT "dog""#),
        vec![TaggedRef::passage(fox)]
    );
    assert_eq!(harness.refs("fox -dog"), vec![TaggedRef::passage(fox)]);
    assert_eq!(harness.refs("fox OR dog").len(), 3);
}

#[test]
fn test_empty_query_returns_nothing() {
    let (harness, _) = TestHarness::with_fox();
    assert!(harness.search("").is_empty());
    assert!(harness.search("   ").is_empty());
}

#[test]
fn test_phrase_query() {
    let harness = TestHarness::new();
    let hit = harness
        .library
        .create_passage("the brown fox ran")
        .unwrap();
    harness
        .library
        .create_passage("a fox that was brown")
        .unwrap();

    assert_eq!(
        harness.refs(r#""brown fox""#),
        vec![TaggedRef::passage(hit)]
    );
}

#[test]
fn test_metadata_language_drives_analysis() {
    let harness = TestHarness::new();
    let passage = harness
        .library
        .create_passage("Die Katzen schlafen im Garten")
        .unwrap();
    let german = harness
        .library
        .create(Language::new("German", "de"))
        .unwrap();
    harness
        .library
        .create(Metadata::new().with_passage(passage).with_language(german))
        .unwrap();

    let results = harness
        .library
        .search_blocking(&SearchParams::new("Katze").with_language("german"))
        .unwrap();
    assert_eq!(results.refs(), vec![TaggedRef::passage(passage)]);
    assert!(results.items[0].highlighted_snippet.contains("<b>Katzen</b>"));
}

#[tokio::test]
async fn test_search_through_backend_trait() {
    let (harness, id) = TestHarness::with_fox();
    let backend: &dyn SearchBackend = &harness.library;

    let results = backend
        .search(SearchParams::new("jumping").with_limit(5))
        .await
        .unwrap();
    assert_eq!(results.refs(), vec![TaggedRef::passage(id)]);
    assert_eq!(results.backend, "memory");
}
