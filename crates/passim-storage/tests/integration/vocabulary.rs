//! Everyday content words stay searchable; only function words are dropped.

use passim_core::{Author, Metadata, TaggedRef};

use crate::common::TestHarness;

#[test]
fn test_content_words_find_passage() {
    let harness = TestHarness::new();
    let id = harness
        .library
        .create_passage("Research on world history and information science.")
        .unwrap();

    for query in ["research", "world", "information", "science"] {
        assert_eq!(
            harness.refs(query),
            vec![TaggedRef::passage(id)],
            "query {query:?}"
        );
    }
}

#[test]
fn test_function_words_alone_find_nothing() {
    let harness = TestHarness::new();
    harness
        .library
        .create_passage("Research on world history and information science.")
        .unwrap();

    assert!(harness.refs("on and").is_empty());
}

#[test]
fn test_author_surname_young_finds_passage() {
    let harness = TestHarness::new();
    let passage = harness.library.create_passage("Call me Ishmael.").unwrap();
    let author = harness
        .library
        .create(Author::new("Mark").with_last_name("Young"))
        .unwrap();
    harness
        .library
        .create(Metadata::new().with_passage(passage).with_author(author))
        .unwrap();

    assert_eq!(harness.refs("Young"), vec![TaggedRef::passage(passage)]);
    assert_eq!(harness.refs("Mark"), vec![TaggedRef::passage(passage)]);

    let results = harness.search("young");
    assert!(results.items[0].highlighted_snippet.contains("<b>Young</b>"));
}
