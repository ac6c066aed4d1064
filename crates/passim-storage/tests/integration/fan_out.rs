//! Dependent metadata entries follow changes to what they embed.

use passim_core::{EntityKind, Metadata, Publisher, TaggedRef, Title};

use crate::common::{TestHarness, author_ref, renamed};

#[test]
fn test_shared_author_update_resyncs_every_metadata() {
    let harness = TestHarness::new();
    let (first, author, first_meta) = harness.with_report();
    let second = harness
        .library
        .create_passage("Quarterly Outlook")
        .unwrap();
    let second_meta = harness
        .library
        .create(Metadata::new().with_passage(second).with_author(author))
        .unwrap();

    harness
        .library
        .update(renamed(author, "Janet", "Doe"))
        .unwrap();

    let snapshot = harness.library.index_snapshot().unwrap();
    assert_eq!(
        snapshot[&TaggedRef::metadata(first_meta)],
        "Janet Doe Annual Report 2021"
    );
    assert_eq!(
        snapshot[&TaggedRef::metadata(second_meta)],
        "Janet Doe Quarterly Outlook"
    );

    let mut hits = harness.refs("Janet");
    hits.sort();
    assert_eq!(
        hits,
        vec![TaggedRef::passage(first), TaggedRef::passage(second)]
    );
}

#[test]
fn test_passage_edit_resyncs_its_metadata() {
    let harness = TestHarness::new();
    let (passage, _, metadata) = harness.with_report();

    let mut edited = passim_core::Passage::new("Annual Report 2022");
    edited.id = passage;
    harness.library.update(edited).unwrap();

    assert_eq!(
        harness.library.index_snapshot().unwrap()[&TaggedRef::metadata(metadata)],
        "Jane Doe Annual Report 2022"
    );
}

#[test]
fn test_author_delete_strips_name_from_metadata() {
    let harness = TestHarness::new();
    let (passage, author, metadata) = harness.with_report();

    harness.library.delete(author_ref(author)).unwrap();

    let snapshot = harness.library.index_snapshot().unwrap();
    assert!(!snapshot.contains_key(&author_ref(author)));
    assert_eq!(
        snapshot[&TaggedRef::metadata(metadata)],
        "Annual Report 2021"
    );
    assert!(harness.refs("Jane").is_empty());
    assert_eq!(harness.refs("annual"), vec![TaggedRef::passage(passage)]);
    assert!(
        harness
            .library
            .reverse_refs()
            .unwrap()
            .referencing(author_ref(author))
            .is_empty()
    );
}

#[test]
fn test_passage_delete_removes_metadata_entry() {
    let harness = TestHarness::new();
    let (passage, author, metadata) = harness.with_report();

    harness.library.delete(TaggedRef::passage(passage)).unwrap();

    let snapshot = harness.library.index_snapshot().unwrap();
    assert!(!snapshot.contains_key(&TaggedRef::passage(passage)));
    assert!(!snapshot.contains_key(&TaggedRef::metadata(metadata)));
    assert!(snapshot.contains_key(&author_ref(author)));

    let refs = harness.library.reverse_refs().unwrap();
    assert!(refs.referencing(author_ref(author)).is_empty());
    assert!(refs.referencing(TaggedRef::passage(passage)).is_empty());
}

#[test]
fn test_publisher_association_round_trip() {
    let harness = TestHarness::new();
    let (passage, _, metadata) = harness.with_report();
    let publisher = harness
        .library
        .create(Publisher::new("Penguin"))
        .unwrap();

    harness.library.add_publisher(metadata, publisher).unwrap();
    assert_eq!(harness.refs("penguin"), vec![TaggedRef::passage(passage)]);

    harness.library.remove_publisher(metadata, publisher).unwrap();
    assert!(harness.refs("penguin").is_empty());
}

#[test]
fn test_title_rename_and_delete() {
    let harness = TestHarness::new();
    let passage = harness.library.create_passage("Call me Ishmael").unwrap();
    let title = harness.library.create(Title::new("Moby-Dick")).unwrap();
    harness
        .library
        .create(Metadata::new().with_passage(passage).with_title(title))
        .unwrap();
    assert_eq!(harness.refs("moby"), vec![TaggedRef::passage(passage)]);

    let mut retitled = Title::new("The Whale");
    retitled.id = title;
    harness.library.update(retitled).unwrap();
    assert!(harness.refs("moby").is_empty());
    assert_eq!(harness.refs("whale"), vec![TaggedRef::passage(passage)]);

    harness
        .library
        .delete(TaggedRef::new(EntityKind::Title, title))
        .unwrap();
    assert!(harness.refs("whale").is_empty());
    assert_eq!(harness.refs("ishmael"), vec![TaggedRef::passage(passage)]);
}
