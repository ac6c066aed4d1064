//! A failing index store leaves every store as it was.

use passim_core::{Author, EntityId, Error, Metadata, TaggedRef};
use passim_fts::SearchConfig;
use passim_storage::Library;

use crate::common::{FailingIndexStore, author_ref, renamed};

/// Jane Doe credited on "Annual Report 2021": (passage, author, metadata).
fn seeded() -> (Library<FailingIndexStore>, EntityId, EntityId, EntityId) {
    let library = Library::new(FailingIndexStore::new(), SearchConfig::default());
    let passage = library.create_passage("Annual Report 2021").unwrap();
    let author = library
        .create(Author::new("Jane").with_last_name("Doe"))
        .unwrap();
    let metadata = library
        .create(Metadata::new().with_passage(passage).with_author(author))
        .unwrap();
    (library, passage, author, metadata)
}

fn assert_unchanged<T: std::fmt::Debug>(
    library: &Library<FailingIndexStore>,
    result: passim_core::Result<T>,
    before: &(passim_storage::Dataset, passim_sync::ReverseRefIndex),
    index_before: &std::collections::BTreeMap<TaggedRef, String>,
) {
    let err = result.unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable { .. }));
    assert!(err.is_retryable());
    assert_eq!(library.export().unwrap(), before.0);
    assert_eq!(library.reverse_refs().unwrap(), before.1);
    assert_eq!(&library.index_snapshot().unwrap(), index_before);
}

#[test]
fn test_failed_update_rolls_back() {
    let (library, _, author, _) = seeded();
    let before = (library.export().unwrap(), library.reverse_refs().unwrap());
    let index_before = library.index_snapshot().unwrap();

    library.index().set_failing(true);
    let result = library.update(renamed(author, "Janet", "Doe"));
    assert_unchanged(&library, result, &before, &index_before);
}

#[test]
fn test_failed_delete_rolls_back() {
    let (library, passage, author, _) = seeded();
    let before = (library.export().unwrap(), library.reverse_refs().unwrap());
    let index_before = library.index_snapshot().unwrap();

    library.index().set_failing(true);
    let result = library.delete(TaggedRef::passage(passage));
    assert_unchanged(&library, result, &before, &index_before);

    let result = library.delete(author_ref(author));
    assert_unchanged(&library, result, &before, &index_before);
}

#[test]
fn test_failed_create_releases_id() {
    let (library, _, _, _) = seeded();
    let before = (library.export().unwrap(), library.reverse_refs().unwrap());
    let index_before = library.index_snapshot().unwrap();

    library.index().set_failing(true);
    let result = library.create_passage("Quarterly Outlook");
    assert_unchanged(&library, result, &before, &index_before);

    library.index().set_failing(false);
    let id = library.create_passage("Quarterly Outlook").unwrap();
    assert_eq!(id, EntityId(2));
}

#[test]
fn test_failed_association_rolls_back() {
    let (library, _, _, metadata) = seeded();
    let other = library.create(Author::new("John")).unwrap();
    let before = (library.export().unwrap(), library.reverse_refs().unwrap());
    let index_before = library.index_snapshot().unwrap();

    library.index().set_failing(true);
    let result = library.add_author(metadata, other);
    assert_unchanged(&library, result, &before, &index_before);
}

#[test]
fn test_failed_rebuild_keeps_refs() {
    let (library, _, _, _) = seeded();
    let refs = library.reverse_refs().unwrap();

    library.index().set_failing(true);
    assert!(library.rebuild().is_err());
    assert_eq!(library.reverse_refs().unwrap(), refs);

    library.index().set_failing(false);
    assert!(library.rebuild().is_ok());
}
