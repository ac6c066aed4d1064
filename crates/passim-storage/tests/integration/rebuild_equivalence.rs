//! Rebuilding from scratch matches what incremental syncing produced.

use passim_core::{
    Author, EntityId, EntityKind, EntityStore, Metadata, Publisher, TaggedRef, Title,
};
use passim_fts::SearchConfig;
use passim_storage::Library;
use proptest::prelude::*;

const WORDS: &[&str] = &["fox", "whale", "snow", "harbor", "lantern", "orchard"];
const NAMES: &[&str] = &["Jane", "Janet", "Herman", "Ada", "Ishmael"];

#[derive(Debug, Clone)]
enum Op {
    CreatePassage(usize, usize),
    CreateAuthor(usize),
    CreateTitle(usize),
    CreatePublisher(usize),
    CreateMetadata(usize, usize),
    RenameAuthor(usize, usize),
    DeleteAuthor(usize),
    DeletePassage(usize),
    DeleteTitle(usize),
    AddAuthor(usize, usize),
    RemoveAuthor(usize, usize),
    AddPublisher(usize, usize),
    SetTitle(usize, usize),
    DeleteMetadata(usize),
}

fn op() -> impl Strategy<Value = Op> {
    let pick = 0usize..8;
    prop_oneof![
        (0..WORDS.len(), 0..WORDS.len()).prop_map(|(a, b)| Op::CreatePassage(a, b)),
        (0..NAMES.len()).prop_map(Op::CreateAuthor),
        (0..WORDS.len()).prop_map(Op::CreateTitle),
        (0..WORDS.len()).prop_map(Op::CreatePublisher),
        (pick.clone(), pick.clone()).prop_map(|(p, a)| Op::CreateMetadata(p, a)),
        (pick.clone(), 0..NAMES.len()).prop_map(|(a, n)| Op::RenameAuthor(a, n)),
        pick.clone().prop_map(Op::DeleteAuthor),
        pick.clone().prop_map(Op::DeletePassage),
        pick.clone().prop_map(Op::DeleteTitle),
        (pick.clone(), pick.clone()).prop_map(|(m, a)| Op::AddAuthor(m, a)),
        (pick.clone(), pick.clone()).prop_map(|(m, a)| Op::RemoveAuthor(m, a)),
        (pick.clone(), pick.clone()).prop_map(|(m, p)| Op::AddPublisher(m, p)),
        (pick.clone(), pick.clone()).prop_map(|(m, t)| Op::SetTitle(m, t)),
        pick.prop_map(Op::DeleteMetadata),
    ]
}

/// The `n`th existing id of `kind`, wrapping around.
fn nth(library: &Library, kind: EntityKind, n: usize) -> Option<EntityId> {
    let ids = library
        .with_entities(|store| store.ids(kind))
        .unwrap()
        .unwrap();
    if ids.is_empty() {
        None
    } else {
        Some(ids[n % ids.len()])
    }
}

/// Applies one operation. Constraint violations are expected and ignored:
/// a rejected mutation must leave everything consistent too.
fn apply(library: &Library, op: &Op) {
    let _ = match *op {
        Op::CreatePassage(a, b) => library
            .create_passage(format!("{} {}", WORDS[a], WORDS[b]))
            .map(drop),
        Op::CreateAuthor(n) => library
            .create(Author::new(NAMES[n]).with_last_name("Doe"))
            .map(drop),
        Op::CreateTitle(w) => library.create(Title::new(WORDS[w])).map(drop),
        Op::CreatePublisher(w) => library
            .create(Publisher::new(format!("{} Press", WORDS[w])))
            .map(drop),
        Op::CreateMetadata(p, a) => {
            let mut record = Metadata::new();
            if let Some(passage) = nth(library, EntityKind::Passage, p) {
                record = record.with_passage(passage);
            }
            if let Some(author) = nth(library, EntityKind::Author, a) {
                record = record.with_author(author);
            }
            library.create(record).map(drop)
        }
        Op::RenameAuthor(a, n) => match nth(library, EntityKind::Author, a) {
            Some(id) => {
                let mut author = Author::new(NAMES[n]).with_last_name("Roe");
                author.id = id;
                library.update(author)
            }
            None => Ok(()),
        },
        Op::DeleteAuthor(a) => delete_nth(library, EntityKind::Author, a),
        Op::DeletePassage(p) => delete_nth(library, EntityKind::Passage, p),
        Op::DeleteTitle(t) => delete_nth(library, EntityKind::Title, t),
        Op::DeleteMetadata(m) => delete_nth(library, EntityKind::Metadata, m),
        Op::AddAuthor(m, a) => match (
            nth(library, EntityKind::Metadata, m),
            nth(library, EntityKind::Author, a),
        ) {
            (Some(m), Some(a)) => library.add_author(m, a),
            _ => Ok(()),
        },
        Op::RemoveAuthor(m, a) => match (
            nth(library, EntityKind::Metadata, m),
            nth(library, EntityKind::Author, a),
        ) {
            (Some(m), Some(a)) => library.remove_author(m, a),
            _ => Ok(()),
        },
        Op::AddPublisher(m, p) => match (
            nth(library, EntityKind::Metadata, m),
            nth(library, EntityKind::Publisher, p),
        ) {
            (Some(m), Some(p)) => library.add_publisher(m, p),
            _ => Ok(()),
        },
        Op::SetTitle(m, t) => match (
            nth(library, EntityKind::Metadata, m),
            nth(library, EntityKind::Title, t),
        ) {
            (Some(m), Some(t)) => {
                let record = library.get(TaggedRef::metadata(m)).unwrap();
                match record.and_then(|e| Metadata::try_from(e).ok()) {
                    Some(record) => library.update(record.with_title(t)),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        },
    };
}

fn delete_nth(library: &Library, kind: EntityKind, n: usize) -> passim_core::Result<()> {
    match nth(library, kind, n) {
        Some(id) => library.delete(TaggedRef::new(kind, id)).map(drop),
        None => Ok(()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_rebuild_matches_incremental_sync(ops in prop::collection::vec(op(), 1..40)) {
        let library = Library::in_memory(SearchConfig::default()).unwrap();
        for op in &ops {
            apply(&library, op);
        }

        let incremental = library.index_snapshot().unwrap();
        let incremental_refs = library.reverse_refs().unwrap();

        library.rebuild().unwrap();
        prop_assert_eq!(library.index_snapshot().unwrap(), incremental);
        prop_assert_eq!(library.reverse_refs().unwrap(), incremental_refs);
    }

    #[test]
    fn test_every_entity_has_exactly_one_entry(ops in prop::collection::vec(op(), 1..40)) {
        let library = Library::in_memory(SearchConfig::default()).unwrap();
        for op in &ops {
            apply(&library, op);
        }

        let snapshot = library.index_snapshot().unwrap();
        let entity_count = library.with_entities(|store| store.len()).unwrap();
        prop_assert_eq!(snapshot.len(), entity_count);
        for tagged_ref in snapshot.keys() {
            prop_assert!(library.get(*tagged_ref).unwrap().is_some());
        }
    }
}
