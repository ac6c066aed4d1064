//! Full index rebuilds.
//!
//! A rebuild re-derives everything from the entity store: the reverse
//! references from a scan of metadata records, and one index entry per
//! entity. All entries go out in a single batch that begins with a clear, so
//! readers see either the old index or the new one and never an empty one.

use std::collections::BTreeMap;
use std::fmt;

use passim_core::{EntityKind, EntityStore, Metadata, Result, TaggedRef, project};
use passim_fts::{IndexBatch, SearchIndexStore};
use serde::{Deserialize, Serialize};

use crate::refs::ReverseRefIndex;

/// Statistics about a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildStats {
    /// Entries written per kind.
    pub indexed: BTreeMap<EntityKind, usize>,
    /// Reverse-reference associations rebuilt.
    pub references: usize,
}

impl RebuildStats {
    /// Entries written for `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.indexed.get(&kind).copied().unwrap_or(0)
    }

    /// Entries written in total.
    pub fn total(&self) -> usize {
        self.indexed.values().sum()
    }
}

impl fmt::Display for RebuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in EntityKind::ALL {
            writeln!(f, "Indexed {} {kind} entities.", self.count(kind))?;
        }
        write!(
            f,
            "Search index rebuilt: {} entries, {} references.",
            self.total(),
            self.references
        )
    }
}

/// Rebuilds the reverse references and the whole index from `store`.
///
/// `refs` is only replaced once the index accepted the new batch; on error
/// both are left as they were.
pub fn rebuild<S>(
    store: &dyn EntityStore,
    refs: &mut ReverseRefIndex,
    index: &S,
) -> Result<RebuildStats>
where
    S: SearchIndexStore + ?Sized,
{
    log::info!("Rebuilding search index from the entity store");

    let metadata_ids = store.ids(EntityKind::Metadata)?;
    let records: Vec<Metadata> = store
        .get_many(EntityKind::Metadata, &metadata_ids)?
        .into_iter()
        .filter_map(|e| Metadata::try_from(e).ok())
        .collect();
    let fresh_refs = ReverseRefIndex::from_metadata(&records);

    let mut stats = RebuildStats {
        references: fresh_refs.len(),
        ..Default::default()
    };
    let mut batch = IndexBatch::replacing_all();

    for kind in EntityKind::ALL {
        log::info!("Indexing {kind}...");
        let mut count = 0;
        for id in store.ids(kind)? {
            let tagged_ref = TaggedRef::new(kind, id);
            if let Some(view) = store.view(tagged_ref)? {
                batch.upsert(tagged_ref, project(&view));
                count += 1;
            }
        }
        log::info!("Indexed {count} {kind} entities");
        stats.indexed.insert(kind, count);
    }

    index.apply(batch)?;
    *refs = fresh_refs;

    log::info!(
        "Search index rebuilt: {} entries, {} references",
        stats.total(),
        stats.references
    );
    Ok(stats)
}

// ============================================================================
// Tests
// ============================================================================
