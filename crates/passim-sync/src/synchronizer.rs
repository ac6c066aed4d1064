//! Keeping index entries consistent with the entity graph.
//!
//! A [`SyncUnit`] covers one unit of work. It reads the entity store as it
//! stands after the triggering mutation, stages index writes into an
//! [`IndexBatch`], and journals every reverse-reference change it makes.
//! The caller applies the batch to the index store and either keeps the
//! result or rolls the journal back.
//!
//! Fan-out, i.e. which metadata entries are rewritten when something else
//! changes:
//!
//! | Changed kind | Metadata rewritten |
//! |---|---|
//! | Passage | its linked metadata, if any |
//! | Author, Title, Publisher, Language | every metadata referencing it |
//! | Metadata | none |

use std::collections::BTreeSet;

use passim_core::{Entity, EntityId, EntityKind, EntityStore, Result, TaggedRef, project};
use passim_fts::IndexBatch;

use crate::refs::{RefChange, RefJournal, ReverseRefIndex};

/// Direction of an association change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    /// The association was created.
    Added,
    /// The association was dissolved.
    Removed,
}

/// One unit of index synchronization work.
pub struct SyncUnit<'a> {
    store: &'a dyn EntityStore,
    refs: &'a mut ReverseRefIndex,
    batch: IndexBatch,
    journal: RefJournal,
}

impl<'a> SyncUnit<'a> {
    /// Starts a unit over the current store state.
    pub fn new(store: &'a dyn EntityStore, refs: &'a mut ReverseRefIndex) -> Self {
        Self {
            store,
            refs,
            batch: IndexBatch::new(),
            journal: RefJournal::new(),
        }
    }

    /// Projects the entity and stages an upsert. Returns `false` (staging
    /// nothing) when the entity does not exist.
    pub fn sync(&mut self, tagged_ref: TaggedRef) -> Result<bool> {
        let Some(view) = self.store.view(tagged_ref)? else {
            return Ok(false);
        };
        let projection = project(&view);
        log::debug!(
            "Syncing {tagged_ref} ({} chars, {})",
            projection.text_content.len(),
            projection.language_tag
        );
        self.batch.upsert(tagged_ref, projection);
        Ok(true)
    }

    /// Stages removal of an entry.
    pub fn remove(&mut self, tagged_ref: TaggedRef) {
        log::debug!("Removing {tagged_ref} from index");
        self.batch.delete(tagged_ref);
    }

    /// Handles a created or updated entity.
    pub fn on_entity_saved(&mut self, tagged_ref: TaggedRef) -> Result<()> {
        match tagged_ref.kind {
            EntityKind::Metadata => {
                self.reconcile_metadata(tagged_ref.id)?;
                if !self.sync(tagged_ref)? {
                    self.remove(tagged_ref);
                }
            }
            EntityKind::Passage => {
                self.sync(tagged_ref)?;
                if let Some(metadata) = self.store.metadata_for_passage(tagged_ref.id)? {
                    self.resync_or_remove(metadata.id)?;
                }
            }
            _ => {
                self.sync(tagged_ref)?;
                for metadata_id in self.refs.referencing(tagged_ref) {
                    self.resync_or_remove(metadata_id)?;
                }
            }
        }
        Ok(())
    }

    /// Handles a deleted entity. The store must already reflect the delete.
    ///
    /// Dependents are captured before any association is severed, so a
    /// metadata record that lost the owner (or was deleted along with it) is
    /// rewritten or removed in this same unit.
    pub fn on_entity_deleted(&mut self, tagged_ref: TaggedRef) -> Result<()> {
        if tagged_ref.kind == EntityKind::Metadata {
            self.remove(tagged_ref);
            let changes = self.refs.remove_metadata(tagged_ref.id);
            self.journal.extend(changes);
            return Ok(());
        }

        let dependents = self.refs.referencing(tagged_ref);
        self.remove(tagged_ref);
        for metadata_id in dependents {
            self.resync_or_remove(metadata_id)?;
        }
        let changes = self.refs.clear_owner(tagged_ref);
        self.journal.extend(changes);
        Ok(())
    }

    /// Handles an association between `owner` and a metadata record being
    /// created or dissolved.
    pub fn association_changed(
        &mut self,
        owner: TaggedRef,
        metadata_id: EntityId,
        change: Association,
    ) -> Result<()> {
        match change {
            Association::Added => {
                let added = self.refs.add(owner, metadata_id);
                self.journal
                    .record_if(added, RefChange::Added { owner, metadata_id });
            }
            Association::Removed => {
                let removed = self.refs.remove(owner, metadata_id);
                self.journal
                    .record_if(removed, RefChange::Removed { owner, metadata_id });
            }
        }
        self.resync_or_remove(metadata_id)
    }

    /// Rewrites a dependent metadata entry, or removes it when the record no
    /// longer exists.
    pub fn resync_or_remove(&mut self, metadata_id: EntityId) -> Result<()> {
        let tagged_ref = TaggedRef::metadata(metadata_id);
        if self.sync(tagged_ref)? {
            return Ok(());
        }
        log::debug!("{tagged_ref} no longer exists, removing its index entry");
        self.remove(tagged_ref);
        let changes = self.refs.remove_metadata(metadata_id);
        self.journal.extend(changes);
        Ok(())
    }

    /// Aligns the reverse references of a metadata record with its stored
    /// relations.
    fn reconcile_metadata(&mut self, metadata_id: EntityId) -> Result<()> {
        let owners: BTreeSet<TaggedRef> = match self.store.get(TaggedRef::metadata(metadata_id))? {
            Some(Entity::Metadata(record)) => record.relation_owners(),
            _ => BTreeSet::new(),
        };
        let changes = self.refs.set_owners(metadata_id, &owners);
        self.journal.extend(changes);
        Ok(())
    }

    /// Staged writes so far.
    pub fn batch(&self) -> &IndexBatch {
        &self.batch
    }

    /// Ends the unit, handing back the staged batch and the journal.
    pub fn finish(self) -> (IndexBatch, RefJournal) {
        (self.batch, self.journal)
    }
}

impl std::fmt::Debug for SyncUnit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncUnit")
            .field("staged", &self.batch.len())
            .field("journaled", &self.journal.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
