//! Reverse references: which metadata records point at an entity.
//!
//! The index keeps denormalized copies of author, title, publisher,
//! language and passage text inside metadata entries. When one of those
//! owners changes, [`ReverseRefIndex::referencing`] tells the synchronizer
//! which metadata entries to rewrite.
//!
//! Every mutation reports what it changed as [`RefChange`]s, which a unit of
//! work collects in a [`RefJournal`] so the changes can be undone.

use std::collections::{BTreeMap, BTreeSet};

use passim_core::{EntityId, Metadata, TaggedRef};

/// One association added to or removed from the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefChange {
    /// `metadata_id` now references `owner`.
    Added {
        /// Referenced entity.
        owner: TaggedRef,
        /// Referencing metadata record.
        metadata_id: EntityId,
    },
    /// `metadata_id` no longer references `owner`.
    Removed {
        /// Previously referenced entity.
        owner: TaggedRef,
        /// Previously referencing metadata record.
        metadata_id: EntityId,
    },
}

/// Owner → referencing metadata ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseRefIndex {
    refs: BTreeMap<TaggedRef, BTreeSet<EntityId>>,
}

impl ReverseRefIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from a full scan of metadata records.
    pub fn from_metadata<'a>(records: impl IntoIterator<Item = &'a Metadata>) -> Self {
        let mut index = Self::new();
        for record in records {
            for owner in record.relation_owners() {
                index.add(owner, record.id);
            }
        }
        index
    }

    /// Records that `metadata_id` references `owner`. Returns whether this
    /// was new.
    pub fn add(&mut self, owner: TaggedRef, metadata_id: EntityId) -> bool {
        self.refs.entry(owner).or_default().insert(metadata_id)
    }

    /// Drops one association. Returns whether it existed.
    pub fn remove(&mut self, owner: TaggedRef, metadata_id: EntityId) -> bool {
        let Some(ids) = self.refs.get_mut(&owner) else {
            return false;
        };
        let removed = ids.remove(&metadata_id);
        if ids.is_empty() {
            self.refs.remove(&owner);
        }
        removed
    }

    /// Metadata ids referencing `owner`.
    pub fn referencing(&self, owner: TaggedRef) -> BTreeSet<EntityId> {
        self.refs.get(&owner).cloned().unwrap_or_default()
    }

    /// Owners referenced by `metadata_id`.
    pub fn owners_of(&self, metadata_id: EntityId) -> BTreeSet<TaggedRef> {
        self.refs
            .iter()
            .filter(|(_, ids)| ids.contains(&metadata_id))
            .map(|(owner, _)| *owner)
            .collect()
    }

    /// Drops every association of a deleted owner.
    pub fn clear_owner(&mut self, owner: TaggedRef) -> Vec<RefChange> {
        self.refs
            .remove(&owner)
            .unwrap_or_default()
            .into_iter()
            .map(|metadata_id| RefChange::Removed { owner, metadata_id })
            .collect()
    }

    /// Drops every association of a deleted metadata record.
    pub fn remove_metadata(&mut self, metadata_id: EntityId) -> Vec<RefChange> {
        let owners = self.owners_of(metadata_id);
        owners
            .into_iter()
            .filter(|owner| self.remove(*owner, metadata_id))
            .map(|owner| RefChange::Removed { owner, metadata_id })
            .collect()
    }

    /// Makes `metadata_id` reference exactly `owners`.
    pub fn set_owners(
        &mut self,
        metadata_id: EntityId,
        owners: &BTreeSet<TaggedRef>,
    ) -> Vec<RefChange> {
        let current = self.owners_of(metadata_id);
        let mut changes = Vec::new();
        for owner in current.difference(owners) {
            if self.remove(*owner, metadata_id) {
                changes.push(RefChange::Removed {
                    owner: *owner,
                    metadata_id,
                });
            }
        }
        for owner in owners.difference(&current) {
            if self.add(*owner, metadata_id) {
                changes.push(RefChange::Added {
                    owner: *owner,
                    metadata_id,
                });
            }
        }
        changes
    }

    /// Reverts one change.
    pub fn undo(&mut self, change: RefChange) {
        match change {
            RefChange::Added { owner, metadata_id } => {
                self.remove(owner, metadata_id);
            }
            RefChange::Removed { owner, metadata_id } => {
                self.add(owner, metadata_id);
            }
        }
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.refs.clear();
    }

    /// Number of (owner, metadata) associations.
    pub fn len(&self) -> usize {
        self.refs.values().map(BTreeSet::len).sum()
    }

    /// Whether no associations are tracked.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Changes made to a [`ReverseRefIndex`] by one unit of work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefJournal {
    changes: Vec<RefChange>,
}

impl RefJournal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a change reported as a bool by `add`/`remove`.
    pub fn record_if(&mut self, changed: bool, change: RefChange) {
        if changed {
            self.changes.push(change);
        }
    }

    /// Records several changes.
    pub fn extend(&mut self, changes: impl IntoIterator<Item = RefChange>) {
        self.changes.extend(changes);
    }

    /// Number of recorded changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Undoes every recorded change, newest first.
    pub fn rollback(self, refs: &mut ReverseRefIndex) {
        for change in self.changes.into_iter().rev() {
            refs.undo(change);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
