//! In-memory entity store.
//!
//! Holds one table per kind and enforces the constraints of the entity
//! model on every write:
//!
//! - passage text, title text, publisher name and language code are unique
//! - an author's (first name, last name) pair is unique
//! - a passage has at most one metadata record
//! - metadata may only reference entities that exist
//!
//! Deletes keep metadata consistent: authors and publishers are removed from
//! every record's sets, titles and languages are cleared from the records
//! that use them, and a passage takes its metadata record with it.
//!
//! Every write returns an [`Undo`] that [`MemoryEntityStore::rollback`]
//! reverts exactly.

use std::collections::BTreeMap;

use passim_core::{
    Entity, EntityId, EntityKind, EntityStore, Error, Metadata, Passage, Result, TaggedRef,
};

/// Changes made by one write, in the order they were made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "dropping an Undo makes the write impossible to revert"]
pub struct Undo {
    previous: Vec<(TaggedRef, Option<Entity>)>,
    counters: Vec<(EntityKind, Option<u64>)>,
}

impl Undo {
    /// Whether the write changed nothing.
    pub fn is_empty(&self) -> bool {
        self.previous.is_empty() && self.counters.is_empty()
    }

    /// Number of entity slots touched.
    pub fn len(&self) -> usize {
        self.previous.len()
    }
}

/// Entity store backed by in-memory tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryEntityStore {
    tables: BTreeMap<EntityKind, BTreeMap<EntityId, Entity>>,
    next_ids: BTreeMap<EntityKind, u64>,
}

impl MemoryEntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new entity.
    ///
    /// An unassigned id is allocated from the kind's counter; an assigned id
    /// is kept as long as it is free.
    pub fn insert(&mut self, entity: impl Into<Entity>) -> Result<(EntityId, Undo)> {
        let mut entity = entity.into();
        let kind = entity.kind();
        let mut undo = Undo::default();

        let id = if entity.id().is_assigned() {
            let id = entity.id();
            if self.table(kind).contains_key(&id) {
                return Err(Error::conflict(format!("{kind}:{id} already exists")));
            }
            id
        } else {
            EntityId(self.next_id(kind))
        };
        entity.set_id(id);
        self.validate(&entity)?;

        if id.get() >= self.next_id(kind) {
            let next = id
                .get()
                .checked_add(1)
                .ok_or_else(|| Error::conflict(format!("{kind}:{id} is the last assignable id")))?;
            let previous = self.next_ids.insert(kind, next);
            undo.counters.push((kind, previous));
        }
        self.put(entity, &mut undo);
        Ok((id, undo))
    }

    /// Replaces an existing entity.
    pub fn update(&mut self, entity: impl Into<Entity>) -> Result<Undo> {
        let entity = entity.into();
        let tagged_ref = entity.tagged_ref();
        if !self.table(tagged_ref.kind).contains_key(&tagged_ref.id) {
            return Err(Error::not_found(tagged_ref.id, tagged_ref.kind.name()));
        }
        self.validate(&entity)?;

        let mut undo = Undo::default();
        self.put(entity, &mut undo);
        Ok(undo)
    }

    /// Deletes an entity and applies its effect on metadata records.
    pub fn delete(&mut self, tagged_ref: TaggedRef) -> Result<(Entity, Undo)> {
        let mut undo = Undo::default();
        let entity = self
            .take(tagged_ref, &mut undo)
            .ok_or_else(|| Error::not_found(tagged_ref.id, tagged_ref.kind.name()))?;

        match tagged_ref.kind {
            EntityKind::Metadata => {}
            EntityKind::Passage => {
                if let Some(metadata_id) = self.metadata_for(tagged_ref.id).map(|m| m.id) {
                    log::debug!("Deleting metadata {metadata_id} with {tagged_ref}");
                    self.take(TaggedRef::metadata(metadata_id), &mut undo);
                }
            }
            _ => {
                let touched: Vec<Metadata> = self
                    .metadata_records()
                    .filter(|m| m.relation_owners().contains(&tagged_ref))
                    .cloned()
                    .collect();
                for mut record in touched {
                    record.detach(tagged_ref);
                    self.put(Entity::Metadata(record), &mut undo);
                }
            }
        }
        Ok((entity, undo))
    }

    /// Reverts a write. Undos must be rolled back newest first.
    pub fn rollback(&mut self, undo: Undo) {
        for (tagged_ref, previous) in undo.previous.into_iter().rev() {
            let table = self.tables.entry(tagged_ref.kind).or_default();
            match previous {
                Some(entity) => {
                    table.insert(tagged_ref.id, entity);
                }
                None => {
                    table.remove(&tagged_ref.id);
                }
            }
            self.prune(tagged_ref.kind);
        }
        for (kind, counter) in undo.counters.into_iter().rev() {
            match counter {
                Some(next) => self.next_ids.insert(kind, next),
                None => self.next_ids.remove(&kind),
            };
        }
    }

    /// Every entity of `kind`, by ascending id.
    pub fn all(&self, kind: EntityKind) -> Vec<Entity> {
        self.tables
            .get(&kind)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Every passage, by ascending id.
    pub fn passages(&self) -> Vec<Passage> {
        self.all(EntityKind::Passage)
            .into_iter()
            .filter_map(|e| Passage::try_from(e).ok())
            .collect()
    }

    /// Number of entities of `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.tables.get(&kind).map_or(0, BTreeMap::len)
    }

    /// Total number of entities.
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    /// Whether the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn table(&self, kind: EntityKind) -> &BTreeMap<EntityId, Entity> {
        static EMPTY: BTreeMap<EntityId, Entity> = BTreeMap::new();
        self.tables.get(&kind).unwrap_or(&EMPTY)
    }

    fn next_id(&self, kind: EntityKind) -> u64 {
        self.next_ids.get(&kind).copied().unwrap_or(1)
    }

    fn put(&mut self, entity: Entity, undo: &mut Undo) {
        let tagged_ref = entity.tagged_ref();
        let previous = self
            .tables
            .entry(tagged_ref.kind)
            .or_default()
            .insert(tagged_ref.id, entity);
        undo.previous.push((tagged_ref, previous));
    }

    fn take(&mut self, tagged_ref: TaggedRef, undo: &mut Undo) -> Option<Entity> {
        let removed = self.tables.get_mut(&tagged_ref.kind)?.remove(&tagged_ref.id)?;
        self.prune(tagged_ref.kind);
        undo.previous.push((tagged_ref, Some(removed.clone())));
        Some(removed)
    }

    /// Drops an emptied table so stores compare equal by content.
    fn prune(&mut self, kind: EntityKind) {
        if self.tables.get(&kind).is_some_and(BTreeMap::is_empty) {
            self.tables.remove(&kind);
        }
    }

    fn metadata_records(&self) -> impl Iterator<Item = &Metadata> {
        self.table(EntityKind::Metadata)
            .values()
            .filter_map(|e| match e {
                Entity::Metadata(m) => Some(m),
                _ => None,
            })
    }

    fn metadata_for(&self, passage_id: EntityId) -> Option<&Metadata> {
        self.metadata_records()
            .find(|m| m.passage_id == Some(passage_id))
    }

    fn others(&self, entity: &Entity) -> impl Iterator<Item = &Entity> {
        let id = entity.id();
        self.table(entity.kind())
            .iter()
            .filter(move |(other, _)| **other != id)
            .map(|(_, e)| e)
    }

    /// Checks uniqueness and relation constraints against every other row.
    fn validate(&self, entity: &Entity) -> Result<()> {
        let duplicate = |what: String| Err(Error::conflict(format!("duplicate {what}")));
        match entity {
            Entity::Passage(p) => {
                if self
                    .others(entity)
                    .any(|e| matches!(e, Entity::Passage(o) if o.text == p.text))
                {
                    return duplicate(format!("passage text '{p}'"));
                }
            }
            Entity::Author(a) => {
                if self.others(entity).any(|e| {
                    matches!(e, Entity::Author(o)
                        if o.first_name == a.first_name && o.last_name == a.last_name)
                }) {
                    return duplicate(format!("author '{a}'"));
                }
            }
            Entity::Title(t) => {
                if self
                    .others(entity)
                    .any(|e| matches!(e, Entity::Title(o) if o.title == t.title))
                {
                    return duplicate(format!("title '{t}'"));
                }
            }
            Entity::Publisher(p) => {
                if self
                    .others(entity)
                    .any(|e| matches!(e, Entity::Publisher(o) if o.name == p.name))
                {
                    return duplicate(format!("publisher '{p}'"));
                }
            }
            Entity::Language(l) => {
                if self
                    .others(entity)
                    .any(|e| matches!(e, Entity::Language(o) if o.code == l.code))
                {
                    return duplicate(format!("language code '{}'", l.code));
                }
            }
            Entity::Metadata(m) => self.validate_metadata(m)?,
        }
        Ok(())
    }

    fn validate_metadata(&self, record: &Metadata) -> Result<()> {
        for owner in record.relation_owners() {
            if !self.table(owner.kind).contains_key(&owner.id) {
                return Err(Error::conflict(format!(
                    "metadata {} references missing {owner}",
                    record.id
                )));
            }
        }
        if let Some(passage_id) = record.passage_id
            && let Some(other) = self.metadata_for(passage_id)
            && other.id != record.id
        {
            return Err(Error::conflict(format!(
                "passage {passage_id} already has metadata {}",
                other.id
            )));
        }
        Ok(())
    }
}

impl EntityStore for MemoryEntityStore {
    fn get(&self, tagged_ref: TaggedRef) -> Result<Option<Entity>> {
        Ok(self.table(tagged_ref.kind).get(&tagged_ref.id).cloned())
    }

    fn get_many(&self, kind: EntityKind, ids: &[EntityId]) -> Result<Vec<Entity>> {
        let table = self.table(kind);
        Ok(ids.iter().filter_map(|id| table.get(id).cloned()).collect())
    }

    fn ids(&self, kind: EntityKind) -> Result<Vec<EntityId>> {
        Ok(self.table(kind).keys().copied().collect())
    }

    fn metadata_for_passage(&self, passage_id: EntityId) -> Result<Option<Metadata>> {
        Ok(self.metadata_for(passage_id).cloned())
    }
}

// ============================================================================
// Tests
// ============================================================================
