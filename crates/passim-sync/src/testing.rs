//! Map-backed entity store for unit tests.

use std::collections::BTreeMap;

use passim_core::{
    Entity, EntityId, EntityKind, EntityStore, Metadata, Result, TaggedRef,
};

use crate::refs::ReverseRefIndex;

#[derive(Debug, Default)]
pub(crate) struct GraphStore {
    entities: BTreeMap<TaggedRef, Entity>,
}

impl GraphStore {
    /// Inserts or replaces an entity under `id`.
    pub(crate) fn put(&mut self, id: u64, entity: impl Into<Entity>) {
        let mut entity = entity.into();
        entity.set_id(EntityId(id));
        self.entities.insert(entity.tagged_ref(), entity);
    }

    pub(crate) fn delete(&mut self, tagged_ref: TaggedRef) {
        self.entities.remove(&tagged_ref);
    }

    /// Deletes an author and detaches it from every metadata record.
    pub(crate) fn remove_author_everywhere(&mut self, id: u64) {
        let owner = TaggedRef::new(EntityKind::Author, id);
        self.entities.remove(&owner);
        for entity in self.entities.values_mut() {
            if let Entity::Metadata(record) = entity {
                record.detach(owner);
            }
        }
    }

    pub(crate) fn reverse_refs(&self) -> ReverseRefIndex {
        ReverseRefIndex::from_metadata(self.entities.values().filter_map(|e| match e {
            Entity::Metadata(m) => Some(m),
            _ => None,
        }))
    }
}

impl EntityStore for GraphStore {
    fn get(&self, tagged_ref: TaggedRef) -> Result<Option<Entity>> {
        Ok(self.entities.get(&tagged_ref).cloned())
    }

    fn get_many(&self, kind: EntityKind, ids: &[EntityId]) -> Result<Vec<Entity>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.entities.get(&TaggedRef::new(kind, *id)).cloned())
            .collect())
    }

    fn ids(&self, kind: EntityKind) -> Result<Vec<EntityId>> {
        Ok(self
            .entities
            .keys()
            .filter(|r| r.kind == kind)
            .map(|r| r.id)
            .collect())
    }

    fn metadata_for_passage(&self, passage_id: EntityId) -> Result<Option<Metadata>> {
        Ok(self.entities.values().find_map(|e| match e {
            Entity::Metadata(m) if m.passage_id == Some(passage_id) => Some(m.clone()),
            _ => None,
        }))
    }
}
