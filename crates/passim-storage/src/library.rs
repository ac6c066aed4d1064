//! The mutation service: entity writes with index synchronization.
//!
//! Every mutation is one unit of work under the write lock:
//!
//! ```text
//! write lock
//!   ├── MemoryEntityStore write ──► Undo
//!   ├── SyncUnit (direct + fan-out) ──► IndexBatch + RefJournal
//!   ├── SearchIndexStore::apply(batch)
//!   └── on any error: RefJournal::rollback, MemoryEntityStore::rollback
//! ```
//!
//! Searches take the read lock, so they never see the entity store and the
//! index out of step.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use passim_core::{
    Entity, EntityId, EntityKind, EntityStore, Error, Metadata, Passage, Result, TaggedRef,
};
use passim_fts::{MemoryIndexStore, SearchConfig, SearchIndexStore};
use passim_query::{QueryEngine, SearchBackend, SearchParams, SearchResults};
use passim_sync::{Association, RebuildStats, ReverseRefIndex, SyncUnit};

use crate::dataset::Dataset;
use crate::memory::{MemoryEntityStore, Undo};

#[derive(Debug, Default)]
struct State {
    entities: MemoryEntityStore,
    refs: ReverseRefIndex,
}

/// Entity graph plus its synchronized search index.
pub struct Library<S = MemoryIndexStore> {
    state: RwLock<State>,
    index: S,
    engine: QueryEngine,
}

impl Library<MemoryIndexStore> {
    /// Creates an empty library over an in-memory index.
    pub fn in_memory(config: SearchConfig) -> Result<Self> {
        Ok(Self::new(MemoryIndexStore::new()?, config))
    }
}

impl<S: SearchIndexStore> Library<S> {
    /// Creates an empty library over `index`.
    pub fn new(index: S, config: SearchConfig) -> Self {
        Self {
            state: RwLock::new(State::default()),
            index,
            engine: QueryEngine::new(config),
        }
    }

    /// The index store.
    pub fn index(&self) -> &S {
        &self.index
    }

    /// The search configuration.
    pub fn config(&self) -> &SearchConfig {
        self.engine.config()
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Creates an entity and indexes it. Returns the assigned id.
    pub fn create(&self, entity: impl Into<Entity>) -> Result<EntityId> {
        let entity = entity.into();
        let kind = entity.kind();
        self.transact(
            |entities| entities.insert(entity),
            |unit, id| unit.on_entity_saved(TaggedRef::new(kind, *id)),
        )
    }

    /// Creates a passage.
    pub fn create_passage(&self, text: impl Into<String>) -> Result<EntityId> {
        self.create(Passage::new(text))
    }

    /// Replaces an existing entity and re-indexes it and its dependents.
    pub fn update(&self, entity: impl Into<Entity>) -> Result<()> {
        let entity = entity.into();
        let tagged_ref = entity.tagged_ref();
        self.transact(
            |entities| Ok(((), entities.update(entity)?)),
            |unit, _| unit.on_entity_saved(tagged_ref),
        )
    }

    /// Deletes an entity, returning it.
    pub fn delete(&self, tagged_ref: TaggedRef) -> Result<Entity> {
        self.transact(
            |entities| entities.delete(tagged_ref),
            |unit, _| unit.on_entity_deleted(tagged_ref),
        )
    }

    /// Credits an author on a metadata record.
    pub fn add_author(&self, metadata_id: EntityId, author_id: EntityId) -> Result<()> {
        self.associate(
            metadata_id,
            TaggedRef::new(EntityKind::Author, author_id),
            Association::Added,
        )
    }

    /// Removes an author credit from a metadata record.
    pub fn remove_author(&self, metadata_id: EntityId, author_id: EntityId) -> Result<()> {
        self.associate(
            metadata_id,
            TaggedRef::new(EntityKind::Author, author_id),
            Association::Removed,
        )
    }

    /// Adds a publisher to a metadata record.
    pub fn add_publisher(&self, metadata_id: EntityId, publisher_id: EntityId) -> Result<()> {
        self.associate(
            metadata_id,
            TaggedRef::new(EntityKind::Publisher, publisher_id),
            Association::Added,
        )
    }

    /// Removes a publisher from a metadata record.
    pub fn remove_publisher(&self, metadata_id: EntityId, publisher_id: EntityId) -> Result<()> {
        self.associate(
            metadata_id,
            TaggedRef::new(EntityKind::Publisher, publisher_id),
            Association::Removed,
        )
    }

    /// Loads every entity of `dataset` through the normal mutation path.
    /// Returns the number of entities created.
    pub fn import(&self, dataset: Dataset) -> Result<usize> {
        log::info!("Importing {} entities", dataset.len());
        let mut created = 0;
        for entity in dataset.into_entities() {
            self.create(entity)?;
            created += 1;
        }
        log::info!("Imported {created} entities");
        Ok(created)
    }

    /// Re-derives the reverse references and the whole index.
    pub fn rebuild(&self) -> Result<RebuildStats> {
        let mut guard = self.write()?;
        let state = &mut *guard;
        passim_sync::rebuild(&state.entities, &mut state.refs, &self.index)
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Fetches one entity.
    pub fn get(&self, tagged_ref: TaggedRef) -> Result<Option<Entity>> {
        self.read()?.entities.get(tagged_ref)
    }

    /// Every passage, by ascending id.
    pub fn passages(&self) -> Result<Vec<Passage>> {
        Ok(self.read()?.entities.passages())
    }

    /// Snapshot of every entity.
    pub fn export(&self) -> Result<Dataset> {
        Ok(Dataset::from_store(&self.read()?.entities))
    }

    /// Every indexed reference with its stored text.
    pub fn index_snapshot(&self) -> Result<BTreeMap<TaggedRef, String>> {
        let _guard = self.read()?;
        self.index.snapshot()
    }

    /// Copy of the reverse references.
    pub fn reverse_refs(&self) -> Result<ReverseRefIndex> {
        Ok(self.read()?.refs.clone())
    }

    /// Runs `f` against the entity store under the read lock.
    pub fn with_entities<T>(&self, f: impl FnOnce(&MemoryEntityStore) -> T) -> Result<T> {
        Ok(f(&self.read()?.entities))
    }

    /// Runs a search synchronously.
    pub fn search_blocking(&self, params: &SearchParams) -> Result<SearchResults> {
        let state = self.read()?;
        self.engine.execute(params, &state.entities, &self.index)
    }

    // ------------------------------------------------------------------------
    // Unit of work
    // ------------------------------------------------------------------------

    fn associate(
        &self,
        metadata_id: EntityId,
        owner: TaggedRef,
        change: Association,
    ) -> Result<()> {
        self.transact(
            |entities| {
                let mut record = match entities.get(TaggedRef::metadata(metadata_id))? {
                    Some(Entity::Metadata(record)) => record,
                    _ => return Err(Error::not_found(metadata_id, "metadata")),
                };
                set_association(&mut record, owner, change);
                Ok(((), entities.update(record)?))
            },
            |unit, _| unit.association_changed(owner, metadata_id, change),
        )
    }

    /// Applies `mutate` to the entity store, stages the index changes with
    /// `sync`, and applies them. Either everything lands or nothing does.
    fn transact<T>(
        &self,
        mutate: impl FnOnce(&mut MemoryEntityStore) -> Result<(T, Undo)>,
        sync: impl FnOnce(&mut SyncUnit<'_>, &T) -> Result<()>,
    ) -> Result<T> {
        let mut guard = self.write()?;
        let state = &mut *guard;

        let (value, undo) = mutate(&mut state.entities)?;

        let mut unit = SyncUnit::new(&state.entities, &mut state.refs);
        let staged = sync(&mut unit, &value);
        let (batch, journal) = unit.finish();

        let applied = staged.and_then(|()| {
            log::debug!("Applying {} index operations", batch.len());
            self.index.apply(batch)
        });
        if let Err(err) = applied {
            log::warn!("Index update failed, rolling back: {err}");
            journal.rollback(&mut state.refs);
            state.entities.rollback(undo);
            return Err(err);
        }
        Ok(value)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| Error::store_unavailable("library lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| Error::store_unavailable("library lock poisoned"))
    }
}

fn set_association(record: &mut Metadata, owner: TaggedRef, change: Association) {
    let set = match owner.kind {
        EntityKind::Author => &mut record.author_ids,
        _ => &mut record.publisher_ids,
    };
    match change {
        Association::Added => {
            set.insert(owner.id);
        }
        Association::Removed => {
            set.remove(&owner.id);
        }
    }
}

#[async_trait]
impl<S: SearchIndexStore> SearchBackend for Library<S> {
    async fn search(&self, params: SearchParams) -> Result<SearchResults> {
        self.search_blocking(&params)
    }

    fn name(&self) -> &str {
        self.index.name()
    }
}

impl<S: SearchIndexStore> std::fmt::Debug for Library<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("index", &self.index.name())
            .field("engine", &self.engine)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
