//! Read access to the entity graph.
//!
//! The synchronizer and the query engine only ever read entities; writes go
//! through the mutation service that owns the concrete store. Reads are
//! fallible so that a store backed by external resources can report
//! [`Error::StoreUnavailable`](crate::Error::StoreUnavailable).

use crate::Result;
use crate::entity::{
    Author, Entity, EntityId, EntityKind, Language, Metadata, Passage, Publisher, TaggedRef,
    Title,
};
use crate::projector::{EntityView, MetadataView};

/// Read-only view of the entity graph.
pub trait EntityStore: Send + Sync {
    /// Fetches one entity, or `None` if it does not exist.
    fn get(&self, tagged_ref: TaggedRef) -> Result<Option<Entity>>;

    /// Fetches every existing entity of `kind` among `ids`, in the order of
    /// `ids`. Missing ids are skipped.
    fn get_many(&self, kind: EntityKind, ids: &[EntityId]) -> Result<Vec<Entity>>;

    /// All ids of `kind`, ascending.
    fn ids(&self, kind: EntityKind) -> Result<Vec<EntityId>>;

    /// The metadata record linked to `passage_id`, if any.
    fn metadata_for_passage(&self, passage_id: EntityId) -> Result<Option<Metadata>>;

    /// Whether the entity exists.
    fn contains(&self, tagged_ref: TaggedRef) -> Result<bool> {
        Ok(self.get(tagged_ref)?.is_some())
    }

    /// Loads an entity ready for projection, resolving metadata relations.
    fn view(&self, tagged_ref: TaggedRef) -> Result<Option<EntityView>> {
        match self.get(tagged_ref)? {
            Some(Entity::Metadata(record)) => {
                Ok(Some(EntityView::Metadata(self.metadata_view(record)?)))
            }
            Some(entity) => Ok(Some(EntityView::shallow(entity))),
            None => Ok(None),
        }
    }

    /// Resolves the shallow relations of a metadata record.
    fn metadata_view(&self, record: Metadata) -> Result<MetadataView> {
        let title = match record.title_id {
            Some(id) => self
                .get(TaggedRef::new(EntityKind::Title, id))?
                .and_then(|e| Title::try_from(e).ok()),
            None => None,
        };
        let language = match record.language_id {
            Some(id) => self
                .get(TaggedRef::new(EntityKind::Language, id))?
                .and_then(|e| Language::try_from(e).ok()),
            None => None,
        };
        let passage = match record.passage_id {
            Some(id) => self
                .get(TaggedRef::passage(id))?
                .and_then(|e| Passage::try_from(e).ok()),
            None => None,
        };

        let author_ids: Vec<EntityId> = record.author_ids.iter().copied().collect();
        let authors = self
            .get_many(EntityKind::Author, &author_ids)?
            .into_iter()
            .filter_map(|e| Author::try_from(e).ok())
            .collect();

        let publisher_ids: Vec<EntityId> = record.publisher_ids.iter().copied().collect();
        let publishers = self
            .get_many(EntityKind::Publisher, &publisher_ids)?
            .into_iter()
            .filter_map(|e| Publisher::try_from(e).ok())
            .collect();

        Ok(MetadataView {
            record,
            title,
            language,
            passage,
            authors,
            publishers,
        })
    }
}
