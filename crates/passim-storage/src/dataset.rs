//! JSON entity snapshots.
//!
//! A [`Dataset`] holds one array per kind with explicit ids, e.g.
//!
//! ```json
//! {
//!   "passages": [{"id": 1, "text": "Call me Ishmael"}],
//!   "authors": [{"id": 1, "first_name": "Herman", "last_name": "Melville"}],
//!   "metadata": [{"id": 1, "passage_id": 1, "author_ids": [1]}]
//! }
//! ```
//!
//! Missing arrays are empty.

use std::path::Path;

use passim_core::{
    Author, Entity, EntityKind, Error, Language, Metadata, Passage, Publisher, Result, Title,
};
use serde::{Deserialize, Serialize};

use crate::memory::MemoryEntityStore;

/// A snapshot of every entity, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Languages.
    #[serde(default)]
    pub languages: Vec<Language>,
    /// Titles.
    #[serde(default)]
    pub titles: Vec<Title>,
    /// Publishers.
    #[serde(default)]
    pub publishers: Vec<Publisher>,
    /// Authors.
    #[serde(default)]
    pub authors: Vec<Author>,
    /// Passages.
    #[serde(default)]
    pub passages: Vec<Passage>,
    /// Metadata records.
    #[serde(default)]
    pub metadata: Vec<Metadata>,
}

impl Dataset {
    /// Parses a dataset from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a dataset from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        Self::from_json(&content)
    }

    /// Serializes as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshot of everything in `store`.
    pub fn from_store(store: &MemoryEntityStore) -> Self {
        let mut dataset = Self::default();
        for kind in EntityKind::ALL {
            for entity in store.all(kind) {
                dataset.push(entity);
            }
        }
        dataset
    }

    /// Adds one entity to the array for its kind.
    pub fn push(&mut self, entity: impl Into<Entity>) {
        match entity.into() {
            Entity::Passage(p) => self.passages.push(p),
            Entity::Author(a) => self.authors.push(a),
            Entity::Title(t) => self.titles.push(t),
            Entity::Publisher(p) => self.publishers.push(p),
            Entity::Language(l) => self.languages.push(l),
            Entity::Metadata(m) => self.metadata.push(m),
        }
    }

    /// Total number of entities.
    pub fn len(&self) -> usize {
        self.languages.len()
            + self.titles.len()
            + self.publishers.len()
            + self.authors.len()
            + self.passages.len()
            + self.metadata.len()
    }

    /// Whether the dataset holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entity, with metadata after everything it can reference.
    pub fn into_entities(self) -> impl Iterator<Item = Entity> {
        self.languages
            .into_iter()
            .map(Entity::from)
            .chain(self.titles.into_iter().map(Entity::from))
            .chain(self.publishers.into_iter().map(Entity::from))
            .chain(self.authors.into_iter().map(Entity::from))
            .chain(self.passages.into_iter().map(Entity::from))
            .chain(self.metadata.into_iter().map(Entity::from))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use passim_core::EntityId;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "passages": [{"id": 1, "text": "Call me Ishmael"}],
        "authors": [{"id": 3, "first_name": "Herman", "last_name": "Melville"}],
        "metadata": [{"id": 1, "passage_id": 1, "author_ids": [3]}]
    }"#;

    #[test]
    fn test_from_json_defaults_missing_arrays() {
        let dataset = Dataset::from_json(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(dataset.titles.is_empty());
        assert_eq!(dataset.authors[0].id, EntityId(3));
        assert!(dataset.metadata[0].author_ids.contains(&EntityId(3)));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Dataset::from_json("{not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_into_entities_puts_metadata_last() {
        let dataset = Dataset::from_json(SAMPLE).unwrap();
        let kinds: Vec<EntityKind> = dataset.into_entities().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Author, EntityKind::Passage, EntityKind::Metadata]
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.passages[0].text, "Call me Ishmael");
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = Dataset::load(Path::new("/nonexistent/passim.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/passim.json"));
    }

    #[test]
    fn test_from_store_round_trips_through_json() {
        let mut store = MemoryEntityStore::new();
        let _ = store.insert(Passage::new("Call me Ishmael")).unwrap();
        let _ = store.insert(Title::new("Moby-Dick")).unwrap();

        let dataset = Dataset::from_store(&store);
        let parsed = Dataset::from_json(&dataset.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, dataset);
        assert_eq!(parsed.len(), 2);
    }
}
