//! Query execution.
//!
//! [`QueryEngine::execute`] runs a request end to end:
//!
//! 1. parse and compile the query under the request language
//! 2. rank entries of the requested kind in the index store
//! 3. when searching passages, fold metadata hits into their passages
//! 4. highlight each hit's stored text
//! 5. resolve hits to entities, dropping references that no longer resolve
//!
//! The engine holds only configuration. Callers pass the entity store and
//! the index store they are holding a consistent view of.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use passim_core::{Entity, EntityId, EntityKind, EntityStore, Result, TaggedRef};
use passim_fts::{
    CompiledQuery, HighlightOptions, RankedEntry, SearchConfig, SearchIndexStore, analyzer,
    highlight, query,
};

use crate::backend::{SearchHit, SearchParams, SearchResults};

/// Executes search requests against an index store.
#[derive(Clone, Default)]
pub struct QueryEngine {
    config: SearchConfig,
    highlight: HighlightOptions,
}

impl QueryEngine {
    /// Creates an engine falling back on `config` for unset request fields.
    pub fn new(config: SearchConfig) -> Self {
        let highlight = HighlightOptions::from(&config);
        Self { config, highlight }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs `params` against `index`, resolving hits through `store`.
    pub fn execute(
        &self,
        params: &SearchParams,
        store: &dyn EntityStore,
        index: &dyn SearchIndexStore,
    ) -> Result<SearchResults> {
        if params.query.trim().is_empty() {
            return Ok(SearchResults::empty(index.name()));
        }

        let language = params
            .language
            .as_deref()
            .unwrap_or(&self.config.default_language);
        let analyzer = analyzer::analyzer(language);
        let Some(compiled) = query::compile(&params.query, &analyzer) else {
            log::debug!("Query '{}' compiled to nothing", params.query);
            return Ok(SearchResults::empty(index.name()));
        };

        let kind = params.kind.unwrap_or(self.config.default_kind);
        let expand = params.expand_metadata.unwrap_or(self.config.expand_metadata);

        let ranked = if kind == EntityKind::Passage && expand {
            self.ranked_with_expansion(&compiled, store, index)?
        } else {
            index.query(kind, &compiled)?
        };
        log::debug!(
            "Query '{}' on {kind} ({language}): {} ranked entries",
            params.query,
            ranked.len()
        );

        let lexemes = compiled.positive_lexemes();
        let mut items = self.resolve(kind, ranked, store, |text| {
            highlight(text, &lexemes, &analyzer, &self.highlight)
        })?;

        let total = items.len();
        if let Some(limit) = params.limit.or(self.config.default_limit) {
            items.truncate(limit);
        }

        Ok(SearchResults {
            items,
            total,
            backend: index.name().to_string(),
        })
    }

    /// Passage hits merged with metadata hits attributed to their passages.
    ///
    /// A passage found both ways keeps the higher score and that entry's
    /// text; on a tie the passage's own entry wins.
    fn ranked_with_expansion(
        &self,
        compiled: &CompiledQuery,
        store: &dyn EntityStore,
        index: &dyn SearchIndexStore,
    ) -> Result<Vec<RankedEntry>> {
        let mut merged: BTreeMap<EntityId, RankedEntry> = index
            .query(EntityKind::Passage, compiled)?
            .into_iter()
            .map(|entry| (entry.tagged_ref.id, entry))
            .collect();

        let metadata_hits = index.query(EntityKind::Metadata, compiled)?;
        if !metadata_hits.is_empty() {
            let ids: Vec<EntityId> = metadata_hits.iter().map(|e| e.tagged_ref.id).collect();
            let passage_of: HashMap<EntityId, EntityId> = store
                .get_many(EntityKind::Metadata, &ids)?
                .into_iter()
                .filter_map(|entity| match entity {
                    Entity::Metadata(record) => record.passage_id.map(|p| (record.id, p)),
                    _ => None,
                })
                .collect();

            for hit in metadata_hits {
                let Some(&passage_id) = passage_of.get(&hit.tagged_ref.id) else {
                    continue;
                };
                let attributed = RankedEntry {
                    tagged_ref: TaggedRef::passage(passage_id),
                    ..hit
                };
                match merged.get(&passage_id) {
                    Some(existing) if existing.rank_score >= attributed.rank_score => {}
                    _ => {
                        merged.insert(passage_id, attributed);
                    }
                }
            }
        }

        let mut ranked: Vec<RankedEntry> = merged.into_values().collect();
        sort_ranked(&mut ranked);
        Ok(ranked)
    }

    /// Looks up every ranked entry with one `get_many`, keeping rank order.
    fn resolve<F>(
        &self,
        kind: EntityKind,
        ranked: Vec<RankedEntry>,
        store: &dyn EntityStore,
        snippet: F,
    ) -> Result<Vec<SearchHit>>
    where
        F: Fn(&str) -> String,
    {
        if ranked.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<EntityId> = ranked.iter().map(|e| e.tagged_ref.id).collect();
        let mut entities: HashMap<EntityId, Entity> = store
            .get_many(kind, &ids)?
            .into_iter()
            .map(|entity| (entity.id(), entity))
            .collect();

        let mut stale = BTreeSet::new();
        let hits = ranked
            .into_iter()
            .filter_map(|entry| match entities.remove(&entry.tagged_ref.id) {
                Some(entity) => Some(SearchHit {
                    entity_ref: entry.tagged_ref,
                    rank_score: entry.rank_score,
                    highlighted_snippet: snippet(&entry.text_content),
                    entity,
                }),
                None => {
                    stale.insert(entry.tagged_ref);
                    None
                }
            })
            .collect();

        for tagged_ref in stale {
            log::warn!("Index entry {tagged_ref} does not resolve to an entity, skipping");
        }
        Ok(hits)
    }
}

/// Score descending, then id ascending.
fn sort_ranked(entries: &mut [RankedEntry]) {
    entries.sort_by(|a, b| {
        b.rank_score
            .total_cmp(&a.rank_score)
            .then_with(|| a.tagged_ref.id.cmp(&b.tagged_ref.id))
    });
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("default_language", &self.config.default_language)
            .field("default_kind", &self.config.default_kind)
            .field("default_limit", &self.config.default_limit)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
