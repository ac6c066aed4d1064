//! Tantivy schema for the search index.
//!
//! # Schema Fields
//!
//! ## Identity Fields
//! - `ref`: Tagged reference `kind:id`, the delete/lookup key (STRING | STORED)
//! - `kind`: Entity kind name, scopes negations and BM25 statistics (STRING)
//! - `id`: Numeric entity id, breaks score ties (STORED)
//! - `language`: Analyzer language the body was tokenized with (STORED)
//!
//! ## Body Fields
//! - `body_<kind>`: One per entity kind, holding the pre-tokenized
//!   `text_content` with positions for phrase queries (indexed | STORED)
//!
//! Bodies arrive pre-tokenized by the document's own language analyzer, so
//! each kind's field carries its own term dictionary and length statistics.

use passim_core::EntityKind;
use tantivy::Index;
use tantivy::schema::{
    Field, IndexRecordOption, STORED, STRING, Schema, SchemaBuilder, TextFieldIndexing,
    TextOptions,
};

use crate::analyzer::{Analyzer, SIMPLE_LANGUAGE_TAG};

/// Typed handles to the search index fields.
#[derive(Clone)]
pub struct IndexSchema {
    schema: Schema,

    /// Tagged reference, rendered `kind:id`.
    pub tagged_ref: Field,
    /// Entity kind name.
    pub kind: Field,
    /// Entity id.
    pub id: Field,
    /// Analyzer language tag.
    pub language: Field,

    body_passage: Field,
    body_author: Field,
    body_title: Field,
    body_publisher: Field,
    body_language: Field,
    body_metadata: Field,
}

impl IndexSchema {
    /// Builds the schema with one body field per entity kind.
    pub fn build() -> Self {
        let mut builder = SchemaBuilder::new();

        let body_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(SIMPLE_LANGUAGE_TAG)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();

        let tagged_ref = builder.add_text_field("ref", STRING | STORED);
        let kind = builder.add_text_field("kind", STRING);
        let id = builder.add_u64_field("id", STORED);
        let language = builder.add_text_field("language", STORED);

        let mut body = |kind: EntityKind| {
            builder.add_text_field(&format!("body_{}", kind.name()), body_options.clone())
        };
        let body_passage = body(EntityKind::Passage);
        let body_author = body(EntityKind::Author);
        let body_title = body(EntityKind::Title);
        let body_publisher = body(EntityKind::Publisher);
        let body_language = body(EntityKind::Language);
        let body_metadata = body(EntityKind::Metadata);

        Self {
            schema: builder.build(),
            tagged_ref,
            kind,
            id,
            language,
            body_passage,
            body_author,
            body_title,
            body_publisher,
            body_language,
            body_metadata,
        }
    }

    /// The underlying tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Body field of `kind`.
    pub fn body(&self, kind: EntityKind) -> Field {
        match kind {
            EntityKind::Passage => self.body_passage,
            EntityKind::Author => self.body_author,
            EntityKind::Title => self.body_title,
            EntityKind::Publisher => self.body_publisher,
            EntityKind::Language => self.body_language,
            EntityKind::Metadata => self.body_metadata,
        }
    }

    /// Registers the tokenizer named by the body fields.
    ///
    /// Documents are indexed pre-tokenized; the registered analyzer is what
    /// tantivy falls back on for anything it tokenizes itself.
    pub fn register_tokenizers(index: &Index) {
        index
            .tokenizers()
            .register(SIMPLE_LANGUAGE_TAG, Analyzer::simple().text_analyzer());
    }
}

impl std::fmt::Debug for IndexSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexSchema")
            .field("fields", &self.schema.fields().count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
