//! Text projection: the flat, searchable text of an entity.
//!
//! Every entity variant implements [`Projectable`]. A metadata record is
//! projected through a [`MetadataView`], which carries the record together
//! with its shallow relations resolved from an
//! [`EntityStore`](crate::store::EntityStore). Projection itself is pure: the
//! same view always yields the same [`Projection`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{
    Author, Entity, EntityKind, Language, Metadata, Passage, Publisher, TaggedRef, Title,
};

/// Language tag used when an entity carries no language of its own.
pub const DEFAULT_LANGUAGE_TAG: &str = "english";

/// Flattened text of an entity plus the language it should be analyzed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// Space-joined searchable text.
    pub text_content: String,
    /// Analyzer language tag, e.g. `english` or `german`.
    pub language_tag: String,
}

impl Projection {
    /// Creates a projection under the default language tag.
    pub fn new(text_content: impl Into<String>) -> Self {
        Self {
            text_content: text_content.into(),
            language_tag: DEFAULT_LANGUAGE_TAG.to_string(),
        }
    }

    /// Overrides the language tag.
    pub fn with_language(mut self, language_tag: impl Into<String>) -> Self {
        self.language_tag = language_tag.into();
        self
    }
}

/// Capability of producing a [`Projection`].
pub trait Projectable {
    /// Projects `self` to searchable text.
    fn project(&self) -> Projection;
}

/// Joins the non-empty segments with single spaces.
fn join_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Projectable for Passage {
    fn project(&self) -> Projection {
        Projection::new(self.text.clone())
    }
}

impl Projectable for Author {
    fn project(&self) -> Projection {
        Projection::new(join_segments([
            self.first_name.as_str(),
            self.last_name.as_deref().unwrap_or_default(),
            self.alternate_name.as_deref().unwrap_or_default(),
        ]))
    }
}

impl Projectable for Title {
    fn project(&self) -> Projection {
        Projection::new(self.title.clone())
    }
}

impl Projectable for Publisher {
    fn project(&self) -> Projection {
        Projection::new(self.name.clone())
    }
}

impl Projectable for Language {
    fn project(&self) -> Projection {
        Projection::new(join_segments([self.name.as_str(), self.code.as_str()]))
    }
}

// ============================================================================
// MetadataView
// ============================================================================

/// A metadata record with its shallow relations resolved.
///
/// Relations that did not resolve are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataView {
    /// The record itself.
    pub record: Metadata,
    /// Resolved title.
    pub title: Option<Title>,
    /// Resolved language.
    pub language: Option<Language>,
    /// Resolved passage.
    pub passage: Option<Passage>,
    /// Resolved authors, ascending by id.
    pub authors: Vec<Author>,
    /// Resolved publishers, ascending by id.
    pub publishers: Vec<Publisher>,
}

impl MetadataView {
    /// Creates a view with no resolved relations.
    pub fn new(record: Metadata) -> Self {
        Self {
            record,
            ..Default::default()
        }
    }

    /// Language tag for this record: the linked language's lower-cased name,
    /// or [`DEFAULT_LANGUAGE_TAG`].
    pub fn language_tag(&self) -> String {
        self.language
            .as_ref()
            .map(|l| l.name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| DEFAULT_LANGUAGE_TAG.to_string())
    }
}

impl Projectable for MetadataView {
    fn project(&self) -> Projection {
        let mut authors: Vec<&Author> = self.authors.iter().collect();
        authors.sort_by_key(|a| a.id);
        let mut publishers: Vec<&Publisher> = self.publishers.iter().collect();
        publishers.sort_by_key(|p| p.id);

        let author_texts: Vec<String> = authors.iter().map(|a| a.project().text_content).collect();

        let mut segments: Vec<&str> = Vec::new();
        if let Some(title) = &self.title {
            segments.push(&title.title);
        }
        if let Some(identifier) = &self.record.identifier {
            segments.push(identifier);
        }
        if let Some(edition) = &self.record.edition {
            segments.push(edition);
        }
        segments.extend(author_texts.iter().map(String::as_str));
        segments.extend(publishers.iter().map(|p| p.name.as_str()));
        if let Some(passage) = &self.passage {
            segments.push(&passage.text);
        }

        Projection::new(join_segments(segments)).with_language(self.language_tag())
    }
}

impl fmt::Display for MetadataView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => f.write_str(&title.title),
            None => self.record.fmt(f),
        }
    }
}

// ============================================================================
// EntityView
// ============================================================================

/// An entity ready for projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityView {
    /// A passage.
    Passage(Passage),
    /// An author.
    Author(Author),
    /// A title.
    Title(Title),
    /// A publisher.
    Publisher(Publisher),
    /// A language.
    Language(Language),
    /// A metadata record with resolved relations.
    Metadata(MetadataView),
}

impl EntityView {
    /// Kind of the viewed entity.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Passage(_) => EntityKind::Passage,
            Self::Author(_) => EntityKind::Author,
            Self::Title(_) => EntityKind::Title,
            Self::Publisher(_) => EntityKind::Publisher,
            Self::Language(_) => EntityKind::Language,
            Self::Metadata(_) => EntityKind::Metadata,
        }
    }

    /// Tagged reference to the viewed entity.
    pub fn tagged_ref(&self) -> TaggedRef {
        let id = match self {
            Self::Passage(e) => e.id,
            Self::Author(e) => e.id,
            Self::Title(e) => e.id,
            Self::Publisher(e) => e.id,
            Self::Language(e) => e.id,
            Self::Metadata(view) => view.record.id,
        };
        TaggedRef::new(self.kind(), id)
    }

    /// Wraps a leaf entity. Metadata gets a view with nothing resolved.
    pub fn shallow(entity: Entity) -> Self {
        match entity {
            Entity::Passage(e) => Self::Passage(e),
            Entity::Author(e) => Self::Author(e),
            Entity::Title(e) => Self::Title(e),
            Entity::Publisher(e) => Self::Publisher(e),
            Entity::Language(e) => Self::Language(e),
            Entity::Metadata(e) => Self::Metadata(MetadataView::new(e)),
        }
    }
}

impl Projectable for EntityView {
    fn project(&self) -> Projection {
        match self {
            Self::Passage(e) => e.project(),
            Self::Author(e) => e.project(),
            Self::Title(e) => e.project(),
            Self::Publisher(e) => e.project(),
            Self::Language(e) => e.project(),
            Self::Metadata(e) => e.project(),
        }
    }
}

/// Projects a view. Total over every variant.
pub fn project(view: &EntityView) -> Projection {
    view.project()
}

// ============================================================================
// Tests
// ============================================================================
