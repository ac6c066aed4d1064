//! Entity model for the bibliographic passage graph.
//!
//! Six entity kinds make up the graph. [`Passage`] holds the searchable text,
//! [`Metadata`] ties a passage to its bibliographic description, and
//! [`Author`], [`Title`], [`Publisher`] and [`Language`] are leaf records that
//! a metadata record references.
//!
//! ```text
//!            ┌────────── Title (0..1)
//!            ├────────── Language (0..1)
//!  Metadata ─┼────────── Passage (0..1, at most one Metadata per Passage)
//!            ├────────── Author (0..n)
//!            └────────── Publisher (0..n)
//! ```
//!
//! Every entity is addressed by a [`TaggedRef`], an explicit `(kind, id)`
//! pair used by the search index and the reverse-reference index alike.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================================================
// EntityKind
// ============================================================================

/// The closed set of entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A text passage.
    Passage,
    /// A person credited on a passage.
    Author,
    /// A work title.
    Title,
    /// A publishing house.
    Publisher,
    /// A natural language (ISO 639-1).
    Language,
    /// The bibliographic record describing a passage.
    Metadata,
}

impl EntityKind {
    /// All kinds, leaf kinds first and [`EntityKind::Metadata`] last.
    ///
    /// Rebuilds walk kinds in this order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Passage,
        EntityKind::Author,
        EntityKind::Title,
        EntityKind::Publisher,
        EntityKind::Language,
        EntityKind::Metadata,
    ];

    /// Lowercase name used in tagged references and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Passage => "passage",
            Self::Author => "author",
            Self::Title => "title",
            Self::Publisher => "publisher",
            Self::Language => "language",
            Self::Metadata => "metadata",
        }
    }

    /// Whether metadata records can reference entities of this kind.
    pub fn is_relation_owner(&self) -> bool {
        !matches!(self, Self::Metadata)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| Error::not_indexable(s.trim()))
    }
}

// ============================================================================
// EntityId / TaggedRef
// ============================================================================

/// Numeric identity of an entity within its kind.
///
/// `EntityId(0)` is never assigned by a store; records built in memory carry
/// it until the store gives them an identity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Placeholder for records that have not been stored yet.
    pub const UNASSIGNED: EntityId = EntityId(0);

    /// Returns the raw id.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Whether a store has assigned this id.
    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// An explicit `(kind, id)` reference to any indexable entity.
///
/// Rendered and parsed as `kind:id`, e.g. `passage:42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaggedRef {
    /// Entity kind.
    pub kind: EntityKind,
    /// Entity id within the kind.
    pub id: EntityId,
}

impl TaggedRef {
    /// Creates a tagged reference.
    pub fn new(kind: EntityKind, id: impl Into<EntityId>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Shorthand for a passage reference.
    pub fn passage(id: impl Into<EntityId>) -> Self {
        Self::new(EntityKind::Passage, id)
    }

    /// Shorthand for a metadata reference.
    pub fn metadata(id: impl Into<EntityId>) -> Self {
        Self::new(EntityKind::Metadata, id)
    }
}

impl fmt::Display for TaggedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl FromStr for TaggedRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| Error::operation(format!("Malformed tagged reference '{s}'")))?;
        let kind: EntityKind = kind.parse()?;
        let id: u64 = id
            .trim()
            .parse()
            .map_err(|e| Error::operation(format!("Malformed id in '{s}': {e}")))?;
        Ok(Self::new(kind, id))
    }
}

// ============================================================================
// Leaf records
// ============================================================================

/// A text passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Store-assigned id.
    #[serde(default)]
    pub id: EntityId,
    /// Full passage text (unique across passages).
    pub text: String,
}

impl Passage {
    /// Creates an unsaved passage.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            text: text.into(),
        }
    }

    /// Length of the passage text in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the passage text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Passage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW_CHARS: usize = 50;
        let preview: String = self.text.chars().take(PREVIEW_CHARS).collect();
        if self.text.chars().count() > PREVIEW_CHARS {
            write!(f, "{preview}...")
        } else {
            f.write_str(&preview)
        }
    }
}

/// A person credited on a passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Store-assigned id.
    #[serde(default)]
    pub id: EntityId,
    /// Given name.
    pub first_name: String,
    /// Family name. `(first_name, last_name)` is unique.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Pen name or transliteration.
    #[serde(default)]
    pub alternate_name: Option<String>,
}

impl Author {
    /// Creates an unsaved author with only a first name.
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            first_name: first_name.into(),
            last_name: None,
            alternate_name: None,
        }
    }

    /// Sets the last name.
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Sets the alternate name.
    pub fn with_alternate_name(mut self, alternate_name: impl Into<String>) -> Self {
        self.alternate_name = Some(alternate_name.into());
        self
    }

    /// `"last, first"` when a last name is present, otherwise the first name.
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref().filter(|l| !l.is_empty()) {
            Some(last) => format!("{last}, {}", self.first_name),
            None => self.first_name.clone(),
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// A work title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Store-assigned id.
    #[serde(default)]
    pub id: EntityId,
    /// The title string (unique).
    pub title: String,
}

impl Title {
    /// Creates an unsaved title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            title: title.into(),
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A publishing house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    /// Store-assigned id.
    #[serde(default)]
    pub id: EntityId,
    /// Publisher name (unique).
    pub name: String,
}

impl Publisher {
    /// Creates an unsaved publisher.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: name.into(),
        }
    }
}

impl fmt::Display for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A natural language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Store-assigned id.
    #[serde(default)]
    pub id: EntityId,
    /// English name of the language, e.g. `German`.
    pub name: String,
    /// ISO 639-1 two-letter code, e.g. `de` (unique).
    pub code: String,
}

impl Language {
    /// Creates an unsaved language.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: name.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Publication status of a metadata record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    /// Not yet published.
    Draft,
    /// Published (the default).
    #[default]
    Published,
    /// Withdrawn or archived.
    Archived,
    /// Status not recorded.
    Unknown,
}

/// Bibliographic record describing (at most) one passage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Store-assigned id.
    #[serde(default)]
    pub id: EntityId,
    /// Edition string, e.g. `2nd`.
    #[serde(default)]
    pub edition: Option<String>,
    /// Publication date.
    #[serde(default)]
    pub publish_date: Option<NaiveDate>,
    /// Publication status.
    #[serde(default)]
    pub publication_status: PublicationStatus,
    /// ISBN, DOI or other identifier.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Credited authors.
    #[serde(default)]
    pub author_ids: BTreeSet<EntityId>,
    /// Work title.
    #[serde(default)]
    pub title_id: Option<EntityId>,
    /// Described passage.
    #[serde(default)]
    pub passage_id: Option<EntityId>,
    /// Publishers.
    #[serde(default)]
    pub publisher_ids: BTreeSet<EntityId>,
    /// Language of the passage.
    #[serde(default)]
    pub language_id: Option<EntityId>,
}

impl Metadata {
    /// Creates an empty, unsaved metadata record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Links the described passage.
    pub fn with_passage(mut self, id: impl Into<EntityId>) -> Self {
        self.passage_id = Some(id.into());
        self
    }

    /// Links the title.
    pub fn with_title(mut self, id: impl Into<EntityId>) -> Self {
        self.title_id = Some(id.into());
        self
    }

    /// Links the language.
    pub fn with_language(mut self, id: impl Into<EntityId>) -> Self {
        self.language_id = Some(id.into());
        self
    }

    /// Adds an author.
    pub fn with_author(mut self, id: impl Into<EntityId>) -> Self {
        self.author_ids.insert(id.into());
        self
    }

    /// Adds a publisher.
    pub fn with_publisher(mut self, id: impl Into<EntityId>) -> Self {
        self.publisher_ids.insert(id.into());
        self
    }

    /// Sets the identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the edition.
    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = Some(edition.into());
        self
    }

    /// Every entity this record references, as tagged references.
    pub fn relation_owners(&self) -> BTreeSet<TaggedRef> {
        let mut owners = BTreeSet::new();
        owners.extend(
            self.author_ids
                .iter()
                .map(|id| TaggedRef::new(EntityKind::Author, *id)),
        );
        owners.extend(
            self.publisher_ids
                .iter()
                .map(|id| TaggedRef::new(EntityKind::Publisher, *id)),
        );
        if let Some(id) = self.title_id {
            owners.insert(TaggedRef::new(EntityKind::Title, id));
        }
        if let Some(id) = self.language_id {
            owners.insert(TaggedRef::new(EntityKind::Language, id));
        }
        if let Some(id) = self.passage_id {
            owners.insert(TaggedRef::new(EntityKind::Passage, id));
        }
        owners
    }

    /// Drops any reference to `owner`. Returns whether anything changed.
    pub fn detach(&mut self, owner: TaggedRef) -> bool {
        match owner.kind {
            EntityKind::Author => self.author_ids.remove(&owner.id),
            EntityKind::Publisher => self.publisher_ids.remove(&owner.id),
            EntityKind::Title => clear_if(&mut self.title_id, owner.id),
            EntityKind::Language => clear_if(&mut self.language_id, owner.id),
            EntityKind::Passage => clear_if(&mut self.passage_id, owner.id),
            EntityKind::Metadata => false,
        }
    }
}

fn clear_if(slot: &mut Option<EntityId>, id: EntityId) -> bool {
    if *slot == Some(id) {
        *slot = None;
        true
    } else {
        false
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.identifier, self.passage_id) {
            (Some(identifier), _) => f.write_str(identifier),
            (None, Some(passage)) => write!(f, "Metadata for passage {passage}"),
            (None, None) => write!(f, "Metadata {}", self.id),
        }
    }
}

// ============================================================================
// Entity
// ============================================================================

/// Any entity in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
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
    /// A metadata record.
    Metadata(Metadata),
}

impl Entity {
    /// Kind of this entity.
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

    /// Id of this entity.
    pub fn id(&self) -> EntityId {
        match self {
            Self::Passage(e) => e.id,
            Self::Author(e) => e.id,
            Self::Title(e) => e.id,
            Self::Publisher(e) => e.id,
            Self::Language(e) => e.id,
            Self::Metadata(e) => e.id,
        }
    }

    /// Overwrites the id (used by stores when assigning identity).
    pub fn set_id(&mut self, id: EntityId) {
        match self {
            Self::Passage(e) => e.id = id,
            Self::Author(e) => e.id = id,
            Self::Title(e) => e.id = id,
            Self::Publisher(e) => e.id = id,
            Self::Language(e) => e.id = id,
            Self::Metadata(e) => e.id = id,
        }
    }

    /// Tagged reference to this entity.
    pub fn tagged_ref(&self) -> TaggedRef {
        TaggedRef::new(self.kind(), self.id())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passage(e) => e.fmt(f),
            Self::Author(e) => e.fmt(f),
            Self::Title(e) => e.fmt(f),
            Self::Publisher(e) => e.fmt(f),
            Self::Language(e) => e.fmt(f),
            Self::Metadata(e) => e.fmt(f),
        }
    }
}

macro_rules! entity_conversions {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Entity {
                fn from(value: $variant) -> Self {
                    Entity::$variant(value)
                }
            }

            impl TryFrom<Entity> for $variant {
                type Error = Entity;

                fn try_from(entity: Entity) -> Result<Self, Self::Error> {
                    match entity {
                        Entity::$variant(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

entity_conversions!(Passage, Author, Title, Publisher, Language, Metadata);

// ============================================================================
// Tests
// ============================================================================
