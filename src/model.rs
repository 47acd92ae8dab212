//! Index and namespace model shared across the analysis pipeline.
//!
//! All types here are immutable inputs: indexes describe stored metadata,
//! sort keys describe the query's ordering requirement, and a namespace
//! names the collection whose indexes are consulted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoverageError;

/// Traversal direction of one index or sort component.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending key order.
    Ascending,
    /// Descending key order.
    Descending,
}

impl Direction {
    /// Maps the wire-format integer token (`1` / `-1`) onto a direction.
    ///
    /// Non-negative tokens mean ascending, mirroring how index key documents
    /// encode direction.
    pub fn from_token(token: i64) -> Self {
        if token >= 0 {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    }

    /// Returns the opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => write!(f, "1"),
            Direction::Descending => write!(f, "-1"),
        }
    }
}

/// One component of a compound index key.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct IndexField {
    /// Field path (may be dotted for nested documents).
    pub name: String,
    /// Declared key order for this component.
    pub direction: Direction,
}

impl IndexField {
    /// Creates an index field from a name and direction.
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }

    /// Creates an index field from a name and a `1`/`-1` direction token.
    pub fn from_token(name: impl Into<String>, token: i64) -> Self {
        Self::new(name, Direction::from_token(token))
    }
}

/// A B-tree index over a collection.
///
/// Field order is the compound prefix order and is semantically significant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Index name as reported by the server.
    pub name: String,
    /// Ordered key components; never empty.
    pub fields: Vec<IndexField>,
}

impl Index {
    /// Creates an index from a name and its ordered key components.
    pub fn new(name: impl Into<String>, fields: Vec<IndexField>) -> Self {
        debug_assert!(!fields.is_empty(), "index must have at least one field");
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Whether this index has more than one key component.
    pub fn is_compound(&self) -> bool {
        self.fields.len() > 1
    }

    /// Whether any key component references the given field path.
    pub fn covers_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Position of the first key component with the given name.
    pub fn field_position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// One component of a query's ordering requirement.
///
/// Structurally identical to [`IndexField`] but kept distinct: sort keys are
/// query input, index fields are stored metadata.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    /// Field path to order by.
    pub name: String,
    /// Requested output order.
    pub direction: Direction,
}

impl SortKey {
    /// Creates a sort key from a name and direction.
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }
}

/// A `database.collection` pair identifying one collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    database: String,
    collection: String,
}

impl Namespace {
    /// Parses the textual `<database>.<collection>` form.
    ///
    /// Exactly one `.` separator is required and both sides must be non-empty
    /// after trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, CoverageError> {
        let invalid = || CoverageError::InvalidNamespace {
            namespace: raw.to_owned(),
        };
        let (database, collection) = raw.split_once('.').ok_or_else(invalid)?;
        if collection.contains('.') {
            return Err(invalid());
        }
        let database = database.trim();
        let collection = collection.trim();
        if database.is_empty() || collection.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            database: database.to_owned(),
            collection: collection.to_owned(),
        })
    }

    /// Database part of the namespace.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Collection part of the namespace.
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}
