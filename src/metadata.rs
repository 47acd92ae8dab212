//! Index metadata resolution for the coverage driver.
//!
//! The driver never talks to a server itself; it consumes index lists
//! through the [`IndexSource`] boundary. Embedders wire in whatever backs
//! their deployment: a live catalog adapter, a fixture, or a caching
//! decorator such as [`crate::cache::CachedIndexSource`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{CoverageError, Result};
use crate::model::{Index, Namespace};

/// Provides the B-tree indexes declared on a collection.
///
/// Implementations must be safe for concurrent lookup. Returning
/// [`CoverageError::NotFound`] and returning an empty list are equivalent
/// from the driver's perspective; both mean nothing can be covered.
pub trait IndexSource {
    /// Returns the indexes of the named collection.
    fn lookup(&self, namespace: &Namespace) -> Result<Vec<Index>>;
}

impl<S: IndexSource + ?Sized> IndexSource for &S {
    fn lookup(&self, namespace: &Namespace) -> Result<Vec<Index>> {
        (**self).lookup(namespace)
    }
}

impl<S: IndexSource + ?Sized> IndexSource for Arc<S> {
    fn lookup(&self, namespace: &Namespace) -> Result<Vec<Index>> {
        (**self).lookup(namespace)
    }
}

impl<S: IndexSource + ?Sized> IndexSource for Box<S> {
    fn lookup(&self, namespace: &Namespace) -> Result<Vec<Index>> {
        (**self).lookup(namespace)
    }
}

/// In-memory index source for tests and embedders without a live catalog.
#[derive(Clone, Debug, Default)]
pub struct InMemoryIndexSource {
    collections: HashMap<Namespace, Vec<Index>>,
}

impl InMemoryIndexSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an index under the given namespace.
    ///
    /// # Panics
    /// Panics if `namespace` is not a valid `<database>.<collection>` pair;
    /// fixtures are expected to be well-formed.
    pub fn with_index(mut self, namespace: &str, index: Index) -> Self {
        let namespace = Namespace::parse(namespace).expect("fixture namespace must be valid");
        self.collections.entry(namespace).or_default().push(index);
        self
    }

    /// Registers a collection with its full index list.
    ///
    /// # Panics
    /// Panics if `namespace` is not a valid `<database>.<collection>` pair;
    /// fixtures are expected to be well-formed.
    pub fn with_collection(mut self, namespace: &str, indexes: Vec<Index>) -> Self {
        let namespace = Namespace::parse(namespace).expect("fixture namespace must be valid");
        self.collections.insert(namespace, indexes);
        self
    }
}

impl IndexSource for InMemoryIndexSource {
    fn lookup(&self, namespace: &Namespace) -> Result<Vec<Index>> {
        self.collections
            .get(namespace)
            .cloned()
            .ok_or(CoverageError::NotFound)
    }
}
