//! Top-level coverage driver.
//!
//! Ties the pipeline together: namespace validation, DNF normalization,
//! and per-conjunct index matching against the metadata source.

use tracing::debug;

use crate::ast::Predicate;
use crate::dnf::{self, Limits};
use crate::errors::{CoverageError, Result};
use crate::matching;
use crate::metadata::IndexSource;
use crate::model::{Namespace, SortKey};

/// Answers whether a query is perfectly covered by the collection's B-tree
/// indexes.
///
/// The analyzer holds no per-query state; one instance may serve concurrent
/// callers as long as the underlying source allows concurrent lookup.
pub struct CoverageAnalyzer<S> {
    source: S,
    limits: Limits,
}

impl<S: IndexSource> CoverageAnalyzer<S> {
    /// Creates an analyzer over the given index source with default limits.
    pub fn new(source: S) -> Self {
        Self::with_limits(source, Limits::default())
    }

    /// Creates an analyzer with explicit normalization limits.
    pub fn with_limits(source: S, limits: Limits) -> Self {
        Self { source, limits }
    }

    /// Whether the predicate plus ordering can be answered by walking one
    /// index per disjunct, with no in-memory filter or sort pass.
    ///
    /// Conservative: any shape the analysis cannot vouch for yields
    /// `Ok(false)`. Errors are limited to an unparseable namespace and
    /// backend failures from the index source.
    pub fn analyze_coverage(
        &self,
        predicate: &Predicate,
        sort: &[SortKey],
        namespace: &str,
    ) -> Result<bool> {
        let namespace = Namespace::parse(namespace)?;
        debug!(namespace = %namespace, "analyzing index coverage");

        let conjuncts = dnf::normalize(predicate, &self.limits);
        if conjuncts.iter().any(|c| c.is_rejected()) {
            debug!(namespace = %namespace, "predicate rejected conservatively");
            return Ok(false);
        }

        let indexes = match self.source.lookup(&namespace) {
            Ok(indexes) => indexes,
            // An unknown collection has nothing to cover with.
            Err(CoverageError::NotFound) => Vec::new(),
            Err(err) => return Err(err),
        };
        if indexes.is_empty() {
            debug!(namespace = %namespace, "no indexes available");
            return Ok(false);
        }

        // Every disjunct must find its own covering index; the indexes may
        // differ per disjunct.
        for conjunct in &conjuncts {
            let covered = indexes
                .iter()
                .any(|index| matching::index_covers(conjunct, sort, index));
            if !covered {
                debug!(namespace = %namespace, ?conjunct, "conjunct not covered");
                return Ok(false);
            }
        }

        debug!(namespace = %namespace, conjuncts = conjuncts.len(), "query perfectly covered");
        Ok(true)
    }
}
