#![forbid(unsafe_code)]

//! Atalaya answers one question about a database query: can the predicate
//! and its ordering requirement be satisfied using only B-tree index
//! traversals, with no in-memory filtering or sorting pass?
//!
//! The pipeline is a chain of pure transformations: a predicate tree is
//! rewritten into disjunctive normal form, each conjunctive branch is
//! classified into equality and range field sets, and every branch is
//! matched against the collection's compound indexes under the
//! Equality-Sort-Range discipline (including reverse index traversal).
//! Shapes the analysis cannot vouch for are rejected conservatively:
//! "cannot prove covered" and "not covered" are the same answer.
//!
//! ```
//! use atalaya::builder::field;
//! use atalaya::{CoverageAnalyzer, InMemoryIndexSource, Index, IndexField};
//!
//! let source = InMemoryIndexSource::new().with_index(
//!     "app.users",
//!     Index::new(
//!         "userId_1_createdAt_-1",
//!         vec![
//!             IndexField::from_token("userId", 1),
//!             IndexField::from_token("createdAt", -1),
//!         ],
//!     ),
//! );
//! let analyzer = CoverageAnalyzer::new(source);
//! let sort = atalaya::sort::parse(vec![("createdAt", -1)]);
//! let covered = analyzer
//!     .analyze_coverage(&field("userId").eq(1), &sort, "app.users")
//!     .unwrap();
//! assert!(covered);
//! ```

/// Predicate tree consumed by the normalizer.
pub mod ast;

/// Fluent predicate construction helpers.
pub mod builder;

/// Conjunct analysis: equality/range classification of one branch.
pub mod analyze;

/// TTL caching decorator over an index source.
pub mod cache;

/// Document-literal adapter producing predicate trees.
pub mod document;

/// Disjunctive-normal-form rewriting.
pub mod dnf;

/// Top-level coverage driver.
pub mod driver;

/// Error types surfaced across the API boundary.
pub mod errors;

/// Equality-Sort-Range index matching.
pub mod matching;

/// Index metadata boundary and in-memory source.
pub mod metadata;

/// Index, sort, and namespace model types.
pub mod model;

/// Sort-specification parsing.
pub mod sort;

/// Scalar literal representation.
pub mod value;

pub use analyze::ConjunctAnalysis;
pub use ast::{FieldOp, FieldPredicate, Predicate};
pub use cache::{CacheStats, CachedIndexSource};
pub use dnf::Limits;
pub use driver::CoverageAnalyzer;
pub use errors::{CoverageError, DocumentError, Result};
pub use matching::Traversal;
pub use metadata::{InMemoryIndexSource, IndexSource};
pub use model::{Direction, Index, IndexField, Namespace, SortKey};
pub use value::Value;
