//! Error types surfaced across the coverage-analysis boundary.

use thiserror::Error;

/// Convenience alias for fallible coverage operations.
pub type Result<T> = std::result::Result<T, CoverageError>;

/// Errors the coverage driver and index sources can surface.
///
/// Unsupported predicate shapes are deliberately absent: they are absorbed
/// into the rejected flag of a conjunct analysis and reported as uncovered,
/// never as an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoverageError {
    /// Namespace string does not parse as `<database>.<collection>`.
    #[error("invalid namespace '{namespace}': expected <database>.<collection>")]
    InvalidNamespace {
        /// The rejected input, verbatim.
        namespace: String,
    },
    /// The index source has no entry for the namespace.
    ///
    /// The driver treats this identically to an empty index list.
    #[error("namespace not found")]
    NotFound,
    /// The index source failed; passed through to the caller unchanged.
    #[error("index lookup failed: {0}")]
    Backend(String),
}

/// Errors produced while converting a document literal into a predicate tree.
///
/// These never escape the [`crate::document`] adapter; the core pipeline
/// consumes already-built trees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The top-level filter (or a nested clause) was not a JSON object.
    #[error("{context} must be a document")]
    NotADocument {
        /// Which clause carried the malformed value.
        context: &'static str,
    },
    /// A logical operator's operand was not an array of documents.
    #[error("{operator} requires an array of documents")]
    LogicalOperand {
        /// The logical operator in question.
        operator: &'static str,
    },
    /// An operator name is not part of the supported surface.
    #[error("unknown operator '{operator}'")]
    UnknownOperator {
        /// The operator as written.
        operator: String,
    },
    /// An operator received an operand of the wrong shape.
    #[error("{operator} expects {expected}")]
    OperandType {
        /// The operator in question.
        operator: &'static str,
        /// Human-readable description of the expected operand.
        expected: &'static str,
    },
    /// `$not` wraps something other than a single operator document.
    #[error("$not requires a document containing exactly one operator")]
    NotOperand,
    /// A literal cannot be represented as a scalar or array value.
    #[error("unsupported literal for field '{path}'")]
    UnsupportedLiteral {
        /// The field whose literal was rejected.
        path: String,
    },
}
