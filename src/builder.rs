//! Fluent construction of predicate trees.
//!
//! The combinators here are the programmatic counterpart of the document
//! adapter: `field("age").gte(18)` yields the same leaf the adapter builds
//! from `{"age": {"$gte": 18}}`.
//!
//! ```
//! use atalaya::builder::{all_of, any_of, field};
//!
//! let predicate = all_of([
//!     field("status").eq("active"),
//!     any_of([field("userId").eq(1), field("category").eq("premium")]),
//! ]);
//! ```

use crate::ast::{FieldOp, Predicate};
use crate::value::Value;

/// Starts a leaf predicate on the given field path.
pub fn field(path: impl Into<String>) -> FieldBuilder {
    FieldBuilder { path: path.into() }
}

/// Conjunction of the given predicates.
pub fn all_of(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::And(predicates.into_iter().collect())
}

/// Disjunction of the given predicates.
pub fn any_of(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::Or(predicates.into_iter().collect())
}

/// Negated disjunction of the given predicates.
pub fn none_of(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::Nor(predicates.into_iter().collect())
}

/// Negation of a single predicate.
pub fn not(predicate: Predicate) -> Predicate {
    Predicate::Not(Box::new(predicate))
}

/// Builder holding the field path while the operator is chosen.
#[derive(Clone, Debug)]
pub struct FieldBuilder {
    path: String,
}

impl FieldBuilder {
    fn leaf(self, op: FieldOp) -> Predicate {
        Predicate::field(self.path, op)
    }

    /// Exact match.
    pub fn eq(self, value: impl Into<Value>) -> Predicate {
        self.leaf(FieldOp::Eq(value.into()))
    }

    /// Exclusion of one literal.
    pub fn ne(self, value: impl Into<Value>) -> Predicate {
        self.leaf(FieldOp::Ne(value.into()))
    }

    /// Membership in a literal set.
    pub fn is_in<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Predicate {
        self.leaf(FieldOp::In(values.into_iter().map(Into::into).collect()))
    }

    /// Strictly greater than.
    pub fn gt(self, value: impl Into<Value>) -> Predicate {
        self.leaf(FieldOp::Gt(value.into()))
    }

    /// Greater than or equal.
    pub fn gte(self, value: impl Into<Value>) -> Predicate {
        self.leaf(FieldOp::Gte(value.into()))
    }

    /// Strictly less than.
    pub fn lt(self, value: impl Into<Value>) -> Predicate {
        self.leaf(FieldOp::Lt(value.into()))
    }

    /// Less than or equal.
    pub fn lte(self, value: impl Into<Value>) -> Predicate {
        self.leaf(FieldOp::Lte(value.into()))
    }

    /// Field presence test.
    pub fn exists(self, present: bool) -> Predicate {
        self.leaf(FieldOp::Exists(present))
    }

    /// Array element match over a sub-predicate.
    pub fn elem_match(self, subtree: Predicate) -> Predicate {
        self.leaf(FieldOp::ElemMatch(Box::new(subtree)))
    }

    /// Per-field negation of the operator carried by the given leaf builder
    /// result.
    pub fn not_op(self, op: FieldOp) -> Predicate {
        self.leaf(FieldOp::Not(Box::new(op)))
    }

    /// Regular expression match.
    pub fn regex(self, pattern: impl Into<String>) -> Predicate {
        self.leaf(FieldOp::Regex(pattern.into()))
    }
}
