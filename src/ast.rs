//! Predicate tree consumed by the normalizer and analyzer.
//!
//! Trees are built by callers directly, through the fluent helpers in
//! [`crate::builder`], or from a document literal via [`crate::document`].
//! The core never parses surface syntax itself; it only walks these tagged
//! variants.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A single operator applied to one field path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldPredicate {
    /// Field path the operator constrains (dotted for nested documents).
    pub path: String,
    /// Operator form applied to the field.
    pub op: FieldOp,
}

impl FieldPredicate {
    /// Creates a field predicate from a path and operator.
    pub fn new(path: impl Into<String>, op: FieldOp) -> Self {
        Self {
            path: path.into(),
            op,
        }
    }
}

/// Boolean structure over field predicates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Leaf applying one operator form to one field.
    Field(FieldPredicate),
    /// N-ary conjunction.
    And(Vec<Predicate>),
    /// N-ary disjunction.
    Or(Vec<Predicate>),
    /// Negated disjunction; analyzed conservatively.
    Nor(Vec<Predicate>),
    /// Negation of a single subtree.
    Not(Box<Predicate>),
    /// Predicate matching every document.
    Empty,
}

impl Predicate {
    /// Convenience constructor for a leaf predicate.
    pub fn field(path: impl Into<String>, op: FieldOp) -> Self {
        Predicate::Field(FieldPredicate::new(path, op))
    }
}

/// Operator forms a field predicate may carry.
///
/// The classification into equality, range, and unsupported operators lives
/// in [`crate::analyze`]; this enum only models shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldOp {
    /// Exact match against one literal.
    Eq(Value),
    /// Membership in a literal set.
    In(Vec<Value>),
    /// Exclusion of one literal.
    Ne(Value),
    /// Strictly greater than.
    Gt(Value),
    /// Greater than or equal.
    Gte(Value),
    /// Strictly less than.
    Lt(Value),
    /// Less than or equal.
    Lte(Value),
    /// Field presence (`true`) or absence (`false`) test.
    Exists(bool),
    /// Array element match; the subtree constrains element subfields.
    ElemMatch(Box<Predicate>),
    /// Per-field negation of an inner operator.
    Not(Box<FieldOp>),
    /// Regular expression match.
    Regex(String),
    /// Modulo arithmetic test.
    Mod {
        /// Divisor operand.
        divisor: i64,
        /// Expected remainder.
        remainder: i64,
    },
    /// Server-side JavaScript predicate.
    Where(String),
    /// Aggregation expression predicate.
    Expr(String),
    /// BSON type test.
    Type(String),
    /// Array containment of every listed literal.
    All(Vec<Value>),
    /// Exact array length test.
    Size(i64),
}
