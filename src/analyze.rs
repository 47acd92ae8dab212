//! Conjunct analysis: classifies every field reference of one conjunctive
//! branch as equality or range, or rejects the branch outright.
//!
//! The input is a branch already freed of logical operators by the DNF
//! normalizer. Output ordering is not observable; field sets are kept in
//! sorted containers only so diagnostics stay stable.

use std::collections::BTreeSet;

use tracing::debug;

use crate::ast::{FieldOp, FieldPredicate, Predicate};

/// Classification of one conjunctive branch.
///
/// A rejected analysis can never be reported as covered; the driver maps it
/// to `false` without consulting any index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConjunctAnalysis {
    equality: BTreeSet<String>,
    range: BTreeSet<String>,
    rejected: bool,
}

impl ConjunctAnalysis {
    /// Builds an analysis from known equality and range field sets.
    pub fn simple<I, J, S, T>(equality: I, range: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            equality: equality.into_iter().map(Into::into).collect(),
            range: range.into_iter().map(Into::into).collect(),
            rejected: false,
        }
    }

    /// Builds an analysis marked rejected.
    pub fn rejected() -> Self {
        Self {
            rejected: true,
            ..Self::default()
        }
    }

    /// Fields constrained by equality-class operators.
    pub fn equality_fields(&self) -> &BTreeSet<String> {
        &self.equality
    }

    /// Fields constrained by range operators.
    pub fn range_fields(&self) -> &BTreeSet<String> {
        &self.range
    }

    /// Whether the branch contained a form that defeats index-only execution.
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    /// Union of equality and range fields.
    pub fn all_fields(&self) -> BTreeSet<String> {
        self.equality.union(&self.range).cloned().collect()
    }

    fn reject(&mut self) {
        self.rejected = true;
    }
}

/// Operator class used when classifying a leaf.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum OpClass {
    Equality,
    Range,
    Unsupported,
}

/// Top-constructor class of an operator, used for `Not` classification.
fn class_of(op: &FieldOp) -> OpClass {
    match op {
        FieldOp::Eq(_) | FieldOp::In(_) | FieldOp::Ne(_) => OpClass::Equality,
        FieldOp::Gt(_) | FieldOp::Gte(_) | FieldOp::Lt(_) | FieldOp::Lte(_) => OpClass::Range,
        _ => OpClass::Unsupported,
    }
}

/// Analyzes the leaves of one conjunctive branch.
pub fn analyze_leaves(leaves: &[FieldPredicate]) -> ConjunctAnalysis {
    let mut analysis = ConjunctAnalysis::default();
    for leaf in leaves {
        classify_into(&mut analysis, &leaf.path, &leaf.op);
        if analysis.rejected {
            break;
        }
    }
    analysis
}

fn classify_into(analysis: &mut ConjunctAnalysis, path: &str, op: &FieldOp) {
    match op {
        FieldOp::Eq(_) | FieldOp::In(_) | FieldOp::Ne(_) => {
            analysis.equality.insert(path.to_owned());
        }
        FieldOp::Gt(_) | FieldOp::Gte(_) | FieldOp::Lt(_) | FieldOp::Lte(_) => {
            analysis.range.insert(path.to_owned());
        }
        // exists:true rides a sparse index prefix; exists:false cannot.
        FieldOp::Exists(true) => {
            analysis.equality.insert(path.to_owned());
        }
        FieldOp::Exists(false) => {
            debug!(field = path, "exists:false defeats index coverage");
            analysis.reject();
        }
        FieldOp::Not(inner) => match class_of(inner) {
            OpClass::Equality => {
                analysis.equality.insert(path.to_owned());
            }
            OpClass::Range => {
                analysis.range.insert(path.to_owned());
            }
            OpClass::Unsupported => {
                debug!(field = path, "negation of unsupported operator");
                analysis.reject();
            }
        },
        FieldOp::ElemMatch(subtree) => collect_elem_match(analysis, path, subtree),
        FieldOp::Regex(_)
        | FieldOp::Mod { .. }
        | FieldOp::Where(_)
        | FieldOp::Expr(_)
        | FieldOp::Type(_)
        | FieldOp::All(_)
        | FieldOp::Size(_) => {
            debug!(field = path, "operator requires document examination");
            analysis.reject();
        }
    }
}

/// Folds an `$elemMatch` subtree into the outer analysis, renaming every
/// produced field onto the base path.
///
/// Only conjunctive subtrees are index-friendly; any logical structure
/// inside the element match rejects the whole branch.
fn collect_elem_match(analysis: &mut ConjunctAnalysis, base: &str, subtree: &Predicate) {
    match subtree {
        Predicate::Empty => {
            analysis.equality.insert(base.to_owned());
        }
        Predicate::Field(leaf) => {
            let renamed = format!("{base}.{}", leaf.path);
            classify_into(analysis, &renamed, &leaf.op);
        }
        Predicate::And(children) => {
            for child in children {
                collect_elem_match(analysis, base, child);
                if analysis.rejected {
                    return;
                }
            }
        }
        Predicate::Or(_) | Predicate::Nor(_) | Predicate::Not(_) => {
            debug!(field = base, "logical operator inside $elemMatch");
            analysis.reject();
        }
    }
}
