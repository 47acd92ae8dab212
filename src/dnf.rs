//! Disjunctive-normal-form rewriting of predicate trees.
//!
//! The normalizer turns an arbitrary AND/OR/NOT tree into a list of
//! conjunctive branches so each branch can be matched against indexes
//! independently. Literal conjuncts are distributed into every alternative
//! of an OR they share a level with, and multiple OR children expand via
//! their cross product.
//!
//! Normalization never fails: shapes the analyzer cannot vouch for (`Nor`,
//! a negation over anything but a single leaf, oversized trees) surface as
//! rejected analyses, which the driver reports as uncovered.

use tracing::debug;

use crate::analyze::{self, ConjunctAnalysis};
use crate::ast::{FieldOp, FieldPredicate, Predicate};

/// Resource limits applied during normalization.
///
/// Cross-product expansion is exponential in the number of OR children, so
/// oversized inputs are rejected conservatively rather than expanded.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    /// Maximum number of conjunctive branches the expansion may produce.
    pub max_branches: usize,
    /// Maximum number of nodes in the input tree.
    pub max_nodes: usize,
    /// Maximum nesting depth of the input tree.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_branches: 512,
            max_nodes: 4_096,
            max_depth: 128,
        }
    }
}

/// One conjunctive branch of the disjunctive normal form.
///
/// `unsupported` marks branches that contained a shape the analyzer must
/// reject (`Nor`, or a negation over a non-leaf subtree).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Branch {
    /// Field-predicate leaves of the conjunct.
    pub leaves: Vec<FieldPredicate>,
    /// Whether the conjunct contained an unsupported logical shape.
    pub unsupported: bool,
}

impl Branch {
    fn leaf(leaf: FieldPredicate) -> Self {
        Self {
            leaves: vec![leaf],
            unsupported: false,
        }
    }

    fn unsupported() -> Self {
        Self {
            leaves: Vec::new(),
            unsupported: true,
        }
    }

    fn merge(&self, other: &Branch) -> Self {
        let mut leaves = Vec::with_capacity(self.leaves.len() + other.leaves.len());
        leaves.extend_from_slice(&self.leaves);
        leaves.extend_from_slice(&other.leaves);
        Self {
            leaves,
            unsupported: self.unsupported || other.unsupported,
        }
    }
}

/// Expands a predicate into its DNF branches without applying limits.
///
/// The result is never empty; an empty predicate yields a single empty
/// branch.
pub fn branches(predicate: &Predicate) -> Vec<Branch> {
    expand(predicate, usize::MAX).unwrap_or_else(|| vec![Branch::unsupported()])
}

/// Normalizes a predicate into per-branch conjunct analyses.
///
/// The list is never empty. Branches carrying unsupported shapes, and inputs
/// exceeding the configured limits, produce rejected analyses.
pub fn normalize(predicate: &Predicate, limits: &Limits) -> Vec<ConjunctAnalysis> {
    let stats = predicate_stats(predicate);
    if stats.nodes > limits.max_nodes || stats.depth > limits.max_depth {
        debug!(
            nodes = stats.nodes,
            depth = stats.depth,
            "predicate exceeds normalization limits"
        );
        return vec![ConjunctAnalysis::rejected()];
    }

    let branches = match expand(predicate, limits.max_branches) {
        Some(branches) => branches,
        None => {
            debug!(
                max_branches = limits.max_branches,
                "DNF expansion exceeds branch limit"
            );
            return vec![ConjunctAnalysis::rejected()];
        }
    };

    branches
        .iter()
        .map(|branch| {
            if branch.unsupported {
                ConjunctAnalysis::rejected()
            } else {
                analyze::analyze_leaves(&branch.leaves)
            }
        })
        .collect()
}

/// Recursive expansion; `None` when the branch count would exceed `cap`.
fn expand(predicate: &Predicate, cap: usize) -> Option<Vec<Branch>> {
    match predicate {
        Predicate::Empty => Some(vec![Branch::default()]),
        Predicate::Field(leaf) => Some(vec![Branch::leaf(leaf.clone())]),
        // Only a negated leaf folds into a per-field operator; anything
        // else is rejected conservatively rather than De Morgan expanded.
        Predicate::Not(subtree) => match subtree.as_ref() {
            Predicate::Field(leaf) => Some(vec![Branch::leaf(FieldPredicate::new(
                leaf.path.clone(),
                FieldOp::Not(Box::new(leaf.op.clone())),
            ))]),
            _ => Some(vec![Branch::unsupported()]),
        },
        Predicate::Nor(_) => Some(vec![Branch::unsupported()]),
        Predicate::And(children) => {
            let mut acc = vec![Branch::default()];
            for child in children {
                let alternatives = expand(child, cap)?;
                if acc.len().checked_mul(alternatives.len())? > cap {
                    return None;
                }
                let mut next = Vec::with_capacity(acc.len() * alternatives.len());
                for left in &acc {
                    for right in &alternatives {
                        next.push(left.merge(right));
                    }
                }
                acc = next;
            }
            Some(acc)
        }
        Predicate::Or(children) => {
            if children.is_empty() {
                return Some(vec![Branch::default()]);
            }
            let mut acc = Vec::new();
            for child in children {
                acc.extend(expand(child, cap)?);
                if acc.len() > cap {
                    return None;
                }
            }
            Some(acc)
        }
    }
}

struct PredicateStats {
    nodes: usize,
    depth: usize,
}

fn predicate_stats(predicate: &Predicate) -> PredicateStats {
    match predicate {
        Predicate::Empty | Predicate::Field(_) => PredicateStats { nodes: 1, depth: 1 },
        Predicate::And(children) | Predicate::Or(children) | Predicate::Nor(children) => {
            let mut nodes = 1;
            let mut max_depth = 0;
            for child in children {
                let stats = predicate_stats(child);
                nodes += stats.nodes;
                max_depth = max_depth.max(stats.depth);
            }
            PredicateStats {
                nodes,
                depth: max_depth + 1,
            }
        }
        Predicate::Not(child) => {
            let stats = predicate_stats(child);
            PredicateStats {
                nodes: stats.nodes + 1,
                depth: stats.depth + 1,
            }
        }
    }
}
