//! Equality-Sort-Range matching of one conjunct against one index.
//!
//! A compound B-tree index covers a conjunct when its leading fields satisfy
//! the equality constraints (in any order within the prefix), the next run
//! of fields reproduces the sort keys positionally, and every range field
//! appears somewhere in the key. Sorts may also be satisfied by walking the
//! index backwards, provided the reversal is unanimous across the sort list
//! and no sort field doubles as a range field.

use tracing::debug;

use crate::analyze::ConjunctAnalysis;
use crate::model::{Index, SortKey};

/// How a matching index would be walked to produce the requested order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Traversal {
    /// Natural key order.
    Forward,
    /// Reverse key order.
    Reverse,
}

/// Whether the index perfectly covers the conjunct and sort.
pub fn index_covers(analysis: &ConjunctAnalysis, sort: &[SortKey], index: &Index) -> bool {
    match_index(analysis, sort, index).is_some()
}

/// Matches the conjunct against the index, reporting the traversal that
/// satisfies the sort. `None` means the index does not perfectly cover the
/// conjunct.
pub fn match_index(
    analysis: &ConjunctAnalysis,
    sort: &[SortKey],
    index: &Index,
) -> Option<Traversal> {
    // Rejected conjuncts are uncoverable by construction.
    if analysis.is_rejected() {
        return None;
    }

    let fields = &index.fields;
    let equality = analysis.equality_fields();
    let range = analysis.range_fields();

    // Step E: the equality fields must fill an uninterrupted prefix,
    // starting at position 0, in any internal order.
    let prefix_len = fields
        .iter()
        .take_while(|f| equality.contains(&f.name))
        .count();
    let prefix_names: Vec<&str> = fields[..prefix_len]
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    if let Some(missing) = equality.iter().find(|e| !prefix_names.contains(&e.as_str())) {
        debug!(
            index = %index.name,
            field = missing.as_str(),
            "equality field missing from index prefix"
        );
        return None;
    }

    // Step S: sort keys occupy the positions immediately after the prefix,
    // with directions matching either all forward or all reversed.
    let traversal = if sort.is_empty() {
        Traversal::Forward
    } else {
        if fields.len() - prefix_len < sort.len() {
            debug!(
                index = %index.name,
                "index has too few fields after the equality prefix"
            );
            return None;
        }
        let segment = &fields[prefix_len..prefix_len + sort.len()];
        if segment
            .iter()
            .zip(sort)
            .any(|(field, key)| field.name != key.name)
        {
            debug!(index = %index.name, "sort fields misaligned with index");
            return None;
        }
        let forward = segment
            .iter()
            .zip(sort)
            .all(|(field, key)| field.direction == key.direction);
        let reversed = segment
            .iter()
            .zip(sort)
            .all(|(field, key)| field.direction == key.direction.reverse());
        // A sort field that also carries a range constraint pins the
        // traversal direction; reversal is off the table.
        let range_and_sort = sort.iter().any(|key| range.contains(&key.name));
        if forward {
            Traversal::Forward
        } else if reversed && !range_and_sort {
            Traversal::Reverse
        } else {
            debug!(
                index = %index.name,
                range_and_sort, "sort directions incompatible with index"
            );
            return None;
        }
    };

    // Step R: range fields may sit anywhere in the key.
    if let Some(missing) = range.iter().find(|r| !index.covers_field(r.as_str())) {
        debug!(
            index = %index.name,
            field = missing.as_str(),
            "range field absent from index"
        );
        return None;
    }

    debug!(index = %index.name, ?traversal, "index covers conjunct");
    Some(traversal)
}
