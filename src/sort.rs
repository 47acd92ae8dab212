//! Sort-specification parsing.

use crate::model::{Direction, SortKey};

/// Converts `(field, direction-token)` pairs into an ordered sort-key list.
///
/// Tokens follow the index key convention: non-negative means ascending.
/// Duplicate field names are passed through unchanged; the matcher rejects
/// them by running out of index positions.
pub fn parse<I, S>(spec: I) -> Vec<SortKey>
where
    I: IntoIterator<Item = (S, i64)>,
    S: Into<String>,
{
    spec.into_iter()
        .map(|(name, token)| SortKey::new(name, Direction::from_token(token)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_yields_empty_list() {
        let keys = parse(Vec::<(&str, i64)>::new());
        assert!(keys.is_empty());
    }

    #[test]
    fn preserves_order_and_direction() {
        let keys = parse(vec![("createdAt", -1), ("score", 1)]);
        assert_eq!(
            keys,
            vec![
                SortKey::new("createdAt", Direction::Descending),
                SortKey::new("score", Direction::Ascending),
            ]
        );
    }

    #[test]
    fn duplicates_pass_through() {
        let keys = parse(vec![("a", 1), ("a", -1)]);
        assert_eq!(keys.len(), 2);
    }
}
