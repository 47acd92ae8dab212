//! End-to-end coverage scenarios against an in-memory index source.

use atalaya::builder::{all_of, any_of, field, none_of};
use atalaya::{
    CoverageAnalyzer, Index, IndexField, InMemoryIndexSource, Predicate, SortKey,
};

fn index(name: &str, fields: &[(&str, i64)]) -> Index {
    Index::new(
        name,
        fields
            .iter()
            .map(|(f, d)| IndexField::from_token(*f, *d))
            .collect(),
    )
}

fn analyzer(indexes: Vec<Index>) -> CoverageAnalyzer<InMemoryIndexSource> {
    CoverageAnalyzer::new(InMemoryIndexSource::new().with_collection("app.users", indexes))
}

fn sort(spec: &[(&str, i64)]) -> Vec<SortKey> {
    atalaya::sort::parse(spec.iter().map(|(f, d)| (*f, *d)))
}

#[test]
fn equality_sort_range_on_one_compound_index() {
    // userId == 1 AND status == "a" AND createdAt >= T, sort createdAt desc
    let analyzer = analyzer(vec![index(
        "userId_1_status_1_createdAt_-1",
        &[("userId", 1), ("status", 1), ("createdAt", -1)],
    )]);
    let predicate = all_of([
        field("userId").eq(1),
        field("status").eq("a"),
        field("createdAt").gte(1_700_000_000),
    ]);
    assert!(analyzer
        .analyze_coverage(&predicate, &sort(&[("createdAt", -1)]), "app.users")
        .unwrap());
}

#[test]
fn reverse_traversal_satisfies_an_opposite_sort() {
    // Index walks descending; ascending sort is served by reverse traversal.
    let analyzer = analyzer(vec![index(
        "status_1_createdAt_-1",
        &[("status", 1), ("createdAt", -1)],
    )]);
    let predicate = field("status").eq("a");
    assert!(analyzer
        .analyze_coverage(&predicate, &sort(&[("createdAt", 1)]), "app.users")
        .unwrap());
}

#[test]
fn range_and_sort_on_the_same_field_blocks_reversal() {
    let analyzer = analyzer(vec![index("score_-1_createdAt_1", &[("score", -1), ("createdAt", 1)])]);
    let predicate = field("score").gte(80);
    assert!(!analyzer
        .analyze_coverage(&predicate, &sort(&[("score", 1)]), "app.users")
        .unwrap());
}

#[test]
fn disjuncts_may_be_covered_by_different_indexes() {
    let analyzer = analyzer(vec![
        index("userId_1", &[("userId", 1)]),
        index("status_1_createdAt_-1", &[("status", 1), ("createdAt", -1)]),
    ]);
    let predicate = any_of([field("userId").eq(1), field("status").eq("a")]);
    assert!(analyzer.analyze_coverage(&predicate, &[], "app.users").unwrap());
}

#[test]
fn one_uncovered_disjunct_fails_the_whole_query() {
    let analyzer = analyzer(vec![index("userId_1", &[("userId", 1)])]);
    let predicate = any_of([field("userId").eq(1), field("quota").eq("x")]);
    assert!(!analyzer.analyze_coverage(&predicate, &[], "app.users").unwrap());
}

#[test]
fn distributed_or_branches_each_need_an_index() {
    // status == "a" AND (userId == 1 OR category == "p"), sort createdAt asc.
    // Both DNF branches need {status, userId} / {status, category} prefixes
    // followed by createdAt; the single index has neither.
    let analyzer = analyzer(vec![index(
        "status_1_createdAt_1_score_1",
        &[("status", 1), ("createdAt", 1), ("score", 1)],
    )]);
    let predicate = all_of([
        field("status").eq("a"),
        any_of([field("userId").eq(1), field("category").eq("p")]),
    ]);
    assert!(!analyzer
        .analyze_coverage(&predicate, &sort(&[("createdAt", 1)]), "app.users")
        .unwrap());
}

#[test]
fn distributed_or_succeeds_with_an_index_per_branch() {
    let analyzer = analyzer(vec![
        index(
            "status_1_userId_1_createdAt_1",
            &[("status", 1), ("userId", 1), ("createdAt", 1)],
        ),
        index(
            "category_1_status_1_createdAt_1",
            &[("category", 1), ("status", 1), ("createdAt", 1)],
        ),
    ]);
    let predicate = all_of([
        field("status").eq("a"),
        any_of([field("userId").eq(1), field("category").eq("p")]),
    ]);
    assert!(analyzer
        .analyze_coverage(&predicate, &sort(&[("createdAt", 1)]), "app.users")
        .unwrap());
}

#[test]
fn empty_predicate_with_a_sortable_index() {
    let analyzer = analyzer(vec![index("createdAt_-1", &[("createdAt", -1)])]);
    assert!(analyzer
        .analyze_coverage(&Predicate::Empty, &sort(&[("createdAt", -1)]), "app.users")
        .unwrap());
    // Reverse traversal applies here too.
    assert!(analyzer
        .analyze_coverage(&Predicate::Empty, &sort(&[("createdAt", 1)]), "app.users")
        .unwrap());
}

#[test]
fn collection_without_indexes_is_never_covered() {
    let analyzer = analyzer(Vec::new());
    assert!(!analyzer
        .analyze_coverage(&Predicate::Empty, &[], "app.users")
        .unwrap());
}

#[test]
fn nor_is_rejected_conservatively() {
    let analyzer = analyzer(vec![index("status_1", &[("status", 1)])]);
    let predicate = none_of([field("status").eq("inactive")]);
    assert!(!analyzer.analyze_coverage(&predicate, &[], "app.users").unwrap());

    // Even buried under a covered conjunction.
    let predicate = all_of([
        field("status").eq("a"),
        none_of([field("status").eq("inactive")]),
    ]);
    assert!(!analyzer.analyze_coverage(&predicate, &[], "app.users").unwrap());
}

#[test]
fn document_examination_operators_are_rejected() {
    let analyzer = analyzer(vec![index("status_1", &[("status", 1)])]);
    for predicate in [
        field("status").regex("^act"),
        all_of([field("status").eq("a"), field("name").regex("^bo")]),
        Predicate::field("$where", atalaya::FieldOp::Where("this.x > 1".into())),
    ] {
        assert!(!analyzer.analyze_coverage(&predicate, &[], "app.users").unwrap());
    }
}

#[test]
fn negated_elem_match_is_rejected_conservatively() {
    let analyzer = analyzer(vec![index("items_sku_1", &[("items.sku", 1)])]);
    let predicate = atalaya::document::parse(&serde_json::json!({
        "items": {"$not": {"$elemMatch": {"sku": 1}}}
    }))
    .unwrap();
    assert!(!analyzer.analyze_coverage(&predicate, &[], "app.users").unwrap());
}

#[test]
fn in_operator_counts_as_equality() {
    let analyzer = analyzer(vec![index(
        "status_1_createdAt_-1",
        &[("status", 1), ("createdAt", -1)],
    )]);
    let predicate = field("status").is_in(["a", "b"]);
    assert!(analyzer
        .analyze_coverage(&predicate, &sort(&[("createdAt", -1)]), "app.users")
        .unwrap());
}

#[test]
fn dotted_paths_from_elem_match_align_with_index_fields() {
    let analyzer = analyzer(vec![index(
        "items_sku_1_items_qty_1",
        &[("items.sku", 1), ("items.qty", 1)],
    )]);
    let predicate = field("items").elem_match(all_of([
        field("sku").eq(7),
        field("qty").gt(0),
    ]));
    assert!(analyzer.analyze_coverage(&predicate, &[], "app.users").unwrap());
}

#[test]
fn json_filters_run_through_the_same_pipeline() {
    let analyzer = analyzer(vec![index(
        "userId_1_status_1_createdAt_-1",
        &[("userId", 1), ("status", 1), ("createdAt", -1)],
    )]);
    let predicate = atalaya::document::parse(&serde_json::json!({
        "userId": 1,
        "status": "a",
        "createdAt": {"$gte": 1_700_000_000i64}
    }))
    .unwrap();
    assert!(analyzer
        .analyze_coverage(&predicate, &sort(&[("createdAt", -1)]), "app.users")
        .unwrap());
}

#[test]
fn repeated_calls_agree() {
    let analyzer = analyzer(vec![index("userId_1", &[("userId", 1)])]);
    let predicate = field("userId").eq(1);
    let first = analyzer.analyze_coverage(&predicate, &[], "app.users").unwrap();
    let second = analyzer.analyze_coverage(&predicate, &[], "app.users").unwrap();
    assert_eq!(first, second);
    assert!(first);
}
