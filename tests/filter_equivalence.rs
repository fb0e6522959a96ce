//! Compiled filters must select exactly the entries the interpreter
//! selects, for any mix of pushed-down and residual sub-expressions.

use basequery::compiler::compile_filter;
use basequery::expr::parse_expression;
use basequery::query::FilterValue;
use basequery::runtime::entry_matches;
use basequery::store::Entry;
use serde_json::json;

fn corpus() -> Vec<Entry> {
    vec![
        Entry::new(
            "notes/apple.md",
            json!({"price": 12, "status": "done", "tags": ["fruit"]}),
        ),
        Entry::new("notes/banana.md", json!({"price": 3, "status": "draft"})),
        Entry::new("notes/deep/cherry.md", json!({"price": 7})),
        Entry::new("drafts/plan.md", json!({"price": null})),
        Entry::new("report.pdf", json!({})),
        Entry::new("readme", json!({"status": "done"})),
    ]
}

fn interpret(filter: &FilterValue, entry: &Entry, root: Option<&str>) -> bool {
    match filter {
        FilterValue::Expression(src) => {
            entry_matches(&parse_expression(src).unwrap(), entry, root)
        }
        FilterValue::Group(group) => {
            let and_ok =
                group.and.is_empty() || group.and.iter().all(|c| interpret(c, entry, root));
            let or_ok = group.or.is_empty() || group.or.iter().any(|c| interpret(c, entry, root));
            let not_ok =
                group.not.is_empty() || group.not.iter().all(|c| !interpret(c, entry, root));
            and_ok && or_ok && not_ok
        }
    }
}

fn assert_equivalent(filter: FilterValue) {
    for root in [None, Some("Vault")] {
        let compiled = compile_filter(&filter, root).unwrap();
        for entry in corpus() {
            let split = compiled.store.matches(&entry)
                && compiled.residual.as_ref().is_none_or(|r| r(&entry));
            let direct = interpret(&filter, &entry, root);
            assert_eq!(
                split, direct,
                "split diverged for {:?} on {}",
                filter, entry.path
            );
        }
    }
}

fn expr(src: &str) -> FilterValue {
    FilterValue::expr(src)
}

#[test]
fn leaf_expressions() {
    assert_equivalent(expr("price > 5"));
    // the null-price entry must fail the range test on both paths
    assert_equivalent(expr("price < 5"));
    assert_equivalent(expr("price == 12"));
    assert_equivalent(expr("status != \"done\""));
    assert_equivalent(expr("file.ext == \"md\""));
    assert_equivalent(expr("file.path == \"report.pdf\""));
    assert_equivalent(expr("file.inFolder(\"notes\")"));
    assert_equivalent(expr("file.hasProperty(\"status\")"));
}

#[test]
fn residual_only_expressions() {
    assert_equivalent(expr("file.name == \"apple.md\""));
    assert_equivalent(expr("file.folder == \"notes\""));
    assert_equivalent(expr("price + 1 > 10"));
    assert_equivalent(expr("status.startsWith(\"d\")"));
    assert_equivalent(expr("price == null"));
}

#[test]
fn and_groups() {
    assert_equivalent(FilterValue::and(vec![
        expr("file.ext == \"md\""),
        expr("price > 5"),
    ]));
    assert_equivalent(FilterValue::and(vec![
        expr("file.inFolder(\"notes\")"),
        expr("file.name == \"apple.md\""),
    ]));
}

#[test]
fn or_groups() {
    assert_equivalent(FilterValue::or(vec![
        expr("file.ext == \"pdf\""),
        expr("price > 5"),
    ]));
    assert_equivalent(FilterValue::or(vec![
        expr("file.ext == \"pdf\""),
        expr("file.name == \"banana.md\""),
    ]));
}

#[test]
fn not_groups() {
    assert_equivalent(FilterValue::not(vec![expr("status == \"done\"")]));
    assert_equivalent(FilterValue::not(vec![expr("file.ext == \"md\"")]));
}

#[test]
fn nested_groups() {
    assert_equivalent(FilterValue::and(vec![
        expr("file.ext == \"md\""),
        FilterValue::or(vec![expr("price > 10"), expr("status == \"done\"")]),
        FilterValue::not(vec![expr("file.inFolder(\"drafts\")")]),
    ]));
}

#[test]
fn and_pushes_partially() {
    let filter = FilterValue::and(vec![
        expr("file.ext == \"md\""),
        expr("file.name == \"apple.md\""),
    ]);
    let compiled = compile_filter(&filter, None).unwrap();
    assert!(!compiled.store.is_all());
    assert!(compiled.has_residual());
}

#[test]
fn or_with_residual_child_degrades_to_match_all() {
    let filter = FilterValue::or(vec![
        expr("file.ext == \"md\""),
        expr("file.name == \"plan.md\""),
    ]);
    let compiled = compile_filter(&filter, None).unwrap();
    assert!(compiled.store.is_all());
    assert!(compiled.has_residual());
}

#[test]
fn evaluation_failures_exclude_the_entry() {
    // calling a number is an evaluation error, not a crash
    let compiled = compile_filter(&expr("price(1) == 2"), None).unwrap();
    for entry in corpus() {
        let residual = compiled.residual.as_ref().unwrap();
        assert!(!residual(&entry));
    }
}
