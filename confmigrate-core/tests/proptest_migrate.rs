//! Property-based tests for whole migration runs.
//!
//! - Idempotence: a second run against the same reference changes nothing
//! - Comments only: the migrated file parses to the same tree as before
//! - Unchanged means untouched: `None` whenever there is nothing missing

use chrono::NaiveDate;
use confmigrate_core::adapters::FixedClock;
use confmigrate_core::{ConfigTree, MigrationEngine, Value};
use confmigrate_domain::{DocumentFormat, YamlFormat};
use proptest::prelude::*;

fn engine() -> MigrationEngine {
    let at = NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(12, 30, 0))
        .unwrap();
    MigrationEngine::new().with_clock(FixedClock(at))
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0i64..100).prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-z]{1,6}".prop_map(Value::from),
    ]
}

fn arb_tree() -> impl Strategy<Value = ConfigTree> {
    let leaf = arb_leaf();
    let value = leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::List),
            prop::collection::vec(("[a-e]", inner), 0..4)
                .prop_map(|kv| Value::Tree(kv.into_iter().collect())),
        ]
    });
    prop::collection::vec(("[a-f]", value), 0..5).prop_map(|kv| kv.into_iter().collect())
}

fn render(tree: &ConfigTree) -> String {
    YamlFormat.dump(&Value::Tree(tree.clone())).unwrap()
}

fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn second_run_is_unchanged(current in arb_tree(), reference in arb_tree()) {
        let e = engine();
        let reference_text = render(&reference);
        let mut buf = lines(&render(&current));

        if let Some(out) = e.migrate(&buf, &reference_text).unwrap() {
            buf = out;
        }
        prop_assert!(e.migrate(&buf, &reference_text).unwrap().is_none());
    }

    #[test]
    fn migration_only_adds_comments(current in arb_tree(), reference in arb_tree()) {
        let current_text = render(&current);
        let out = engine()
            .migrate(&lines(&current_text), &render(&reference))
            .unwrap();

        if let Some(out) = out {
            let before = YamlFormat.parse(&current_text).unwrap();
            let after = YamlFormat.parse(&out.join("\n")).unwrap();
            prop_assert_eq!(after, before);
            prop_assert!(out.len() > lines(&current_text).len());
        }
    }

    #[test]
    fn self_migration_never_writes(tree in arb_tree()) {
        let text = render(&tree);
        prop_assert!(engine().migrate(&lines(&text), &text).unwrap().is_none());
    }

    #[test]
    fn written_iff_something_is_missing(current in arb_tree(), reference in arb_tree()) {
        let e = engine();
        let current_text = render(&current);
        let reference_text = render(&reference);

        let outcome = e.migrate_with_report(&lines(&current_text), &reference_text).unwrap();
        let any_missing = e
            .diff_texts(&current_text, &reference_text)
            .unwrap()
            .iter()
            .any(|d| d.is_missing());
        prop_assert_eq!(outcome.lines.is_some(), any_missing);
        prop_assert_eq!(outcome.report.changed, any_missing);
    }
}
