//! End-to-end screening scenarios across store, alignment, predicates and evaluation.

use approx::assert_relative_eq;
use ronda_align::{CompareOp, compare, union_index};
use ronda_eval::{
    BatchConfig, ConstantScorer, LatestValueScorer, Metric, StrategySpec, evaluate_strategy,
    run_batch,
};
use ronda_predicates::{consecutive_growth, peer_relative, threshold};
use ronda_store::{CategoryMap, TableKey, TableStore};
use ronda_traits::{Date, Frequency, Panel, Table};

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

fn daily(days: &[u32], columns: Vec<(&str, Vec<f64>)>) -> Table {
    Table::from_columns(
        Frequency::Daily,
        "TWD",
        days.iter().map(|&d| date(2024, 1, d)).collect(),
        columns.into_iter().map(|(s, v)| (s.to_string(), v)).collect(),
    )
    .unwrap()
}

fn close_above(name: &str, level: f64) -> StrategySpec {
    StrategySpec::new(name, "1")
        .require([TableKey::Close])
        .condition(format!("close > {level}"), move |inputs| {
            threshold(inputs.table(TableKey::Close)?, CompareOp::Gt, level)
        })
}

#[test]
fn close_threshold_end_to_end() {
    let mut store = TableStore::new();
    store
        .register(
            TableKey::Close.name(),
            daily(&[2, 3, 4], vec![("X", vec![100.0, 110.0, 120.0])]),
        )
        .unwrap();

    let condition = threshold(store.table(TableKey::Close).unwrap(), CompareOp::Gt, 105.0).unwrap();
    let held: Vec<bool> = condition.to_bool_array().column(0).to_vec();
    assert_eq!(held, vec![false, true, true]);

    let spec = close_above("breakout", 105.0);
    assert!(evaluate_strategy(&store, &spec, Some(date(2024, 1, 2))).is_empty());
    assert_eq!(
        evaluate_strategy(&store, &spec, Some(date(2024, 1, 3))).symbols(),
        vec!["X"]
    );
    assert_eq!(evaluate_strategy(&store, &spec, None).symbols(), vec!["X"]);
}

#[test]
fn disjoint_symbols_align_to_nothing() {
    let left = daily(&[2, 3], vec![("A", vec![1.0, 2.0])]);
    let right = daily(&[2, 3], vec![("B", vec![0.0, 0.0])]);
    let condition = compare(&left, CompareOp::Gt, &right).unwrap();
    assert_eq!(condition.n_cols(), 0);
    assert!(condition.candidates_as_of(date(2024, 1, 3)).is_empty());
}

#[test]
fn union_index_is_sorted_and_unique() {
    let a = [date(2024, 1, 2), date(2024, 1, 5), date(2024, 1, 9)];
    let b = [date(2024, 1, 1), date(2024, 1, 5), date(2024, 1, 10)];
    let index = union_index(&a, &b);
    assert_eq!(index.len(), 5);
    assert!(index.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn quarterly_table_is_invisible_before_first_observation() {
    let mut store = TableStore::new();
    store
        .register(
            TableKey::Close.name(),
            Table::from_columns(
                Frequency::Daily,
                "TWD",
                vec![date(2024, 3, 28), date(2024, 3, 29), date(2024, 4, 1), date(2024, 4, 2)],
                vec![("A".to_string(), vec![10.0, 10.0, 10.0, 10.0])],
            )
            .unwrap(),
        )
        .unwrap();
    store
        .register(
            TableKey::Eps.name(),
            Table::from_columns(
                Frequency::Quarterly,
                "TWD",
                vec![date(2024, 4, 1)],
                vec![("A".to_string(), vec![2.5])],
            )
            .unwrap(),
        )
        .unwrap();

    let spec = StrategySpec::new("profitable", "1")
        .require([TableKey::Close, TableKey::Eps])
        .condition("close > 5", |inputs| {
            threshold(inputs.table(TableKey::Close)?, CompareOp::Gt, 5.0)
        })
        .condition("eps > 0", |inputs| {
            threshold(inputs.table(TableKey::Eps)?, CompareOp::Gt, 0.0)
        });

    assert!(evaluate_strategy(&store, &spec, Some(date(2024, 3, 29))).is_empty());
    assert_eq!(
        evaluate_strategy(&store, &spec, Some(date(2024, 4, 2))).symbols(),
        vec!["A"]
    );
}

#[test]
fn consecutive_growth_needs_full_history() {
    let eps = Table::from_columns(
        Frequency::Quarterly,
        "TWD",
        vec![date(2023, 4, 1), date(2023, 7, 1), date(2023, 10, 1)],
        vec![("A".to_string(), vec![1.0, 2.0, 3.0])],
    )
    .unwrap();
    let mut store = TableStore::new();
    store.register(TableKey::Eps.name(), eps).unwrap();

    let four = StrategySpec::new("growth4", "1")
        .require([TableKey::Eps])
        .condition("eps up 4 quarters", |inputs| {
            consecutive_growth(inputs.table(TableKey::Eps)?, 4)
        });
    let three = StrategySpec::new("growth3", "1")
        .require([TableKey::Eps])
        .condition("eps up 3 quarters", |inputs| {
            consecutive_growth(inputs.table(TableKey::Eps)?, 3)
        });

    assert!(evaluate_strategy(&store, &four, None).is_empty());
    assert_eq!(evaluate_strategy(&store, &three, None).symbols(), vec!["A"]);
}

#[test]
fn peer_comparison_drops_unmapped_symbols() {
    let mut store = TableStore::new();
    store
        .register(
            TableKey::Roe.name(),
            Table::from_columns(
                Frequency::Quarterly,
                "%",
                vec![date(2024, 1, 1)],
                vec![
                    ("A".to_string(), vec![20.0]),
                    ("B".to_string(), vec![10.0]),
                    ("U".to_string(), vec![99.0]),
                ],
            )
            .unwrap(),
        )
        .unwrap();
    store
        .register_categories(
            TableKey::Industry.name(),
            CategoryMap::from([
                ("A".to_string(), "semis".to_string()),
                ("B".to_string(), "semis".to_string()),
            ]),
        )
        .unwrap();

    let condition = peer_relative(
        store.table(TableKey::Roe).unwrap(),
        store.categories(TableKey::Industry.name()).unwrap(),
        CompareOp::Gt,
    )
    .unwrap();
    assert_eq!(condition.symbols(), &["A".to_string(), "B".to_string()]);

    let spec = StrategySpec::new("industry leader", "1")
        .require([TableKey::Roe, TableKey::Industry])
        .condition("roe above industry mean", |inputs| {
            peer_relative(
                inputs.table(TableKey::Roe)?,
                inputs.categories(TableKey::Industry)?,
                CompareOp::Gt,
            )
        });
    assert_eq!(evaluate_strategy(&store, &spec, None).symbols(), vec!["A"]);
}

fn overlap_store() -> TableStore {
    let mut store = TableStore::new();
    store
        .register(
            TableKey::Close.name(),
            daily(&[2], vec![("A", vec![1.0]), ("B", vec![2.0]), ("C", vec![3.0])]),
        )
        .unwrap();
    store
}

fn overlap_specs() -> Vec<StrategySpec> {
    let scorer = || LatestValueScorer::new(Metric::table(TableKey::Close));
    let below = |inputs: &ronda_eval::Inputs<'_>| {
        threshold(inputs.table(TableKey::Close)?, CompareOp::Lt, 2.5)
    };
    vec![
        StrategySpec::new("ab", "1")
            .require([TableKey::Close])
            .condition("close < 2.5", below)
            .score_with(scorer()),
        close_above("bc", 1.5).score_with(scorer()),
        close_above("b", 1.5)
            .condition("close < 2.5", below)
            .score_with(scorer()),
    ]
}

#[test]
fn overlap_counts_and_order() {
    let store = overlap_store();
    let report = run_batch(&store, &overlap_specs(), None, &BatchConfig::default());

    let order: Vec<_> = report.entries.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(order, vec!["B", "C", "A"]);

    let b = report.entry("B").unwrap();
    assert_eq!(b.appearance_count, 3);
    assert_relative_eq!(b.average_score, 2.0);
    assert_eq!(b.strategies, vec!["ab", "bc", "b"]);
    assert_eq!(report.entry("A").unwrap().appearance_count, 1);
    assert_eq!(report.entry("C").unwrap().appearance_count, 1);
}

#[test]
fn batch_is_idempotent_and_parallel_matches_sequential() {
    let store = overlap_store();
    let specs = overlap_specs();
    let parallel = BatchConfig::default();
    let sequential = BatchConfig {
        parallel: false,
        ..BatchConfig::default()
    };

    let first = run_batch(&store, &specs, None, &parallel);
    let second = run_batch(&store, &specs, None, &parallel);
    let third = run_batch(&store, &specs, None, &sequential);
    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn ties_break_by_symbol() {
    let store = overlap_store();
    let spec = close_above("all", 0.0).score_with(ConstantScorer::new(1.0));
    assert_eq!(evaluate_strategy(&store, &spec, None).symbols(), vec!["A", "B", "C"]);

    let report = run_batch(&store, &[spec], None, &BatchConfig::default());
    let order: Vec<_> = report.entries.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn failed_strategy_does_not_affect_siblings() {
    let store = overlap_store();
    let mut specs = overlap_specs();
    specs.insert(
        1,
        close_above("needs volume", 0.0).require([TableKey::Volume]),
    );

    let report = run_batch(&store, &specs, None, &BatchConfig::default());
    assert_eq!(report.results.len(), 4);
    assert_eq!(report.failed_count(), 1);
    assert!(report.results[1].is_failed());
    assert_eq!(report.entry("B").unwrap().appearance_count, 3);
}

#[test]
fn top_n_truncates_each_strategy() {
    let store = overlap_store();
    let config = BatchConfig {
        top_n: Some(1),
        ..BatchConfig::default()
    };
    let report = run_batch(&store, &overlap_specs(), None, &config);
    // "ab" keeps B, "bc" keeps C, "b" keeps B.
    assert!(report.entry("A").is_none());
    assert_eq!(report.entry("B").unwrap().appearance_count, 2);
    assert_eq!(report.entry("C").unwrap().appearance_count, 1);
}
