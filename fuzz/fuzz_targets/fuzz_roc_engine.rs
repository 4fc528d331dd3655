//! Fuzz target for the ROC engine.
//!
//! Arbitrary scores, labels and options must either produce a well-formed
//! curve or a typed error, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use roc_math::{roc_table, select_point, RocOptions, ThresholdRule};

#[derive(Debug, Arbitrary)]
struct Input {
    samples: Vec<(i8, bool)>,
    decreasing: bool,
    x_threshold: f64,
    legacy_rule: bool,
}

fuzz_target!(|input: Input| {
    // A small score alphabet keeps ties frequent.
    let scores: Vec<f64> = input.samples.iter().map(|(s, _)| *s as f64 / 8.0).collect();
    let labels: Vec<bool> = input.samples.iter().map(|(_, l)| *l).collect();

    let Ok(table) = roc_table(&scores, &labels, input.decreasing) else {
        return;
    };

    let rows = table.rows();
    let first = &rows[0];
    let last = &rows[rows.len() - 1];
    assert_eq!(first.fpr, 0.0);
    assert_eq!((last.fpr, last.tpr), (1.0, 1.0));
    for pair in rows.windows(2) {
        assert!(pair[1].fpr > pair[0].fpr);
        assert!(pair[1].tpr >= pair[0].tpr);
        assert!(pair[1].auc >= pair[0].auc);
    }
    assert!((0.0..=1.0).contains(&table.full_auc()));

    let rule = if input.legacy_rule {
        ThresholdRule::Auc
    } else {
        ThresholdRule::Fpr
    };
    let options = RocOptions::default()
        .with_auc_only(true)
        .with_x_threshold(input.x_threshold)
        .with_threshold_rule(rule);
    if let Ok(Some(sel)) = select_point(&table, &options) {
        assert!(sel.index < table.len());
        assert!(sel.auc <= table.full_auc());
    }
});
