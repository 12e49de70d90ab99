use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{Bindings, Decision, Label, Policy, Summary, Value};

/// Compute cost, coverage and per-label counts for a batch.
///
/// `records[i]` must be the record that produced `decisions[i]`. When the
/// slices differ in length only the common prefix is aggregated.
#[must_use]
pub fn aggregate(policy: &Policy, records: &[Bindings], decisions: &[Decision]) -> Summary {
    if records.len() != decisions.len() {
        warn!(
            records = records.len(),
            decisions = decisions.len(),
            "record and decision counts differ; aggregating the common prefix"
        );
    }

    let mut total_cost = 0.0;
    let mut high_risk = 0;
    let mut high_risk_covered = 0;
    let mut label_counts: BTreeMap<Label, usize> = BTreeMap::new();

    for (record, decision) in records.iter().zip(decisions) {
        let label = decision.label();
        total_cost += policy.cost(label.as_str());
        *label_counts.entry(label.clone()).or_default() += 1;

        let is_high_risk = record
            .get(policy.risk_field())
            .and_then(Value::as_number)
            .is_some_and(|risk| risk >= policy.high_risk_threshold());
        if is_high_risk {
            high_risk += 1;
            if label != policy.default_label() {
                high_risk_covered += 1;
            }
        }
    }

    let summary = Summary {
        records: records.len().min(decisions.len()),
        total_cost,
        high_risk,
        high_risk_covered,
        label_counts,
    };
    debug!(%summary, "aggregated batch");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleSetBuilder;

    fn decide(label: &str) -> Decision {
        RuleSetBuilder::new()
            .otherwise(label)
            .compile()
            .unwrap()
            .evaluate(&record(0.5))
    }

    fn record(risk: f64) -> Bindings {
        Bindings::new()
            .set("churn_score", risk)
            .set("segment", "VIP")
    }

    #[test]
    fn cost_is_summed() {
        let records = vec![record(0.1); 4];
        let decisions: Vec<Decision> = ["BIG", "BIG", "SMALL", "NO_OFFER"]
            .into_iter()
            .map(decide)
            .collect();
        let summary = aggregate(&Policy::default(), &records, &decisions);
        assert!((summary.total_cost() - 110.0).abs() < f64::EPSILON);
        assert_eq!(summary.count("BIG"), 2);
        assert_eq!(summary.count("NO_OFFER"), 1);
        assert_eq!(summary.records(), 4);
    }

    #[test]
    fn coverage_over_high_risk_records() {
        let records: Vec<Bindings> = [0.9, 0.8, 0.7, 0.75, 0.2].into_iter().map(record).collect();
        let decisions: Vec<Decision> = ["BIG", "MEDIUM", "SMALL", "NO_OFFER", "BIG"]
            .into_iter()
            .map(decide)
            .collect();
        let summary = aggregate(&Policy::default(), &records, &decisions);
        assert_eq!(summary.high_risk(), 4);
        assert_eq!(summary.high_risk_covered(), 3);
        assert!((summary.coverage() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn no_high_risk_means_zero_coverage() {
        let records = vec![record(0.1), record(0.3)];
        let decisions = vec![decide("BIG"), decide("SMALL")];
        let summary = aggregate(&Policy::default(), &records, &decisions);
        assert_eq!(summary.high_risk(), 0);
        assert_eq!(summary.coverage(), 0.0);
    }

    #[test]
    fn records_without_risk_are_not_high_risk() {
        let records = vec![Bindings::new().set("segment", "VIP")];
        let decisions = vec![decide("BIG")];
        let summary = aggregate(&Policy::default(), &records, &decisions);
        assert_eq!(summary.high_risk(), 0);
    }

    #[test]
    fn mismatched_lengths_use_common_prefix() {
        let records = vec![record(0.9), record(0.9), record(0.9)];
        let decisions = vec![decide("BIG")];
        let summary = aggregate(&Policy::default(), &records, &decisions);
        assert_eq!(summary.records(), 1);
        assert_eq!(summary.high_risk(), 1);
        assert!((summary.total_cost() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_batch() {
        let summary = aggregate(&Policy::default(), &[], &[]);
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn threshold_and_default_label_come_from_policy() {
        let policy = Policy::builder()
            .high_risk_threshold(0.5)
            .default_label("SMALL")
            .build()
            .unwrap();
        let records = vec![record(0.6), record(0.55)];
        let decisions = vec![decide("SMALL"), decide("NO_OFFER")];
        let summary = aggregate(&policy, &records, &decisions);
        assert_eq!(summary.high_risk(), 2);
        assert_eq!(summary.high_risk_covered(), 1);
    }
}
