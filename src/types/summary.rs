use std::collections::BTreeMap;
use std::fmt;

use super::decision::Decision;
use super::label::Label;

/// Batch metrics over a set of records and their decisions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub(crate) records: usize,
    pub(crate) total_cost: f64,
    pub(crate) high_risk: usize,
    pub(crate) high_risk_covered: usize,
    pub(crate) label_counts: BTreeMap<Label, usize>,
}

impl Summary {
    /// Number of records aggregated.
    #[must_use]
    pub fn records(&self) -> usize {
        self.records
    }

    /// Sum of the policy cost of every decision.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Records whose risk measure is at or above the high-risk threshold.
    #[must_use]
    pub fn high_risk(&self) -> usize {
        self.high_risk
    }

    /// High-risk records that received a non-default label.
    #[must_use]
    pub fn high_risk_covered(&self) -> usize {
        self.high_risk_covered
    }

    /// Fraction of high-risk records covered, or `0.0` when there are none.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coverage(&self) -> f64 {
        if self.high_risk == 0 {
            0.0
        } else {
            self.high_risk_covered as f64 / self.high_risk as f64
        }
    }

    /// How many records received `label`.
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.label_counts.get(label).copied().unwrap_or(0)
    }

    /// Per-label counts, ordered by label.
    #[must_use]
    pub fn label_counts(&self) -> &BTreeMap<Label, usize> {
        &self.label_counts
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records, cost {:.2}, coverage {:.1}% ({}/{} high-risk)",
            self.records,
            self.total_cost,
            self.coverage() * 100.0,
            self.high_risk_covered,
            self.high_risk,
        )?;
        for (label, count) in &self.label_counts {
            write!(f, ", {label}={count}")?;
        }
        Ok(())
    }
}

/// Decisions for a batch of records together with their [`Summary`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub decisions: Vec<Decision>,
    pub summary: Summary,
}
