use std::fmt;

use super::error::EvaluationError;
use super::label::Label;

/// Why a record received its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A conditional rule matched.
    Matched { rule_index: usize, line: usize },
    /// The unconditional `RETURN` rule was reached.
    Fallback { rule_index: usize, line: usize },
    /// No rule matched; the policy's default label applies.
    Default,
    /// A required field was absent or malformed, so no rule was consulted.
    Gate { field: String },
}

impl Outcome {
    /// Index of the rule that fired, if any.
    #[must_use]
    pub fn rule_index(&self) -> Option<usize> {
        match self {
            Outcome::Matched { rule_index, .. } | Outcome::Fallback { rule_index, .. } => {
                Some(*rule_index)
            }
            Outcome::Default | Outcome::Gate { .. } => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Matched { rule_index, line } => {
                write!(f, "rule {rule_index} (line {line}) matched")
            }
            Outcome::Fallback { rule_index, line } => {
                write!(f, "fallback rule {rule_index} (line {line})")
            }
            Outcome::Default => write!(f, "no rule matched, default applied"),
            Outcome::Gate { field } => write!(f, "data-quality gate failed on '{field}'"),
        }
    }
}

/// Per-record evaluation trace: the outcome, how many rules were checked,
/// and every comparison fault hit along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationTrace {
    outcome: Outcome,
    rules_checked: usize,
    faults: Vec<EvaluationError>,
}

impl EvaluationTrace {
    pub(crate) fn new(
        outcome: Outcome,
        rules_checked: usize,
        faults: Vec<EvaluationError>,
    ) -> Self {
        Self {
            outcome,
            rules_checked,
            faults,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    #[must_use]
    pub fn rules_checked(&self) -> usize {
        self.rules_checked
    }

    /// Comparison faults that were resolved as `false`, in evaluation order.
    #[must_use]
    pub fn faults(&self) -> &[EvaluationError] {
        &self.faults
    }
}

impl fmt::Display for EvaluationTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} rules checked", self.outcome, self.rules_checked)?;
        if !self.faults.is_empty() {
            let faults: Vec<String> = self.faults.iter().map(ToString::to_string).collect();
            write!(f, ", faults: [{}]", faults.join("; "))?;
        }
        Ok(())
    }
}

/// The label chosen for one record plus the trace explaining it.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Decision {
    label: Label,
    trace: EvaluationTrace,
}

impl Decision {
    pub(crate) fn new(label: Label, trace: EvaluationTrace) -> Self {
        Self { label, trace }
    }

    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    #[must_use]
    pub fn trace(&self) -> &EvaluationTrace {
        &self.trace
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        self.trace.outcome()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.trace)
    }
}
