use thiserror::Error;

use super::expr::CompareOp;

/// Errors produced when building a [`Policy`](super::Policy) or compiling a
/// [`RuleSetBuilder`](super::RuleSetBuilder) programmatically.
///
/// User-authored rule text never produces these; it degrades to diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("the label vocabulary is empty")]
    EmptyVocabulary,

    #[error("label '{label}' is not a valid identifier")]
    InvalidLabel { label: String },

    #[error("duplicate label '{label}' in vocabulary")]
    DuplicateLabel { label: String },

    #[error("default label '{label}' is not in the vocabulary")]
    UnknownDefaultLabel { label: String },

    #[error("cost given for label '{label}' which is not in the vocabulary")]
    UnknownCostLabel { label: String },

    #[error("cost {cost} for label '{label}' must be a non-negative number")]
    InvalidCost { label: String, cost: f64 },

    #[error("high-risk threshold {value} must be a finite number")]
    InvalidThreshold { value: f64 },

    #[error("'{name}' is not a valid field name")]
    InvalidFieldName { name: String },

    #[error("rule {index} returns '{label}' which is not in the vocabulary")]
    UnknownRuleLabel { index: usize, label: String },
}

/// A fault hit while evaluating one comparison.
///
/// Faults never escape evaluation: the comparison is treated as false and the
/// fault is recorded in the [`EvaluationTrace`](super::EvaluationTrace).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("variable '{name}' is not bound")]
    MissingVariable { name: String },

    #[error("cannot compare {left} {op} {right}")]
    TypeMismatch {
        left: &'static str,
        op: CompareOp,
        right: &'static str,
    },

    #[error("null only supports == and !=, found {op}")]
    NullOrdering { op: CompareOp },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_default_label_message() {
        let err = ConfigError::UnknownDefaultLabel {
            label: "NONE".into(),
        };
        assert_eq!(
            err.to_string(),
            "default label 'NONE' is not in the vocabulary"
        );
    }

    #[test]
    fn invalid_cost_message() {
        let err = ConfigError::InvalidCost {
            label: "BIG".into(),
            cost: -5.0,
        };
        assert_eq!(
            err.to_string(),
            "cost -5 for label 'BIG' must be a non-negative number"
        );
    }

    #[test]
    fn unknown_rule_label_message() {
        let err = ConfigError::UnknownRuleLabel {
            index: 2,
            label: "HUGE".into(),
        };
        assert_eq!(
            err.to_string(),
            "rule 2 returns 'HUGE' which is not in the vocabulary"
        );
    }

    #[test]
    fn missing_variable_message() {
        let err = EvaluationError::MissingVariable {
            name: "undefined_field".into(),
        };
        assert_eq!(err.to_string(), "variable 'undefined_field' is not bound");
    }

    #[test]
    fn type_mismatch_message() {
        let err = EvaluationError::TypeMismatch {
            left: "string",
            op: CompareOp::Gt,
            right: "number",
        };
        assert_eq!(err.to_string(), "cannot compare string > number");
    }

    #[test]
    fn null_ordering_message() {
        let err = EvaluationError::NullOrdering { op: CompareOp::Lt };
        assert_eq!(err.to_string(), "null only supports == and !=, found <");
    }
}
