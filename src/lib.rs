//! A safe, first-match-wins rule engine for customer retention offers.
//!
//! Instruction text holds a `[RULES]` block of `IF ... THEN RETURN ...`
//! lines and an optional `[POLICY]` block of `KEY=VALUE` settings. Compiling
//! it never fails: malformed lines are skipped and reported as
//! [`Diagnostic`]s. Records are evaluated against the compiled [`RuleSet`]
//! one at a time, and a batch of decisions can be aggregated into cost and
//! coverage metrics.
//!
//! ```
//! use offer_rules::{compile, evaluate, Bindings};
//!
//! let ruleset = compile(
//!     "IF churn_score < 0.4 THEN RETURN NO_OFFER\n\
//!      IF segment == \"VIP\" THEN RETURN BIG\n\
//!      RETURN SMALL",
//! );
//! let record = Bindings::new().set("churn_score", 0.82).set("segment", "VIP");
//! assert_eq!(evaluate(&ruleset, &record).label().as_str(), "BIG");
//! ```

mod aggregate;
mod compile;
mod error;
mod evaluate;
mod heuristic;
pub mod parse;
mod template;
mod types;

pub use aggregate::aggregate;
pub use error::Error;
pub use heuristic::churn_score;
pub use template::DEFAULT_DOCUMENT;
pub use types::{
    var, BatchOutcome, Bindings, CompareOp, CompiledRule, ConfigError, Decision, Diagnostic,
    DiagnosticKind, EvaluationError, EvaluationTrace, Expression, Label, Operand, Outcome, Policy,
    PolicyBuilder, Rule, RuleSet, RuleSetBuilder, Summary, Value, VarExpr, DEFAULT_LABELS,
};

/// Compile instruction text into a [`RuleSet`].
///
/// Equivalent to [`RuleSet::from_document()`].
#[must_use]
pub fn compile(text: &str) -> RuleSet {
    RuleSet::from_document(text)
}

/// Decide the label for one record.
pub fn evaluate(ruleset: &RuleSet, bindings: &Bindings) -> Decision {
    ruleset.evaluate(bindings)
}
