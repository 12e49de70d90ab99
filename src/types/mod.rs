mod bindings;
mod decision;
mod diagnostic;
mod error;
mod expr;
mod label;
pub(crate) mod policy;
mod rule;
mod ruleset;
mod summary;
mod value;

pub use bindings::Bindings;
pub use decision::{Decision, EvaluationTrace, Outcome};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{ConfigError, EvaluationError};
pub use expr::{var, CompareOp, Expression, Operand, VarExpr};
pub use label::Label;
pub use policy::{Policy, PolicyBuilder, DEFAULT_LABELS};
pub use rule::{CompiledRule, Rule};
pub use ruleset::{RuleSet, RuleSetBuilder};
pub use summary::{BatchOutcome, Summary};
pub use value::Value;
