use std::cmp::Ordering;

use tracing::trace;

use crate::types::{EvaluationTrace, Outcome};
use crate::{
    Bindings, CompareOp, CompiledRule, Decision, EvaluationError, Expression, Label, Operand,
    Policy, Rule, Value,
};

/// An operand after lookup: `None` when a variable is not bound.
type Resolved<'a> = Option<&'a Value>;

fn resolve<'a>(operand: &'a Operand, bindings: &'a Bindings) -> Resolved<'a> {
    match operand {
        Operand::Variable(name) => bindings.get(name),
        Operand::Literal(value) => Some(value),
    }
}

fn is_null_operand(operand: &Operand, resolved: Resolved<'_>) -> bool {
    matches!(operand, Operand::Literal(Value::Null)) || resolved.is_some_and(Value::is_null)
}

fn missing_name<'a>(left: &'a Operand, right: &'a Operand, bindings: &Bindings) -> Option<&'a str> {
    [left, right].into_iter().find_map(|operand| match operand {
        Operand::Variable(name) if !bindings.contains(name) => Some(name.as_str()),
        _ => None,
    })
}

fn apply(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Neq => ordering != Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Gte => ordering != Ordering::Less,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Lte => ordering != Ordering::Greater,
    }
}

fn mismatch(left: &Value, op: CompareOp, right: &Value) -> EvaluationError {
    EvaluationError::TypeMismatch {
        left: left.type_name(),
        op,
        right: right.type_name(),
    }
}

pub(crate) fn eval_comparison(
    left: &Operand,
    op: CompareOp,
    right: &Operand,
    bindings: &Bindings,
) -> Result<bool, EvaluationError> {
    let lhs = resolve(left, bindings);
    let rhs = resolve(right, bindings);

    // Null comparisons: an unbound variable counts as null here.
    if is_null_operand(left, lhs) || is_null_operand(right, rhs) {
        if op.is_ordering() {
            return Err(EvaluationError::NullOrdering { op });
        }
        let lhs_null = lhs.map_or(true, Value::is_null);
        let rhs_null = rhs.map_or(true, Value::is_null);
        let equal = lhs_null && rhs_null;
        return Ok(if op == CompareOp::Eq { equal } else { !equal });
    }

    let (Some(lhs), Some(rhs)) = (lhs, rhs) else {
        let name = missing_name(left, right, bindings).unwrap_or_default();
        return Err(EvaluationError::MissingVariable {
            name: name.to_owned(),
        });
    };

    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) if !op.is_ordering() => {
            Ok((a == b) == (op == CompareOp::Eq))
        }
        _ => {
            let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) else {
                return Err(mismatch(lhs, op, rhs));
            };
            a.partial_cmp(&b)
                .map(|ordering| apply(op, ordering))
                .ok_or_else(|| mismatch(lhs, op, rhs))
        }
    }
}

/// Evaluate `expr`, recording comparison faults in `faults`.
///
/// `AND` stops at the first false side and `OR` at the first true side; the
/// skipped side is never looked at.
pub(crate) fn eval_expr(
    expr: &Expression,
    bindings: &Bindings,
    faults: &mut Vec<EvaluationError>,
) -> bool {
    match expr {
        Expression::Comparison { left, op, right } => {
            match eval_comparison(left, *op, right, bindings) {
                Ok(result) => result,
                Err(fault) => {
                    faults.push(fault);
                    false
                }
            }
        }
        Expression::Conjunction(a, b) => {
            eval_expr(a, bindings, faults) && eval_expr(b, bindings, faults)
        }
        Expression::Disjunction(a, b) => {
            eval_expr(a, bindings, faults) || eval_expr(b, bindings, faults)
        }
        Expression::Constant(value) => *value,
    }
}

impl Expression {
    /// Evaluate this condition against one record.
    ///
    /// Faults such as unbound variables make the affected comparison false.
    #[must_use]
    pub fn evaluate(&self, bindings: &Bindings) -> bool {
        let mut faults = Vec::new();
        eval_expr(self, bindings, &mut faults)
    }

    /// Like [`evaluate()`](Self::evaluate), also returning the faults hit.
    #[must_use]
    pub fn evaluate_traced(&self, bindings: &Bindings) -> (bool, Vec<EvaluationError>) {
        let mut faults = Vec::new();
        let result = eval_expr(self, bindings, &mut faults);
        (result, faults)
    }
}

/// Name of the first gated field that is absent or malformed, if any.
fn gate_failure<'p>(policy: &'p Policy, bindings: &Bindings) -> Option<&'p str> {
    let risk_ok = bindings
        .get(policy.risk_field())
        .and_then(Value::as_number)
        .is_some();
    if !risk_ok {
        return Some(policy.risk_field());
    }

    let segment_ok = bindings
        .get(policy.segment_field())
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty());
    if !segment_ok {
        return Some(policy.segment_field());
    }

    None
}

/// Run the rule list against one record, first match wins.
pub(crate) fn evaluate(rules: &[CompiledRule], policy: &Policy, bindings: &Bindings) -> Decision {
    if let Some(field) = gate_failure(policy, bindings) {
        trace!(field, "data-quality gate failed");
        return Decision::new(
            policy.default_label().clone(),
            EvaluationTrace::new(
                Outcome::Gate {
                    field: field.to_owned(),
                },
                0,
                Vec::new(),
            ),
        );
    }

    let mut faults = Vec::new();
    for (rule_index, compiled) in rules.iter().enumerate() {
        let checked = rule_index + 1;
        match &compiled.rule {
            Rule::Conditional { condition, result } => {
                if eval_expr(condition, bindings, &mut faults) {
                    let outcome = Outcome::Matched {
                        rule_index,
                        line: compiled.line,
                    };
                    return finish(result.clone(), outcome, checked, faults);
                }
            }
            Rule::Fallback { result } => {
                let outcome = Outcome::Fallback {
                    rule_index,
                    line: compiled.line,
                };
                return finish(result.clone(), outcome, checked, faults);
            }
        }
    }

    finish(
        policy.default_label().clone(),
        Outcome::Default,
        rules.len(),
        faults,
    )
}

fn finish(
    label: Label,
    outcome: Outcome,
    rules_checked: usize,
    faults: Vec<EvaluationError>,
) -> Decision {
    for fault in &faults {
        trace!(%fault, "comparison fault resolved as false");
    }
    Decision::new(label, EvaluationTrace::new(outcome, rules_checked, faults))
}
