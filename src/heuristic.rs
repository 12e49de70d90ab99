use crate::{Bindings, Policy, Value};

const MONTHLY_CONTRACT_WEIGHT: f64 = 0.35;
const SHORT_TENURE_WEIGHT: f64 = 0.25;
const HIGH_CHARGES_WEIGHT: f64 = 0.15;
const OTHER_SEGMENT_WEIGHT: f64 = 0.05;

const SHORT_TENURE_MONTHS: f64 = 6.0;
const HIGH_MONTHLY_CHARGES: f64 = 100.0;

fn number(bindings: &Bindings, name: &str) -> Option<f64> {
    bindings.get(name).and_then(Value::as_number)
}

fn text<'a>(bindings: &'a Bindings, name: &str) -> Option<&'a str> {
    bindings.get(name).and_then(Value::as_str)
}

/// Heuristic churn risk in `[0, 1]` from the `contract`, `tenure`,
/// `monthly_charges` and `segment` fields.
///
/// Missing or malformed fields simply contribute nothing.
///
/// # Example
///
/// ```
/// use offer_rules::{churn_score, Bindings};
///
/// let record = Bindings::new()
///     .set("contract", "Month-to-month")
///     .set("tenure", 3_i64);
/// assert!((churn_score(&record) - 0.60).abs() < 1e-9);
/// ```
#[must_use]
pub fn churn_score(bindings: &Bindings) -> f64 {
    let mut score = 0.0;

    let contract = text(bindings, "contract").unwrap_or_default();
    if contract.to_ascii_lowercase().contains("month") {
        score += MONTHLY_CONTRACT_WEIGHT;
    }
    let tenure = number(bindings, "tenure");
    if tenure.is_some_and(|t| t < SHORT_TENURE_MONTHS) {
        score += SHORT_TENURE_WEIGHT;
    }
    let charges = number(bindings, "monthly_charges");
    if charges.is_some_and(|c| c > HIGH_MONTHLY_CHARGES) {
        score += HIGH_CHARGES_WEIGHT;
    }
    let segment = text(bindings, "segment").unwrap_or_default();
    if segment.trim().eq_ignore_ascii_case("OTHER") {
        score += OTHER_SEGMENT_WEIGHT;
    }

    f64::clamp(score, 0.0, 1.0)
}

impl Bindings {
    /// Bind the policy's risk field to [`churn_score()`] unless the record
    /// already carries a numeric risk value.
    #[must_use]
    pub fn with_churn_score(mut self, policy: &Policy) -> Self {
        let field = policy.risk_field();
        if number(&self, field).is_none() {
            let score = churn_score(&self);
            self.insert(field, score);
        }
        self
    }
}
