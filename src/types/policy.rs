use std::collections::{BTreeMap, HashSet};

use super::error::ConfigError;
use super::label::Label;

/// Labels of the built-in retention vocabulary, cheapest first.
pub const DEFAULT_LABELS: [&str; 4] = ["NO_OFFER", "SMALL", "MEDIUM", "BIG"];

const DEFAULT_COSTS: [(&str, f64); 4] = [
    ("NO_OFFER", 0.0),
    ("SMALL", 10.0),
    ("MEDIUM", 25.0),
    ("BIG", 50.0),
];

pub(crate) const DEFAULT_RISK_FIELD: &str = "churn_score";
pub(crate) const DEFAULT_SEGMENT_FIELD: &str = "segment";
pub(crate) const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 0.70;

/// Decision policy: the label vocabulary, default label, cost table and the
/// fields used by the data-quality gate and coverage accounting.
///
/// Read from the `[POLICY]` block of a document or built with
/// [`PolicyBuilder`]. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    labels: Vec<Label>,
    default_label: Label,
    costs: BTreeMap<Label, f64>,
    risk_field: String,
    segment_field: String,
    high_risk_threshold: f64,
    extra: BTreeMap<String, String>,
}

impl Policy {
    #[must_use]
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::new()
    }

    /// The declared vocabulary, in declaration order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label returned when no rule matches or the data-quality gate fails.
    #[must_use]
    pub fn default_label(&self) -> &Label {
        &self.default_label
    }

    #[must_use]
    pub fn is_known(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Cost of handing out `label`. Labels without a cost entry cost nothing.
    #[must_use]
    pub fn cost(&self, label: &str) -> f64 {
        self.costs.get(label).copied().unwrap_or(0.0)
    }

    /// Field holding the numeric risk measure (default `churn_score`).
    #[must_use]
    pub fn risk_field(&self) -> &str {
        &self.risk_field
    }

    /// Field holding the categorical customer segment (default `segment`).
    #[must_use]
    pub fn segment_field(&self) -> &str {
        &self.segment_field
    }

    /// Records whose risk measure is at or above this value are high-risk.
    #[must_use]
    pub fn high_risk_threshold(&self) -> f64 {
        self.high_risk_threshold
    }

    /// Unrecognised `[POLICY]` keys, kept verbatim for collaborators.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    pub(crate) fn costs(&self) -> impl Iterator<Item = (&Label, f64)> {
        self.costs.iter().map(|(l, c)| (l, *c))
    }

    pub(crate) fn extras(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().copied().map(Label::new).collect(),
            default_label: Label::new(DEFAULT_LABELS[0]),
            costs: DEFAULT_COSTS
                .iter()
                .map(|&(l, c)| (Label::new(l), c))
                .collect(),
            risk_field: DEFAULT_RISK_FIELD.to_owned(),
            segment_field: DEFAULT_SEGMENT_FIELD.to_owned(),
            high_risk_threshold: DEFAULT_HIGH_RISK_THRESHOLD,
            extra: BTreeMap::new(),
        }
    }
}

/// Builder for a validated [`Policy`].
///
/// Starts from the default retention policy. Replacing the vocabulary with
/// [`labels()`](Self::labels) also drops costs for labels that are no longer
/// declared.
///
/// # Example
///
/// ```
/// use offer_rules::Policy;
///
/// let policy = Policy::builder()
///     .labels(["NONE", "VOUCHER"])
///     .default_label("NONE")
///     .cost("VOUCHER", 15.0)
///     .high_risk_threshold(0.6)
///     .build()
///     .unwrap();
/// assert_eq!(policy.cost("VOUCHER"), 15.0);
/// ```
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    labels: Vec<String>,
    default_label: Option<String>,
    costs: Vec<(String, f64)>,
    risk_field: String,
    segment_field: String,
    high_risk_threshold: f64,
    extra: BTreeMap<String, String>,
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|&l| l.to_owned()).collect(),
            default_label: None,
            costs: DEFAULT_COSTS
                .iter()
                .map(|&(l, c)| (l.to_owned(), c))
                .collect(),
            risk_field: DEFAULT_RISK_FIELD.to_owned(),
            segment_field: DEFAULT_SEGMENT_FIELD.to_owned(),
            high_risk_threshold: DEFAULT_HIGH_RISK_THRESHOLD,
            extra: BTreeMap::new(),
        }
    }

    /// Replace the label vocabulary.
    #[must_use]
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        let declared: HashSet<&str> = self.labels.iter().map(String::as_str).collect();
        self.costs.retain(|(l, _)| declared.contains(l.as_str()));
        self
    }

    pub(crate) fn declared_labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Set the default label. Without this call the first declared label is
    /// the default.
    #[must_use]
    pub fn default_label(mut self, label: &str) -> Self {
        self.default_label = Some(label.to_owned());
        self
    }

    #[must_use]
    pub fn cost(mut self, label: &str, cost: f64) -> Self {
        self.costs.retain(|(l, _)| l != label);
        self.costs.push((label.to_owned(), cost));
        self
    }

    #[must_use]
    pub fn risk_field(mut self, name: &str) -> Self {
        name.clone_into(&mut self.risk_field);
        self
    }

    #[must_use]
    pub fn segment_field(mut self, name: &str) -> Self {
        name.clone_into(&mut self.segment_field);
        self
    }

    #[must_use]
    pub fn high_risk_threshold(mut self, value: f64) -> Self {
        self.high_risk_threshold = value;
        self
    }

    #[must_use]
    pub fn extra(mut self, key: &str, value: &str) -> Self {
        self.extra.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Validate and build the policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the vocabulary is empty or malformed, the
    /// default label or a cost refers to an undeclared label, a cost is
    /// negative or non-finite, the threshold is non-finite, or a field name
    /// is not an identifier.
    pub fn build(self) -> Result<Policy, ConfigError> {
        if self.labels.is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }

        let mut labels = Vec::with_capacity(self.labels.len());
        let mut seen = HashSet::new();
        for name in self.labels {
            let label = Label::new(name);
            if !label.is_identifier() {
                return Err(ConfigError::InvalidLabel {
                    label: label.to_string(),
                });
            }
            if !seen.insert(label.clone()) {
                return Err(ConfigError::DuplicateLabel {
                    label: label.to_string(),
                });
            }
            labels.push(label);
        }

        let default_label = match self.default_label {
            Some(name) if seen.contains(name.as_str()) => Label::new(name),
            Some(name) => return Err(ConfigError::UnknownDefaultLabel { label: name }),
            None => labels[0].clone(),
        };

        let mut costs = BTreeMap::new();
        for (name, cost) in self.costs {
            if !seen.contains(name.as_str()) {
                return Err(ConfigError::UnknownCostLabel { label: name });
            }
            if !cost.is_finite() || cost < 0.0 {
                return Err(ConfigError::InvalidCost { label: name, cost });
            }
            costs.insert(Label::new(name), cost);
        }

        if !self.high_risk_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold {
                value: self.high_risk_threshold,
            });
        }

        for name in [&self.risk_field, &self.segment_field] {
            if !is_field_name(name) {
                return Err(ConfigError::InvalidFieldName { name: name.clone() });
            }
        }

        Ok(Policy {
            labels,
            default_label,
            costs,
            risk_field: self.risk_field,
            segment_field: self.segment_field,
            high_risk_threshold: self.high_risk_threshold,
            extra: self.extra,
        })
    }
}

/// `[A-Za-z_][A-Za-z0-9_.]*`, the same shape the rule grammar accepts for variables.
pub(crate) fn is_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
