use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, instrument};

use super::decision::Decision;
use super::diagnostic::Diagnostic;
use super::error::ConfigError;
use super::expr::Expression;
use super::label::Label;
use super::policy::Policy;
use super::rule::{CompiledRule, Rule};
use super::summary::BatchOutcome;
use super::Bindings;

/// Builder for constructing a [`RuleSet`] in code.
///
/// Rules are kept in the order they are added; the first rule whose
/// condition holds decides the label.
///
/// # Example
///
/// ```
/// use offer_rules::{var, Bindings, RuleSetBuilder};
///
/// let ruleset = RuleSetBuilder::new()
///     .when(var("churn_score").lt(0.4), "NO_OFFER")
///     .when(var("segment").eq("VIP"), "BIG")
///     .otherwise("SMALL")
///     .compile()
///     .unwrap();
///
/// let record = Bindings::new().set("churn_score", 0.8).set("segment", "VIP");
/// assert_eq!(ruleset.evaluate(&record).label().as_str(), "BIG");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    policy: Policy,
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `policy` instead of the default retention policy.
    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Append `IF <condition> THEN RETURN <label>`.
    #[must_use]
    pub fn when(mut self, condition: Expression, label: &str) -> Self {
        self.rules.push(Rule::Conditional {
            condition,
            result: Label::new(label),
        });
        self
    }

    /// Append an unconditional `RETURN <label>`.
    #[must_use]
    pub fn otherwise(mut self, label: &str) -> Self {
        self.rules.push(Rule::Fallback {
            result: Label::new(label),
        });
        self
    }

    /// Append an already built rule.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Compile the rules into an immutable `RuleSet`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRuleLabel`] if a rule returns a label
    /// that is not in the policy vocabulary.
    pub fn compile(self) -> Result<RuleSet, ConfigError> {
        crate::compile::compile_strict(self.rules, self.policy)
    }
}

/// A compiled, immutable rule list together with its policy.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) policy: Policy,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl RuleSet {
    /// Compile an instruction document.
    ///
    /// Rules come from the `[RULES]` section, or from the text before the
    /// first section header when there is none. The policy comes from the
    /// `[POLICY]` section. Never fails; problems are reported through
    /// [`diagnostics()`](Self::diagnostics).
    #[must_use]
    pub fn from_document(text: &str) -> Self {
        let doc = crate::parse::Document::parse(text);
        let parsed = crate::parse::rules_of(&doc);
        let policy = crate::parse::policy_of(&doc);
        crate::compile::compile(parsed, policy)
    }

    /// Compile a bare rule block under an explicit policy.
    #[must_use]
    pub fn from_rules(rule_text: &str, policy: Policy) -> Self {
        crate::compile::compile(crate::parse::parse_rule_block(rule_text), policy)
    }

    /// Read an instruction document from a file and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be read.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_document(&text))
    }

    /// Decide the label for one record.
    pub fn evaluate(&self, bindings: &Bindings) -> Decision {
        crate::evaluate::evaluate(&self.rules, &self.policy, bindings)
    }

    /// Decide every record and aggregate the results.
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn evaluate_batch(&self, records: &[Bindings]) -> BatchOutcome {
        let decisions: Vec<Decision> = records.iter().map(|r| self.evaluate(r)).collect();
        let summary = crate::aggregate::aggregate(&self.policy, records, &decisions);
        debug!(
            cost = summary.total_cost(),
            coverage = summary.coverage(),
            "batch evaluated"
        );
        BatchOutcome { decisions, summary }
    }

    /// The executable rules, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Skipped and unreachable lines, ordered by line number.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether the rule list ends in an unconditional `RETURN`.
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.rules.last().is_some_and(|r| r.rule.is_fallback())
    }

    /// Every variable name any rule condition reads.
    #[must_use]
    pub fn referenced_variables(&self) -> BTreeSet<&str> {
        self.rules
            .iter()
            .filter_map(|r| r.rule.condition())
            .flat_map(Expression::variables)
            .collect()
    }
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules && self.policy == other.policy
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleSet({} rules, {} labels, {} diagnostics)",
            self.rules.len(),
            self.policy.labels().len(),
            self.diagnostics.len(),
        )
    }
}
