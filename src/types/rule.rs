use std::fmt;

use super::expr::Expression;
use super::label::Label;

/// One entry of an ordered rule list.
///
/// Rules are produced by parsing a rule block with
/// [`RuleSet::from_document()`](super::RuleSet::from_document) or built with
/// [`RuleSetBuilder`](super::RuleSetBuilder).
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// `IF <condition> THEN RETURN <result>`
    Conditional {
        condition: Expression,
        result: Label,
    },
    /// `RETURN <result>`; always matches and ends evaluation.
    Fallback { result: Label },
}

impl Rule {
    #[must_use]
    pub fn result(&self) -> &Label {
        match self {
            Rule::Conditional { result, .. } | Rule::Fallback { result } => result,
        }
    }

    #[must_use]
    pub fn condition(&self) -> Option<&Expression> {
        match self {
            Rule::Conditional { condition, .. } => Some(condition),
            Rule::Fallback { .. } => None,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Rule::Fallback { .. })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Conditional { condition, result } => {
                write!(f, "IF {condition} THEN RETURN {result}")
            }
            Rule::Fallback { result } => write!(f, "RETURN {result}"),
        }
    }
}

/// A rule together with the 1-based source line it was read from.
///
/// Rules built programmatically are numbered by their position instead.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    pub(crate) rule: Rule,
    pub(crate) line: usize,
}

impl CompiledRule {
    pub(crate) fn new(rule: Rule, line: usize) -> Self {
        Self { rule, line }
    }

    #[must_use]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}
