mod error;
mod grammar;
mod parser;
mod policy;
mod section;

pub use error::ParseError;
pub use parser::ParsedRules;
pub use section::{Document, Section, POLICY_SECTION, RULES_SECTION};

use tracing::warn;

use crate::{Expression, Policy};

/// Parse the rule block of an instruction document.
///
/// Never fails. Malformed lines become diagnostics. Without a `[RULES]`
/// section the text before the first header is the rule block, and a blank
/// one yields an empty rule list.
#[must_use]
pub fn parse_rules(text: &str) -> ParsedRules {
    let doc = Document::parse(text);
    rules_of(&doc)
}

/// Parse bare rule lines, without looking for section headers.
#[must_use]
pub fn parse_rule_block(text: &str) -> ParsedRules {
    parser::parse_lines(text.lines().enumerate().map(|(i, l)| (i + 1, l)))
}

/// Read the `[POLICY]` block of an instruction document, or the default
/// policy when there is none.
#[must_use]
pub fn parse_policy(text: &str) -> Policy {
    let doc = Document::parse(text);
    policy_of(&doc)
}

/// Parse a single condition such as `segment == "VIP" AND tenure < 6`.
///
/// # Errors
///
/// Returns [`ParseError`] if the text is not a complete condition.
pub fn parse_condition(text: &str) -> Result<Expression, ParseError> {
    use winnow::Parser;
    let parsed = (grammar::expression, winnow::ascii::space0)
        .map(|(expr, _)| expr)
        .parse(text);
    parsed.map_err(|e| {
        let message = e.inner().to_string().replace('\n', "; ");
        ParseError::at(e.offset() + 1, message)
    })
}

pub(crate) fn rules_of(doc: &Document<'_>) -> ParsedRules {
    match doc.rule_block() {
        Some(block) => parser::parse_lines(block.lines()),
        None => {
            warn!("no rule block in document; no rules loaded");
            ParsedRules::default()
        }
    }
}

pub(crate) fn policy_of(doc: &Document<'_>) -> Policy {
    doc.policy_block()
        .map(|block| policy::policy_from_lines(block.lines()))
        .unwrap_or_default()
}
