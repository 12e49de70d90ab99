use tracing::{debug, warn};

use crate::parse::{ParseError, ParsedRules};
use crate::{CompiledRule, ConfigError, Diagnostic, Policy, Rule, RuleSet};

/// Turn parsed rule lines into an executable [`RuleSet`].
///
/// Rules returning a label outside the policy vocabulary are skipped, and
/// rules following the first `RETURN` are dropped as unreachable. Both
/// produce diagnostics, never errors.
pub(crate) fn compile(parsed: ParsedRules, policy: Policy) -> RuleSet {
    let ParsedRules {
        rules: candidates,
        mut diagnostics,
    } = parsed;

    let mut rules: Vec<CompiledRule> = Vec::with_capacity(candidates.len());
    let mut fallback_line: Option<usize> = None;

    for compiled in candidates {
        let label = compiled.rule.result();
        if !policy.is_known(label.as_str()) {
            let reason = ParseError::new(format!("label '{label}' is not in the vocabulary"));
            warn!(line = compiled.line, label = %label, "skipping rule with undeclared label");
            diagnostics.push(Diagnostic::skipped(
                compiled.line,
                &compiled.rule.to_string(),
                reason,
            ));
            continue;
        }

        if let Some(fallback) = fallback_line {
            warn!(line = compiled.line, fallback, "dropping unreachable rule");
            diagnostics.push(Diagnostic::unreachable(
                compiled.line,
                &compiled.rule.to_string(),
                fallback,
            ));
            continue;
        }

        if compiled.rule.is_fallback() {
            fallback_line = Some(compiled.line);
        }
        rules.push(compiled);
    }

    diagnostics.sort_by_key(Diagnostic::line);

    debug!(
        rules = rules.len(),
        diagnostics = diagnostics.len(),
        has_fallback = fallback_line.is_some(),
        "compiled rule set"
    );

    RuleSet {
        rules,
        policy,
        diagnostics,
    }
}

/// Strict compilation for programmatically built rule lists.
///
/// Unlike [`compile`], an undeclared label is a hard error. Unreachable rules
/// are still dropped with a diagnostic, numbered by position.
pub(crate) fn compile_strict(rules: Vec<Rule>, policy: Policy) -> Result<RuleSet, ConfigError> {
    for (index, rule) in rules.iter().enumerate() {
        let label = rule.result();
        if !policy.is_known(label.as_str()) {
            return Err(ConfigError::UnknownRuleLabel {
                index,
                label: label.to_string(),
            });
        }
    }

    let parsed = ParsedRules {
        rules: rules
            .into_iter()
            .enumerate()
            .map(|(i, rule)| CompiledRule::new(rule, i + 1))
            .collect(),
        diagnostics: Vec::new(),
    };
    Ok(compile(parsed, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_rule_block;
    use crate::{var, DiagnosticKind, Label};

    #[test]
    fn keeps_rules_in_order() {
        let ruleset = compile(
            parse_rule_block(
                "IF churn_score < 0.4 THEN RETURN NO_OFFER\n\
                 IF segment == \"VIP\" THEN RETURN BIG\n\
                 RETURN SMALL",
            ),
            Policy::default(),
        );
        assert_eq!(ruleset.len(), 3);
        assert!(ruleset.has_fallback());
        assert!(ruleset.diagnostics().is_empty());
        let labels: Vec<&str> = ruleset
            .rules()
            .iter()
            .map(|r| r.rule().result().as_str())
            .collect();
        assert_eq!(labels, vec!["NO_OFFER", "BIG", "SMALL"]);
    }

    #[test]
    fn undeclared_label_is_skipped() {
        let ruleset = compile(
            parse_rule_block("IF x == 1 THEN RETURN PLATINUM\nRETURN SMALL"),
            Policy::default(),
        );
        assert_eq!(ruleset.len(), 1);
        let diag = &ruleset.diagnostics()[0];
        assert_eq!(diag.line(), 1);
        match diag.kind() {
            DiagnosticKind::Skipped(reason) => assert!(reason.message().contains("PLATINUM")),
            other => panic!("expected Skipped, got {other:?}"),
        }
    }

    #[test]
    fn rules_after_fallback_are_unreachable() {
        let ruleset = compile(
            parse_rule_block(
                "RETURN SMALL\n\
                 IF x == 1 THEN RETURN BIG\n\
                 RETURN MEDIUM",
            ),
            Policy::default(),
        );
        assert_eq!(ruleset.len(), 1);
        assert_eq!(ruleset.diagnostics().len(), 2);
        assert!(ruleset.diagnostics().iter().all(Diagnostic::is_unreachable));
        assert_eq!(
            ruleset.diagnostics()[0].kind(),
            &DiagnosticKind::Unreachable { fallback_line: 1 }
        );
    }

    #[test]
    fn diagnostics_sorted_by_line() {
        let ruleset = compile(
            parse_rule_block(
                "RETURN SMALL\n\
                 IF x == 1 THEN RETURN BIG\n\
                 garbage",
            ),
            Policy::default(),
        );
        let lines: Vec<usize> = ruleset.diagnostics().iter().map(Diagnostic::line).collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn strict_rejects_unknown_label() {
        let err = compile_strict(
            vec![Rule::Conditional {
                condition: var("x").eq(1_i64),
                result: Label::new("HUGE"),
            }],
            Policy::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownRuleLabel {
                index: 0,
                label: "HUGE".into()
            }
        );
    }

    #[test]
    fn strict_numbers_rules_by_position() {
        let ruleset = compile_strict(
            vec![
                Rule::Fallback {
                    result: Label::new("SMALL"),
                },
                Rule::Fallback {
                    result: Label::new("BIG"),
                },
            ],
            Policy::default(),
        )
        .unwrap();
        assert_eq!(ruleset.rules()[0].line(), 1);
        assert_eq!(ruleset.diagnostics()[0].line(), 2);
    }
}
