use tracing::warn;
use winnow::ascii::{space0, till_line_ending};
use winnow::combinator::separated_pair;
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::take_while;

use crate::types::policy::is_field_name;
use crate::{Label, Policy, PolicyBuilder};

fn key<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| {
        c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
    })
    .parse_next(input)
}

fn entry<'i>(input: &mut &'i str) -> ModalResult<(&'i str, &'i str)> {
    separated_pair(
        key,
        (space0, '=', space0),
        till_line_ending.map(str::trim_end),
    )
    .verify(|(_, value): &(&str, &str)| !value.is_empty())
    .parse_next(input)
}

fn parse_number(key: &str, raw: &str) -> Option<f64> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(
                key,
                value = raw,
                "policy value is not a finite number; keeping default"
            );
            None
        }
    }
}

/// Build a [`Policy`] from the lines of a `[POLICY]` block.
///
/// Never fails: malformed lines and invalid values are logged and the
/// affected setting keeps its default.
pub(crate) fn policy_from_lines<'a>(lines: impl IntoIterator<Item = (usize, &'a str)>) -> Policy {
    let mut entries: Vec<(usize, &str, &str)> = Vec::new();
    for (line_no, raw) in lines {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }
        match entry.parse(line) {
            Ok((k, v)) => entries.push((line_no, k, v)),
            Err(_) => warn!(
                line = line_no,
                text = line,
                "ignoring malformed policy line"
            ),
        }
    }

    let lookup = |name: &str| {
        entries
            .iter()
            .rev()
            .find(|(_, k, _)| *k == name)
            .map(|(_, _, v)| *v)
    };

    let mut builder = PolicyBuilder::new();

    if let Some(raw) = lookup("LABELS") {
        let labels: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let all_valid = !labels.is_empty()
            && labels.iter().all(|l| Label::new(*l).is_identifier())
            && labels
                .iter()
                .enumerate()
                .all(|(i, l)| !labels[..i].contains(l));
        if all_valid {
            builder = builder.labels(labels.iter().copied());
        } else {
            warn!(
                value = raw,
                "invalid LABELS list; keeping the default vocabulary"
            );
        }
    }
    let vocabulary: Vec<String> = builder.declared_labels().map(str::to_owned).collect();

    if let Some(raw) = lookup("DEFAULT_LABEL") {
        if vocabulary.iter().any(|l| l == raw) {
            builder = builder.default_label(raw);
        } else {
            warn!(
                value = raw,
                "DEFAULT_LABEL is not in the vocabulary; ignoring"
            );
        }
    }

    let threshold_key = if lookup("HIGH_RISK_THRESHOLD").is_some() {
        "HIGH_RISK_THRESHOLD"
    } else {
        "MED_THRESHOLD"
    };
    if let Some(raw) = lookup(threshold_key) {
        if let Some(v) = parse_number(threshold_key, raw) {
            builder = builder.high_risk_threshold(v);
        }
    }

    for (field_key, is_risk) in [("RISK_FIELD", true), ("SEGMENT_FIELD", false)] {
        if let Some(raw) = lookup(field_key) {
            if !is_field_name(raw) {
                warn!(
                    key = field_key,
                    value = raw,
                    "invalid field name; keeping default"
                );
            } else if is_risk {
                builder = builder.risk_field(raw);
            } else {
                builder = builder.segment_field(raw);
            }
        }
    }

    for &(line_no, k, raw) in &entries {
        match k {
            "LABELS" | "DEFAULT_LABEL" | "HIGH_RISK_THRESHOLD" | "RISK_FIELD"
            | "SEGMENT_FIELD" => {}
            "MED_THRESHOLD" if threshold_key == "MED_THRESHOLD" => {}
            _ => {
                if let Some(label) = k.strip_prefix("COST_") {
                    if !vocabulary.iter().any(|l| l == label) {
                        warn!(line = line_no, label, "cost for undeclared label; ignoring");
                        continue;
                    }
                    match parse_number(k, raw) {
                        Some(cost) if cost >= 0.0 => builder = builder.cost(label, cost),
                        Some(cost) => warn!(
                            line = line_no,
                            label,
                            cost,
                            "negative cost; keeping default"
                        ),
                        None => {}
                    }
                } else {
                    builder = builder.extra(k, raw);
                }
            }
        }
    }

    match builder.build() {
        Ok(policy) => policy,
        Err(err) => {
            warn!(error = %err, "policy block rejected; using the default policy");
            Policy::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<(usize, &str)> {
        text.lines().enumerate().map(|(i, l)| (i + 1, l)).collect()
    }

    #[test]
    fn entry_parser() {
        assert_eq!(
            entry.parse("COST_BIG=50").map_err(|_| ()),
            Ok(("COST_BIG", "50"))
        );
        assert_eq!(
            entry.parse("COST_BIG = 50  ").map_err(|_| ()),
            Ok(("COST_BIG", "50"))
        );
        assert!(entry.parse("cost_big=50").is_err());
        assert!(entry.parse("COST_BIG=").is_err());
        assert!(entry.parse("COST_BIG 50").is_err());
    }

    #[test]
    fn empty_block_is_default() {
        assert_eq!(policy_from_lines(Vec::new()), Policy::default());
    }

    #[test]
    fn reads_costs_and_threshold() {
        let policy = policy_from_lines(lines(
            "COST_SMALL=12\nCOST_MEDIUM=30\nCOST_BIG=60\nHIGH_RISK_THRESHOLD=0.65",
        ));
        assert_eq!(policy.cost("SMALL"), 12.0);
        assert_eq!(policy.cost("MEDIUM"), 30.0);
        assert_eq!(policy.cost("BIG"), 60.0);
        assert!((policy.high_risk_threshold() - 0.65).abs() < f64::EPSILON);
    }

    #[test]
    fn med_threshold_is_an_alias() {
        let policy = policy_from_lines(lines("MED_THRESHOLD=0.6"));
        assert!((policy.high_risk_threshold() - 0.6).abs() < f64::EPSILON);
        assert_eq!(policy.extra("MED_THRESHOLD"), None);

        let policy = policy_from_lines(lines("MED_THRESHOLD=0.6\nHIGH_RISK_THRESHOLD=0.8"));
        assert!((policy.high_risk_threshold() - 0.8).abs() < f64::EPSILON);
        assert_eq!(policy.extra("MED_THRESHOLD"), Some("0.6"));
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let policy = policy_from_lines(lines(
            "COST_BIG=lots\nCOST_SMALL=-4\nHIGH_RISK_THRESHOLD=high\nRISK_FIELD=churn score",
        ));
        assert_eq!(policy.cost("BIG"), 50.0);
        assert_eq!(policy.cost("SMALL"), 10.0);
        assert!((policy.high_risk_threshold() - 0.70).abs() < f64::EPSILON);
        assert_eq!(policy.risk_field(), "churn_score");
    }

    #[test]
    fn custom_vocabulary_and_default() {
        let policy = policy_from_lines(lines(
            "LABELS=NONE, VOUCHER, UPGRADE\nDEFAULT_LABEL=NONE\nCOST_VOUCHER=15\nCOST_BIG=99",
        ));
        assert_eq!(policy.labels().len(), 3);
        assert_eq!(policy.default_label(), &Label::new("NONE"));
        assert_eq!(policy.cost("VOUCHER"), 15.0);
        assert_eq!(policy.cost("BIG"), 0.0);
        assert!(!policy.is_known("BIG"));
    }

    #[test]
    fn invalid_vocabulary_is_ignored() {
        let policy = policy_from_lines(lines("LABELS=A,A\nDEFAULT_LABEL=A"));
        assert_eq!(policy.labels().len(), 4);
        assert_eq!(policy.default_label(), &Label::new("NO_OFFER"));
    }

    #[test]
    fn default_label_can_be_overridden() {
        let policy = policy_from_lines(lines("DEFAULT_LABEL=SMALL"));
        assert_eq!(policy.default_label(), &Label::new("SMALL"));
    }

    #[test]
    fn field_names_and_extras() {
        let policy = policy_from_lines(lines(
            "RISK_FIELD=risk\nSEGMENT_FIELD=tier\nLOW_THRESHOLD=0.40\n// note\nnot a setting",
        ));
        assert_eq!(policy.risk_field(), "risk");
        assert_eq!(policy.segment_field(), "tier");
        assert_eq!(policy.extra("LOW_THRESHOLD"), Some("0.40"));
    }

    #[test]
    fn last_duplicate_key_wins() {
        let policy = policy_from_lines(lines("COST_BIG=70\nCOST_BIG=80"));
        assert_eq!(policy.cost("BIG"), 80.0);
    }
}
