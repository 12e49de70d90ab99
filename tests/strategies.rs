use offer_rules::{var, Bindings, CompareOp, Expression, RuleSet, RuleSetBuilder, Value};
use proptest::prelude::*;

// --- Fixed record schema ---
// churn_score     : number (0.00..=1.00)
// segment         : string, one of {"VIP", "STANDARD", "OTHER"}
// tenure          : number (0..=72)
// monthly_charges : number (20..=150)

pub const SEGMENTS: &[&str] = &["VIP", "STANDARD", "OTHER"];
pub const LABELS: &[&str] = &["NO_OFFER", "SMALL", "MEDIUM", "BIG"];

const OPS: &[CompareOp] = &[
    CompareOp::Eq,
    CompareOp::Neq,
    CompareOp::Gt,
    CompareOp::Gte,
    CompareOp::Lt,
    CompareOp::Lte,
];

fn hundredths(n: u32) -> f64 {
    f64::from(n) / 100.0
}

/// Generate a record that passes the data-quality gate.
pub fn arb_record() -> impl Strategy<Value = Bindings> {
    (
        0_u32..=100,
        prop::sample::select(SEGMENTS),
        0_i64..=72,
        20_i64..=150,
    )
        .prop_map(|(churn, segment, tenure, charges)| {
            Bindings::new()
                .set("churn_score", hundredths(churn))
                .set("segment", segment)
                .set("tenure", tenure)
                .set("monthly_charges", charges)
        })
}

/// A single generated comparison, `field op literal`.
#[derive(Debug, Clone)]
pub struct GenComparison {
    pub field: &'static str,
    pub op: CompareOp,
    pub literal: Value,
}

impl GenComparison {
    #[must_use]
    pub fn to_expr(&self) -> Expression {
        let v = var(self.field);
        let literal = self.literal.clone();
        match self.op {
            CompareOp::Eq => v.eq(literal),
            CompareOp::Neq => v.neq(literal),
            CompareOp::Gt => v.gt(literal),
            CompareOp::Gte => v.gte(literal),
            CompareOp::Lt => v.lt(literal),
            CompareOp::Lte => v.lte(literal),
        }
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        format!("{} {} {}", self.field, self.op, self.literal)
    }
}

/// Generate a comparison on a field from the schema, or on a field that is
/// never bound.
pub fn arb_comparison() -> impl Strategy<Value = GenComparison> {
    let op = prop::sample::select(OPS);
    prop_oneof![
        (op.clone(), 0_u32..=100).prop_map(|(op, n)| GenComparison {
            field: "churn_score",
            op,
            literal: Value::Number(hundredths(n)),
        }),
        (op.clone(), 0_u32..=72).prop_map(|(op, n)| GenComparison {
            field: "tenure",
            op,
            literal: Value::Number(f64::from(n)),
        }),
        (op.clone(), 20_u32..=150).prop_map(|(op, n)| GenComparison {
            field: "monthly_charges",
            op,
            literal: Value::Number(f64::from(n)),
        }),
        (op.clone(), prop::sample::select(SEGMENTS)).prop_map(|(op, s)| GenComparison {
            field: "segment",
            op,
            literal: Value::from(s),
        }),
        (op, 0_u32..=10).prop_map(|(op, n)| GenComparison {
            field: "undefined_field",
            op,
            literal: Value::Number(f64::from(n)),
        }),
    ]
}

/// A condition as the rule language writes it: comparisons joined by
/// `AND`/`OR`, folded left to right.
#[derive(Debug, Clone)]
pub struct GenCondition {
    pub first: GenComparison,
    /// `(is_and, comparison)` pairs.
    pub rest: Vec<(bool, GenComparison)>,
}

impl GenCondition {
    #[must_use]
    pub fn to_expr(&self) -> Expression {
        self.rest
            .iter()
            .fold(self.first.to_expr(), |acc, (is_and, cmp)| {
                if *is_and {
                    acc.and(cmp.to_expr())
                } else {
                    acc.or(cmp.to_expr())
                }
            })
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = self.first.to_text();
        for (is_and, cmp) in &self.rest {
            text.push_str(if *is_and { " AND " } else { " OR " });
            text.push_str(&cmp.to_text());
        }
        text
    }
}

pub fn arb_condition() -> impl Strategy<Value = GenCondition> {
    (
        arb_comparison(),
        prop::collection::vec((any::<bool>(), arb_comparison()), 0..=3),
    )
        .prop_map(|(first, rest)| GenCondition { first, rest })
}

/// A generated rule list: conditional rules, then an optional fallback.
#[derive(Debug, Clone)]
pub struct GenRuleSet {
    pub rules: Vec<(GenCondition, &'static str)>,
    pub fallback: Option<&'static str>,
}

impl GenRuleSet {
    /// Build through [`RuleSetBuilder`].
    ///
    /// # Panics
    ///
    /// Panics if the generated rules fail to compile (should not happen
    /// with valid generators).
    #[must_use]
    pub fn build(&self) -> RuleSet {
        let mut builder = RuleSetBuilder::new();
        for (condition, label) in &self.rules {
            builder = builder.when(condition.to_expr(), label);
        }
        if let Some(label) = self.fallback {
            builder = builder.otherwise(label);
        }
        builder.compile().expect("generated ruleset should compile")
    }

    /// Render as a bare rule block, one rule per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = self
            .rules
            .iter()
            .map(|(condition, label)| {
                let condition = condition.to_text();
                format!("IF {condition} THEN RETURN {label}")
            })
            .collect();
        if let Some(label) = self.fallback {
            lines.push(format!("RETURN {label}"));
        }
        lines.join("\n")
    }

    /// Index of the rule that should fire for `record`, first match wins.
    #[must_use]
    pub fn expected_index(&self, record: &Bindings) -> Option<usize> {
        self.rules
            .iter()
            .position(|(condition, _)| condition.to_expr().evaluate(record))
            .or(self.fallback.map(|_| self.rules.len()))
    }
}

pub fn arb_ruleset() -> impl Strategy<Value = GenRuleSet> {
    (
        prop::collection::vec((arb_condition(), prop::sample::select(LABELS)), 0..=6),
        prop::option::of(prop::sample::select(LABELS)),
    )
        .prop_map(|(rules, fallback)| GenRuleSet { rules, fallback })
}
