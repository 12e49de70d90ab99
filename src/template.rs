/// Starter instruction document: the tiered retention policy written as
/// rules, its `[POLICY]` settings and a flowchart for diagram renderers.
///
/// ```
/// let ruleset = offer_rules::compile(offer_rules::DEFAULT_DOCUMENT);
/// assert!(ruleset.diagnostics().is_empty());
/// assert!(ruleset.has_fallback());
/// ```
pub const DEFAULT_DOCUMENT: &str = r#"Retention offer policy.
Records missing churn_score or segment get NO_OFFER before any rule runs.

[RULES]
// Risk thresholds: LOW 0.40, MED 0.70
IF churn_score < 0.40 THEN RETURN NO_OFFER
IF churn_score < 0.70 AND segment == "VIP" THEN RETURN SMALL
IF churn_score < 0.70 THEN RETURN NO_OFFER
IF segment == "VIP" THEN RETURN BIG
IF segment == "STANDARD" THEN RETURN MEDIUM
IF churn_score >= 0.70 THEN RETURN SMALL
RETURN NO_OFFER

[POLICY]
LOW_THRESHOLD=0.40
MED_THRESHOLD=0.70
COST_SMALL=10
COST_MEDIUM=25
COST_BIG=50

[MERMAID]
flowchart TD
  A([Start]) --> B{Data valid?}
  B -- No --> Z([NO_OFFER])
  B -- Yes --> C{Churn < LOW?}
  C -- Yes --> Z
  C -- No --> D{Churn < MED?}
  D -- Yes --> E{VIP?}
  E -- Yes --> S([SMALL])
  E -- No --> Z
  D -- No --> F{Segment?}
  F -- VIP --> G([BIG])
  F -- STANDARD --> H([MEDIUM])
  F -- other --> S
"#;
