use offer_rules::{Bindings, Policy, RuleSet};

fn main() {
    let policy = Policy::builder()
        .labels(["NONE", "A", "B"])
        .build()
        .expect("failed to build policy");

    let ruleset = RuleSet::from_rules(
        "IF true THEN RETURN A\nIF true THEN RETURN B",
        policy,
    );

    for segment in ["VIP", "STANDARD", "OTHER"] {
        let record = Bindings::new()
            .set("churn_score", 0.5)
            .set("segment", segment);
        let decision = ruleset.evaluate(&record);
        println!("{segment:>8}: {decision}");
    }
}
