use offer_rules::{var, Bindings, RuleSetBuilder};

fn main() {
    let ruleset = RuleSetBuilder::new()
        .when(var("churn_score").lt(0.4), "NO_OFFER")
        .when(
            var("segment").eq("VIP").and(var("churn_score").gte(0.7)),
            "BIG",
        )
        .when(var("segment").eq("STANDARD"), "MEDIUM")
        .otherwise("SMALL")
        .compile()
        .expect("failed to compile ruleset");

    println!("{ruleset}");

    let record = Bindings::new()
        .set("churn_score", 0.82)
        .set("segment", "VIP");

    let decision = ruleset.evaluate(&record);
    println!("Result: {decision}");
}
