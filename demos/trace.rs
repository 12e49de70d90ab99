use offer_rules::{compile, Bindings, Value};

fn main() {
    let ruleset = compile(
        "IF segment == \"VIP\" AND undefined_field > 5 THEN RETURN BIG\n\
         IF promo > 1 THEN RETURN MEDIUM\n\
         IF segment == VIP THEN RETURN MEDIUM\n\
         IF churn_score >= 0.7 THEN RETURN SMALL",
    );

    let records = [
        Bindings::new()
            .set("churn_score", 0.82)
            .set("segment", "VIP")
            .set("promo", Value::Null),
        Bindings::new()
            .set("churn_score", 0.3)
            .set("segment", "OTHER"),
        Bindings::new().set("segment", "VIP"),
    ];

    for record in &records {
        let decision = ruleset.evaluate(record);
        let trace = decision.trace();
        println!("{} <- {}", decision.label(), trace.outcome());
        println!("  rules checked: {}", trace.rules_checked());
        for fault in trace.faults() {
            println!("  fault: {fault}");
        }
    }
}
