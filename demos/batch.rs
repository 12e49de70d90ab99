use offer_rules::{compile, Bindings, DEFAULT_DOCUMENT};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let ruleset = compile(DEFAULT_DOCUMENT);

    let raw = [
        ("C-001", "VIP", 2, 110, "Month-to-month"),
        ("C-002", "STANDARD", 40, 65, "Two year"),
        ("C-003", "OTHER", 1, 130, "Month-to-month"),
        ("C-004", "VIP", 60, 90, "One year"),
        ("C-005", "", 12, 50, "Month-to-month"),
    ];

    let records: Vec<Bindings> = raw
        .iter()
        .map(|&(id, segment, tenure, charges, contract)| {
            Bindings::new()
                .set("customer_id", id)
                .set("segment", segment)
                .set("tenure", tenure)
                .set("monthly_charges", charges)
                .set("contract", contract)
                .with_churn_score(ruleset.policy())
        })
        .collect();

    let outcome = ruleset.evaluate_batch(&records);

    for (record, decision) in records.iter().zip(&outcome.decisions) {
        let id = record
            .get("customer_id")
            .and_then(|v| v.as_str())
            .unwrap_or("?");
        println!("{id}: {decision}");
    }
    println!("\n{}", outcome.summary);
}
