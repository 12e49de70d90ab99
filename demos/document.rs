use offer_rules::parse::Document;
use offer_rules::{compile, Bindings, DEFAULT_DOCUMENT};

fn main() {
    tracing_subscriber::fmt::init();

    let ruleset = compile(DEFAULT_DOCUMENT);
    println!("{ruleset}");
    for rule in ruleset.rules() {
        println!("  line {:>2}: {}", rule.line(), rule.rule());
    }

    let doc = Document::parse(DEFAULT_DOCUMENT);
    if let Some(diagram) = doc.section("MERMAID") {
        println!("\nDiagram source:\n{}", diagram.text());
    }

    // A hand-edited copy with a typo and an undeclared label.
    let edited = DEFAULT_DOCUMENT
        .replace("IF segment == \"VIP\" THEN", "IF segment = \"VIP\" THEN")
        .replace("RETURN MEDIUM", "RETURN PLATINUM");
    let edited = compile(&edited);
    println!("\n{edited}");
    for diagnostic in edited.diagnostics() {
        println!("  {diagnostic}");
    }

    let record = Bindings::new()
        .set("churn_score", 0.9)
        .set("segment", "STANDARD");
    println!("\noriginal: {}", ruleset.evaluate(&record).label());
    println!("edited:   {}", edited.evaluate(&record).label());
}
