//! List rules command implementation.

use cop_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<22} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        for code in rule.codes() {
            println!("{:<8} {:<22} {}", code.code, rule.name(), code.description);
        }
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  cop-lint check --rules final-class,temporary-variable");
    println!("  cop-lint check --rules COP001,COP002");
    println!("\nSuppress a finding with a trailing `# noqa: COP011` comment.");
}
