//! List rules command implementation.

use matlint_rules::{standard_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    print!("{}", render());
}

fn render() -> String {
    use std::fmt::Write;

    let mut out = String::from("Available rules:\n\n");
    let _ = writeln!(
        out,
        "{:<6} {:<26} {:<8} {:<16} Description",
        "Id", "Name", "Level", "Category"
    );
    let _ = writeln!(out, "{}", "-".repeat(96));

    for rule in standard_rules() {
        let marker = if rule.advisory { " (advisory)" } else { "" };
        let _ = writeln!(
            out,
            "{:<6} {:<26} {:<8} {:<16} {}{}",
            rule.id,
            rule.name,
            rule.severity.to_string(),
            rule.category.to_string(),
            rule.description,
            marker
        );
    }

    out.push_str("\nPresets:\n");
    for preset in Preset::ALL {
        let ids: Vec<&str> = preset
            .rules()
            .iter()
            .filter(|r| !r.advisory)
            .map(|r| r.id)
            .collect();
        let default = if preset == Preset::default() { " (default)" } else { "" };
        let _ = writeln!(
            out,
            "  {:<12} - {} rule(s){}: {}",
            preset.name(),
            ids.len(),
            default,
            ids.join(", ")
        );
    }

    out.push_str("\nAdvisory rules are listed for reference and never produce findings.\n");
    out.push_str("\nUse --rules to run specific rules, by id or name:\n");
    out.push_str("  matlint check --rules N001,S001\n");
    out.push_str("  matlint check --rules function-name-case,no-global\n");
    out
}
