//! Init command implementation.

use std::path::Path;

use anyhow::{bail, Context, Result};

const CONFIG_NAME: &str = "matlint.toml";

const DEFAULT_CONFIG: &str = r#"# matlint configuration

# Rule preset: "minimal" (MUST only), "recommended" (MUST + SHOULD), "strict" (all)
preset = "recommended"

# Lowest severity that makes `matlint check` exit with status 1
# fail_on = "must"

[engine]
# Abandon a rule that runs longer than this on one file
# rule_timeout_ms = 5000

# Run the rules of each file in parallel
parallel_rules = false

[files]
# Glob patterns to exclude, relative to the checked directory
exclude = [
    "**/slprj/**",
    "**/codegen/**",
]

extensions = ["m"]

# Respect .gitignore files
respect_gitignore = true

# Per-rule settings: enabled, severity, and rule options

[rules.L001]
max_line_length = 80

[rules.L005]
max_function_lines = 100

# [rules.N004]
# builtins = ["inputname"]

# [rules.G002]
# enabled = true
# severity = "should"
"#;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    let path = write_config(Path::new("."), force)?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to configure rules");
    println!("  2. Run: matlint check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<std::path::PathBuf> {
    let path = dir.join(CONFIG_NAME);

    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
