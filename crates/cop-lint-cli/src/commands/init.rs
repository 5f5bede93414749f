//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "cop-lint.toml";

const DEFAULT_CONFIG: &str = r#"# cop-lint configuration

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/.venv/**",
    "**/venv/**",
    "**/__pycache__/**",
    "**/migrations/**",
]

# Respect .gitignore files
respect_gitignore = true

# Extra directories searched when resolving `from x import a, b, c`
# python_path = ["./vendor"]

[lint]
# min_name_length = 8
# max_import_names = 2
# loop_variable_prefix = "one_"
# async_forbidden_prefix = "get_"

# "next-line" flags every single-use temporary read on the following line;
# "first-in-scope" flags only the first one per function.
# temporary_variable = "next-line"

# Setting verbs replaces the built-in list
# verbs = ["get", "create", "process"]

# Rule toggles, keyed by rule name or code

# [rules.final-class]
# enabled = false

# [rules.COP011]
# enabled = false
"#;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    let config_path = write_config(Path::new("."), force)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: cop-lint check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}
