//! Locating and loading the configuration for a run.
//!
//! Lookup order, first hit wins:
//!
//! 1. `--config <file>`
//! 2. `cop-lint.toml`, then `.cop-lint.toml`, in the checked directory
//! 3. a `[tool.cop-lint]` table in the checked directory's `pyproject.toml`
//! 4. `$COP_LINT_CONFIG_DIR/config.toml`, else `~/.cop-lint/config.toml`
//! 5. built-in defaults

use anyhow::{Context, Result};
use cop_lint_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// A `cop-lint.toml` next to the sources.
    Project(PathBuf),
    /// The `[tool.cop-lint]` table of a `pyproject.toml`.
    Pyproject(PathBuf),
    /// The per-user file.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the file backing this source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Pyproject(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and parses the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// [`Config`].
    pub fn load(&self) -> Result<Config> {
        match self {
            Self::Default => Ok(Config::default()),
            Self::Pyproject(p) => load_pyproject(p),
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => {
                if matches!(self, Self::Global(_)) {
                    tracing::info!("Using global config: {}", p.display());
                }
                Config::from_file(p)
                    .with_context(|| format!("Failed to load config: {}", p.display()))
            }
        }
    }
}

const PROJECT_FILES: &[&str] = &["cop-lint.toml", ".cop-lint.toml"];
const PYPROJECT_FILE: &str = "pyproject.toml";
const TOOL_TABLE: &str = "cop-lint";
const GLOBAL_FILE: &str = "config.toml";

/// Finds the configuration for checking `target` (a directory or a file).
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    let dir = if target.is_file() {
        target.parent().unwrap_or(Path::new("."))
    } else {
        target
    };
    resolve_in(dir, explicit, global_config_dir())
}

fn resolve_in(dir: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    let pyproject = dir.join(PYPROJECT_FILE);
    if has_tool_table(&pyproject) {
        tracing::debug!("Found [tool.{TOOL_TABLE}] in {}", pyproject.display());
        return ConfigSource::Pyproject(pyproject);
    }

    match global_dir.map(|d| d.join(GLOBAL_FILE)) {
        Some(global) if global.is_file() => {
            tracing::debug!("Found global config: {}", global.display());
            ConfigSource::Global(global)
        }
        _ => ConfigSource::Default,
    }
}

/// `$COP_LINT_CONFIG_DIR`, else `~/.cop-lint`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os("COP_LINT_CONFIG_DIR") {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|h| h.join(".cop-lint")),
    }
}

fn tool_table(content: &str) -> Option<toml::Value> {
    let document: toml::Value = toml::from_str(content).ok()?;
    document.get("tool")?.get(TOOL_TABLE).cloned()
}

fn has_tool_table(pyproject: &Path) -> bool {
    std::fs::read_to_string(pyproject)
        .ok()
        .and_then(|content| tool_table(&content))
        .is_some()
}

fn load_pyproject(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let table = tool_table(&content)
        .with_context(|| format!("No [tool.{TOOL_TABLE}] table in {}", path.display()))?;
    table
        .try_into::<Config>()
        .with_context(|| format!("Invalid [tool.{TOOL_TABLE}] table in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cop_lint_core::TemporaryVariableMode;
    use std::fs;
    use tempfile::TempDir;

    const PYPROJECT: &str = r#"
[project]
name = "service"

[tool.cop-lint.lint]
min_name_length = 6
temporary_variable = "first-in-scope"

[tool.cop-lint.rules.final-class]
enabled = false
"#;

    #[test]
    fn explicit_wins_without_existence_check() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("cop-lint.toml"), "").unwrap();

        let result = resolve_in(tmp.path(), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn plain_name_preferred_over_dotted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".cop-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_in(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join(".cop-lint.toml"))
        );

        fs::write(tmp.path().join("cop-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_in(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join("cop-lint.toml"))
        );
    }

    #[test]
    fn pyproject_needs_tool_table() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pyproject.toml"), "[project]\nname = \"x\"\n").unwrap();
        assert_eq!(resolve_in(tmp.path(), None, None), ConfigSource::Default);

        fs::write(tmp.path().join("pyproject.toml"), PYPROJECT).unwrap();
        assert_eq!(
            resolve_in(tmp.path(), None, None),
            ConfigSource::Pyproject(tmp.path().join("pyproject.toml"))
        );
    }

    #[test]
    fn pyproject_table_loads_as_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pyproject.toml");
        fs::write(&path, PYPROJECT).unwrap();

        let config = ConfigSource::Pyproject(path).load().unwrap();
        assert_eq!(config.lint.min_name_length, 6);
        assert_eq!(
            config.lint.temporary_variable,
            TemporaryVariableMode::FirstInScope
        );
        assert!(!config.is_rule_enabled(&["final-class"]));
    }

    #[test]
    fn project_file_beats_pyproject_and_global() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(project.path().join("cop-lint.toml"), "").unwrap();
        fs::write(project.path().join("pyproject.toml"), PYPROJECT).unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_in(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn global_fallback_and_default() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let global_dir = Some(global.path().to_path_buf());
        assert_eq!(
            resolve_in(project.path(), None, global_dir.clone()),
            ConfigSource::Default
        );

        fs::write(global.path().join("config.toml"), "").unwrap();
        assert_eq!(
            resolve_in(project.path(), None, global_dir),
            ConfigSource::Global(global.path().join("config.toml"))
        );
    }

    #[test]
    fn file_target_uses_its_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("module.py");
        fs::write(&file, "").unwrap();
        fs::write(tmp.path().join("cop-lint.toml"), "").unwrap();

        let result = resolve(&file, None);
        assert_eq!(result, ConfigSource::Project(tmp.path().join("cop-lint.toml")));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cop-lint.toml");
        fs::write(&path, "[lint\n").unwrap();
        assert!(ConfigSource::Project(path).load().is_err());
        assert!(ConfigSource::Default.load().is_ok());
        assert!(ConfigSource::Default.path().is_none());
    }
}
