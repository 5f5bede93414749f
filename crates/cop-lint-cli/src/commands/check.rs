//! Check command implementation.

use anyhow::{bail, Context, Result};
use cop_lint_core::{AnalyzerConfig, FileReport, LintResult, Linter};
use cop_lint_rules::select_rules;
use cop_lint_ts::PythonParser;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::resolver::SearchPathResolver;
use crate::OutputFormat;

/// Command line options of `cop-lint check`.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Extra import search directories.
    pub python_path: Vec<PathBuf>,
}

/// Runs the check command.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<()> {
    match source.path() {
        Some(p) => tracing::debug!("Config: {}", p.display()),
        None => tracing::debug!("Config: built-in defaults"),
    }
    let mut config = source.load()?;
    config.analyzer.exclude.extend(options.exclude.iter().cloned());
    config
        .analyzer
        .python_path
        .extend(options.python_path.iter().cloned());

    let root = if config.analyzer.root.is_absolute() {
        config.analyzer.root.clone()
    } else if path.is_file() {
        path.to_path_buf()
    } else {
        path.join(&config.analyzer.root)
    };
    // Report paths and import lookups are relative to this directory.
    let base = if root.is_file() {
        root.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    } else {
        root.clone()
    };

    let keys = rule_keys(options.rules.as_deref());
    let rules = select_rules(&keys);
    if rules.is_empty() {
        bail!("No rules match --rules {}", keys.join(","));
    }

    let mut search_paths = vec![base.clone()];
    search_paths.extend(config.analyzer.python_path.iter().cloned());

    let analyzer = config.analyzer.clone();
    let linter = Linter::builder()
        .rules(rules)
        .select(keys.iter().cloned())
        .config(config)
        .resolver(SearchPathResolver::new(search_paths))
        .build()
        .context("Failed to build linter")?;

    let parser = PythonParser::new();
    let files = discover_files(&root, &analyzer, parser.extensions())?;

    tracing::info!(
        "Checking {} file(s) under {} with {} rule(s)",
        files.len(),
        root.display(),
        linter.rule_count()
    );

    let reports: Vec<FileReport> = files
        .par_iter()
        .filter_map(|file| check_file(&linter, &parser, &base, file))
        .collect();

    let mut result = LintResult::new();
    for report in reports {
        result.push(report);
    }
    result.sort();

    tracing::info!(
        "Found {} violation(s) in {} file(s)",
        result.violation_count(),
        result.files_checked
    );

    super::output::print(&result, options.format, &base, linter.lint_config())?;

    if result.has_violations() {
        std::process::exit(1);
    }

    Ok(())
}

fn rule_keys(filter: Option<&str>) -> Vec<String> {
    filter
        .map(|filter| {
            filter
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Lints one file. Unreadable or unparsable files are skipped with a
/// warning and do not count as checked.
fn check_file(
    linter: &Linter,
    parser: &PythonParser,
    root: &Path,
    file: &Path,
) -> Option<FileReport> {
    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Skipping unreadable file {}: {e}", file.display());
            return None;
        }
    };
    let tree = match parser.parse(&content) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::warn!("Skipping {}: {e}", file.display());
            return None;
        }
    };

    let rel = file.strip_prefix(root).unwrap_or(file);
    Some(linter.check_file(rel, &content, &tree))
}

/// Finds Python sources under `root`, honouring `.gitignore` and the
/// configured exclude globs. Sorted for stable output.
fn discover_files(
    root: &Path,
    analyzer: &AnalyzerConfig,
    extensions: &[&str],
) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let excludes = analyzer
        .exclude
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern).with_context(|| format!("Invalid exclude glob: {pattern}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(analyzer.respect_gitignore)
        .filter_entry(|entry| entry.file_name() != ".git");

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.context("Failed to walk source tree")?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        if !extensions.contains(&ext.as_str()) {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        if excludes
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(rel))
        {
            tracing::debug!("Excluding: {}", path.display());
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn rule_keys_split_and_trim() {
        assert_eq!(
            rule_keys(Some("COP001, final-class,,")),
            vec!["COP001".to_string(), "final-class".to_string()]
        );
        assert!(rule_keys(None).is_empty());
    }

    #[test]
    fn discovers_python_sources_and_applies_excludes() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("pkg/migrations")).unwrap();
        fs::create_dir_all(root.join(".venv/lib")).unwrap();
        fs::write(root.join("pkg/models.py"), "").unwrap();
        fs::write(root.join("pkg/stubs.pyi"), "").unwrap();
        fs::write(root.join("pkg/README.md"), "").unwrap();
        fs::write(root.join("pkg/migrations/0001_initial.py"), "").unwrap();
        fs::write(root.join(".venv/lib/site.py"), "").unwrap();

        let analyzer = AnalyzerConfig {
            exclude: vec!["**/.venv/**".to_string(), "**/migrations/**".to_string()],
            ..AnalyzerConfig::default()
        };
        let files = discover_files(root, &analyzer, &[".py", ".pyi"]).unwrap();
        let rel: Vec<PathBuf> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![PathBuf::from("pkg/models.py"), PathBuf::from("pkg/stubs.pyi")]
        );
    }

    #[test]
    fn single_file_root_is_checked_directly() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("script.py");
        fs::write(&file, "").unwrap();

        let files = discover_files(&file, &AnalyzerConfig::default(), &[".py"]).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn check_file_reports_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("module.py");
        fs::write(&file, "class Repo:\n    pass\n").unwrap();

        let linter = Linter::builder()
            .rules(select_rules::<&str>(&["final-class"]))
            .build()
            .unwrap();
        let parser = PythonParser::new();
        let report = check_file(&linter, &parser, tmp.path(), &file).unwrap();

        assert_eq!(report.path, PathBuf::from("module.py"));
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].code.code, "COP012");
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let linter = Linter::builder().build().unwrap();
        let parser = PythonParser::new();
        assert!(check_file(&linter, &parser, tmp.path(), &tmp.path().join("missing.py")).is_none());
    }
}
