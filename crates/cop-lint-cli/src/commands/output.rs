//! Shared output formatting for lint results.

use anyhow::Result;
use cop_lint_core::{offset_for, LintConfig, LintResult, Violation};
use cop_lint_rules::all_rules;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format. `root` locates the sources
/// behind the report paths for pretty output; `lint` words the messages.
pub fn print(
    result: &LintResult,
    format: OutputFormat,
    root: &Path,
    lint: &LintConfig,
) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result, lint),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result, lint),
        OutputFormat::Pretty => print_pretty(result, root, lint),
    }
    Ok(())
}

fn print_text(result: &LintResult, lint: &LintConfig) {
    print_compact(result, lint);

    let count = result.violation_count();
    if count > 0 {
        println!();
        for (code, n) in result.count_by_code() {
            println!("  {:<8} {n:>4}  {}", code.code, lint.describe(code));
        }
        println!();
    }

    let summary_color = if count > 0 { "\x1b[31m" } else { "\x1b[32m" };
    println!(
        "{}Found {} violation(s) in {} of {} file(s)\x1b[0m",
        summary_color,
        count,
        result.files.len(),
        result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult, lint: &LintConfig) {
    for (path, violation) in result.iter() {
        println!("{}", format_line(path, violation, lint));
    }
}

/// `path:line:col: CODE description`.
fn format_line(path: &Path, violation: &Violation, lint: &LintConfig) -> String {
    format!(
        "{}:{}:{}: {} {}",
        path.display(),
        violation.line,
        violation.column,
        violation.code.code,
        lint.describe(violation.code)
    )
}

fn print_pretty(result: &LintResult, root: &Path, lint: &LintConfig) {
    for report in &result.files {
        let Ok(content) = std::fs::read_to_string(root.join(&report.path)) else {
            tracing::warn!("Cannot reread {}; falling back to compact", report.path.display());
            for violation in &report.violations {
                println!("{}", format_line(&report.path, violation, lint));
            }
            continue;
        };
        let name = report.path.display().to_string();
        for violation in &report.violations {
            let diagnostic = ViolationDiagnostic::new(violation, &name, &content, lint);
            println!("{:?}", miette::Report::new(diagnostic));
        }
    }
    println!(
        "Found {} violation(s) in {} file(s)",
        result.violation_count(),
        result.files_checked
    );
}

/// A violation rendered as a miette diagnostic.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{code}] {message}")]
struct ViolationDiagnostic {
    code: &'static str,
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("{rule}")]
    span: SourceSpan,
    rule: &'static str,
}

impl ViolationDiagnostic {
    fn new(violation: &Violation, name: &str, content: &str, lint: &LintConfig) -> Self {
        let offset = offset_for(content, violation.line, violation.column);
        Self {
            code: violation.code.code,
            message: lint.describe(violation.code).into_owned(),
            src: NamedSource::new(name, content.to_string()),
            span: SourceSpan::from((offset, token_length(content, offset))),
            rule: rule_name(violation),
        }
    }
}

/// Length of the identifier or keyword starting at `offset`, at least 1.
fn token_length(content: &str, offset: usize) -> usize {
    content
        .get(offset..)
        .map(|rest| {
            rest.chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .map(char::len_utf8)
                .sum()
        })
        .unwrap_or(0)
        .max(1)
        .min(content.len().saturating_sub(offset).max(1))
}

fn rule_name(violation: &Violation) -> &'static str {
    all_rules()
        .iter()
        .find(|rule| rule.codes().contains(&violation.code))
        .map_or("", |rule| rule.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cop_lint_core::codes;

    #[test]
    fn diagnostic_spans_the_reported_identifier() {
        let content = "import typing\nclass Repo:\n    pass\n";
        let violation = Violation::new(2, 0, codes::FINAL_CLASS);
        let diagnostic =
            ViolationDiagnostic::new(&violation, "module.py", content, &LintConfig::default());

        assert_eq!(diagnostic.span.offset(), 14);
        assert_eq!(diagnostic.span.len(), 5);
        assert_eq!(diagnostic.rule, "final-class");
        assert_eq!(
            diagnostic.to_string(),
            "[COP012] Classes should be marked typing.final"
        );
    }

    #[test]
    fn lines_use_configured_wording() {
        let violation = Violation::new(3, 4, codes::VARIABLE_NAME_LENGTH);
        let path = Path::new("pkg/module.py");
        assert_eq!(
            format_line(path, &violation, &LintConfig::default()),
            "pkg/module.py:3:4: COP005 Variable name must be at least 8 characters"
        );

        let short = LintConfig {
            min_name_length: 4,
            ..LintConfig::default()
        };
        assert_eq!(
            format_line(path, &violation, &short),
            "pkg/module.py:3:4: COP005 Variable name must be at least 4 characters"
        );
    }

    #[test]
    fn token_length_is_never_zero() {
        assert_eq!(token_length("x = (1)", 4), 1);
        assert_eq!(token_length("", 0), 1);
        assert_eq!(token_length("name", 0), 4);
    }
}
