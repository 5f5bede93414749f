//! Core types for rule codes, violations and results.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// A stable rule code with its one-line description.
///
/// Codes are never reused for a different meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleCode {
    /// Code identifier (e.g., "COP001").
    pub code: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

impl RuleCode {
    /// Creates a new rule code.
    #[must_use]
    pub const fn new(code: &'static str, description: &'static str) -> Self {
        Self { code, description }
    }

    /// Returns the reported message: `"<code> <description>"`.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} {}", self.code, self.description)
    }
}

impl PartialOrd for RuleCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RuleCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code
            .cmp(other.code)
            .then_with(|| self.description.cmp(other.description))
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for RuleCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

/// A lint violation found during analysis.
///
/// Ordering is by `(line, column, code)`, which is the order the linter
/// reports in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Violation {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column as a byte offset within the line (0-indexed).
    pub column: usize,
    /// The violated rule.
    pub code: RuleCode,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(line: usize, column: usize, code: RuleCode) -> Self {
        Self { line, column, code }
    }

    /// Creates a violation at the start of `position`.
    #[must_use]
    pub fn at(position: crate::ast::Position, code: RuleCode) -> Self {
        Self::new(position.line, position.column, code)
    }

    /// Returns the reported message: `"<code> <description>"`.
    #[must_use]
    pub fn message(&self) -> String {
        self.code.message()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} {}",
            self.line, self.column, self.code.code, self.code.description
        )
    }
}

/// Violations found in one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    /// Path of the checked file.
    pub path: PathBuf,
    /// Violations in reporting order.
    pub violations: Vec<Violation>,
}

impl FileReport {
    /// Creates a report for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, violations: Vec<Violation>) -> Self {
        Self {
            path: path.into(),
            violations,
        }
    }

    /// Returns true if the file has no violations.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Result of linting a set of files.
#[derive(Debug, Default, Serialize)]
pub struct LintResult {
    /// Reports for files with at least one violation, sorted by path.
    pub files: Vec<FileReport>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a checked file. Clean files only count towards
    /// `files_checked`.
    pub fn push(&mut self, report: FileReport) {
        self.files_checked += 1;
        if !report.is_clean() {
            self.files.push(report);
        }
    }

    /// Sorts reports by path so output is stable across parallel runs.
    pub fn sort(&mut self) {
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
    }

    /// Returns the total number of violations.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.files.iter().map(|f| f.violations.len()).sum()
    }

    /// Returns true if there are any violations.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        self.files.iter().any(|f| !f.is_clean())
    }

    /// Iterates over `(path, violation)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Violation)> {
        self.files
            .iter()
            .flat_map(|f| f.violations.iter().map(move |v| (&f.path, v)))
    }

    /// Counts violations per rule code, ordered by code.
    #[must_use]
    pub fn count_by_code(&self) -> Vec<(RuleCode, usize)> {
        let mut counts: Vec<(RuleCode, usize)> = Vec::new();
        for (_, violation) in self.iter() {
            match counts.iter_mut().find(|(code, _)| *code == violation.code) {
                Some((_, count)) => *count += 1,
                None => counts.push((violation.code, 1)),
            }
        }
        counts.sort_by(|a, b| a.0.cmp(&b.0));
        counts
    }

    /// Adds reports from another result.
    pub fn extend(&mut self, other: Self) {
        self.files.extend(other.files);
        self.files_checked += other.files_checked;
    }
}
