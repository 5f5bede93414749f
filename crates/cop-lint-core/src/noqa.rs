//! `# noqa` suppression comments.
//!
//! Supports directives like:
//! ```text
//! values = {"a": 1}  # noqa
//! from os import path, sep, getcwd  # noqa: COP001, COP002
//! ```

use std::collections::{HashMap, HashSet};

use crate::types::Violation;

/// A parsed suppression comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoqaDirective {
    /// Bare `# noqa`: every code is suppressed.
    All,
    /// `# noqa: CODE, ...`: only the listed codes (upper-cased).
    Codes(HashSet<String>),
}

impl NoqaDirective {
    /// Returns true if `code` is suppressed by this directive.
    #[must_use]
    pub fn suppresses(&self, code: &str) -> bool {
        match self {
            Self::All => true,
            Self::Codes(codes) => codes.contains(&code.to_ascii_uppercase()),
        }
    }
}

/// Suppression directives of one file, keyed by line (1-indexed).
#[derive(Debug, Clone, Default)]
pub struct NoqaIndex {
    lines: HashMap<usize, NoqaDirective>,
}

impl NoqaIndex {
    /// Scans `content` for directives.
    #[must_use]
    pub fn build(content: &str) -> Self {
        let lines = content
            .lines()
            .enumerate()
            .filter_map(|(i, line)| parse_noqa(line).map(|d| (i + 1, d)))
            .collect();
        Self { lines }
    }

    /// Returns true if the file has no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the directive on `line`.
    #[must_use]
    pub fn directive(&self, line: usize) -> Option<&NoqaDirective> {
        self.lines.get(&line)
    }

    /// Returns true if `violation` is suppressed on its own line.
    #[must_use]
    pub fn is_suppressed(&self, violation: &Violation) -> bool {
        self.directive(violation.line)
            .is_some_and(|d| d.suppresses(violation.code.code))
    }

    /// Drops suppressed violations.
    pub fn retain_unsuppressed(&self, violations: &mut Vec<Violation>) {
        if !self.is_empty() {
            violations.retain(|v| !self.is_suppressed(v));
        }
    }
}

/// Parses a `# noqa` directive from one source line.
///
/// A `# noqa:` followed by no recognizable code is treated as a bare
/// `# noqa`.
#[must_use]
pub fn parse_noqa(line: &str) -> Option<NoqaDirective> {
    line.match_indices('#').find_map(|(start, _)| {
        let comment = line[start + 1..].trim_start();
        let keyword = comment.get(..4)?;
        if !keyword.eq_ignore_ascii_case("noqa") {
            return None;
        }

        let rest = &comment[4..];
        if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
            return None;
        }
        let rest = rest.trim_start();
        let Some(list) = rest.strip_prefix(':') else {
            return Some(NoqaDirective::All);
        };

        let codes: HashSet<String> = list
            .split(|c: char| c == ',' || c.is_whitespace())
            .take_while(|token| token.is_empty() || is_code(token))
            .filter(|token| !token.is_empty())
            .map(str::to_ascii_uppercase)
            .collect();

        if codes.is_empty() {
            Some(NoqaDirective::All)
        } else {
            Some(NoqaDirective::Codes(codes))
        }
    })
}

/// Returns true for tokens shaped like `COP011` or `E501`.
fn is_code(token: &str) -> bool {
    let digits = token.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    digits.len() < token.len() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
