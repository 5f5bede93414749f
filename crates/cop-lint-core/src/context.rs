//! Context types for rule execution.

use std::path::Path;

use crate::ast::SyntaxTree;
use crate::config::LintConfig;
use crate::decorators::DecoratorClassifier;
use crate::index::TreeIndex;
use crate::resolver::ModuleResolver;

/// Everything a rule sees for one file.
///
/// Built once per file by the [`Linter`](crate::Linter) and shared read-only
/// by every rule.
#[derive(Clone, Copy)]
pub struct FileContext<'a> {
    /// Path of the file being checked.
    pub path: &'a Path,
    /// File contents; empty when the host only supplied a tree.
    pub content: &'a str,
    /// Parsed syntax tree.
    pub tree: &'a SyntaxTree,
    /// Parent index over `tree`.
    pub index: &'a TreeIndex<'a>,
    /// Rule thresholds and allow-lists.
    pub config: &'a LintConfig,
    /// Module existence queries.
    pub resolver: &'a dyn ModuleResolver,
}

impl<'a> FileContext<'a> {
    /// Returns a decorator classifier over this file's tree.
    #[must_use]
    pub fn decorators(&self) -> DecoratorClassifier<'a> {
        DecoratorClassifier::new(self.tree, self.config)
    }

    /// Calculates the byte offset of a 1-indexed line and 0-indexed byte
    /// column in this file.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        offset_for(self.content, line, column)
    }
}

impl std::fmt::Debug for FileContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileContext")
            .field("path", &self.path)
            .field("nodes", &self.tree.len())
            .finish_non_exhaustive()
    }
}

/// Calculates the byte offset for a given line and column.
///
/// # Arguments
///
/// * `line` - 1-indexed line number
/// * `column` - 0-indexed byte column
///
/// # Returns
///
/// Byte offset from the start of the file, clamped to the content length.
#[must_use]
pub fn offset_for(content: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }

    let mut offset = 0;
    for (i, line_content) in content.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let width = line_content.trim_end_matches(['\n', '\r']).len();
            return offset + column.min(width);
        }
        offset += line_content.len();
    }

    content.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_calculation() {
        let content = "line1\nline2\r\nline3";
        assert_eq!(offset_for(content, 1, 0), 0);
        assert_eq!(offset_for(content, 2, 0), 6);
        assert_eq!(offset_for(content, 2, 2), 8);
        assert_eq!(offset_for(content, 3, 0), 13);
        assert_eq!(offset_for(content, 2, 40), 11);
        assert_eq!(offset_for(content, 9, 0), content.len());
    }
}
