//! Python parser backed by Tree-sitter.

use cop_lint_core::SyntaxTree;
use thiserror::Error;
use tracing::debug;
use tree_sitter::{Language, Parser};

use crate::lower::Lowerer;

/// Errors raised before a tree could be produced.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The Python grammar could not be loaded into the parser.
    #[error("Failed to load Python grammar: {0}")]
    Language(String),

    /// The parser returned no tree.
    #[error("Parser produced no tree")]
    Parse,
}

/// Parses Python source into a [`SyntaxTree`].
pub struct PythonParser {
    language: Language,
}

impl PythonParser {
    /// Creates a new Python parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// File extensions handled by this parser.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        &[".py", ".pyi"]
    }

    /// Parses and lowers one source file.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or the parser gives
    /// up. Syntax errors inside the source are not errors.
    pub fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Language(e.to_string()))?;

        let tree = parser.parse(source, None).ok_or(ParseError::Parse)?;
        let root = tree.root_node();
        if root.has_error() {
            debug!("Source contains syntax errors; lowering error nodes as-is");
        }

        Ok(Lowerer::new(source).lower_module(root))
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `source` with a fresh [`PythonParser`].
///
/// # Errors
///
/// See [`PythonParser::parse`].
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    PythonParser::new().parse(source)
}
