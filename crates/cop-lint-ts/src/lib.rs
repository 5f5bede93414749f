//! # cop-lint-ts
//!
//! Tree-sitter frontend for cop-lint.
//!
//! Parses Python source with `tree-sitter-python` and lowers the concrete
//! tree into the arena [`SyntaxTree`](cop_lint_core::SyntaxTree) the rules
//! run on. Sources with syntax errors are still lowered; unrecognized
//! shapes become `Other` nodes that keep their children.
//!
//! ```ignore
//! let tree = cop_lint_ts::parse("class A:\n    pass\n")?;
//! assert_eq!(tree.module_body().len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod lower;
pub mod parser;

pub use parser::{parse, ParseError, PythonParser};
