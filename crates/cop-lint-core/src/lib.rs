//! # cop-lint-core
//!
//! Core framework for linting Python code against the COP conventions.
//!
//! This crate owns everything between a parsed file and its violations:
//!
//! - [`SyntaxTree`], an arena-backed Python syntax tree produced by a frontend
//! - [`TreeIndex`] for parent, class, function and scope queries
//! - [`UsageAnalyzer`] for per-function store/load accounting
//! - [`DecoratorClassifier`] for property, fixture, final and dataclass roles
//! - [`Rule`] and [`Linter`] for dispatching rules and aggregating violations
//!
//! ## Example
//!
//! ```ignore
//! use cop_lint_core::{Linter, LintConfig};
//!
//! let linter = Linter::builder()
//!     .rules(cop_lint_rules::all_rules())
//!     .lint_config(LintConfig::default())
//!     .build()?;
//!
//! let tree = cop_lint_ts::parse(source)?;
//! for violation in linter.check(path, source, &tree) {
//!     println!("{}:{violation}", path.display());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod codes;
mod config;
mod context;
mod decorators;
mod index;
mod linter;
pub mod noqa;
mod resolver;
mod rule;
mod stdlib;
mod types;
mod usage;
mod visit;

pub use ast::{NodeId, NodeKind, Position, Span, SyntaxTree, TreeBuilder};
pub use config::{
    AnalyzerConfig, Config, ConfigError, LintConfig, RuleConfig, TemporaryVariableMode,
};
pub use context::{offset_for, FileContext};
pub use decorators::{DataclassOptions, DecoratorClassifier, DecoratorRole};
pub use index::{Scope, ScopeKind, TreeIndex};
pub use linter::{Linter, LinterBuilder, LinterError};
pub use resolver::{ModuleResolver, StaticModuleResolver};
pub use rule::{Rule, RuleBox};
pub use stdlib::{is_stdlib_module, is_stdlib_package};
pub use types::{FileReport, LintResult, RuleCode, Violation};
pub use usage::{
    is_temporary_candidate, Access, AccessKind, Binding, UsageAnalyzer, UsageClass, UsageMap,
    UsageRecord,
};
pub use visit::{walk_children, walk_node, walk_tree, Visit};
