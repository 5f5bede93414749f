//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::types::{RuleCode, Violation};

/// A per-file lint rule over the Python syntax tree.
///
/// Rules receive the shared [`FileContext`] and usually drive a
/// [`Visit`](crate::Visit) implementation that accumulates violations.
/// A rule never fails: a node shape it does not recognize is compliant.
///
/// # Example
///
/// ```ignore
/// use cop_lint_core::{codes, walk_tree, FileContext, Rule, RuleCode, Violation, Visit};
///
/// pub struct AsyncGetPrefix;
///
/// impl Rule for AsyncGetPrefix {
///     fn name(&self) -> &'static str { "async-get-prefix" }
///     fn codes(&self) -> &'static [RuleCode] { &[codes::ASYNC_GET_PREFIX] }
///
///     fn check(&self, ctx: &FileContext) -> Vec<Violation> {
///         let mut visitor = PrefixVisitor::new(ctx);
///         walk_tree(&mut visitor, ctx.tree);
///         visitor.violations
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "name-length").
    fn name(&self) -> &'static str;

    /// Returns the codes this rule can emit.
    fn codes(&self) -> &'static [RuleCode];

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        self.codes().first().map_or("", |code| code.description)
    }

    /// Checks a single file and returns any violations found.
    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
