//! Rule to keep `get_` off async functions.
//!
//! `get_` reads as a cheap accessor; an awaited call is not one. Use
//! `fetch_`, `load_` or similar instead. There are no exemptions.

use cop_lint_core::ast::FunctionDef;
use cop_lint_core::{
    codes, walk_children, walk_tree, FileContext, NodeId, Rule, RuleCode, SyntaxTree, Violation,
    Visit,
};

/// Rule code for async-get-prefix.
pub const CODE: RuleCode = codes::ASYNC_GET_PREFIX;

/// Rule name for async-get-prefix.
pub const NAME: &str = "async-get-prefix";

/// Flags `async def get_*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsyncGetPrefix;

impl AsyncGetPrefix {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for AsyncGetPrefix {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[CODE]
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let mut visitor = PrefixVisitor {
            prefix: &ctx.config.async_forbidden_prefix,
            violations: Vec::new(),
        };
        walk_tree(&mut visitor, ctx.tree);
        visitor.violations
    }
}

struct PrefixVisitor<'a> {
    prefix: &'a str,
    violations: Vec<Violation>,
}

impl<'t> Visit<'t> for PrefixVisitor<'_> {
    fn visit_function_def(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t FunctionDef) {
        if node.is_async && node.name.as_str().starts_with(self.prefix) {
            self.violations.push(Violation::at(tree.position(id), CODE));
        }
        walk_children(self, tree, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{positions, run_default};

    fn check_code(code: &str) -> Vec<Violation> {
        run_default(&AsyncGetPrefix::new(), code)
    }

    #[test]
    fn test_detects_async_get() {
        let violations = check_code("async def get_data():\n    pass\n");
        assert_eq!(positions(&violations), vec![(1, 0)]);
    }

    #[test]
    fn test_allows_sync_get() {
        assert!(check_code("def get_data():\n    pass\n").is_empty());
    }

    #[test]
    fn test_detects_async_method() {
        let code = r#"
class Repository:
    @staticmethod
    async def get_user():
        pass
"#;
        assert_eq!(positions(&check_code(code)), vec![(4, 4)]);
    }

    #[test]
    fn test_allows_other_async_names() {
        assert!(check_code("async def fetch_data():\n    pass\n").is_empty());
    }
}
