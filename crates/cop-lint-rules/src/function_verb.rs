//! Rule to require verb-named functions.
//!
//! A function name must be a configured verb or start with `<verb>_`
//! (`get_user`, `process`). Properties and fixtures name values rather
//! than actions and are exempt.

use cop_lint_core::ast::FunctionDef;
use cop_lint_core::{
    codes, walk_children, walk_tree, DecoratorRole, FileContext, NodeId, Rule, RuleCode,
    SyntaxTree, Violation, Visit,
};

use crate::naming::has_excluded_base;

/// Rule code for function-verb.
pub const CODE: RuleCode = codes::FUNCTION_VERB;

/// Rule name for function-verb.
pub const NAME: &str = "function-verb";

/// Flags functions whose name does not start with a verb.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionVerb;

impl FunctionVerb {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for FunctionVerb {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[CODE]
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let mut visitor = VerbVisitor {
            ctx,
            violations: Vec::new(),
        };
        walk_tree(&mut visitor, ctx.tree);
        visitor.violations
    }
}

struct VerbVisitor<'a> {
    ctx: &'a FileContext<'a>,
    violations: Vec<Violation>,
}

impl VerbVisitor<'_> {
    fn is_exempt(&self, tree: &SyntaxTree, id: NodeId, node: &FunctionDef) -> bool {
        let config = self.ctx.config;
        let name = node.name.as_str();
        if name == "main"
            || name.starts_with('_')
            || config.ignored_names.iter().any(|n| n == name)
            || name.chars().count() < config.min_verb_check_length
        {
            return true;
        }

        let in_excluded_class = self
            .ctx
            .index
            .class_body_owner(id)
            .is_some_and(|(_, class)| has_excluded_base(tree, class, config));
        if in_excluded_class {
            return true;
        }

        let decorators = self.ctx.decorators();
        decorators.any_is(&node.decorators, DecoratorRole::Property)
            || decorators.any_is(&node.decorators, DecoratorRole::Fixture)
    }
}

impl<'t> Visit<'t> for VerbVisitor<'_> {
    fn visit_function_def(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t FunctionDef) {
        if !self.is_exempt(tree, id, node) && !self.ctx.config.is_verb_name(node.name.as_str()) {
            self.violations.push(Violation::at(tree.position(id), CODE));
        }
        walk_children(self, tree, id);
    }
}
