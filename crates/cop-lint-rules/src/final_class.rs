//! Rule to require `typing.final` on classes.
//!
//! Protocols, pytest test classes and classes built on a model factory or
//! on an exempt base (`TypedDict`) are meant to be subclassed or are not
//! real classes, so they are skipped.

use cop_lint_core::ast::ClassDef;
use cop_lint_core::{
    codes, walk_children, walk_tree, DecoratorRole, FileContext, NodeId, Rule, RuleCode,
    SyntaxTree, Violation, Visit,
};

use crate::naming::{is_protocol, is_test_class};

/// Rule code for final-class.
pub const CODE: RuleCode = codes::FINAL_CLASS;

/// Rule name for final-class.
pub const NAME: &str = "final-class";

/// Flags classes without a `final` decorator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinalClass;

impl FinalClass {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for FinalClass {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[CODE]
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let mut visitor = FinalVisitor {
            ctx,
            violations: Vec::new(),
        };
        walk_tree(&mut visitor, ctx.tree);
        visitor.violations
    }
}

struct FinalVisitor<'a> {
    ctx: &'a FileContext<'a>,
    violations: Vec<Violation>,
}

impl FinalVisitor<'_> {
    fn is_exempt(&self, tree: &SyntaxTree, node: &ClassDef) -> bool {
        let config = self.ctx.config;
        is_protocol(tree, node)
            || is_test_class(node)
            || tree.inherits_from(node, &config.model_factory_bases)
            || tree.inherits_from(node, &config.final_exempt_bases)
    }
}

impl<'t> Visit<'t> for FinalVisitor<'_> {
    fn visit_class_def(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t ClassDef) {
        let is_final = self
            .ctx
            .decorators()
            .any_is(&node.decorators, DecoratorRole::Final);
        if !is_final && !self.is_exempt(tree, node) {
            self.violations.push(Violation::at(tree.position(id), CODE));
        }
        walk_children(self, tree, id);
    }
}
