//! Rule to require fully configured dataclasses.
//!
//! A dataclass must pass `kw_only=True`, `slots=True` and `frozen=True`.
//! `init=False` stands in for `frozen=True`. A bare `@dataclass` sets
//! none of them.
//!
//! Models, factories and exception types are exempt; any other base class
//! is still checked.

use cop_lint_core::ast::ClassDef;
use cop_lint_core::{
    codes, walk_children, walk_tree, FileContext, NodeId, Rule, RuleCode, SyntaxTree, Violation,
    Visit,
};

use crate::naming::has_excluded_base;

/// Rule code for dataclass-config.
pub const CODE: RuleCode = codes::DATACLASS_CONFIG;

/// Rule name for dataclass-config.
pub const NAME: &str = "dataclass-config";

const MODEL_BASES: &[&str] = &["BaseModel", "RootModel"];
const EXCEPTION_MARKERS: &[&str] = &["Error", "Exception"];

/// Flags dataclasses missing `kw_only`, `slots` or `frozen`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataclassConfig;

impl DataclassConfig {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DataclassConfig {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[CODE]
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let mut visitor = DataclassVisitor {
            ctx,
            violations: Vec::new(),
        };
        walk_tree(&mut visitor, ctx.tree);
        visitor.violations
    }
}

struct DataclassVisitor<'a> {
    ctx: &'a FileContext<'a>,
    violations: Vec<Violation>,
}

impl DataclassVisitor<'_> {
    fn is_exempt(&self, tree: &SyntaxTree, node: &ClassDef) -> bool {
        let config = self.ctx.config;
        if has_excluded_base(tree, node, config)
            || tree.inherits_from(node, MODEL_BASES)
            || tree.inherits_from(node, &config.model_factory_bases)
        {
            return true;
        }
        node.bases.iter().any(|base| {
            tree.base_name(*base)
                .is_some_and(|name| EXCEPTION_MARKERS.iter().any(|m| name.contains(m)))
        })
    }
}

impl<'t> Visit<'t> for DataclassVisitor<'_> {
    fn visit_class_def(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t ClassDef) {
        let options = self.ctx.decorators().dataclass(&node.decorators);
        if let Some(options) = options {
            if !options.is_fully_configured() && !self.is_exempt(tree, node) {
                self.violations.push(Violation::at(tree.position(id), CODE));
            }
        }
        walk_children(self, tree, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{positions, run_default};

    fn check_code(code: &str) -> Vec<Violation> {
        run_default(&DataclassConfig::new(), code)
    }

    #[test]
    fn test_detects_bare_decorator() {
        let code = r#"
@dataclass
class Example:
    value: int
"#;
        let violations = check_code(code);
        assert_eq!(positions(&violations), vec![(3, 0)]);
        assert_eq!(violations[0].code, CODE);
    }

    #[test]
    fn test_allows_full_configuration() {
        let code = r#"
import dataclasses

@dataclass(kw_only=True, slots=True, frozen=True)
class Example:
    value: int

@dataclasses.dataclass(kw_only=True, slots=True, init=False)
class Lazy:
    value: int
"#;
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_detects_partial_configuration() {
        let code = r#"
@dataclass(kw_only=True, slots=True)
class Example:
    value: int

@dataclass(kw_only=True, slots=False, frozen=True)
class Other:
    value: int
"#;
        assert_eq!(positions(&check_code(code)), vec![(3, 0), (7, 0)]);
    }

    #[test]
    fn test_base_class_exemptions() {
        let code = r#"
@dataclass
class Payload(BaseModel):
    value: int

@dataclass
class Failure(ValueError):
    value: int

@dataclass
class Custom(DomainException):
    value: int

@dataclass
class UserFactory(ModelFactory[User]):
    value: int
"#;
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_other_bases_are_checked() {
        let code = r#"
@dataclass
class Child(Parent):
    value: int
"#;
        assert_eq!(positions(&check_code(code)), vec![(3, 0)]);
    }

    #[test]
    fn test_ignores_plain_classes() {
        assert!(check_code("class Example:\n    value: int\n").is_empty());
    }
}
