//! Rule to avoid annotating literal assignments with scalar types.
//!
//! `timeout: int = 30` repeats what the literal already says. Class-body
//! attributes are exempt, since there the annotation declares a field.

use cop_lint_core::ast::AnnAssign;
use cop_lint_core::{
    codes, walk_children, walk_tree, FileContext, LintConfig, NodeId, NodeKind, Rule, RuleCode,
    SyntaxTree, TreeIndex, Violation, Visit,
};

/// Rule code for scalar-annotation.
pub const CODE: RuleCode = codes::SCALAR_ANNOTATION;

/// Rule name for scalar-annotation.
pub const NAME: &str = "scalar-annotation";

/// Flags `name: <scalar> = <literal>` outside class bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarAnnotation;

impl ScalarAnnotation {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ScalarAnnotation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[CODE]
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let mut visitor = AnnotationVisitor {
            index: ctx.index,
            config: ctx.config,
            violations: Vec::new(),
        };
        walk_tree(&mut visitor, ctx.tree);
        visitor.violations
    }
}

/// Constants and collection displays.
fn is_literal(tree: &SyntaxTree, id: NodeId) -> bool {
    matches!(
        tree.kind(id),
        NodeKind::Constant(_)
            | NodeKind::List { .. }
            | NodeKind::Tuple { .. }
            | NodeKind::Set { .. }
            | NodeKind::Dict { .. }
    )
}

fn is_final(tree: &SyntaxTree, id: NodeId) -> bool {
    match tree.kind(id) {
        NodeKind::Subscript { value, .. } => is_final(tree, *value),
        _ => tree.terminal_name(id) == Some("Final"),
    }
}

/// `int`, `builtins.int`, `Final[int]`; for other subscripts the
/// subscripted name decides.
fn is_scalar(tree: &SyntaxTree, id: NodeId, config: &LintConfig) -> bool {
    match tree.kind(id) {
        NodeKind::Subscript { value, slice } => {
            if is_final(tree, *value) {
                is_scalar(tree, *slice, config)
            } else {
                is_scalar(tree, *value, config)
            }
        }
        _ => tree
            .terminal_name(id)
            .is_some_and(|name| config.scalar_types.iter().any(|s| s == name)),
    }
}

struct AnnotationVisitor<'a> {
    index: &'a TreeIndex<'a>,
    config: &'a LintConfig,
    violations: Vec<Violation>,
}

impl<'t> Visit<'t> for AnnotationVisitor<'_> {
    fn visit_ann_assign(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t AnnAssign) {
        let flagged = tree.name_id(node.target).is_some()
            && self.index.class_body_owner(id).is_none()
            && node.value.is_some_and(|value| is_literal(tree, value))
            && is_scalar(tree, node.annotation, self.config);
        if flagged {
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
        run_default(&ScalarAnnotation::new(), code)
    }

    #[test]
    fn test_detects_module_scalar() {
        let violations = check_code("timeout: int = 30\nlabel: str = \"x\"\n");
        assert_eq!(positions(&violations), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn test_detects_final_wrapped_scalar() {
        let code = "import typing\nretries: typing.Final[int] = 3\n";
        assert_eq!(positions(&check_code(code)), vec![(2, 0)]);
    }

    #[test]
    fn test_detects_function_local() {
        let code = r#"
def compute_total():
    counter: int = 0
    return counter
"#;
        assert_eq!(positions(&check_code(code)), vec![(3, 4)]);
    }

    #[test]
    fn test_allows_class_attribute() {
        let code = r#"
class Settings:
    timeout: int = 30
"#;
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_detects_method_local_inside_class() {
        let code = r#"
class Settings:
    def build_value(self):
        counter: int = 0
        return counter
"#;
        assert_eq!(positions(&check_code(code)), vec![(4, 8)]);
    }

    #[test]
    fn test_allows_non_literal_or_non_scalar() {
        let code = r#"
limit: int = compute_limit()
names: list[str] = []
maybe: typing.Optional[int] = None
bare: int
final_only: typing.Final = 1
"#;
        assert!(check_code(code).is_empty());
    }
}
