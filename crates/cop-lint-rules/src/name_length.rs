//! Rule to require descriptive identifiers.
//!
//! One analyzer, five codes: attributes (COP004), variables (COP005),
//! arguments (COP006), functions (COP007) and classes (COP008) shorter than
//! `min_name_length` characters are reported.
//!
//! A name bound directly in a class body is an attribute; the same binding
//! inside a method is a variable.
//!
//! # Exemptions
//!
//! - `_`, `_private`, dunders, `UPPER_CASE` and the configured ignore-list
//! - `self` and `cls` arguments, and arguments annotated as fixtures
//! - Attributes and methods of classes inheriting an excluded base
//! - `main`, and functions decorated as fixtures
//! - `Test*` classes

use cop_lint_core::ast::{
    AnnAssign, Assign, ClassDef, Comprehension, ExceptHandler, FunctionDef, Lambda, Parameter,
    With,
};
use cop_lint_core::{
    codes, walk_children, walk_tree, DecoratorRole, FileContext, NodeId, NodeKind, Position, Rule,
    RuleCode, SyntaxTree, Violation, Visit,
};

use crate::naming::{has_excluded_base, is_ignored_name, is_test_class, is_whitelisted_annotation};

/// Rule name for name-length.
pub const NAME: &str = "name-length";

const CODES: &[RuleCode] = &[
    codes::ATTRIBUTE_NAME_LENGTH,
    codes::VARIABLE_NAME_LENGTH,
    codes::ARGUMENT_NAME_LENGTH,
    codes::FUNCTION_NAME_LENGTH,
    codes::CLASS_NAME_LENGTH,
];

const RECEIVER_NAMES: &[&str] = &["self", "cls"];

/// Flags identifiers shorter than the configured minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameLength;

impl NameLength {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NameLength {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        CODES
    }

    fn description(&self) -> &'static str {
        "Identifiers must be at least the configured length"
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let mut visitor = NameLengthVisitor {
            ctx,
            violations: Vec::new(),
        };
        walk_tree(&mut visitor, ctx.tree);
        visitor.violations
    }
}

struct NameLengthVisitor<'a> {
    ctx: &'a FileContext<'a>,
    violations: Vec<Violation>,
}

impl NameLengthVisitor<'_> {
    fn is_short(&self, name: &str) -> bool {
        !is_ignored_name(name, self.ctx.config)
            && name.chars().count() < self.ctx.config.min_name_length
    }

    fn report(&mut self, position: Position, code: RuleCode) {
        self.violations.push(Violation::at(position, code));
    }

    /// A plain-name assignment target; `statement` decides the scope.
    fn check_binding(&mut self, tree: &SyntaxTree, statement: NodeId, target: NodeId) {
        let Some(name) = tree.name_id(target) else {
            return;
        };
        if !self.is_short(name) {
            return;
        }

        let code = match self.ctx.index.class_body_owner(statement) {
            Some((_, class)) if has_excluded_base(tree, class, self.ctx.config) => return,
            Some(_) => codes::ATTRIBUTE_NAME_LENGTH,
            None => codes::VARIABLE_NAME_LENGTH,
        };
        self.report(tree.position(statement), code);
    }

    /// Comprehension and `with` targets, unpacked recursively.
    fn check_target(&mut self, tree: &SyntaxTree, target: NodeId) {
        match tree.kind(target) {
            NodeKind::Name { id } => {
                if self.is_short(id) {
                    self.report(tree.position(target), codes::VARIABLE_NAME_LENGTH);
                }
            }
            NodeKind::Tuple { elts } | NodeKind::List { elts } => {
                for element in elts {
                    self.check_target(tree, *element);
                }
            }
            _ => {}
        }
    }

    fn check_parameters(&mut self, tree: &SyntaxTree, parameters: &[Parameter]) {
        for parameter in parameters {
            let name = parameter.name.as_str();
            if RECEIVER_NAMES.contains(&name)
                || is_whitelisted_annotation(tree, parameter.annotation, self.ctx.config)
                || !self.is_short(name)
            {
                continue;
            }
            self.report(parameter.name.span.start, codes::ARGUMENT_NAME_LENGTH);
        }
    }

    fn is_exempt_function(&self, tree: &SyntaxTree, id: NodeId, node: &FunctionDef) -> bool {
        let name = node.name.as_str();
        name == "main"
            || !self.is_short(name)
            || self
                .ctx
                .index
                .class_body_owner(id)
                .is_some_and(|(_, class)| has_excluded_base(tree, class, self.ctx.config))
            || self
                .ctx
                .decorators()
                .any_is(&node.decorators, DecoratorRole::Fixture)
    }
}

impl<'t> Visit<'t> for NameLengthVisitor<'_> {
    fn visit_class_def(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t ClassDef) {
        if !is_test_class(node) && self.is_short(node.name.as_str()) {
            self.report(tree.position(id), codes::CLASS_NAME_LENGTH);
        }
        walk_children(self, tree, id);
    }

    fn visit_function_def(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t FunctionDef) {
        if !self.is_exempt_function(tree, id, node) {
            self.report(tree.position(id), codes::FUNCTION_NAME_LENGTH);
        }
        self.check_parameters(tree, &node.parameters);
        walk_children(self, tree, id);
    }

    fn visit_assign(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t Assign) {
        for target in &node.targets {
            self.check_binding(tree, id, *target);
        }
        walk_children(self, tree, id);
    }

    fn visit_ann_assign(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t AnnAssign) {
        self.check_binding(tree, id, node.target);
        walk_children(self, tree, id);
    }

    fn visit_with(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t With) {
        for target in node.items.iter().filter_map(|item| item.target) {
            self.check_target(tree, target);
        }
        walk_children(self, tree, id);
    }

    fn visit_except_handler(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t ExceptHandler) {
        if let Some(name) = &node.name {
            // Handler names are reported at the start of the `except` line.
            if self.is_short(name.as_str()) {
                let line = tree.position(id).line;
                self.violations
                    .push(Violation::new(line, 0, codes::VARIABLE_NAME_LENGTH));
            }
        }
        walk_children(self, tree, id);
    }

    fn visit_lambda(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t Lambda) {
        self.check_parameters(tree, &node.parameters);
        walk_children(self, tree, id);
    }

    fn visit_comprehension(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t Comprehension) {
        for generator in &node.generators {
            if let NodeKind::Generator(clause) = tree.kind(*generator) {
                self.check_target(tree, clause.target);
            }
        }
        walk_children(self, tree, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run_default;

    fn check_code(code: &str) -> Vec<Violation> {
        run_default(&NameLength::new(), code)
    }

    fn found(code: &str) -> Vec<(usize, usize, &'static str)> {
        check_code(code)
            .iter()
            .map(|v| (v.line, v.column, v.code.code))
            .collect()
    }

    #[test]
    fn test_module_variable() {
        assert_eq!(found("total = 1\n"), vec![(1, 0, "COP005")]);
        assert!(found("total_amount = 1\n").is_empty());
    }

    #[test]
    fn test_attribute_vs_variable_scope() {
        let code = r#"
class Settings:
    a: int = 1

    def build_settings(self):
        a: int = 1
        return a
"#;
        assert_eq!(found(code), vec![(3, 4, "COP004"), (6, 8, "COP005")]);
    }

    #[test]
    fn test_class_name() {
        assert_eq!(found("class Foo:\n    pass\n"), vec![(1, 0, "COP008")]);
        assert!(found("class TestFoo:\n    pass\n").is_empty());
    }

    #[test]
    fn test_function_and_arguments() {
        let code = "def run(x, *args, key=None, **kw):\n    pass\n";
        assert_eq!(
            found(code),
            vec![
                (1, 0, "COP007"),
                (1, 8, "COP006"),
                (1, 12, "COP006"),
                (1, 18, "COP006"),
                (1, 30, "COP006"),
            ]
        );
    }

    #[test]
    fn test_main_and_receivers_are_exempt() {
        let code = r#"
def main():
    pass

class Handlers:
    def handle_request(self, request_body):
        pass

    @classmethod
    def build_default(cls):
        pass
"#;
        assert!(found(code).is_empty());
    }

    #[test]
    fn test_ignored_names() {
        let code = r#"
_ = 1
MAX = 2
value = 3
__slots__ = ()
_hidden = 4
"#;
        assert!(found(code).is_empty());
    }

    #[test]
    fn test_excluded_base_exempts_members() {
        let code = r#"
class UserSchema(BaseModel):
    id: int

    def dump(self):
        pass
"#;
        assert!(found(code).is_empty());
    }

    #[test]
    fn test_fixture_function_and_annotations() {
        let code = r#"
import pytest

@pytest.fixture
def db():
    pass

def test_something(db: fixture, fake: Faker, req: pytest.FixtureRequest):
    pass
"#;
        assert!(found(code).is_empty());
    }

    #[test]
    fn test_comprehension_with_and_except_targets() {
        let code = r#"
def process_items(elements):
    squares = [x * x for x in elements]
    with open(elements) as fh:
        pass
    try:
        pass
    except ValueError as exc:
        pass
    return squares
"#;
        assert_eq!(
            found(code),
            vec![
                (3, 4, "COP005"),
                (3, 25, "COP005"),
                (4, 27, "COP005"),
                (8, 0, "COP005"),
            ]
        );
    }

    #[test]
    fn test_except_target_column_is_line_start() {
        let code = r#"
class Importer:
    def import_rows(self):
        try:
            pass
        except (KeyError, ValueError) as err:
            pass
        except OSError as failure_reason:
            pass
"#;
        assert_eq!(found(code), vec![(6, 0, "COP005")]);
    }

    #[test]
    fn test_lambda_arguments() {
        let code = "handler_table = lambda x: x\n";
        assert_eq!(found(code), vec![(1, 23, "COP006")]);
    }
}
