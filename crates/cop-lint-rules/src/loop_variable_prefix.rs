//! Rule to require a prefix on loop variables.
//!
//! ```python
//! for one_user in users: ...          # ok
//! for user in users: ...              # flagged
//! for index in range(10): ...         # ok, literal range
//! ```
//!
//! Partial unpacking is skipped: a comprehension that binds more names than
//! its element expression uses (`[a for a, b in pairs]`).

use cop_lint_core::ast::{Comprehension, ComprehensionKind, For};
use cop_lint_core::{
    codes, walk_children, walk_tree, FileContext, NodeId, NodeKind, Rule, RuleCode, SyntaxTree,
    Violation, Visit,
};

/// Rule code for loop-variable-prefix.
pub const CODE: RuleCode = codes::LOOP_VARIABLE_PREFIX;

/// Rule name for loop-variable-prefix.
pub const NAME: &str = "loop-variable-prefix";

/// Flags loop and comprehension targets without the configured prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopVariablePrefix;

impl LoopVariablePrefix {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for LoopVariablePrefix {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[CODE]
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let mut visitor = PrefixVisitor {
            prefix: &ctx.config.loop_variable_prefix,
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

impl PrefixVisitor<'_> {
    fn check_target(&mut self, tree: &SyntaxTree, target: NodeId, iter: NodeId, used: usize) {
        if is_literal_range(tree, iter) {
            return;
        }
        let bound = name_count(tree, target);
        if bound > used && bound > 1 {
            return;
        }

        let names = match tree.kind(target) {
            NodeKind::Name { .. } => vec![target],
            NodeKind::Tuple { elts } => elts.clone(),
            _ => return,
        };
        for name in names {
            let Some(id) = tree.name_id(name) else {
                continue;
            };
            if id != "_" && !id.starts_with(self.prefix) {
                self.violations
                    .push(Violation::at(tree.position(name), CODE));
            }
        }
    }
}

/// `range(...)` with only literal arguments (`range(10)`, `range(-5, 5)`).
fn is_literal_range(tree: &SyntaxTree, iter: NodeId) -> bool {
    match tree.kind(iter) {
        NodeKind::Call { func, args, .. } => {
            tree.name_id(*func) == Some("range")
                && args.iter().all(|arg| tree.is_numeric_literal(*arg))
        }
        _ => false,
    }
}

/// Number of plain names bound by a target: 1 for a name, the name
/// elements of a tuple, 0 otherwise.
fn name_count(tree: &SyntaxTree, target: NodeId) -> usize {
    match tree.kind(target) {
        NodeKind::Name { .. } => 1,
        NodeKind::Tuple { elts } => elts
            .iter()
            .filter(|elt| tree.name_id(**elt).is_some())
            .count(),
        _ => 0,
    }
}

/// Number of names the comprehension element refers to.
fn element_count(tree: &SyntaxTree, node: &Comprehension) -> usize {
    if node.kind == ComprehensionKind::Dict {
        return 2;
    }
    match tree.kind(node.element) {
        NodeKind::Tuple { .. } => name_count(tree, node.element),
        _ => 1,
    }
}

impl<'t> Visit<'t> for PrefixVisitor<'_> {
    fn visit_for(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t For) {
        self.check_target(tree, node.target, node.iter, 1);
        walk_children(self, tree, id);
    }

    fn visit_comprehension(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t Comprehension) {
        let used = element_count(tree, node);
        for generator in &node.generators {
            if let NodeKind::Generator(clause) = tree.kind(*generator) {
                self.check_target(tree, clause.target, clause.iter, used);
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
        run_default(&LoopVariablePrefix::new(), code)
    }

    #[test]
    fn test_detects_unprefixed_for_target() {
        let violations = check_code("for user in users:\n    print(user)\n");
        assert_eq!(positions(&violations), vec![(1, 4)]);
        assert_eq!(violations[0].code, CODE);
    }

    #[test]
    fn test_allows_prefixed_and_ignored_targets() {
        let code = r#"
for one_user in users:
    print(one_user)

for _ in users:
    pass
"#;
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_allows_literal_range() {
        let code = r#"
for index in range(10):
    pass

for index in range(-5, 5):
    pass
"#;
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_checks_non_literal_range() {
        let code = "for index in range(len(items)):\n    pass\n";
        assert_eq!(positions(&check_code(code)), vec![(1, 4)]);
    }

    #[test]
    fn test_skips_for_loop_unpacking() {
        let code = "for key, value in pairs:\n    pass\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_checks_unpacked_element_when_all_used() {
        let code = "pairs = [(one_key, value) for one_key, value in items]\n";
        assert_eq!(positions(&check_code(code)), vec![(1, 39)]);
    }

    #[test]
    fn test_comprehension_targets() {
        let code = r#"
names = [user.name for user in users]
ok = [one_user.name for one_user in users]
lookup = {key: value for key, value in pairs}
"#;
        assert_eq!(
            positions(&check_code(code)),
            vec![(2, 23), (4, 25), (4, 30)]
        );
    }

    #[test]
    fn test_skips_partial_unpacking() {
        let code = "firsts = [first for first, second in pairs]\n";
        assert!(check_code(code).is_empty());
    }
}
