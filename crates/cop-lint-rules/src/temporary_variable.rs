//! Rule to inline temporary variables that are read exactly once.
//!
//! ```python
//! def build_total():
//!     subtotal = compute_subtotal()
//!     return subtotal * 2
//! ```
//!
//! Usage is analyzed per function; nested functions are separate scopes.
//!
//! # Modes
//!
//! - `next-line` (default): every name bound by a one-line `=` or
//!   annotated assignment and read once, on the following line
//! - `first-in-scope`: the first name per function that is assigned once
//!   and read once later, wherever the read is

use cop_lint_core::ast::FunctionDef;
use cop_lint_core::{
    codes, is_temporary_candidate, walk_children, walk_tree, Access, AccessKind, Binding,
    FileContext, NodeId, NodeKind, Rule, RuleCode, SyntaxTree, TemporaryVariableMode,
    UsageAnalyzer, UsageMap, Violation, Visit,
};

/// Rule code for temporary-variable.
pub const CODE: RuleCode = codes::TEMPORARY_VARIABLE;

/// Rule name for temporary-variable.
pub const NAME: &str = "temporary-variable";

/// Flags variables assigned once and read once.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporaryVariable;

impl TemporaryVariable {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TemporaryVariable {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[CODE]
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let mut visitor = TemporaryVisitor {
            mode: ctx.config.temporary_variable,
            violations: Vec::new(),
        };
        walk_tree(&mut visitor, ctx.tree);
        visitor.violations
    }
}

struct TemporaryVisitor {
    mode: TemporaryVariableMode,
    violations: Vec<Violation>,
}

impl TemporaryVisitor {
    fn check_next_line(&mut self, tree: &SyntaxTree, usage: &UsageMap) {
        for (name, record) in usage.iter() {
            if !is_temporary_candidate(name) {
                continue;
            }
            let Some((store, load)) = record.single_use() else {
                continue;
            };
            let Some(statement) = simple_assignment(tree, store) else {
                continue;
            };
            let span = tree.span(statement);
            if span.is_single_line() && load.position.line == span.end.line + 1 {
                self.violations.push(Violation::at(store.position, CODE));
            }
        }
    }

    fn check_first_in_scope(&mut self, usage: &UsageMap) {
        let first = usage.iter().find_map(|(name, record)| {
            if !is_temporary_candidate(name) {
                return None;
            }
            let (store, _) = record.single_use()?;
            matches!(
                store.kind,
                AccessKind::Store(
                    Binding::Assignment { .. } | Binding::AnnotatedAssignment { .. }
                )
            )
            .then_some(store.position)
        });
        if let Some(position) = first {
            self.violations.push(Violation::at(position, CODE));
        }
    }
}

/// Returns the statement when `store` is the only target of `name = value`
/// or `name: annotation = value`.
fn simple_assignment(tree: &SyntaxTree, store: &Access) -> Option<NodeId> {
    match store.kind {
        AccessKind::Store(Binding::Assignment { statement }) => match tree.kind(statement) {
            NodeKind::Assign(assign) if assign.targets.len() == 1 => Some(statement),
            _ => None,
        },
        AccessKind::Store(Binding::AnnotatedAssignment { statement }) => {
            match tree.kind(statement) {
                NodeKind::AnnAssign(assign) if assign.value.is_some() => Some(statement),
                _ => None,
            }
        }
        _ => None,
    }
}

impl<'t> Visit<'t> for TemporaryVisitor {
    fn visit_function_def(&mut self, tree: &'t SyntaxTree, id: NodeId, _node: &'t FunctionDef) {
        let usage = UsageAnalyzer::analyze(tree, id);
        match self.mode {
            TemporaryVariableMode::NextLine => self.check_next_line(tree, &usage),
            TemporaryVariableMode::FirstInScope => self.check_first_in_scope(&usage),
        }
        walk_children(self, tree, id);
    }
}
