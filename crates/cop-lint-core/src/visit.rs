//! Pre-order traversal over a [`SyntaxTree`].
//!
//! Implement [`Visit`] and override the hooks for the node kinds a rule
//! cares about. Every hook defaults to walking the node's children, so an
//! override that wants to keep descending calls [`walk_children`] itself.

use crate::ast::{
    AnnAssign, Assign, ClassDef, Comprehension, ExceptHandler, For, FunctionDef, ImportFrom,
    Lambda, NodeId, NodeKind, SyntaxTree, With,
};

/// Per-kind visitor hooks.
#[allow(unused_variables)]
pub trait Visit<'t> {
    /// Entry point for any node; dispatches on its kind.
    fn visit_node(&mut self, tree: &'t SyntaxTree, id: NodeId) {
        walk_node(self, tree, id);
    }

    /// Called for class definitions.
    fn visit_class_def(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t ClassDef) {
        walk_children(self, tree, id);
    }

    /// Called for sync and async function definitions.
    fn visit_function_def(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t FunctionDef) {
        walk_children(self, tree, id);
    }

    /// Called for plain assignments.
    fn visit_assign(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t Assign) {
        walk_children(self, tree, id);
    }

    /// Called for annotated assignments.
    fn visit_ann_assign(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t AnnAssign) {
        walk_children(self, tree, id);
    }

    /// Called for `from ... import ...` statements.
    fn visit_import_from(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t ImportFrom) {
        walk_children(self, tree, id);
    }

    /// Called for `for` loops.
    fn visit_for(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t For) {
        walk_children(self, tree, id);
    }

    /// Called for `with` statements.
    fn visit_with(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t With) {
        walk_children(self, tree, id);
    }

    /// Called for `except` clauses.
    fn visit_except_handler(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t ExceptHandler) {
        walk_children(self, tree, id);
    }

    /// Called for lambda expressions.
    fn visit_lambda(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t Lambda) {
        walk_children(self, tree, id);
    }

    /// Called for comprehensions and generator expressions.
    fn visit_comprehension(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t Comprehension) {
        walk_children(self, tree, id);
    }
}

/// Dispatches `id` to the matching hook of `visitor`.
pub fn walk_node<'t, V>(visitor: &mut V, tree: &'t SyntaxTree, id: NodeId)
where
    V: Visit<'t> + ?Sized,
{
    match tree.kind(id) {
        NodeKind::ClassDef(node) => visitor.visit_class_def(tree, id, node),
        NodeKind::FunctionDef(node) => visitor.visit_function_def(tree, id, node),
        NodeKind::Assign(node) => visitor.visit_assign(tree, id, node),
        NodeKind::AnnAssign(node) => visitor.visit_ann_assign(tree, id, node),
        NodeKind::ImportFrom(node) => visitor.visit_import_from(tree, id, node),
        NodeKind::For(node) => visitor.visit_for(tree, id, node),
        NodeKind::With(node) => visitor.visit_with(tree, id, node),
        NodeKind::ExceptHandler(node) => visitor.visit_except_handler(tree, id, node),
        NodeKind::Lambda(node) => visitor.visit_lambda(tree, id, node),
        NodeKind::Comprehension(node) => visitor.visit_comprehension(tree, id, node),
        _ => walk_children(visitor, tree, id),
    }
}

/// Visits every direct child of `id`.
pub fn walk_children<'t, V>(visitor: &mut V, tree: &'t SyntaxTree, id: NodeId)
where
    V: Visit<'t> + ?Sized,
{
    for child in tree.children(id) {
        visitor.visit_node(tree, child);
    }
}

/// Visits the whole tree starting at the module node.
pub fn walk_tree<'t, V>(visitor: &mut V, tree: &'t SyntaxTree)
where
    V: Visit<'t> + ?Sized,
{
    visitor.visit_node(tree, tree.root());
}
