//! Parent index and scope queries.

use crate::ast::{ClassDef, FunctionDef, NodeId, NodeKind, SyntaxTree};

/// Kind of a naming scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The file itself.
    Module,
    /// A class body.
    Class,
    /// A function body.
    Function,
}

/// One entry of a scope chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    /// What kind of scope this is.
    pub kind: ScopeKind,
    /// The node that opens the scope.
    pub node: NodeId,
}

/// Maps every node to its parent, built in one traversal.
///
/// All queries walk parent links, so they cost O(depth).
#[derive(Debug, Clone)]
pub struct TreeIndex<'t> {
    tree: &'t SyntaxTree,
    parents: Vec<Option<NodeId>>,
}

impl<'t> TreeIndex<'t> {
    /// Records the parent of every node reachable from the root.
    #[must_use]
    pub fn build(tree: &'t SyntaxTree) -> Self {
        let mut parents = vec![None; tree.len()];
        let mut stack = vec![tree.root()];

        while let Some(id) = stack.pop() {
            for child in tree.children(id) {
                if let Some(slot) = parents.get_mut(child.index()) {
                    *slot = Some(id);
                }
                stack.push(child);
            }
        }

        Self { tree, parents }
    }

    /// Returns the indexed tree.
    #[must_use]
    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    /// Returns the immediate parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.index()).copied().flatten()
    }

    /// Iterates over the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Returns the innermost class enclosing `id`.
    #[must_use]
    pub fn nearest_class(&self, id: NodeId) -> Option<(NodeId, &'t ClassDef)> {
        let tree = self.tree;
        self.ancestors(id).find_map(|ancestor| match tree.kind(ancestor) {
            NodeKind::ClassDef(class) => Some((ancestor, class)),
            _ => None,
        })
    }

    /// Returns the innermost function enclosing `id`.
    #[must_use]
    pub fn nearest_function(&self, id: NodeId) -> Option<(NodeId, &'t FunctionDef)> {
        let tree = self.tree;
        self.ancestors(id).find_map(|ancestor| match tree.kind(ancestor) {
            NodeKind::FunctionDef(function) => Some((ancestor, function)),
            _ => None,
        })
    }

    /// Returns the enclosing scopes of `id`, innermost first and always
    /// ending with the module.
    #[must_use]
    pub fn scope_chain(&self, id: NodeId) -> Vec<Scope> {
        let mut chain: Vec<Scope> = self
            .ancestors(id)
            .filter_map(|ancestor| self.scope_opened_by(ancestor))
            .collect();
        chain.push(self.module_scope());
        chain
    }

    /// Returns the innermost scope enclosing `id`.
    #[must_use]
    pub fn innermost_scope(&self, id: NodeId) -> Scope {
        self.ancestors(id)
            .find_map(|ancestor| self.scope_opened_by(ancestor))
            .unwrap_or_else(|| self.module_scope())
    }

    fn scope_opened_by(&self, id: NodeId) -> Option<Scope> {
        let kind = match self.tree.kind(id) {
            NodeKind::ClassDef(_) => ScopeKind::Class,
            NodeKind::FunctionDef(_) => ScopeKind::Function,
            _ => return None,
        };
        Some(Scope { kind, node: id })
    }

    fn module_scope(&self) -> Scope {
        Scope {
            kind: ScopeKind::Module,
            node: self.tree.root(),
        }
    }

    /// Returns the class whose body directly contains `id`, i.e. the
    /// nearest class when no function sits between it and `id`.
    #[must_use]
    pub fn class_body_owner(&self, id: NodeId) -> Option<(NodeId, &'t ClassDef)> {
        let tree = self.tree;
        let scope = self.innermost_scope(id);
        match (scope.kind, tree.kind(scope.node)) {
            (ScopeKind::Class, NodeKind::ClassDef(class)) => Some((scope.node, class)),
            _ => None,
        }
    }

    /// Returns true if `id` sits directly in a module body, outside any
    /// class or function.
    #[must_use]
    pub fn is_module_level(&self, id: NodeId) -> bool {
        self.innermost_scope(id).kind == ScopeKind::Module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AnnAssign, Identifier, Position, Span, TreeBuilder};

    fn span(line: usize) -> Span {
        Span::new(Position::new(line, 0, 0), Position::new(line, 1, 0))
    }

    fn class(builder: &mut TreeBuilder, name: &str, body: Vec<NodeId>) -> NodeId {
        builder.push(
            NodeKind::ClassDef(ClassDef {
                name: Identifier::new(name, span(1)),
                bases: Vec::new(),
                keywords: Vec::new(),
                decorators: Vec::new(),
                body,
            }),
            span(1),
        )
    }

    fn function(builder: &mut TreeBuilder, name: &str, body: Vec<NodeId>) -> NodeId {
        builder.push(
            NodeKind::FunctionDef(FunctionDef {
                name: Identifier::new(name, span(1)),
                is_async: false,
                parameters: Vec::new(),
                returns: None,
                decorators: Vec::new(),
                body,
            }),
            span(1),
        )
    }

    fn annotated(builder: &mut TreeBuilder, name: &str) -> NodeId {
        let target = builder.push(NodeKind::Name { id: name.into() }, span(2));
        let annotation = builder.push(NodeKind::Name { id: "int".into() }, span(2));
        builder.push(
            NodeKind::AnnAssign(AnnAssign {
                target,
                annotation,
                value: None,
            }),
            span(2),
        )
    }

    #[test]
    fn test_nearest_scope_for_class_inside_function() {
        // def factory():
        //     class Inner:
        //         field: int
        let mut builder = TreeBuilder::new();
        let field = annotated(&mut builder, "field");
        let inner = class(&mut builder, "Inner", vec![field]);
        let factory = function(&mut builder, "factory", vec![inner]);
        let module = builder.push(NodeKind::Module { body: vec![factory] }, span(1));
        let tree = builder.finish(module);
        let index = TreeIndex::build(&tree);

        assert_eq!(index.nearest_class(field).map(|(id, _)| id), Some(inner));
        assert_eq!(index.nearest_function(field).map(|(id, _)| id), Some(factory));
        assert_eq!(index.class_body_owner(field).map(|(id, _)| id), Some(inner));

        let kinds: Vec<ScopeKind> = index.scope_chain(field).iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![ScopeKind::Class, ScopeKind::Function, ScopeKind::Module]
        );
    }

    #[test]
    fn test_method_local_is_not_class_body() {
        // class Outer:
        //     def method():
        //         local: int
        let mut builder = TreeBuilder::new();
        let local = annotated(&mut builder, "local");
        let method = function(&mut builder, "method", vec![local]);
        let outer = class(&mut builder, "Outer", vec![method]);
        let module = builder.push(NodeKind::Module { body: vec![outer] }, span(1));
        let tree = builder.finish(module);
        let index = TreeIndex::build(&tree);

        assert_eq!(index.nearest_class(local).map(|(id, _)| id), Some(outer));
        assert!(index.class_body_owner(local).is_none());
        assert_eq!(index.innermost_scope(local).kind, ScopeKind::Function);
        assert_eq!(index.parent(method), Some(outer));
        assert!(index.is_module_level(outer));
        assert!(!index.is_module_level(method));
    }
}
