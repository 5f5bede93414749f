//! Store/load accounting for names inside one function scope.
//!
//! Nested `def` and `class` bodies are their own scopes and are skipped;
//! their decorators, defaults, annotations and bases are evaluated in the
//! enclosing scope and therefore counted. Lambdas and comprehensions are
//! counted as part of the enclosing function.

use std::collections::HashMap;

use crate::ast::{NodeId, NodeKind, Parameter, Position, SyntaxTree};

/// How a name was bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Sole plain-name target of `name = value` (chained targets included).
    Assignment {
        /// The assignment statement.
        statement: NodeId,
    },
    /// Plain-name target of `name: annotation = value`.
    AnnotatedAssignment {
        /// The assignment statement.
        statement: NodeId,
    },
    /// Target of `name += value`.
    AugmentedAssignment,
    /// A name inside a tuple, list or starred target.
    Unpacking,
    /// `for name in ...`
    LoopTarget,
    /// `... for name in ...` inside a comprehension.
    ComprehensionTarget,
    /// `with ... as name`
    WithTarget,
    /// `name := value`
    NamedExpression,
}

/// Whether a reference reads or writes the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// The name is bound.
    Store(Binding),
    /// The name is read.
    Load,
}

impl AccessKind {
    /// Returns true for stores.
    #[must_use]
    pub fn is_store(self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// One reference to a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    /// The `Name` node.
    pub node: NodeId,
    /// Read or write.
    pub kind: AccessKind,
    /// Where the reference starts.
    pub position: Position,
}

/// Summary of how a name is used in a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageClass {
    /// Bound but never read.
    StoreOnly,
    /// Read but never bound (globals, builtins, parameters).
    LoadOnly,
    /// Bound exactly once and then read exactly once.
    StoreThenLoadOnce,
    /// Anything else.
    MultiUse,
}

/// Every access to one name, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageRecord {
    accesses: Vec<Access>,
}

impl UsageRecord {
    /// Returns all accesses in source order.
    #[must_use]
    pub fn accesses(&self) -> &[Access] {
        &self.accesses
    }

    /// Iterates over the stores.
    pub fn stores(&self) -> impl Iterator<Item = &Access> {
        self.accesses.iter().filter(|a| a.kind.is_store())
    }

    /// Iterates over the loads.
    pub fn loads(&self) -> impl Iterator<Item = &Access> {
        self.accesses.iter().filter(|a| !a.kind.is_store())
    }

    /// Returns the number of stores.
    #[must_use]
    pub fn store_count(&self) -> usize {
        self.stores().count()
    }

    /// Returns the number of loads.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads().count()
    }

    /// Classifies the usage pattern of this name.
    #[must_use]
    pub fn classify(&self) -> UsageClass {
        match (self.store_count(), self.load_count()) {
            (0, _) => UsageClass::LoadOnly,
            (_, 0) => UsageClass::StoreOnly,
            (1, 1) if self.accesses[0].kind.is_store() => UsageClass::StoreThenLoadOnce,
            _ => UsageClass::MultiUse,
        }
    }

    /// Returns the single store and the single load for a
    /// [`UsageClass::StoreThenLoadOnce`] name.
    #[must_use]
    pub fn single_use(&self) -> Option<(&Access, &Access)> {
        if self.classify() != UsageClass::StoreThenLoadOnce {
            return None;
        }
        Some((self.stores().next()?, self.loads().next()?))
    }
}

/// Usage records of one scope, iterated in order of first occurrence.
#[derive(Debug, Clone, Default)]
pub struct UsageMap {
    order: Vec<String>,
    records: HashMap<String, UsageRecord>,
}

impl UsageMap {
    /// Returns the record for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&UsageRecord> {
        self.records.get(name)
    }

    /// Returns the number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the scope references no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over `(name, record)` pairs by first occurrence.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UsageRecord)> {
        self.order
            .iter()
            .filter_map(|name| self.records.get(name).map(|r| (name.as_str(), r)))
    }
}

/// Returns true if `name` may be reported as a temporary variable:
/// not `_`-prefixed and not a receiver name.
#[must_use]
pub fn is_temporary_candidate(name: &str) -> bool {
    !name.starts_with('_') && name != "self" && name != "cls"
}

/// Collects name accesses for one function scope.
pub struct UsageAnalyzer<'t> {
    tree: &'t SyntaxTree,
    accesses: Vec<(String, Access)>,
}

impl<'t> UsageAnalyzer<'t> {
    /// Analyzes the body of the function `function`. Returns an empty map if
    /// the node is not a function definition.
    #[must_use]
    pub fn analyze(tree: &'t SyntaxTree, function: NodeId) -> UsageMap {
        let mut analyzer = Self {
            tree,
            accesses: Vec::new(),
        };
        if let NodeKind::FunctionDef(def) = tree.kind(function) {
            for statement in &def.body {
                analyzer.visit(*statement);
            }
        }
        analyzer.finish()
    }

    fn finish(mut self) -> UsageMap {
        self.accesses
            .sort_by_key(|(_, access)| (access.position.line, access.position.column));

        let mut map = UsageMap::default();
        for (name, access) in self.accesses {
            map.records
                .entry(name.clone())
                .or_insert_with(|| {
                    map.order.push(name);
                    UsageRecord::default()
                })
                .accesses
                .push(access);
        }
        map
    }

    fn record(&mut self, id: NodeId, kind: AccessKind) {
        if let NodeKind::Name { id: name } = self.tree.kind(id) {
            self.accesses.push((
                name.clone(),
                Access {
                    node: id,
                    kind,
                    position: self.tree.position(id),
                },
            ));
        }
    }

    fn visit_all(&mut self, ids: &[NodeId]) {
        for id in ids {
            self.visit(*id);
        }
    }

    fn visit_parameters(&mut self, parameters: &[Parameter]) {
        for parameter in parameters {
            if let Some(annotation) = parameter.annotation {
                self.visit(annotation);
            }
            if let Some(default) = parameter.default {
                self.visit(default);
            }
        }
    }

    fn visit(&mut self, id: NodeId) {
        let tree = self.tree;
        match tree.kind(id) {
            NodeKind::Name { .. } => self.record(id, AccessKind::Load),
            NodeKind::FunctionDef(nested) => {
                self.visit_all(&nested.decorators);
                self.visit_parameters(&nested.parameters);
                if let Some(returns) = nested.returns {
                    self.visit(returns);
                }
            }
            NodeKind::ClassDef(nested) => {
                self.visit_all(&nested.decorators);
                self.visit_all(&nested.bases);
                for keyword in &nested.keywords {
                    self.visit(keyword.value);
                }
            }
            NodeKind::Assign(assign) => {
                let single = assign.targets.len() == 1;
                for target in &assign.targets {
                    let binding = if single || tree.name_id(*target).is_some() {
                        Binding::Assignment { statement: id }
                    } else {
                        Binding::Unpacking
                    };
                    self.bind(*target, binding);
                }
                self.visit(assign.value);
            }
            NodeKind::AnnAssign(assign) => {
                self.bind(
                    assign.target,
                    Binding::AnnotatedAssignment { statement: id },
                );
                self.visit(assign.annotation);
                if let Some(value) = assign.value {
                    self.visit(value);
                }
            }
            NodeKind::AugAssign { target, value } => {
                // `name += value` reads the name before rebinding it.
                if tree.name_id(*target).is_some() {
                    self.record(*target, AccessKind::Load);
                }
                self.bind(*target, Binding::AugmentedAssignment);
                self.visit(*value);
            }
            NodeKind::NamedExpr { target, value } => {
                self.bind(*target, Binding::NamedExpression);
                self.visit(*value);
            }
            NodeKind::For(node) => {
                self.bind(node.target, Binding::LoopTarget);
                self.visit(node.iter);
                self.visit_all(&node.body);
                self.visit_all(&node.orelse);
            }
            NodeKind::With(node) => {
                for item in &node.items {
                    self.visit(item.context);
                    if let Some(target) = item.target {
                        self.bind(target, Binding::WithTarget);
                    }
                }
                self.visit_all(&node.body);
            }
            NodeKind::Generator(generator) => {
                self.bind(generator.target, Binding::ComprehensionTarget);
                self.visit(generator.iter);
                self.visit_all(&generator.ifs);
            }
            _ => {
                for child in tree.children(id) {
                    self.visit(child);
                }
            }
        }
    }

    fn bind(&mut self, target: NodeId, binding: Binding) {
        let tree = self.tree;
        match tree.kind(target) {
            NodeKind::Name { .. } => self.record(target, AccessKind::Store(binding)),
            NodeKind::Tuple { elts } | NodeKind::List { elts } => {
                for element in elts {
                    self.bind(*element, unpacked(binding));
                }
            }
            NodeKind::Starred { value } => self.bind(*value, unpacked(binding)),
            _ => self.visit(target),
        }
    }
}

/// Names nested in a destructuring target count as unpacking, except for
/// loop and comprehension targets, which keep their origin.
fn unpacked(binding: Binding) -> Binding {
    match binding {
        Binding::LoopTarget | Binding::ComprehensionTarget | Binding::WithTarget => binding,
        _ => Binding::Unpacking,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Assign, FunctionDef, Identifier, Span, TreeBuilder};

    struct Fixture {
        builder: TreeBuilder,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                builder: TreeBuilder::new(),
            }
        }

        fn name(&mut self, id: &str, line: usize, column: usize) -> NodeId {
            self.builder.push(
                NodeKind::Name { id: id.into() },
                Span::new(
                    Position::new(line, column, 0),
                    Position::new(line, column + id.len(), 0),
                ),
            )
        }

        fn assign(&mut self, targets: Vec<NodeId>, value: NodeId, line: usize) -> NodeId {
            self.builder.push(
                NodeKind::Assign(Assign { targets, value }),
                Span::new(Position::new(line, 4, 0), Position::new(line, 20, 0)),
            )
        }

        fn function(mut self, body: Vec<NodeId>) -> (SyntaxTree, NodeId) {
            let function = self.builder.push(
                NodeKind::FunctionDef(FunctionDef {
                    name: Identifier::new("compute_total", Span::default()),
                    is_async: false,
                    parameters: Vec::new(),
                    returns: None,
                    decorators: Vec::new(),
                    body,
                }),
                Span::default(),
            );
            let module = self
                .builder
                .push(NodeKind::Module { body: vec![function] }, Span::default());
            (self.builder.finish(module), function)
        }
    }

    #[test]
    fn test_store_then_single_load() {
        // first = source
        // second = first
        let mut f = Fixture::new();
        let first = f.name("first", 2, 4);
        let source = f.name("source", 2, 12);
        let line_two = f.assign(vec![first], source, 2);
        let second = f.name("second", 3, 4);
        let first_load = f.name("first", 3, 13);
        let line_three = f.assign(vec![second], first_load, 3);
        let (tree, function) = f.function(vec![line_two, line_three]);

        let usage = UsageAnalyzer::analyze(&tree, function);
        let names: Vec<&str> = usage.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["first", "source", "second"]);

        let record = usage.get("first").expect("first is recorded");
        assert_eq!(record.classify(), UsageClass::StoreThenLoadOnce);
        let (store, load) = record.single_use().expect("single use");
        assert_eq!(
            store.kind,
            AccessKind::Store(Binding::Assignment {
                statement: line_two
            })
        );
        assert_eq!(load.position.line, 3);

        assert_eq!(usage.get("source").map(UsageRecord::classify), Some(UsageClass::LoadOnly));
        assert_eq!(usage.get("second").map(UsageRecord::classify), Some(UsageClass::StoreOnly));
    }

    #[test]
    fn test_tuple_targets_are_unpacking() {
        // left, (right, rest) = pair
        let mut f = Fixture::new();
        let left = f.name("left", 2, 4);
        let right = f.name("right", 2, 11);
        let rest = f.name("rest", 2, 18);
        let inner = f
            .builder
            .push(NodeKind::Tuple { elts: vec![right, rest] }, Span::default());
        let outer = f
            .builder
            .push(NodeKind::Tuple { elts: vec![left, inner] }, Span::default());
        let pair = f.name("pair", 2, 26);
        let statement = f.assign(vec![outer], pair, 2);
        let (tree, function) = f.function(vec![statement]);

        let usage = UsageAnalyzer::analyze(&tree, function);
        for name in ["left", "right", "rest"] {
            let record = usage.get(name).expect("target recorded");
            assert_eq!(record.store_count(), 1);
            assert_eq!(
                record.accesses()[0].kind,
                AccessKind::Store(Binding::Unpacking)
            );
        }
    }

    #[test]
    fn test_augmented_target_is_read_and_bound() {
        // total = start
        // total += step
        let mut f = Fixture::new();
        let total = f.name("total", 2, 4);
        let start = f.name("start", 2, 12);
        let line_two = f.assign(vec![total], start, 2);
        let total_again = f.name("total", 3, 4);
        let step = f.name("step", 3, 13);
        let line_three = f.builder.push(
            NodeKind::AugAssign {
                target: total_again,
                value: step,
            },
            Span::new(Position::new(3, 4, 0), Position::new(3, 17, 0)),
        );
        let (tree, function) = f.function(vec![line_two, line_three]);

        let usage = UsageAnalyzer::analyze(&tree, function);
        let record = usage.get("total").expect("total is recorded");
        assert_eq!(record.store_count(), 2);
        assert_eq!(record.load_count(), 1);
        assert_eq!(record.classify(), UsageClass::MultiUse);
        assert!(record.single_use().is_none());
        let kinds: Vec<AccessKind> = record.accesses().iter().map(|a| a.kind).collect();
        assert_eq!(
            &kinds[1..],
            &[AccessKind::Load, AccessKind::Store(Binding::AugmentedAssignment)]
        );
    }

    #[test]
    fn test_nested_function_body_is_skipped() {
        let mut f = Fixture::new();
        let hidden = f.name("hidden", 3, 8);
        let value = f.name("payload", 3, 17);
        let inner_statement = f.assign(vec![hidden], value, 3);
        let nested = f.builder.push(
            NodeKind::FunctionDef(FunctionDef {
                name: Identifier::new("nested_helper", Span::default()),
                is_async: false,
                parameters: Vec::new(),
                returns: None,
                decorators: Vec::new(),
                body: vec![inner_statement],
            }),
            Span::default(),
        );
        let (tree, function) = f.function(vec![nested]);

        let usage = UsageAnalyzer::analyze(&tree, function);
        assert!(usage.is_empty());
        assert_eq!(UsageAnalyzer::analyze(&tree, nested).len(), 2);
    }

    #[test]
    fn test_receiver_names_are_not_candidates() {
        assert!(!is_temporary_candidate("self"));
        assert!(!is_temporary_candidate("cls"));
        assert!(!is_temporary_candidate("_cached"));
        assert!(is_temporary_candidate("result_value"));
    }
}
