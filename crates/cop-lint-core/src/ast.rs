//! Arena-backed Python syntax tree.
//!
//! The tree is produced by a frontend (see `cop-lint-ts`) and is read-only
//! for the whole lint run. Nodes refer to their children by [`NodeId`] and
//! never store parent links; ancestor queries go through
//! [`TreeIndex`](crate::TreeIndex).

use std::fmt;

/// Handle to a node stored in a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the arena slot of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point in the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column as a byte offset within the line (0-indexed).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Source range covered by a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// First position covered.
    pub start: Position,
    /// Position just past the end.
    pub end: Position,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns true if the span starts and ends on the same line.
    #[must_use]
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

/// An identifier that is not itself an expression node (definition names,
/// parameter names, attribute names, exception aliases).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// The identifier text.
    pub name: String,
    /// Where the identifier appears.
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

/// Literal constant values.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// Integer literal, kept as written.
    Int(String),
    /// Float or imaginary literal, kept as written.
    Float(String),
    /// String literal without interpolation, kept as written.
    Str(String),
    /// `...`
    Ellipsis,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `not x`
    Not,
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `~x`
    Invert,
}

/// One name in an `import` or `from ... import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Imported (possibly dotted) name.
    pub name: String,
    /// `as` name, if any.
    pub asname: Option<String>,
    /// Where the alias appears.
    pub span: Span,
}

/// A keyword argument in a call or class header. `arg` is `None` for `**kwargs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    /// Keyword name.
    pub arg: Option<Identifier>,
    /// Argument value.
    pub value: NodeId,
}

/// Parameter flavours in a function or lambda signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Before a `/` separator.
    PositionalOnly,
    /// Ordinary positional-or-keyword parameter.
    Positional,
    /// `*args`
    VarPositional,
    /// After `*` or `*args`.
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

/// A single parameter of a function or lambda.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub name: Identifier,
    /// Parameter flavour.
    pub kind: ParameterKind,
    /// Annotation expression.
    pub annotation: Option<NodeId>,
    /// Default value expression.
    pub default: Option<NodeId>,
}

/// `class Name(bases): body`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    /// Class name.
    pub name: Identifier,
    /// Positional base expressions.
    pub bases: Vec<NodeId>,
    /// Keyword arguments of the class header (e.g. `metaclass=`).
    pub keywords: Vec<Keyword>,
    /// Decorator expressions, outermost first.
    pub decorators: Vec<NodeId>,
    /// Body statements.
    pub body: Vec<NodeId>,
}

/// `def name(params): body` and `async def`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Function name.
    pub name: Identifier,
    /// Whether the function is declared `async`.
    pub is_async: bool,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Return annotation.
    pub returns: Option<NodeId>,
    /// Decorator expressions, outermost first.
    pub decorators: Vec<NodeId>,
    /// Body statements.
    pub body: Vec<NodeId>,
}

/// `target = value`, with one entry in `targets` per chained `=`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    /// Assignment targets, left to right.
    pub targets: Vec<NodeId>,
    /// Assigned value.
    pub value: NodeId,
}

/// `target: annotation = value`
#[derive(Debug, Clone, PartialEq)]
pub struct AnnAssign {
    /// Annotated target.
    pub target: NodeId,
    /// Annotation expression.
    pub annotation: NodeId,
    /// Assigned value, absent for bare declarations.
    pub value: Option<NodeId>,
}

/// `from module import names`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFrom {
    /// Dotted module path, absent for `from . import x`.
    pub module: Option<String>,
    /// Number of leading dots (0 for absolute imports).
    pub level: usize,
    /// Imported names.
    pub names: Vec<Alias>,
}

/// `for target in iter: body else: orelse`
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    /// Loop target.
    pub target: NodeId,
    /// Iterated expression.
    pub iter: NodeId,
    /// Loop body.
    pub body: Vec<NodeId>,
    /// `else` clause body.
    pub orelse: Vec<NodeId>,
    /// Whether this is `async for`.
    pub is_async: bool,
}

/// One `context as target` item of a `with` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WithItem {
    /// Context manager expression.
    pub context: NodeId,
    /// Optional `as` target.
    pub target: Option<NodeId>,
}

/// `with items: body`
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    /// Context items.
    pub items: Vec<WithItem>,
    /// Body statements.
    pub body: Vec<NodeId>,
}

/// `except kind as name: body`
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptHandler {
    /// Caught exception expression.
    pub kind: Option<NodeId>,
    /// Bound name.
    pub name: Option<Identifier>,
    /// Handler body.
    pub body: Vec<NodeId>,
}

/// `lambda params: body`
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    /// Lambda parameters.
    pub parameters: Vec<Parameter>,
    /// Body expression.
    pub body: NodeId,
}

/// Comprehension flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComprehensionKind {
    /// `[elt for ...]`
    List,
    /// `{elt for ...}`
    Set,
    /// `(elt for ...)`
    Generator,
    /// `{key: value for ...}`
    Dict,
}

/// A list/set/dict comprehension or generator expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    /// Flavour of the comprehension.
    pub kind: ComprehensionKind,
    /// Element expression (the key for dict comprehensions).
    pub element: NodeId,
    /// Value expression of dict comprehensions.
    pub value: Option<NodeId>,
    /// `for ... in ...` clauses, each a [`NodeKind::Generator`] node.
    pub generators: Vec<NodeId>,
}

/// One `for target in iter if cond` clause of a comprehension.
#[derive(Debug, Clone, PartialEq)]
pub struct Generator {
    /// Clause target.
    pub target: NodeId,
    /// Iterated expression.
    pub iter: NodeId,
    /// Trailing `if` filters.
    pub ifs: Vec<NodeId>,
    /// Whether this is `async for`.
    pub is_async: bool,
}

/// The kind and payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// File root.
    Module {
        /// Top-level statements.
        body: Vec<NodeId>,
    },
    /// Class definition.
    ClassDef(ClassDef),
    /// Function definition (sync or async).
    FunctionDef(FunctionDef),
    /// Plain assignment.
    Assign(Assign),
    /// Annotated assignment.
    AnnAssign(AnnAssign),
    /// Augmented assignment (`+=` and friends).
    AugAssign {
        /// Assigned target.
        target: NodeId,
        /// Right-hand side.
        value: NodeId,
    },
    /// `import a.b as c`
    Import {
        /// Imported names.
        names: Vec<Alias>,
    },
    /// `from a import b`
    ImportFrom(ImportFrom),
    /// `for` loop.
    For(For),
    /// `with` statement.
    With(With),
    /// `except` clause.
    ExceptHandler(ExceptHandler),
    /// Identifier reference.
    Name {
        /// Identifier text.
        id: String,
    },
    /// `value.attr`
    Attribute {
        /// Owner expression.
        value: NodeId,
        /// Accessed attribute.
        attr: Identifier,
    },
    /// `value[slice]`
    Subscript {
        /// Subscripted expression.
        value: NodeId,
        /// Index expression (a tuple for `a[x, y]`).
        slice: NodeId,
    },
    /// Function call.
    Call {
        /// Callee expression.
        func: NodeId,
        /// Positional arguments (starred arguments included).
        args: Vec<NodeId>,
        /// Keyword arguments.
        keywords: Vec<Keyword>,
    },
    /// Literal constant.
    Constant(Constant),
    /// `[a, b]`
    List {
        /// Elements.
        elts: Vec<NodeId>,
    },
    /// `(a, b)` or `a, b`
    Tuple {
        /// Elements.
        elts: Vec<NodeId>,
    },
    /// `{a, b}`
    Set {
        /// Elements.
        elts: Vec<NodeId>,
    },
    /// `{k: v}`; a `None` key marks a `**mapping` entry.
    Dict {
        /// Keys.
        keys: Vec<Option<NodeId>>,
        /// Values.
        values: Vec<NodeId>,
    },
    /// Unary operation.
    UnaryOp {
        /// Operator.
        op: UnaryOperator,
        /// Operand.
        operand: NodeId,
    },
    /// `*value`
    Starred {
        /// Starred expression.
        value: NodeId,
    },
    /// `target := value`
    NamedExpr {
        /// Bound name.
        target: NodeId,
        /// Value.
        value: NodeId,
    },
    /// Lambda expression.
    Lambda(Lambda),
    /// Comprehension or generator expression.
    Comprehension(Comprehension),
    /// Comprehension `for` clause.
    Generator(Generator),
    /// Any statement or expression without a dedicated kind; keeps its
    /// children so names beneath it are still visited.
    Other {
        /// Frontend node kind, for debugging.
        label: String,
        /// Child nodes in source order.
        children: Vec<NodeId>,
    },
}

impl NodeKind {
    /// Returns the direct children of this node in source order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            Self::Module { body } => out.extend(body),
            Self::ClassDef(class) => {
                out.extend(&class.decorators);
                out.extend(&class.bases);
                out.extend(class.keywords.iter().map(|k| k.value));
                out.extend(&class.body);
            }
            Self::FunctionDef(function) => {
                out.extend(&function.decorators);
                push_parameters(&mut out, &function.parameters);
                out.extend(function.returns);
                out.extend(&function.body);
            }
            Self::Assign(assign) => {
                out.extend(&assign.targets);
                out.push(assign.value);
            }
            Self::AnnAssign(assign) => {
                out.push(assign.target);
                out.push(assign.annotation);
                out.extend(assign.value);
            }
            Self::AugAssign { target, value } | Self::NamedExpr { target, value } => {
                out.push(*target);
                out.push(*value);
            }
            Self::Import { .. } | Self::ImportFrom(_) | Self::Name { .. } | Self::Constant(_) => {}
            Self::For(node) => {
                out.push(node.target);
                out.push(node.iter);
                out.extend(&node.body);
                out.extend(&node.orelse);
            }
            Self::With(node) => {
                for item in &node.items {
                    out.push(item.context);
                    out.extend(item.target);
                }
                out.extend(&node.body);
            }
            Self::ExceptHandler(handler) => {
                out.extend(handler.kind);
                out.extend(&handler.body);
            }
            Self::Attribute { value, .. }
            | Self::Starred { value }
            | Self::UnaryOp { operand: value, .. } => out.push(*value),
            Self::Subscript { value, slice } => {
                out.push(*value);
                out.push(*slice);
            }
            Self::Call {
                func,
                args,
                keywords,
            } => {
                out.push(*func);
                out.extend(args);
                out.extend(keywords.iter().map(|k| k.value));
            }
            Self::List { elts } | Self::Tuple { elts } | Self::Set { elts } => out.extend(elts),
            Self::Dict { keys, values } => {
                for (key, value) in keys.iter().zip(values) {
                    out.extend(*key);
                    out.push(*value);
                }
            }
            Self::Lambda(lambda) => {
                push_parameters(&mut out, &lambda.parameters);
                out.push(lambda.body);
            }
            Self::Comprehension(comp) => {
                out.push(comp.element);
                out.extend(comp.value);
                out.extend(&comp.generators);
            }
            Self::Generator(generator) => {
                out.push(generator.target);
                out.push(generator.iter);
                out.extend(&generator.ifs);
            }
            Self::Other { children, .. } => out.extend(children),
        }
        out
    }
}

fn push_parameters(out: &mut Vec<NodeId>, parameters: &[Parameter]) {
    for parameter in parameters {
        out.extend(parameter.annotation);
        out.extend(parameter.default);
    }
}

/// A node: its kind plus the source range it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Kind and payload.
    pub kind: NodeKind,
    /// Source range.
    pub span: Span,
}

/// An immutable Python syntax tree for one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    /// Returns the module node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns the kind of the node behind `id`.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Returns the span of the node behind `id`.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// Returns the start position of the node behind `id`.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Position {
        self.node(id).span.start
    }

    /// Returns the direct children of `id` in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Iterates over every node in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (to_id(i), node))
    }

    /// Returns the statements directly in the module body.
    #[must_use]
    pub fn module_body(&self) -> &[NodeId] {
        match self.kind(self.root) {
            NodeKind::Module { body } => body,
            _ => &[],
        }
    }

    /// Returns the identifier if `id` is a `Name` node.
    #[must_use]
    pub fn name_id(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Name { id } => Some(id),
            _ => None,
        }
    }

    /// Returns the last segment of a `Name` or `Attribute` node
    /// (`final` for both `final` and `typing.final`).
    #[must_use]
    pub fn terminal_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Name { id } => Some(id),
            NodeKind::Attribute { attr, .. } => Some(attr.as_str()),
            _ => None,
        }
    }

    /// Returns the owner of an `Attribute` node when the owner is a plain
    /// name (`pytest` in `pytest.fixture`).
    #[must_use]
    pub fn attribute_owner(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Attribute { value, .. } => self.name_id(*value),
            _ => None,
        }
    }

    /// Returns the callee for a `Call` node, or the node itself otherwise.
    #[must_use]
    pub fn callee(&self, id: NodeId) -> NodeId {
        match self.kind(id) {
            NodeKind::Call { func, .. } => *func,
            _ => id,
        }
    }

    /// Returns the name a base-class expression refers to: the terminal
    /// name of `Base`, `module.Base` and `Base[...]`.
    #[must_use]
    pub fn base_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Subscript { value, .. } => self.terminal_name(*value),
            _ => self.terminal_name(id),
        }
    }

    /// Returns true if any base of `class` refers to one of `names`.
    #[must_use]
    pub fn inherits_from<S: AsRef<str>>(&self, class: &ClassDef, names: &[S]) -> bool {
        class.bases.iter().any(|base| {
            self.base_name(*base)
                .is_some_and(|base| names.iter().any(|n| n.as_ref() == base))
        })
    }

    /// Returns true if the node is a literal constant.
    #[must_use]
    pub fn is_constant(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Constant(_))
    }

    /// Returns true for a constant or a unary operation applied to one (`-1`).
    #[must_use]
    pub fn is_numeric_literal(&self, id: NodeId) -> bool {
        match self.kind(id) {
            NodeKind::Constant(_) => true,
            NodeKind::UnaryOp { operand, .. } => self.is_constant(*operand),
            _ => false,
        }
    }
}

fn to_id(index: usize) -> NodeId {
    NodeId(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Incrementally builds a [`SyntaxTree`].
///
/// Children must be pushed before the parent that refers to them.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = to_id(self.nodes.len());
        self.nodes.push(Node { kind, span });
        id
    }

    /// Finishes the tree with `root` as the module node.
    #[must_use]
    pub fn finish(self, root: NodeId) -> SyntaxTree {
        SyntaxTree {
            nodes: self.nodes,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(line: usize, column: usize) -> Span {
        Span::new(Position::new(line, column, 0), Position::new(line, column + 1, 0))
    }

    fn name(builder: &mut TreeBuilder, id: &str, line: usize) -> NodeId {
        builder.push(NodeKind::Name { id: id.to_string() }, span(line, 0))
    }

    #[test]
    fn test_children_follow_source_order() {
        let mut builder = TreeBuilder::new();
        let target = name(&mut builder, "result", 1);
        let value = name(&mut builder, "source", 1);
        let assign = builder.push(
            NodeKind::Assign(Assign {
                targets: vec![target],
                value,
            }),
            span(1, 0),
        );
        let module = builder.push(NodeKind::Module { body: vec![assign] }, span(1, 0));
        let tree = builder.finish(module);

        assert_eq!(tree.children(assign), vec![target, value]);
        assert_eq!(tree.module_body(), &[assign]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_base_name_handles_attribute_and_subscript() {
        let mut builder = TreeBuilder::new();
        let module_name = name(&mut builder, "typing", 1);
        let attribute = builder.push(
            NodeKind::Attribute {
                value: module_name,
                attr: Identifier::new("Protocol", span(1, 7)),
            },
            span(1, 0),
        );
        let argument = name(&mut builder, "T", 1);
        let subscript = builder.push(
            NodeKind::Subscript {
                value: attribute,
                slice: argument,
            },
            span(1, 0),
        );
        let module = builder.push(NodeKind::Module { body: vec![] }, span(1, 0));
        let tree = builder.finish(module);

        assert_eq!(tree.base_name(subscript), Some("Protocol"));
        assert_eq!(tree.base_name(attribute), Some("Protocol"));
        assert_eq!(tree.attribute_owner(attribute), Some("typing"));
        assert_eq!(tree.terminal_name(subscript), None);
    }

    #[test]
    fn test_span_single_line() {
        assert!(span(3, 4).is_single_line());
        let multi = Span::new(Position::new(1, 0, 0), Position::new(4, 1, 30));
        assert!(!multi.is_single_line());
    }
}
