//! Lowering from tree-sitter-python nodes to the cop-lint syntax tree.
//!
//! Every named node is lowered; kinds without a dedicated [`NodeKind`]
//! become [`NodeKind::Other`] with their children lowered, so identifiers
//! below unmodelled syntax (conditions, `return` values, `ERROR` nodes)
//! stay visible to the rules.

use cop_lint_core::ast::{
    Alias, AnnAssign, Assign, ClassDef, Comprehension, ComprehensionKind, Constant, ExceptHandler,
    For, FunctionDef, Generator, Identifier, ImportFrom, Keyword, Lambda, Parameter,
    ParameterKind, UnaryOperator, With, WithItem,
};
use cop_lint_core::{NodeId, NodeKind, Position, Span, SyntaxTree, TreeBuilder};
use tree_sitter::Node;

pub(crate) struct Lowerer<'s> {
    src: &'s [u8],
    builder: TreeBuilder,
}

struct Clause {
    target: NodeId,
    iter: NodeId,
    ifs: Vec<NodeId>,
    is_async: bool,
    span: Span,
}

impl<'s> Lowerer<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        Self {
            src: source.as_bytes(),
            builder: TreeBuilder::new(),
        }
    }

    pub(crate) fn lower_module(mut self, root: Node<'_>) -> SyntaxTree {
        let body = self.statements(root);
        let module = self.builder.push(NodeKind::Module { body }, span(root));
        self.builder.finish(module)
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.src).unwrap_or("")
    }

    fn ident(&self, node: Node<'_>) -> Identifier {
        Identifier::new(self.text(node), span(node))
    }

    fn push(&mut self, kind: NodeKind, node: Node<'_>) -> NodeId {
        self.builder.push(kind, span(node))
    }

    // Statements

    fn statements(&mut self, node: Node<'_>) -> Vec<NodeId> {
        let mut out = Vec::new();
        for child in named_children(node) {
            self.lower_any(child, &mut out);
        }
        out
    }

    fn block(&mut self, node: Option<Node<'_>>) -> Vec<NodeId> {
        node.map(|n| self.statements(n)).unwrap_or_default()
    }

    /// Lowers a statement or an expression, flattening blocks into `out`.
    fn lower_any(&mut self, node: Node<'_>, out: &mut Vec<NodeId>) {
        if node.kind() == "block" {
            for child in named_children(node) {
                self.lower_any(child, out);
            }
        } else if is_statement(node.kind()) {
            out.push(self.lower_statement(node));
        } else {
            out.push(self.lower_expr(node));
        }
    }

    fn lower_statement(&mut self, node: Node<'_>) -> NodeId {
        match node.kind() {
            "expression_statement" => self.lower_expression_statement(node),
            "assignment" => self.lower_assignment(node),
            "augmented_assignment" => {
                let target = self.expr_field(node, "left");
                let value = self.expr_field(node, "right");
                self.push(NodeKind::AugAssign { target, value }, node)
            }
            "import_statement" => {
                let names = self.aliases(node);
                self.push(NodeKind::Import { names }, node)
            }
            "import_from_statement" => self.lower_import_from(node),
            "future_import_statement" => {
                let names = self.aliases(node);
                self.push(
                    NodeKind::ImportFrom(ImportFrom {
                        module: Some("__future__".to_string()),
                        level: 0,
                        names,
                    }),
                    node,
                )
            }
            "decorated_definition" => self.lower_decorated(node),
            "class_definition" => self.lower_class(node, Vec::new()),
            "function_definition" => self.lower_function(node, Vec::new()),
            "for_statement" => self.lower_for(node),
            "with_statement" => self.lower_with(node),
            "except_clause" | "except_group_clause" => self.lower_except(node),
            "global_statement" | "nonlocal_statement" => self.push(
                NodeKind::Other {
                    label: node.kind().to_string(),
                    children: Vec::new(),
                },
                node,
            ),
            _ => self.lower_other(node),
        }
    }

    fn lower_expression_statement(&mut self, node: Node<'_>) -> NodeId {
        let children = named_children(node);
        match children.as_slice() {
            [single] => {
                let mut out = Vec::with_capacity(1);
                self.lower_any(*single, &mut out);
                match out.as_slice() {
                    [id] => *id,
                    _ => self.push_other(node, out),
                }
            }
            _ => {
                let elts = children.iter().map(|c| self.lower_expr(*c)).collect();
                self.push(NodeKind::Tuple { elts }, node)
            }
        }
    }

    fn lower_assignment(&mut self, node: Node<'_>) -> NodeId {
        let mut targets = Vec::new();
        let mut current = node;
        loop {
            if let Some(left) = current.child_by_field_name("left") {
                targets.push(self.lower_expr(left));
            }

            if let Some(annotation) = current.child_by_field_name("type") {
                if let [target] = targets.as_slice() {
                    let target = *target;
                    let annotation = self.lower_expr(annotation);
                    let value = current
                        .child_by_field_name("right")
                        .map(|r| self.lower_expr(r));
                    return self.push(
                        NodeKind::AnnAssign(AnnAssign {
                            target,
                            annotation,
                            value,
                        }),
                        node,
                    );
                }
            }

            match current.child_by_field_name("right") {
                Some(right) if right.kind() == "assignment" => current = right,
                Some(right) => {
                    let value = self.lower_expr(right);
                    return self.push(NodeKind::Assign(Assign { targets, value }), node);
                }
                None => return self.push_other(node, targets),
            }
        }
    }

    fn lower_import_from(&mut self, node: Node<'_>) -> NodeId {
        let (module, level) = match node.child_by_field_name("module_name") {
            Some(name) if name.kind() == "relative_import" => {
                let mut level = 0;
                let mut module = None;
                for child in named_children(name) {
                    match child.kind() {
                        "import_prefix" => level = self.text(child).matches('.').count(),
                        "dotted_name" => module = Some(self.dotted(child)),
                        _ => {}
                    }
                }
                (module, level)
            }
            Some(name) => (Some(self.dotted(name)), 0),
            None => (None, 0),
        };

        let mut names = self.aliases(node);
        if let Some(wildcard) = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "wildcard_import")
        {
            names.push(Alias {
                name: "*".to_string(),
                asname: None,
                span: span(wildcard),
            });
        }

        self.push(
            NodeKind::ImportFrom(ImportFrom {
                module,
                level,
                names,
            }),
            node,
        )
    }

    fn aliases(&self, node: Node<'_>) -> Vec<Alias> {
        let mut cursor = node.walk();
        node.children_by_field_name("name", &mut cursor)
            .map(|name| match name.kind() {
                "aliased_import" => Alias {
                    name: name
                        .child_by_field_name("name")
                        .map(|n| self.dotted(n))
                        .unwrap_or_default(),
                    asname: name
                        .child_by_field_name("alias")
                        .map(|a| self.text(a).to_string()),
                    span: span(name),
                },
                _ => Alias {
                    name: self.dotted(name),
                    asname: None,
                    span: span(name),
                },
            })
            .collect()
    }

    /// Joins the identifiers of a `dotted_name` with dots, dropping any
    /// whitespace or comments between them.
    fn dotted(&self, node: Node<'_>) -> String {
        if node.kind() != "dotted_name" {
            return self.text(node).to_string();
        }
        named_children(node)
            .into_iter()
            .map(|part| self.text(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn lower_decorated(&mut self, node: Node<'_>) -> NodeId {
        let decorators: Vec<NodeId> = named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "decorator")
            .filter_map(first_named)
            .map(|expr| self.lower_expr(expr))
            .collect();

        match node.child_by_field_name("definition") {
            Some(def) if def.kind() == "class_definition" => self.lower_class(def, decorators),
            Some(def) if def.kind() == "function_definition" => {
                self.lower_function(def, decorators)
            }
            Some(def) => {
                let mut children = decorators;
                children.push(self.lower_statement(def));
                self.push_other(node, children)
            }
            None => self.push_other(node, decorators),
        }
    }

    fn lower_class(&mut self, node: Node<'_>, decorators: Vec<NodeId>) -> NodeId {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.ident(n))
            .unwrap_or_else(|| Identifier::new("", span(node)));

        let mut bases = Vec::new();
        let mut keywords = Vec::new();
        if let Some(arguments) = node.child_by_field_name("superclasses") {
            self.arguments(arguments, &mut bases, &mut keywords);
        }
        let body = self.block(node.child_by_field_name("body"));

        self.push(
            NodeKind::ClassDef(ClassDef {
                name,
                bases,
                keywords,
                decorators,
                body,
            }),
            node,
        )
    }

    fn lower_function(&mut self, node: Node<'_>, decorators: Vec<NodeId>) -> NodeId {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.ident(n))
            .unwrap_or_else(|| Identifier::new("", span(node)));
        let parameters = self.parameters(node.child_by_field_name("parameters"));
        let returns = node
            .child_by_field_name("return_type")
            .map(|r| self.lower_expr(r));
        let body = self.block(node.child_by_field_name("body"));

        self.push(
            NodeKind::FunctionDef(FunctionDef {
                name,
                is_async: has_token(node, "async"),
                parameters,
                returns,
                decorators,
                body,
            }),
            node,
        )
    }

    fn parameters(&mut self, node: Option<Node<'_>>) -> Vec<Parameter> {
        let Some(node) = node else {
            return Vec::new();
        };

        let mut out: Vec<Parameter> = Vec::new();
        let mut kind = ParameterKind::Positional;
        for child in named_children(node) {
            match child.kind() {
                "positional_separator" => {
                    for param in &mut out {
                        if param.kind == ParameterKind::Positional {
                            param.kind = ParameterKind::PositionalOnly;
                        }
                    }
                }
                "keyword_separator" => kind = ParameterKind::KeywordOnly,
                "identifier" => out.push(parameter(self.ident(child), kind, None, None)),
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    if let Some(param) = self.splat_parameter(child, None) {
                        kind = ParameterKind::KeywordOnly;
                        out.push(param);
                    }
                }
                "typed_parameter" => {
                    let annotation = child
                        .child_by_field_name("type")
                        .map(|t| self.lower_expr(t));
                    match first_named(child) {
                        Some(inner) if inner.kind() == "identifier" => {
                            out.push(parameter(self.ident(inner), kind, annotation, None));
                        }
                        Some(inner) => {
                            if let Some(param) = self.splat_parameter(inner, annotation) {
                                kind = ParameterKind::KeywordOnly;
                                out.push(param);
                            }
                        }
                        None => {}
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    let annotation = child
                        .child_by_field_name("type")
                        .map(|t| self.lower_expr(t));
                    let default = child
                        .child_by_field_name("value")
                        .map(|v| self.lower_expr(v));
                    if let Some(name) = child
                        .child_by_field_name("name")
                        .filter(|n| n.kind() == "identifier")
                    {
                        out.push(parameter(self.ident(name), kind, annotation, default));
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn splat_parameter(&self, node: Node<'_>, annotation: Option<NodeId>) -> Option<Parameter> {
        let kind = match node.kind() {
            "list_splat_pattern" => ParameterKind::VarPositional,
            "dictionary_splat_pattern" => ParameterKind::VarKeyword,
            _ => return None,
        };
        let name = first_named(node).filter(|n| n.kind() == "identifier")?;
        Some(parameter(self.ident(name), kind, annotation, None))
    }

    fn lower_for(&mut self, node: Node<'_>) -> NodeId {
        let target = self.expr_field(node, "left");
        let iter = self.expr_field(node, "right");
        let body = self.block(node.child_by_field_name("body"));
        let orelse = node
            .child_by_field_name("alternative")
            .map(|alt| self.block(alt.child_by_field_name("body")))
            .unwrap_or_default();

        self.push(
            NodeKind::For(For {
                target,
                iter,
                body,
                orelse,
                is_async: has_token(node, "async"),
            }),
            node,
        )
    }

    fn lower_with(&mut self, node: Node<'_>) -> NodeId {
        let mut items = Vec::new();
        for clause in named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "with_clause")
        {
            for item in named_children(clause)
                .into_iter()
                .filter(|c| c.kind() == "with_item")
            {
                items.push(self.with_item(item));
            }
        }
        let body = self.block(node.child_by_field_name("body"));
        self.push(NodeKind::With(With { items, body }), node)
    }

    fn with_item(&mut self, item: Node<'_>) -> WithItem {
        let value = item.child_by_field_name("value").or_else(|| first_named(item));
        match value {
            Some(pattern) if pattern.kind() == "as_pattern" => {
                let context = match first_named(pattern) {
                    Some(expr) => self.lower_expr(expr),
                    None => self.push_other(pattern, Vec::new()),
                };
                let target = pattern
                    .child_by_field_name("alias")
                    .and_then(|alias| {
                        if alias.kind() == "as_pattern_target" {
                            first_named(alias)
                        } else {
                            Some(alias)
                        }
                    })
                    .map(|t| self.lower_expr(t));
                WithItem { context, target }
            }
            Some(expr) => WithItem {
                context: self.lower_expr(expr),
                target: item.child_by_field_name("alias").map(|a| self.lower_expr(a)),
            },
            None => WithItem {
                context: self.push_other(item, Vec::new()),
                target: None,
            },
        }
    }

    fn lower_except(&mut self, node: Node<'_>) -> NodeId {
        let body_node = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "block");
        let mut header: Vec<Node<'_>> = named_children(node)
            .into_iter()
            .filter(|c| c.kind() != "block")
            .collect();

        let (kind_node, name_node) = if let Some(value) = node.child_by_field_name("value") {
            (Some(value), node.child_by_field_name("alias"))
        } else if let Some(pattern) = header.first().copied().filter(|h| h.kind() == "as_pattern")
        {
            let alias = pattern.child_by_field_name("alias").and_then(|a| {
                if a.kind() == "as_pattern_target" {
                    first_named(a)
                } else {
                    Some(a)
                }
            });
            (first_named(pattern), alias)
        } else {
            header.truncate(2);
            (header.first().copied(), header.get(1).copied())
        };

        let kind = kind_node.map(|k| self.lower_expr(k));
        let name = name_node
            .filter(|n| n.kind() == "identifier")
            .map(|n| self.ident(n));
        let body = self.block(body_node);

        self.push(NodeKind::ExceptHandler(ExceptHandler { kind, name, body }), node)
    }

    fn lower_other(&mut self, node: Node<'_>) -> NodeId {
        let mut children = Vec::new();
        for child in named_children(node) {
            self.lower_any(child, &mut children);
        }
        self.push_other(node, children)
    }

    fn push_other(&mut self, node: Node<'_>, children: Vec<NodeId>) -> NodeId {
        self.push(
            NodeKind::Other {
                label: node.kind().to_string(),
                children,
            },
            node,
        )
    }

    // Expressions

    fn expr_field(&mut self, node: Node<'_>, field: &str) -> NodeId {
        match node.child_by_field_name(field) {
            Some(child) => self.lower_expr(child),
            None => self.push_other(node, Vec::new()),
        }
    }

    fn lower_expr(&mut self, node: Node<'_>) -> NodeId {
        match node.kind() {
            "identifier" | "keyword_identifier" => {
                let id = self.text(node).to_string();
                self.push(NodeKind::Name { id }, node)
            }
            "attribute" => {
                let value = self.expr_field(node, "object");
                let attr = node
                    .child_by_field_name("attribute")
                    .map(|a| self.ident(a))
                    .unwrap_or_else(|| Identifier::new("", span(node)));
                self.push(NodeKind::Attribute { value, attr }, node)
            }
            "subscript" => {
                let value = self.expr_field(node, "value");
                let mut cursor = node.walk();
                let parts: Vec<Node<'_>> =
                    node.children_by_field_name("subscript", &mut cursor).collect();
                let slice = self.sequence(node, &parts);
                self.push(NodeKind::Subscript { value, slice }, node)
            }
            "call" => self.lower_call(node),
            "string" => self.lower_string(node),
            "concatenated_string" => {
                let parts = named_children(node);
                if parts.iter().any(|p| self.is_formatted(*p)) {
                    let children = parts.iter().map(|p| self.lower_string(*p)).collect();
                    self.push_other(node, children)
                } else {
                    let text = self.text(node).to_string();
                    self.push(NodeKind::Constant(Constant::Str(text)), node)
                }
            }
            "integer" => {
                let text = self.text(node).to_string();
                self.push(NodeKind::Constant(Constant::Int(text)), node)
            }
            "float" => {
                let text = self.text(node).to_string();
                self.push(NodeKind::Constant(Constant::Float(text)), node)
            }
            "true" => self.push(NodeKind::Constant(Constant::Bool(true)), node),
            "false" => self.push(NodeKind::Constant(Constant::Bool(false)), node),
            "none" => self.push(NodeKind::Constant(Constant::None), node),
            "ellipsis" => self.push(NodeKind::Constant(Constant::Ellipsis), node),
            "unary_operator" => {
                let op = match node.child_by_field_name("operator").map(|o| self.text(o)) {
                    Some("-") => UnaryOperator::Neg,
                    Some("~") => UnaryOperator::Invert,
                    _ => UnaryOperator::Pos,
                };
                let operand = self.expr_field(node, "argument");
                self.push(NodeKind::UnaryOp { op, operand }, node)
            }
            "not_operator" => {
                let operand = self.expr_field(node, "argument");
                self.push(
                    NodeKind::UnaryOp {
                        op: UnaryOperator::Not,
                        operand,
                    },
                    node,
                )
            }
            "list" | "list_pattern" => {
                let elts = self.elements(node);
                self.push(NodeKind::List { elts }, node)
            }
            "set" => {
                let elts = self.elements(node);
                self.push(NodeKind::Set { elts }, node)
            }
            "tuple" | "expression_list" | "pattern_list" | "tuple_pattern" => {
                let elts = self.elements(node);
                self.push(NodeKind::Tuple { elts }, node)
            }
            "dictionary" => self.lower_dict(node),
            "list_splat" | "list_splat_pattern" => {
                let value = match first_named(node) {
                    Some(inner) => self.lower_expr(inner),
                    None => self.push_other(node, Vec::new()),
                };
                self.push(NodeKind::Starred { value }, node)
            }
            "parenthesized_expression" | "type" => match first_named(node) {
                Some(inner) => self.lower_expr(inner),
                None => self.push_other(node, Vec::new()),
            },
            "generic_type" => {
                let children = named_children(node);
                let value = match children.first() {
                    Some(base) => self.lower_expr(*base),
                    None => self.push_other(node, Vec::new()),
                };
                let parts = children
                    .iter()
                    .find(|c| c.kind() == "type_parameter")
                    .map(|p| named_children(*p))
                    .unwrap_or_default();
                let slice = self.sequence(node, &parts);
                self.push(NodeKind::Subscript { value, slice }, node)
            }
            "member_type" => {
                let children = named_children(node);
                match children.as_slice() {
                    [owner, attr] if attr.kind() == "identifier" => {
                        let value = self.lower_expr(*owner);
                        let attr = self.ident(*attr);
                        self.push(NodeKind::Attribute { value, attr }, node)
                    }
                    _ => self.lower_other(node),
                }
            }
            "list_comprehension" => self.lower_comprehension(node, ComprehensionKind::List),
            "set_comprehension" => self.lower_comprehension(node, ComprehensionKind::Set),
            "generator_expression" => {
                self.lower_comprehension(node, ComprehensionKind::Generator)
            }
            "dictionary_comprehension" => {
                self.lower_comprehension(node, ComprehensionKind::Dict)
            }
            "lambda" => {
                let parameters = self.parameters(node.child_by_field_name("parameters"));
                let body = self.expr_field(node, "body");
                self.push(NodeKind::Lambda(Lambda { parameters, body }), node)
            }
            "named_expression" => {
                let target = self.expr_field(node, "name");
                let value = self.expr_field(node, "value");
                self.push(NodeKind::NamedExpr { target, value }, node)
            }
            _ => self.lower_other(node),
        }
    }

    /// Lowers a run of expressions as a single node: the expression itself
    /// when there is one, a tuple otherwise.
    fn sequence(&mut self, owner: Node<'_>, parts: &[Node<'_>]) -> NodeId {
        match parts {
            [single] => self.lower_expr(*single),
            _ => {
                let elts = parts.iter().map(|p| self.lower_expr(*p)).collect();
                self.push(NodeKind::Tuple { elts }, owner)
            }
        }
    }

    fn elements(&mut self, node: Node<'_>) -> Vec<NodeId> {
        named_children(node)
            .into_iter()
            .map(|c| self.lower_expr(c))
            .collect()
    }

    fn lower_call(&mut self, node: Node<'_>) -> NodeId {
        let func = self.expr_field(node, "function");
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        match node.child_by_field_name("arguments") {
            Some(arguments) if arguments.kind() == "argument_list" => {
                self.arguments(arguments, &mut args, &mut keywords);
            }
            Some(generator) => args.push(self.lower_expr(generator)),
            None => {}
        }
        self.push(
            NodeKind::Call {
                func,
                args,
                keywords,
            },
            node,
        )
    }

    fn arguments(&mut self, node: Node<'_>, args: &mut Vec<NodeId>, keywords: &mut Vec<Keyword>) {
        for child in named_children(node) {
            match child.kind() {
                "keyword_argument" => {
                    let arg = child.child_by_field_name("name").map(|n| self.ident(n));
                    let value = self.expr_field(child, "value");
                    keywords.push(Keyword { arg, value });
                }
                "dictionary_splat" => {
                    let value = match first_named(child) {
                        Some(inner) => self.lower_expr(inner),
                        None => self.push_other(child, Vec::new()),
                    };
                    keywords.push(Keyword { arg: None, value });
                }
                _ => args.push(self.lower_expr(child)),
            }
        }
    }

    fn is_formatted(&self, string: Node<'_>) -> bool {
        named_children(string).iter().any(|part| match part.kind() {
            "interpolation" => true,
            "string_start" => self.text(*part).contains(['f', 'F']),
            _ => false,
        })
    }

    fn lower_string(&mut self, node: Node<'_>) -> NodeId {
        if !self.is_formatted(node) {
            let text = self.text(node).to_string();
            return self.push(NodeKind::Constant(Constant::Str(text)), node);
        }
        let mut children = Vec::new();
        for part in named_children(node)
            .into_iter()
            .filter(|p| p.kind() == "interpolation")
        {
            let expression = part
                .child_by_field_name("expression")
                .or_else(|| first_named(part));
            if let Some(expression) = expression {
                children.push(self.lower_expr(expression));
            }
        }
        self.push_other(node, children)
    }

    fn lower_dict(&mut self, node: Node<'_>) -> NodeId {
        let mut keys = Vec::new();
        let mut values = Vec::new();
        for entry in named_children(node) {
            match entry.kind() {
                "pair" => {
                    keys.push(Some(self.expr_field(entry, "key")));
                    values.push(self.expr_field(entry, "value"));
                }
                "dictionary_splat" => {
                    keys.push(None);
                    values.push(match first_named(entry) {
                        Some(inner) => self.lower_expr(inner),
                        None => self.push_other(entry, Vec::new()),
                    });
                }
                _ => {}
            }
        }
        self.push(NodeKind::Dict { keys, values }, node)
    }

    fn lower_comprehension(&mut self, node: Node<'_>, kind: ComprehensionKind) -> NodeId {
        let body = node.child_by_field_name("body");
        let (element, value) = match body {
            Some(pair) if kind == ComprehensionKind::Dict && pair.kind() == "pair" => (
                self.expr_field(pair, "key"),
                Some(self.expr_field(pair, "value")),
            ),
            Some(body) => (self.lower_expr(body), None),
            None => (self.push_other(node, Vec::new()), None),
        };

        let mut clauses: Vec<Clause> = Vec::new();
        for child in named_children(node) {
            if body.is_some_and(|b| b.id() == child.id()) {
                continue;
            }
            match child.kind() {
                "for_in_clause" => {
                    let target = self.expr_field(child, "left");
                    let mut cursor = child.walk();
                    let parts: Vec<Node<'_>> =
                        child.children_by_field_name("right", &mut cursor).collect();
                    let iter = if parts.is_empty() {
                        self.push_other(child, Vec::new())
                    } else {
                        self.sequence(child, &parts)
                    };
                    clauses.push(Clause {
                        target,
                        iter,
                        ifs: Vec::new(),
                        is_async: has_token(child, "async"),
                        span: span(child),
                    });
                }
                "if_clause" => {
                    let condition = match first_named(child) {
                        Some(expr) => self.lower_expr(expr),
                        None => self.push_other(child, Vec::new()),
                    };
                    if let Some(last) = clauses.last_mut() {
                        last.ifs.push(condition);
                    }
                }
                _ => {}
            }
        }

        let generators = clauses
            .into_iter()
            .map(|clause| {
                self.builder.push(
                    NodeKind::Generator(Generator {
                        target: clause.target,
                        iter: clause.iter,
                        ifs: clause.ifs,
                        is_async: clause.is_async,
                    }),
                    clause.span,
                )
            })
            .collect();

        self.push(
            NodeKind::Comprehension(Comprehension {
                kind,
                element,
                value,
                generators,
            }),
            node,
        )
    }
}

fn parameter(
    name: Identifier,
    kind: ParameterKind,
    annotation: Option<NodeId>,
    default: Option<NodeId>,
) -> Parameter {
    Parameter {
        name,
        kind,
        annotation,
        default,
    }
}

fn span(node: Node<'_>) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span::new(
        Position::new(start.row + 1, start.column, node.start_byte()),
        Position::new(end.row + 1, end.column, node.end_byte()),
    )
}

/// Named children without comments and other extras.
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra() && child.kind() != "comment")
        .collect();
    children
}

fn first_named(node: Node<'_>) -> Option<Node<'_>> {
    named_children(node).into_iter().next()
}

/// Returns true if `node` has a direct anonymous child token `token`
/// (e.g. `async`).
fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

fn is_statement(kind: &str) -> bool {
    kind.ends_with("_statement")
        || kind.ends_with("_definition")
        || kind.ends_with("_clause")
        || kind == "decorated_definition"
        || kind == "assignment"
        || kind == "augmented_assignment"
}
