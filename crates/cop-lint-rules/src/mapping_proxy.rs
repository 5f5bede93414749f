//! Rule to keep module-level dictionaries immutable.
//!
//! ```python
//! ROUTES = {"home": "/"}                       # flagged
//! ROUTES = MappingProxyType({"home": "/"})     # ok
//! Point = TypedDict("Point", {"x": int})       # ok
//! ```

use cop_lint_core::{
    codes, FileContext, NodeId, NodeKind, Rule, RuleCode, SyntaxTree, Violation,
};

/// Rule code for mapping-proxy.
pub const CODE: RuleCode = codes::MAPPING_PROXY;

/// Rule name for mapping-proxy.
pub const NAME: &str = "mapping-proxy";

const MAPPING_PROXY_TYPES: &[&str] = &["MappingProxyType"];
const TYPED_DICT: &str = "TypedDict";

/// Flags module-level dictionaries not wrapped in `MappingProxyType`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingProxy;

impl MappingProxy {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for MappingProxy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[CODE]
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let tree = ctx.tree;
        tree.module_body()
            .iter()
            .filter(|statement| is_mutable_mapping(tree, **statement))
            .map(|statement| Violation::at(tree.position(*statement), CODE))
            .collect()
    }
}

fn is_mutable_mapping(tree: &SyntaxTree, statement: NodeId) -> bool {
    let (targets, value) = match tree.kind(statement) {
        NodeKind::Assign(assign) => (assign.targets.as_slice(), assign.value),
        NodeKind::AnnAssign(assign) => {
            let Some(value) = assign.value else {
                return false;
            };
            if is_proxy_annotation(tree, assign.annotation)
                || !is_dict_annotation(tree, assign.annotation)
            {
                return false;
            }
            (std::slice::from_ref(&assign.target), value)
        }
        _ => return false,
    };

    let has_name_target = targets
        .iter()
        .any(|target| tree.name_id(*target).is_some());
    has_name_target && builds_dict(tree, value)
}

/// `{...}` itself, or a call other than a proxy or `TypedDict` constructor
/// with a dict literal among its positional arguments.
fn builds_dict(tree: &SyntaxTree, value: NodeId) -> bool {
    match tree.kind(value) {
        NodeKind::Dict { .. } => true,
        NodeKind::Call { func, args, .. } => {
            let exempt = tree
                .terminal_name(*func)
                .is_some_and(|name| name == TYPED_DICT || MAPPING_PROXY_TYPES.contains(&name));
            !exempt
                && args
                    .iter()
                    .any(|arg| matches!(tree.kind(*arg), NodeKind::Dict { .. }))
        }
        _ => false,
    }
}

fn is_proxy_annotation(tree: &SyntaxTree, annotation: NodeId) -> bool {
    tree.terminal_name(annotation)
        .is_some_and(|name| MAPPING_PROXY_TYPES.contains(&name))
}

/// `dict`, `x.dict`, `dict[...]` and `Final[...]` wrapping any of them.
/// A bare `Final` carries no type and counts as dict-compatible.
fn is_dict_annotation(tree: &SyntaxTree, annotation: NodeId) -> bool {
    match tree.kind(annotation) {
        NodeKind::Name { .. } | NodeKind::Attribute { .. } => {
            matches!(tree.terminal_name(annotation), Some("dict" | "Final"))
        }
        NodeKind::Subscript { value, slice } => match tree.terminal_name(*value) {
            Some("dict") => true,
            Some("Final") => is_dict_annotation(tree, *slice),
            _ => false,
        },
        _ => false,
    }
}
