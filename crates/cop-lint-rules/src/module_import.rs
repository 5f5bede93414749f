//! Rule to require module imports when a `from` import pulls in many names.
//!
//! # Rationale
//!
//! `from package.module import a, b, c, d` scatters a module's namespace into
//! the importing file. Importing the module itself keeps call sites
//! qualified (`module.a`).
//!
//! # Exemptions
//!
//! - Files that declare `__all__` (re-export modules)
//! - Modules ending in a configured settings suffix (`.settings`)
//! - Imports where every name is itself a submodule
//! - Relative imports

use cop_lint_core::ast::ImportFrom;
use cop_lint_core::{
    codes, walk_children, walk_tree, FileContext, NodeId, NodeKind, Rule, RuleCode, SyntaxTree,
    Violation, Visit,
};
use tracing::debug;

/// Rule code for module-import.
pub const CODE: RuleCode = codes::MODULE_IMPORT;

/// Rule name for module-import.
pub const NAME: &str = "module-import";

/// Flags `from module import ...` with more names than allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleImport;

impl ModuleImport {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ModuleImport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[CODE]
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        if declares_all(ctx.tree) {
            debug!("{}: module declares __all__, skipping", ctx.path.display());
            return Vec::new();
        }

        let mut visitor = ImportVisitor {
            ctx,
            violations: Vec::new(),
        };
        walk_tree(&mut visitor, ctx.tree);
        visitor.violations
    }
}

/// Returns true if the module body assigns `__all__`.
fn declares_all(tree: &SyntaxTree) -> bool {
    tree.module_body().iter().any(|statement| match tree.kind(*statement) {
        NodeKind::Assign(assign) => assign
            .targets
            .iter()
            .any(|target| tree.name_id(*target) == Some("__all__")),
        NodeKind::AnnAssign(assign) => tree.name_id(assign.target) == Some("__all__"),
        _ => false,
    })
}

struct ImportVisitor<'a> {
    ctx: &'a FileContext<'a>,
    violations: Vec<Violation>,
}

impl ImportVisitor<'_> {
    fn check_import(&mut self, tree: &SyntaxTree, id: NodeId, module: &str, node: &ImportFrom) {
        let config = self.ctx.config;
        if node.names.len() <= config.max_import_names {
            return;
        }
        if config
            .settings_module_suffixes
            .iter()
            .any(|suffix| module.ends_with(suffix.as_str()))
        {
            return;
        }

        let resolver = self.ctx.resolver;
        let all_submodules = node
            .names
            .iter()
            .all(|alias| resolver.exists(&format!("{module}.{}", alias.name)));
        if all_submodules {
            return;
        }

        self.violations.push(Violation::at(tree.position(id), CODE));
    }
}

impl<'t> Visit<'t> for ImportVisitor<'_> {
    fn visit_import_from(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t ImportFrom) {
        if node.level == 0 {
            if let Some(module) = node.module.as_deref() {
                self.check_import(tree, id, module, node);
            }
        }
        walk_children(self, tree, id);
    }
}
