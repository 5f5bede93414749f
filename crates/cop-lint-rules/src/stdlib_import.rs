//! Rule to import standard library modules whole.
//!
//! `from typing import Final` becomes `import typing` and `typing.Final`.
//! Packages such as `collections` may still be imported from, since their
//! submodules are the units of import; dotted paths into a stdlib package
//! (`from xml.etree import ElementTree`) are flagged.

use cop_lint_core::ast::ImportFrom;
use cop_lint_core::{
    codes, is_stdlib_module, walk_children, walk_tree, FileContext, LintConfig, ModuleResolver,
    NodeId, Rule, RuleCode, SyntaxTree, Violation, Visit,
};

/// Rule code for stdlib-import.
pub const CODE: RuleCode = codes::STDLIB_IMPORT;

/// Rule name for stdlib-import.
pub const NAME: &str = "stdlib-import";

const FUTURE_MODULE: &str = "__future__";

/// Flags `from <stdlib module> import name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdlibImport;

impl StdlibImport {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for StdlibImport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn codes(&self) -> &'static [RuleCode] {
        &[CODE]
    }

    fn check(&self, ctx: &FileContext<'_>) -> Vec<Violation> {
        let mut visitor = StdlibImportVisitor {
            config: ctx.config,
            resolver: ctx.resolver,
            violations: Vec::new(),
        };
        walk_tree(&mut visitor, ctx.tree);
        visitor.violations
    }
}

/// Returns true if `from module import ...` should be a whole-module import.
///
/// Only modules rooted in the standard library are considered; whether a
/// path is a package is left to the resolver.
fn is_stdlib_from_import(module: &str, config: &LintConfig, resolver: &dyn ModuleResolver) -> bool {
    if module == FUTURE_MODULE || config.allowed_stdlib_from_imports.iter().any(|m| m == module) {
        return false;
    }
    match module.split_once('.') {
        None => is_stdlib_module(module) && !resolver.is_package(module),
        Some((top, _)) => is_stdlib_module(top) && resolver.is_package(top),
    }
}

struct StdlibImportVisitor<'a> {
    config: &'a LintConfig,
    resolver: &'a dyn ModuleResolver,
    violations: Vec<Violation>,
}

impl<'t> Visit<'t> for StdlibImportVisitor<'_> {
    fn visit_import_from(&mut self, tree: &'t SyntaxTree, id: NodeId, node: &'t ImportFrom) {
        let flagged = node.level == 0
            && node
                .module
                .as_deref()
                .is_some_and(|module| is_stdlib_from_import(module, self.config, self.resolver));
        if flagged {
            self.violations.push(Violation::at(tree.position(id), CODE));
        }
        walk_children(self, tree, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{positions, run_default, run_rule};
    use cop_lint_core::StaticModuleResolver;

    fn check_code(code: &str) -> Vec<Violation> {
        run_default(&StdlibImport::new(), code)
    }

    #[test]
    fn test_detects_stdlib_module_import() {
        let violations = check_code("from typing import Final\nfrom os import path\n");
        assert_eq!(positions(&violations), vec![(1, 0), (2, 0)]);
    }

    #[test]
    fn test_detects_dotted_path_into_stdlib_package() {
        assert_eq!(check_code("from xml.etree import ElementTree\n").len(), 1);
        assert_eq!(check_code("from email.mime.text import MIMEText\n").len(), 1);
    }

    #[test]
    fn test_allows_package_import() {
        assert!(check_code("from collections import OrderedDict\n").is_empty());
        assert!(check_code("from importlib import util\n").is_empty());
    }

    #[test]
    fn test_allows_configured_and_future_imports() {
        let code = "from __future__ import annotations\nfrom collections.abc import Mapping\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_allows_third_party_and_relative() {
        assert!(check_code("from requests import Session\nfrom .typing import Alias\n").is_empty());
    }

    #[test]
    fn test_allows_whole_module_import() {
        assert!(check_code("import typing\nimport os.path\n").is_empty());
    }

    #[test]
    fn test_package_decision_follows_resolver() {
        let rule = StdlibImport::new();
        let config = LintConfig::default();

        let vendored = StaticModuleResolver::with_stdlib().package("typing");
        assert!(run_rule(&rule, "from typing import Final\n", &config, &vendored).is_empty());

        let bare = StaticModuleResolver::new();
        let code = "from collections import OrderedDict\nfrom xml.etree import ElementTree\n";
        assert_eq!(positions(&run_rule(&rule, code, &config, &bare)), vec![(1, 0)]);
    }
}
