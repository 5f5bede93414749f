//! Helpers for running a single rule over Python source in unit tests.

use std::path::Path;

use cop_lint_core::{
    FileContext, LintConfig, ModuleResolver, Rule, StaticModuleResolver, TreeIndex, Violation,
};

/// Parses `source` and runs `rule` with the given config and resolver.
/// Violations come back sorted.
pub(crate) fn run_rule(
    rule: &dyn Rule,
    source: &str,
    config: &LintConfig,
    resolver: &dyn ModuleResolver,
) -> Vec<Violation> {
    let tree = cop_lint_ts::parse(source).expect("Failed to parse");
    let index = TreeIndex::build(&tree);
    let ctx = FileContext {
        path: Path::new("test.py"),
        content: source,
        tree: &tree,
        index: &index,
        config,
        resolver,
    };
    let mut violations = rule.check(&ctx);
    violations.sort_unstable();
    violations
}

/// Runs `rule` with the default config and the stdlib resolver.
pub(crate) fn run_default(rule: &dyn Rule, source: &str) -> Vec<Violation> {
    run_rule(
        rule,
        source,
        &LintConfig::default(),
        &StaticModuleResolver::with_stdlib(),
    )
}

/// Returns `(line, column)` of each violation.
pub(crate) fn positions(violations: &[Violation]) -> Vec<(usize, usize)> {
    violations.iter().map(|v| (v.line, v.column)).collect()
}
