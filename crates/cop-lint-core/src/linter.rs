//! Rule dispatch and violation aggregation.

use crate::ast::SyntaxTree;
use crate::config::{Config, ConfigError, LintConfig};
use crate::context::FileContext;
use crate::index::TreeIndex;
use crate::noqa::NoqaIndex;
use crate::resolver::{ModuleResolver, StaticModuleResolver};
use crate::rule::{Rule, RuleBox};
use crate::types::{FileReport, Violation};

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while building a [`Linter`].
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    rules: Vec<RuleBox>,
    lint: Option<LintConfig>,
    toggles: HashMap<String, crate::config::RuleConfig>,
    selected: Option<Vec<String>>,
    resolver: Option<Box<dyn ModuleResolver>>,
}

impl LinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the linter.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the linter.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the lint thresholds and rule toggles from a full configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.lint = Some(config.lint);
        self.toggles = config.rules;
        self
    }

    /// Sets only the lint thresholds.
    #[must_use]
    pub fn lint_config(mut self, lint: LintConfig) -> Self {
        self.lint = Some(lint);
        self
    }

    /// Restricts reporting to the given rule names or codes (codes match
    /// case-insensitively). An empty selection reports everything.
    #[must_use]
    pub fn select<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        self.selected = (!keys.is_empty()).then_some(keys);
        self
    }

    /// Sets the module resolver (default: the standard library table).
    #[must_use]
    pub fn resolver<M: ModuleResolver + 'static>(mut self, resolver: M) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Builds the linter.
    ///
    /// # Errors
    ///
    /// Returns an error if the lint configuration is invalid.
    pub fn build(self) -> Result<Linter, LinterError> {
        let lint = self.lint.unwrap_or_default();
        lint.validate()?;

        let toggles = Config {
            rules: self.toggles,
            ..Config::default()
        };
        for key in toggles.rules.keys() {
            let known = self
                .rules
                .iter()
                .any(|r| r.name() == key || r.codes().iter().any(|c| c.code == key));
            if !known {
                warn!("Unknown rule in configuration: {key}");
            }
        }

        let selected = self.selected;
        let is_selected = |name: &str, code: &str| {
            selected.as_ref().map_or(true, |keys| {
                keys.iter()
                    .any(|key| key == name || key.eq_ignore_ascii_case(code))
            })
        };

        let mut enabled_codes = HashSet::new();
        let rules: Vec<RuleBox> = self
            .rules
            .into_iter()
            .filter(|rule| {
                let codes: Vec<&'static str> = rule
                    .codes()
                    .iter()
                    .map(|c| c.code)
                    .filter(|code| {
                        toggles.is_code_enabled(rule.name(), code)
                            && is_selected(rule.name(), *code)
                    })
                    .collect();
                if codes.is_empty() {
                    debug!("Skipping disabled rule: {}", rule.name());
                    return false;
                }
                if codes.len() < rule.codes().len() {
                    debug!("{}: reporting only {}", rule.name(), codes.join(", "));
                }
                enabled_codes.extend(codes);
                true
            })
            .collect();

        Ok(Linter {
            rules,
            enabled_codes,
            lint,
            resolver: self
                .resolver
                .unwrap_or_else(|| Box::new(StaticModuleResolver::with_stdlib())),
        })
    }
}

/// Runs a fixed, ordered set of rules over syntax trees.
///
/// Use [`Linter::builder()`] to construct an instance. A built linter is
/// immutable and can check many files concurrently.
pub struct Linter {
    rules: Vec<RuleBox>,
    enabled_codes: HashSet<&'static str>,
    lint: LintConfig,
    resolver: Box<dyn ModuleResolver>,
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the number of rules with at least one enabled code.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the enabled rules in registry order.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Returns the lint configuration.
    #[must_use]
    pub fn lint_config(&self) -> &LintConfig {
        &self.lint
    }

    /// Checks one file. `content` may be empty when only a tree is
    /// available; `# noqa` comments are then ignored. Violations with a
    /// disabled or unselected code are dropped.
    ///
    /// Violations are sorted by `(line, column, code)` with exact duplicates
    /// removed, so repeated runs give identical output.
    #[must_use]
    pub fn check(&self, path: &Path, content: &str, tree: &SyntaxTree) -> Vec<Violation> {
        debug!("Checking: {}", path.display());

        let index = TreeIndex::build(tree);
        let ctx = FileContext {
            path,
            content,
            tree,
            index: &index,
            config: &self.lint,
            resolver: &*self.resolver,
        };

        let mut violations: Vec<Violation> = if self.lint.parallel {
            self.rules
                .par_iter()
                .flat_map_iter(|rule| self.run_rule(rule.as_ref(), &ctx))
                .collect()
        } else {
            self.rules
                .iter()
                .flat_map(|rule| self.run_rule(rule.as_ref(), &ctx))
                .collect()
        };

        violations.retain(|v| self.enabled_codes.contains(v.code.code));
        NoqaIndex::build(content).retain_unsuppressed(&mut violations);
        violations.sort_unstable();
        violations.dedup();
        violations
    }

    /// Checks one file and wraps the result in a [`FileReport`].
    #[must_use]
    pub fn check_file(&self, path: &Path, content: &str, tree: &SyntaxTree) -> FileReport {
        FileReport::new(path, self.check(path, content, tree))
    }

    #[allow(clippy::unused_self)]
    fn run_rule(&self, rule: &dyn Rule, ctx: &FileContext<'_>) -> Vec<Violation> {
        let violations = rule.check(ctx);
        debug!("{}: {} violation(s)", rule.name(), violations.len());
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, Span, TreeBuilder};
    use crate::codes;
    use crate::config::RuleConfig;
    use crate::types::RuleCode;

    struct Fixed {
        name: &'static str,
        codes: &'static [RuleCode],
        found: Vec<Violation>,
    }

    impl Rule for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn codes(&self) -> &'static [RuleCode] {
            self.codes
        }

        fn check(&self, _ctx: &FileContext<'_>) -> Vec<Violation> {
            self.found.clone()
        }
    }

    fn empty_tree() -> SyntaxTree {
        let mut builder = TreeBuilder::new();
        let module = builder.push(NodeKind::Module { body: Vec::new() }, Span::default());
        builder.finish(module)
    }

    fn linter(parallel: bool) -> Linter {
        Linter::builder()
            .rule(Fixed {
                name: "final-class",
                codes: &[codes::FINAL_CLASS],
                found: vec![
                    Violation::new(3, 0, codes::FINAL_CLASS),
                    Violation::new(1, 0, codes::FINAL_CLASS),
                ],
            })
            .rule(Fixed {
                name: "name-length",
                codes: &[codes::CLASS_NAME_LENGTH],
                found: vec![
                    Violation::new(1, 0, codes::CLASS_NAME_LENGTH),
                    Violation::new(1, 0, codes::CLASS_NAME_LENGTH),
                ],
            })
            .lint_config(LintConfig {
                parallel,
                ..LintConfig::default()
            })
            .build()
            .expect("valid config")
    }

    #[test]
    fn test_output_is_sorted_and_deduplicated() {
        for parallel in [false, true] {
            let found = linter(parallel).check(Path::new("m.py"), "", &empty_tree());
            let order: Vec<(usize, &str)> = found.iter().map(|v| (v.line, v.code.code)).collect();
            assert_eq!(order, vec![(1, "COP008"), (1, "COP012"), (3, "COP012")]);
        }
    }

    #[test]
    fn test_noqa_applies_after_aggregation() {
        let content = "class A:  # noqa: COP012\n    pass\nclass B: pass\n";
        let found = linter(false).check(Path::new("m.py"), content, &empty_tree());
        let order: Vec<(usize, &str)> = found.iter().map(|v| (v.line, v.code.code)).collect();
        assert_eq!(order, vec![(1, "COP008"), (3, "COP012")]);
    }

    #[test]
    fn test_disabled_rules_are_dropped() {
        let mut config = Config::default();
        config.rules.insert(
            "COP012".to_string(),
            RuleConfig {
                enabled: Some(false),
            },
        );
        let linter = Linter::builder()
            .rule(Fixed {
                name: "final-class",
                codes: &[codes::FINAL_CLASS],
                found: vec![Violation::new(1, 0, codes::FINAL_CLASS)],
            })
            .config(config)
            .build()
            .expect("valid config");
        assert_eq!(linter.rule_count(), 0);
        assert!(linter.check(Path::new("m.py"), "", &empty_tree()).is_empty());
    }

    fn name_rule() -> Fixed {
        Fixed {
            name: "name-length",
            codes: &[codes::VARIABLE_NAME_LENGTH, codes::CLASS_NAME_LENGTH],
            found: vec![
                Violation::new(1, 0, codes::CLASS_NAME_LENGTH),
                Violation::new(2, 4, codes::VARIABLE_NAME_LENGTH),
            ],
        }
    }

    #[test]
    fn test_disabled_code_keeps_sibling_codes() {
        let mut config = Config::default();
        config.rules.insert(
            "COP008".to_string(),
            RuleConfig {
                enabled: Some(false),
            },
        );
        let linter = Linter::builder()
            .rule(name_rule())
            .config(config)
            .build()
            .expect("valid config");
        assert_eq!(linter.rule_count(), 1);

        let found = linter.check(Path::new("m.py"), "", &empty_tree());
        let order: Vec<(usize, &str)> = found.iter().map(|v| (v.line, v.code.code)).collect();
        assert_eq!(order, vec![(2, "COP005")]);
    }

    #[test]
    fn test_selection_narrows_to_codes() {
        let linter = Linter::builder()
            .rule(name_rule())
            .select(["cop008"])
            .build()
            .expect("valid config");
        let found = linter.check(Path::new("m.py"), "", &empty_tree());
        let codes: Vec<&str> = found.iter().map(|v| v.code.code).collect();
        assert_eq!(codes, vec!["COP008"]);

        let everything = Linter::builder()
            .rule(name_rule())
            .select(Vec::<String>::new())
            .build()
            .expect("valid config");
        assert_eq!(everything.check(Path::new("m.py"), "", &empty_tree()).len(), 2);

        let by_name = Linter::builder()
            .rule(name_rule())
            .select(["final-class"])
            .build()
            .expect("valid config");
        assert_eq!(by_name.rule_count(), 0);
    }

    #[test]
    fn test_invalid_config_fails_build() {
        let result = Linter::builder()
            .lint_config(LintConfig {
                max_import_names: 0,
                ..LintConfig::default()
            })
            .build();
        assert!(matches!(result, Err(LinterError::Config(_))));
    }
}
