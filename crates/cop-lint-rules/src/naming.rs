//! Naming predicates shared by the naming rules.

use cop_lint_core::ast::ClassDef;
use cop_lint_core::{LintConfig, NodeKind, SyntaxTree};

/// Returns true for names no naming rule reports: `_`, constants in
/// upper case, configured ignore-list entries, dunders and private names.
pub(crate) fn is_ignored_name(name: &str, config: &LintConfig) -> bool {
    name.starts_with('_') || is_upper_case(name) || config.ignored_names.iter().any(|n| n == name)
}

/// Mirrors Python's `str.isupper`: at least one cased character and no
/// lowercase ones.
pub(crate) fn is_upper_case(name: &str) -> bool {
    name.chars().any(char::is_uppercase) && !name.chars().any(char::is_lowercase)
}

/// Returns true if `class` inherits from one of the configured excluded
/// bases (`BaseModel`, factories, ...).
pub(crate) fn has_excluded_base(tree: &SyntaxTree, class: &ClassDef, config: &LintConfig) -> bool {
    tree.inherits_from(class, &config.excluded_bases)
}

/// Returns true if `class` names `Protocol` directly among its bases.
pub(crate) fn is_protocol(tree: &SyntaxTree, class: &ClassDef) -> bool {
    tree.inherits_from(class, &["Protocol"])
}

/// Returns true for test classes collected by pytest.
pub(crate) fn is_test_class(class: &ClassDef) -> bool {
    class.name.as_str().starts_with("Test")
}

/// Returns true if an argument annotation marks an injected fixture
/// (`fixture`, `Faker`, `pytest.X`, `faker.X`).
pub(crate) fn is_whitelisted_annotation(
    tree: &SyntaxTree,
    annotation: Option<cop_lint_core::NodeId>,
    config: &LintConfig,
) -> bool {
    let Some(annotation) = annotation else {
        return false;
    };
    match tree.kind(annotation) {
        NodeKind::Name { id } => config.whitelisted_annotation_names.contains(id),
        NodeKind::Attribute { .. } => tree
            .attribute_owner(annotation)
            .is_some_and(|owner| config.whitelisted_annotation_modules.iter().any(|m| m == owner)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_names() {
        let config = LintConfig::default();
        for name in ["_", "_private", "__init__", "MAX_SIZE", "HTTP2", "value", "values"] {
            assert!(is_ignored_name(name, &config), "{name}");
        }
        for name in ["x", "item", "Mixed_CASE", "1234"] {
            assert!(!is_ignored_name(name, &config), "{name}");
        }
    }
}
