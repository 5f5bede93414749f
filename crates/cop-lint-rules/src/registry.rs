//! The fixed, ordered rule registry.

use cop_lint_core::RuleBox;

use crate::{
    AsyncGetPrefix, DataclassConfig, FinalClass, FunctionVerb, LoopVariablePrefix, MappingProxy,
    ModuleImport, NameLength, ScalarAnnotation, StdlibImport, TemporaryVariable,
};

/// Returns every built-in rule, ordered by the first code it emits.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ModuleImport::new()),
        Box::new(StdlibImport::new()),
        Box::new(ScalarAnnotation::new()),
        Box::new(NameLength::new()),
        Box::new(FunctionVerb::new()),
        Box::new(AsyncGetPrefix::new()),
        Box::new(TemporaryVariable::new()),
        Box::new(FinalClass::new()),
        Box::new(MappingProxy::new()),
        Box::new(DataclassConfig::new()),
        Box::new(LoopVariablePrefix::new()),
    ]
}

/// Returns the registered rules matching any of `keys`, by rule name or
/// code, in registry order. An empty selection returns every rule.
#[must_use]
pub fn select_rules<S: AsRef<str>>(keys: &[S]) -> Vec<RuleBox> {
    if keys.is_empty() {
        return all_rules();
    }
    all_rules()
        .into_iter()
        .filter(|rule| {
            keys.iter().any(|key| {
                let key = key.as_ref();
                rule.name() == key || rule.codes().iter().any(|c| c.code.eq_ignore_ascii_case(key))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cop_lint_core::codes;

    #[test]
    fn test_registry_covers_every_code_in_order() {
        let emitted: Vec<&str> = all_rules()
            .iter()
            .flat_map(|rule| rule.codes().iter().map(|c| c.code))
            .collect();
        let registered: Vec<&str> = codes::ALL.iter().map(|c| c.code).collect();
        assert_eq!(emitted, registered);
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names: Vec<&str> = all_rules().iter().map(|rule| rule.name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_select_by_name_and_code() {
        let selected = select_rules(&["final-class", "cop005"]);
        let names: Vec<&str> = selected.iter().map(|rule| rule.name()).collect();
        assert_eq!(names, vec!["name-length", "final-class"]);

        assert_eq!(select_rules::<&str>(&[]).len(), all_rules().len());
        assert!(select_rules(&["unknown"]).is_empty());
    }
}
