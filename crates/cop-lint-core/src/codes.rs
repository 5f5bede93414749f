//! The fixed rule code registry.
//!
//! Descriptions are worded for the default settings; use
//! [`LintConfig::describe`](crate::LintConfig::describe) for the text under
//! a given configuration.

use crate::types::RuleCode;

/// COP001
pub const MODULE_IMPORT: RuleCode =
    RuleCode::new("COP001", "Use module import when importing more than two names");
/// COP002
pub const STDLIB_IMPORT: RuleCode =
    RuleCode::new("COP002", "Import standard library modules as whole modules");
/// COP003
pub const SCALAR_ANNOTATION: RuleCode =
    RuleCode::new("COP003", "Avoid explicit scalar type annotations");
/// COP004
pub const ATTRIBUTE_NAME_LENGTH: RuleCode =
    RuleCode::new("COP004", "Attribute name must be at least 8 characters");
/// COP005
pub const VARIABLE_NAME_LENGTH: RuleCode =
    RuleCode::new("COP005", "Variable name must be at least 8 characters");
/// COP006
pub const ARGUMENT_NAME_LENGTH: RuleCode =
    RuleCode::new("COP006", "Argument name must be at least 8 characters");
/// COP007
pub const FUNCTION_NAME_LENGTH: RuleCode =
    RuleCode::new("COP007", "Function name must be at least 8 characters");
/// COP008
pub const CLASS_NAME_LENGTH: RuleCode =
    RuleCode::new("COP008", "Class name must be at least 8 characters");
/// COP009
pub const FUNCTION_VERB: RuleCode = RuleCode::new("COP009", "Function identifier must be a verb");
/// COP010
pub const ASYNC_GET_PREFIX: RuleCode =
    RuleCode::new("COP010", "Avoid get_ prefix in async function names");
/// COP011
pub const TEMPORARY_VARIABLE: RuleCode =
    RuleCode::new("COP011", "Avoid temporary variables used only once");
/// COP012
pub const FINAL_CLASS: RuleCode = RuleCode::new("COP012", "Classes should be marked typing.final");
/// COP013
pub const MAPPING_PROXY: RuleCode =
    RuleCode::new("COP013", "Wrap module dictionaries with types.MappingProxyType");
/// COP014
pub const DATACLASS_CONFIG: RuleCode = RuleCode::new(
    "COP014",
    "Use dataclasses with kw_only=True, slots=True, frozen=True",
);
/// COP015
pub const LOOP_VARIABLE_PREFIX: RuleCode =
    RuleCode::new("COP015", "For-loop variables must use the one_ prefix");

/// Every code, in registry order.
pub const ALL: &[RuleCode] = &[
    MODULE_IMPORT,
    STDLIB_IMPORT,
    SCALAR_ANNOTATION,
    ATTRIBUTE_NAME_LENGTH,
    VARIABLE_NAME_LENGTH,
    ARGUMENT_NAME_LENGTH,
    FUNCTION_NAME_LENGTH,
    CLASS_NAME_LENGTH,
    FUNCTION_VERB,
    ASYNC_GET_PREFIX,
    TEMPORARY_VARIABLE,
    FINAL_CLASS,
    MAPPING_PROXY,
    DATACLASS_CONFIG,
    LOOP_VARIABLE_PREFIX,
];

/// Looks up a code by its identifier, ignoring ASCII case.
#[must_use]
pub fn lookup(code: &str) -> Option<RuleCode> {
    ALL.iter().copied().find(|c| c.code.eq_ignore_ascii_case(code))
}
