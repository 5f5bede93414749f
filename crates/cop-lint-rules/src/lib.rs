//! # cop-lint-rules
//!
//! Built-in COP rules for cop-lint.
//!
//! Each rule lives in its own module and walks the shared syntax tree once.
//! [`all_rules`] returns them in code order.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | COP001 | `module-import` | Use module import when importing more than two names |
//! | COP002 | `stdlib-import` | Import standard library modules as whole modules |
//! | COP003 | `scalar-annotation` | Avoid explicit scalar type annotations |
//! | COP004-COP008 | `name-length` | Attribute, variable, argument, function and class names must be long enough |
//! | COP009 | `function-verb` | Function identifier must be a verb |
//! | COP010 | `async-get-prefix` | Avoid get_ prefix in async function names |
//! | COP011 | `temporary-variable` | Avoid temporary variables used only once |
//! | COP012 | `final-class` | Classes should be marked typing.final |
//! | COP013 | `mapping-proxy` | Wrap module dictionaries with types.MappingProxyType |
//! | COP014 | `dataclass-config` | Use dataclasses with kw_only=True, slots=True, frozen=True |
//! | COP015 | `loop-variable-prefix` | For-loop variables must use the one_ prefix |
//!
//! ## Usage
//!
//! ```ignore
//! use cop_lint_core::Linter;
//! use cop_lint_rules::{FinalClass, NameLength};
//!
//! let linter = Linter::builder()
//!     .rule(NameLength::new())
//!     .rule(FinalClass::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod async_get_prefix;
mod dataclass_config;
mod final_class;
mod function_verb;
mod loop_variable_prefix;
mod mapping_proxy;
mod module_import;
mod name_length;
mod naming;
mod registry;
mod scalar_annotation;
mod stdlib_import;
mod temporary_variable;

#[cfg(test)]
mod testing;

pub use async_get_prefix::AsyncGetPrefix;
pub use dataclass_config::DataclassConfig;
pub use final_class::FinalClass;
pub use function_verb::FunctionVerb;
pub use loop_variable_prefix::LoopVariablePrefix;
pub use mapping_proxy::MappingProxy;
pub use module_import::ModuleImport;
pub use name_length::NameLength;
pub use registry::{all_rules, select_rules};
pub use scalar_annotation::ScalarAnnotation;
pub use stdlib_import::StdlibImport;
pub use temporary_variable::TemporaryVariable;

/// Re-export core types for convenience.
pub use cop_lint_core::{Rule, RuleCode, Violation};
