//! Configuration types for cop-lint.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::codes;
use crate::types::RuleCode;

/// Top-level configuration, as read from `cop-lint.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// File discovery configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Thresholds and allow-lists shared by all rules.
    #[serde(default)]
    pub lint: LintConfig,

    /// Per-rule toggles, keyed by rule name or code.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if every toggle named by `keys` (rule names or codes) is
    /// enabled. Keys without a `[rules.<key>]` entry are enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| {
            self.rules
                .get(*key)
                .map_or(true, |c| c.enabled.unwrap_or(true))
        })
    }

    /// Checks if `code`, emitted by the rule named `rule`, is reported.
    /// Disabling the rule name turns off all of its codes; disabling a code
    /// turns off only that code.
    #[must_use]
    pub fn is_code_enabled(&self, rule: &str, code: &str) -> bool {
        self.is_rule_enabled(&[rule, code])
    }
}

/// File discovery configuration used by the command line front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Extra directories searched when resolving imported modules.
    #[serde(default)]
    pub python_path: Vec<PathBuf>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec![
                "**/.venv/**".to_string(),
                "**/venv/**".to_string(),
                "**/__pycache__/**".to_string(),
            ],
            respect_gitignore: true,
            python_path: Vec::new(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Which single-use temporaries the temporary-variable rule reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemporaryVariableMode {
    /// Every single-line assignment whose only read is on the next line.
    #[default]
    NextLine,
    /// Only the first stored-then-read-once name of each function.
    FirstInScope,
}

/// Thresholds and allow-lists consumed by the rules.
///
/// Immutable once handed to a [`Linter`](crate::Linter); validated when the
/// linter is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Shortest accepted identifier length.
    pub min_name_length: usize,
    /// Function names shorter than this skip the verb check.
    pub min_verb_check_length: usize,
    /// Largest number of names a `from` import may list.
    pub max_import_names: usize,
    /// Accepted leading verbs of function names.
    pub verbs: Vec<String>,
    /// Names exempt from naming rules.
    pub ignored_names: Vec<String>,
    /// Bases whose subclasses are exempt from naming and class rules.
    pub excluded_bases: Vec<String>,
    /// Factory bases exempt from the final and dataclass rules.
    pub model_factory_bases: Vec<String>,
    /// Bases exempt from the final-class rule only.
    pub final_exempt_bases: Vec<String>,
    /// Annotation names treated as scalar types.
    pub scalar_types: Vec<String>,
    /// Standard library modules that may be imported from.
    pub allowed_stdlib_from_imports: Vec<String>,
    /// Module suffixes exempt from the module-import rule.
    pub settings_module_suffixes: Vec<String>,
    /// Prefix forbidden on async function names.
    pub async_forbidden_prefix: String,
    /// Prefix required on loop variables.
    pub loop_variable_prefix: String,
    /// Modules whose `cached_property` counts as a property.
    pub property_module_aliases: Vec<String>,
    /// Modules whose `fixture` counts as a test fixture.
    pub fixture_module_aliases: Vec<String>,
    /// Annotation names that exempt an argument from the length check.
    pub whitelisted_annotation_names: Vec<String>,
    /// Annotation owners (`pytest` in `pytest.Fixture`) that exempt an argument.
    pub whitelisted_annotation_modules: Vec<String>,
    /// Temporary-variable reporting mode.
    pub temporary_variable: TemporaryVariableMode,
    /// Run rules on the rayon thread pool.
    pub parallel: bool,
}

const DEFAULT_MIN_NAME_LENGTH: usize = 8;
const DEFAULT_MAX_IMPORT_NAMES: usize = 2;
const DEFAULT_ASYNC_FORBIDDEN_PREFIX: &str = "get_";
const DEFAULT_LOOP_VARIABLE_PREFIX: &str = "one_";

const DEFAULT_VERBS: &[&str] = &[
    "accept", "acquire", "activate", "add", "adjust", "aggregate", "allow", "append", "apply",
    "archive", "assert", "assign", "attach", "authenticate", "authorize", "await", "build",
    "calculate", "call", "cancel", "capture", "change", "check", "clean", "clear", "close",
    "collect", "combine", "commit", "compare", "compile", "complete", "compose", "compute",
    "configure", "confirm", "connect", "consume", "convert", "copy", "count", "create", "decode",
    "decrypt", "define", "delete", "deliver", "deserialize", "destroy", "detect", "disable",
    "disconnect", "dispatch", "display", "do", "download", "drop", "dump", "emit", "enable",
    "encode", "encrypt", "ensure", "enqueue", "evaluate", "execute", "exit", "expand", "export",
    "extend", "extract", "fetch", "filter", "find", "finish", "flush", "format", "forward",
    "generate", "get", "group", "handle", "hash", "import", "increment", "index", "initialize",
    "insert", "inspect", "install", "invoke", "is", "iterate", "join", "keep", "load", "lock",
    "log", "make", "map", "mark", "match", "merge", "migrate", "move", "normalize", "notify",
    "open", "order", "pack", "parse", "patch", "perform", "persist", "pick", "ping", "poll",
    "pop", "populate", "post", "prepare", "print", "process", "produce", "publish", "pull",
    "push", "put", "query", "raise", "read", "receive", "record", "reduce", "refresh",
    "register", "reject", "release", "reload", "remove", "render", "replace", "reply", "report",
    "request", "reset", "resolve", "respond", "restart", "restore", "retrieve", "retry",
    "return", "revoke", "rollback", "run", "save", "scan", "schedule", "search", "select",
    "send", "serialize", "serve", "set", "setup", "show", "shutdown", "skip", "sort", "split",
    "start", "stop", "store", "strip", "submit", "subscribe", "sync", "teardown", "test",
    "toggle", "track", "transform", "translate", "trigger", "truncate", "try", "unlock",
    "unpack", "unregister", "unsubscribe", "update", "upload", "upsert", "use", "validate",
    "verify", "visit", "wait", "walk", "warn", "watch", "wrap", "write", "yield",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            min_name_length: DEFAULT_MIN_NAME_LENGTH,
            min_verb_check_length: 3,
            max_import_names: DEFAULT_MAX_IMPORT_NAMES,
            verbs: strings(DEFAULT_VERBS),
            ignored_names: strings(&["value", "values", "pattern"]),
            excluded_bases: strings(&["BaseModel", "RootModel", "ModelFactory", "SQLAlchemyFactory"]),
            model_factory_bases: strings(&["ModelFactory", "SQLAlchemyFactory"]),
            final_exempt_bases: strings(&["TypedDict"]),
            scalar_types: strings(&["int", "float", "str", "bool", "bytes", "complex"]),
            allowed_stdlib_from_imports: strings(&["collections.abc"]),
            settings_module_suffixes: strings(&[".settings"]),
            async_forbidden_prefix: DEFAULT_ASYNC_FORBIDDEN_PREFIX.to_string(),
            loop_variable_prefix: DEFAULT_LOOP_VARIABLE_PREFIX.to_string(),
            property_module_aliases: strings(&["functools"]),
            fixture_module_aliases: strings(&["pytest"]),
            whitelisted_annotation_names: strings(&["fixture", "Faker"]),
            whitelisted_annotation_modules: strings(&["pytest", "faker"]),
            temporary_variable: TemporaryVariableMode::NextLine,
            parallel: true,
        }
    }
}

impl LintConfig {
    /// Checks that thresholds and required lists are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        };

        if self.min_name_length == 0 {
            return Err(invalid("min_name_length", "must be at least 1"));
        }
        if self.max_import_names == 0 {
            return Err(invalid("max_import_names", "must be at least 1"));
        }
        if self.verbs.is_empty() {
            return Err(invalid("verbs", "must list at least one verb"));
        }
        if let Some(verb) = self.verbs.iter().find(|v| v.trim().is_empty()) {
            return Err(invalid("verbs", &format!("contains a blank entry {verb:?}")));
        }
        if self.async_forbidden_prefix.is_empty() {
            return Err(invalid("async_forbidden_prefix", "must not be empty"));
        }
        if self.loop_variable_prefix.is_empty() {
            return Err(invalid("loop_variable_prefix", "must not be empty"));
        }
        Ok(())
    }

    /// Returns true if `name` is one of the configured verbs or starts with
    /// `verb_`.
    #[must_use]
    pub fn is_verb_name(&self, name: &str) -> bool {
        self.verbs.iter().any(|verb| {
            name == verb
                || name
                    .strip_prefix(verb.as_str())
                    .is_some_and(|rest| rest.starts_with('_'))
        })
    }

    /// Returns the description reported for `code` under this
    /// configuration. Codes whose wording carries a threshold or prefix
    /// are reworded when that setting differs from the default.
    #[must_use]
    pub fn describe(&self, code: RuleCode) -> Cow<'static, str> {
        match code {
            codes::MODULE_IMPORT if self.max_import_names != DEFAULT_MAX_IMPORT_NAMES => {
                Cow::Owned(format!(
                    "Use module import when importing more than {} names",
                    self.max_import_names
                ))
            }
            codes::ATTRIBUTE_NAME_LENGTH
            | codes::VARIABLE_NAME_LENGTH
            | codes::ARGUMENT_NAME_LENGTH
            | codes::FUNCTION_NAME_LENGTH
            | codes::CLASS_NAME_LENGTH
                if self.min_name_length != DEFAULT_MIN_NAME_LENGTH =>
            {
                let kind = code
                    .description
                    .split_once(' ')
                    .map_or(code.description, |(kind, _)| kind);
                Cow::Owned(format!(
                    "{kind} name must be at least {} characters",
                    self.min_name_length
                ))
            }
            codes::ASYNC_GET_PREFIX
                if self.async_forbidden_prefix != DEFAULT_ASYNC_FORBIDDEN_PREFIX =>
            {
                Cow::Owned(format!(
                    "Avoid {} prefix in async function names",
                    self.async_forbidden_prefix
                ))
            }
            codes::LOOP_VARIABLE_PREFIX
                if self.loop_variable_prefix != DEFAULT_LOOP_VARIABLE_PREFIX =>
            {
                Cow::Owned(format!(
                    "For-loop variables must use the {} prefix",
                    self.loop_variable_prefix
                ))
            }
            _ => Cow::Borrowed(code.description),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A value was read but cannot be used.
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.rules.is_empty());
        assert_eq!(config.lint.min_name_length, 8);
        assert_eq!(config.lint.temporary_variable, TemporaryVariableMode::NextLine);
        assert!(config.lint.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analyzer]
root = "./src"
exclude = ["**/migrations/**"]

[lint]
min_name_length = 6
temporary_variable = "first-in-scope"
verbs = ["get", "make"]

[rules.final-class]
enabled = false

[rules.COP011]
enabled = true
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./src"));
        assert_eq!(config.lint.min_name_length, 6);
        assert_eq!(config.lint.max_import_names, 2);
        assert_eq!(
            config.lint.temporary_variable,
            TemporaryVariableMode::FirstInScope
        );
        assert!(!config.is_rule_enabled(&["final-class", "COP012"]));
        assert!(config.is_rule_enabled(&["temporary-variable", "COP011"]));
        assert!(config.is_rule_enabled(&["stdlib-import"]));
    }

    #[test]
    fn test_code_toggle_leaves_sibling_codes_enabled() {
        let config = Config::parse("[rules.COP008]\nenabled = false\n").expect("Failed to parse");
        assert!(!config.is_code_enabled("name-length", "COP008"));
        assert!(config.is_code_enabled("name-length", "COP005"));

        let config =
            Config::parse("[rules.name-length]\nenabled = false\n").expect("Failed to parse");
        assert!(!config.is_code_enabled("name-length", "COP005"));
        assert!(config.is_code_enabled("final-class", "COP012"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Config::parse("[lint]\nmin_name_length = \"long\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let config = LintConfig {
            min_name_length: 0,
            ..LintConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "min_name_length",
                ..
            })
        ));

        let config = LintConfig {
            verbs: Vec::new(),
            ..LintConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LintConfig {
            loop_variable_prefix: String::new(),
            ..LintConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_descriptions_are_registered_text() {
        let config = LintConfig::default();
        for code in codes::ALL {
            assert_eq!(config.describe(*code), code.description);
        }
    }

    #[test]
    fn test_descriptions_follow_configured_thresholds() {
        let config = LintConfig {
            min_name_length: 5,
            max_import_names: 4,
            async_forbidden_prefix: "load_".to_string(),
            loop_variable_prefix: "each_".to_string(),
            ..LintConfig::default()
        };
        assert_eq!(
            config.describe(codes::VARIABLE_NAME_LENGTH),
            "Variable name must be at least 5 characters"
        );
        assert_eq!(
            config.describe(codes::CLASS_NAME_LENGTH),
            "Class name must be at least 5 characters"
        );
        assert_eq!(
            config.describe(codes::MODULE_IMPORT),
            "Use module import when importing more than 4 names"
        );
        assert_eq!(
            config.describe(codes::ASYNC_GET_PREFIX),
            "Avoid load_ prefix in async function names"
        );
        assert_eq!(
            config.describe(codes::LOOP_VARIABLE_PREFIX),
            "For-loop variables must use the each_ prefix"
        );
        assert_eq!(config.describe(codes::FINAL_CLASS), codes::FINAL_CLASS.description);
    }

    #[test]
    fn test_verb_names() {
        let config = LintConfig::default();
        assert!(config.is_verb_name("get"));
        assert!(config.is_verb_name("fetch_item"));
        assert!(config.is_verb_name("process_events"));
        assert!(!config.is_verb_name("getter"));
        assert!(!config.is_verb_name("calculator"));
        assert!(!config.is_verb_name("fill_values"));
        assert!(!config.is_verb_name("total_value"));
    }
}
