//! Structural classification of decorator expressions.
//!
//! A decorator is matched by shape: a bare name (`@final`), an attribute
//! (`@typing.final`) or a call of either (`@pytest.fixture(scope="module")`).
//! The role is decided by the terminal name and, for some roles, the owner
//! module.

use crate::ast::{Constant, Keyword, NodeId, NodeKind, SyntaxTree};
use crate::config::LintConfig;

/// Boolean keyword arguments found on a `dataclass(...)` call.
///
/// A field is `None` when the keyword is absent or not a boolean literal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataclassOptions {
    /// `kw_only=`
    pub kw_only: Option<bool>,
    /// `slots=`
    pub slots: Option<bool>,
    /// `frozen=`
    pub frozen: Option<bool>,
    /// `init=`
    pub init: Option<bool>,
}

impl DataclassOptions {
    /// Returns true when `kw_only` and `slots` are enabled and the class is
    /// frozen. `init=False` waives the frozen requirement.
    #[must_use]
    pub fn is_fully_configured(&self) -> bool {
        let frozen = self.frozen == Some(true) || self.init == Some(false);
        self.kw_only == Some(true) && self.slots == Some(true) && frozen
    }
}

/// Semantic role of one decorator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoratorRole {
    /// Not a decorator any rule cares about.
    None,
    /// `property`, `x.setter`, `cached_property`.
    Property,
    /// A test fixture (`pytest.fixture`).
    Fixture,
    /// `typing.final`.
    Final,
    /// `dataclasses.dataclass`, with the flags of its call form.
    Dataclass(DataclassOptions),
}

/// Classifies decorators against the roles configured in [`LintConfig`].
#[derive(Debug, Clone, Copy)]
pub struct DecoratorClassifier<'a> {
    tree: &'a SyntaxTree,
    config: &'a LintConfig,
}

impl<'a> DecoratorClassifier<'a> {
    /// Creates a classifier over `tree`.
    #[must_use]
    pub fn new(tree: &'a SyntaxTree, config: &'a LintConfig) -> Self {
        Self { tree, config }
    }

    /// Returns the role of the decorator expression `decorator`.
    #[must_use]
    pub fn classify(&self, decorator: NodeId) -> DecoratorRole {
        let target = self.tree.callee(decorator);
        let Some(terminal) = self.tree.terminal_name(target) else {
            return DecoratorRole::None;
        };
        let owner = self.tree.attribute_owner(target);
        let is_bare = matches!(self.tree.kind(target), NodeKind::Name { .. });
        let owner_in = |aliases: &[String]| owner.is_some_and(|o| aliases.iter().any(|a| a == o));

        match terminal {
            "property" | "setter" => DecoratorRole::Property,
            "cached_property" if is_bare || owner_in(&self.config.property_module_aliases) => {
                DecoratorRole::Property
            }
            "fixture" if is_bare || owner_in(&self.config.fixture_module_aliases) => {
                DecoratorRole::Fixture
            }
            "final" => DecoratorRole::Final,
            "dataclass" => DecoratorRole::Dataclass(self.dataclass_options(decorator)),
            _ => DecoratorRole::None,
        }
    }

    /// Returns true if any of `decorators` has `role`. Dataclass roles match
    /// regardless of their options.
    #[must_use]
    pub fn any_is(&self, decorators: &[NodeId], role: DecoratorRole) -> bool {
        decorators
            .iter()
            .any(|d| same_role(self.classify(*d), role))
    }

    /// Returns the options of the first dataclass decorator, if any.
    #[must_use]
    pub fn dataclass(&self, decorators: &[NodeId]) -> Option<DataclassOptions> {
        decorators.iter().find_map(|d| match self.classify(*d) {
            DecoratorRole::Dataclass(options) => Some(options),
            _ => None,
        })
    }

    fn dataclass_options(&self, decorator: NodeId) -> DataclassOptions {
        let NodeKind::Call { keywords, .. } = self.tree.kind(decorator) else {
            return DataclassOptions::default();
        };
        DataclassOptions {
            kw_only: self.flag(keywords, "kw_only"),
            slots: self.flag(keywords, "slots"),
            frozen: self.flag(keywords, "frozen"),
            init: self.flag(keywords, "init"),
        }
    }

    fn flag(&self, keywords: &[Keyword], name: &str) -> Option<bool> {
        keywords
            .iter()
            .filter(|k| k.arg.as_ref().is_some_and(|arg| arg.as_str() == name))
            .find_map(|k| match self.tree.kind(k.value) {
                NodeKind::Constant(Constant::Bool(value)) => Some(*value),
                _ => None,
            })
    }
}

fn same_role(left: DecoratorRole, right: DecoratorRole) -> bool {
    std::mem::discriminant(&left) == std::mem::discriminant(&right)
}
