//! Module existence queries used by the import rules.

use std::collections::HashSet;

use crate::stdlib::{STDLIB_PACKAGES, STDLIB_SUBMODULES};

/// Answers whether a dotted module path exists and whether it is a package.
///
/// Implementations never fail: a lookup that cannot be answered is "not
/// found".
pub trait ModuleResolver: Send + Sync {
    /// Returns true if `dotted_path` names an importable module or package.
    fn exists(&self, dotted_path: &str) -> bool;

    /// Returns true if `dotted_path` names a package.
    fn is_package(&self, dotted_path: &str) -> bool;
}

/// In-memory resolver over fixed module and package sets.
#[derive(Debug, Clone, Default)]
pub struct StaticModuleResolver {
    modules: HashSet<String>,
    packages: HashSet<String>,
}

impl StaticModuleResolver {
    /// Creates a resolver that knows no modules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver preloaded with the standard library packages and
    /// their well-known submodules.
    #[must_use]
    pub fn with_stdlib() -> Self {
        let mut resolver = Self::new();
        for package in STDLIB_PACKAGES {
            resolver.add_package(*package);
        }
        for module in STDLIB_SUBMODULES {
            resolver.add_module(*module);
        }
        resolver
    }

    /// Registers a plain module.
    pub fn add_module(&mut self, dotted_path: impl Into<String>) {
        self.modules.insert(dotted_path.into());
    }

    /// Registers a package. A package also exists as a module.
    pub fn add_package(&mut self, dotted_path: impl Into<String>) {
        let path = dotted_path.into();
        self.modules.insert(path.clone());
        self.packages.insert(path);
    }

    /// Registers a module (builder style).
    #[must_use]
    pub fn module(mut self, dotted_path: impl Into<String>) -> Self {
        self.add_module(dotted_path);
        self
    }

    /// Registers a package (builder style).
    #[must_use]
    pub fn package(mut self, dotted_path: impl Into<String>) -> Self {
        self.add_package(dotted_path);
        self
    }
}

impl ModuleResolver for StaticModuleResolver {
    fn exists(&self, dotted_path: &str) -> bool {
        self.modules.contains(dotted_path)
    }

    fn is_package(&self, dotted_path: &str) -> bool {
        self.packages.contains(dotted_path)
    }
}
