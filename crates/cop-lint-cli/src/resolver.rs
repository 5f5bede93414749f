//! Module resolution against the files on disk.

use cop_lint_core::{ModuleResolver, StaticModuleResolver};
use std::path::{Path, PathBuf};

/// Resolves dotted module paths under a list of search directories, then
/// against the standard library table.
///
/// `a.b` is a package when `a/b/__init__.py` (or a namespace directory
/// `a/b/`) exists, and a module when `a/b.py` or `a/b.pyi` exists.
#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    roots: Vec<PathBuf>,
    stdlib: StaticModuleResolver,
}

impl SearchPathResolver {
    /// Creates a resolver searching `roots` in order.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            stdlib: StaticModuleResolver::with_stdlib(),
        }
    }

    fn locations<'a>(&'a self, dotted_path: &str) -> impl Iterator<Item = PathBuf> + 'a {
        let relative: PathBuf = dotted_path.split('.').collect();
        self.roots.iter().map(move |root| root.join(&relative))
    }
}

fn is_package_dir(base: &Path) -> bool {
    base.join("__init__.py").is_file() || base.join("__init__.pyi").is_file() || base.is_dir()
}

fn is_module_file(base: &Path) -> bool {
    ["py", "pyi"]
        .iter()
        .any(|ext| base.with_extension(ext).is_file())
}

impl ModuleResolver for SearchPathResolver {
    fn exists(&self, dotted_path: &str) -> bool {
        if dotted_path.is_empty() {
            return false;
        }
        self.stdlib.exists(dotted_path)
            || self
                .locations(dotted_path)
                .any(|base| is_module_file(&base) || is_package_dir(&base))
    }

    fn is_package(&self, dotted_path: &str) -> bool {
        if dotted_path.is_empty() {
            return false;
        }
        self.stdlib.is_package(dotted_path)
            || self.locations(dotted_path).any(|base| is_package_dir(&base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("app/services")).unwrap();
        fs::write(root.join("app/__init__.py"), "").unwrap();
        fs::write(root.join("app/services/__init__.py"), "").unwrap();
        fs::write(root.join("app/services/billing.py"), "").unwrap();
        fs::write(root.join("app/types.pyi"), "").unwrap();
        tmp
    }

    #[test]
    fn resolves_packages_and_modules_on_disk() {
        let tmp = project();
        let resolver = SearchPathResolver::new(vec![tmp.path().to_path_buf()]);

        assert!(resolver.is_package("app.services"));
        assert!(resolver.exists("app.services.billing"));
        assert!(!resolver.is_package("app.services.billing"));
        assert!(resolver.exists("app.types"));
        assert!(!resolver.exists("app.missing"));
        assert!(!resolver.exists(""));
    }

    #[test]
    fn later_roots_and_stdlib_are_searched() {
        let tmp = project();
        let empty = TempDir::new().unwrap();
        let resolver =
            SearchPathResolver::new(vec![empty.path().to_path_buf(), tmp.path().to_path_buf()]);

        assert!(resolver.exists("app.services.billing"));
        assert!(resolver.is_package("importlib"));
        assert!(resolver.exists("importlib.resources"));
    }
}
