//! Lazily compiled route table

use super::compiler::{CompiledTree, RouteMap};
use super::matcher::{match_segments, split_path, RouteMatch};
use once_cell::sync::OnceCell;
use std::sync::Mutex;
use tracing::debug;

/// A declared route tree compiled on first use and cached for the life of
/// the table.
#[derive(Debug)]
pub struct RouteTable<T> {
    name: &'static str,
    declared: Mutex<Option<RouteMap<T>>>,
    compiled: OnceCell<CompiledTree<T>>,
}

impl<T> RouteTable<T> {
    pub fn new(name: &'static str, map: RouteMap<T>) -> Self {
        Self {
            name,
            declared: Mutex::new(Some(map)),
            compiled: OnceCell::new(),
        }
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// The compiled tree, compiling the declaration on the first call
    pub fn tree(&self) -> &CompiledTree<T> {
        self.compiled.get_or_init(|| {
            let declared = match self.declared.lock() {
                Ok(mut guard) => guard.take(),
                Err(poisoned) => poisoned.into_inner().take(),
            };
            let tree = declared.unwrap_or_default().compile();
            debug!(target: "arbor::routing", table = self.name, routes = ?tree.routes(), "compiled route table");
            tree
        })
    }

    /// Match a request path, after stripping `base_path`
    pub fn resolve(&self, path: &str, base_path: &str) -> Option<RouteMatch<'_, T>> {
        let segments = split_path(path, base_path)?;
        match_segments(self.tree(), &segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiles_once_on_first_resolve() {
        let table = RouteTable::new("test", RouteMap::new().route("/users/:id", 1));
        assert!(!table.is_compiled());

        let found = table.resolve("/users/5", "").unwrap();
        assert_eq!(**found.terminal, 1);
        assert!(table.is_compiled());

        // Cached tree keeps answering
        assert!(table.resolve("/users/6", "").is_some());
        assert_eq!(table.tree().routes(), vec!["/users/:id"]);
    }

    #[test]
    fn test_resolve_respects_base_path() {
        let table = RouteTable::new("test", RouteMap::new().route("/health", ()));

        assert!(table.resolve("/api/health", "/api").is_some());
        assert!(table.resolve("/health", "/api").is_none());
    }
}
