//! Route tree declaration and compilation

use super::template::RouteTemplate;
use std::sync::Arc;

/// Value side of a declared route entry
#[derive(Debug)]
pub enum RouteNode<T> {
    Terminal(T),
    Nested(RouteMap<T>),
}

/// A declared route tree: ordered `key -> terminal | sub-map` entries.
///
/// Order is significant: the matcher tries siblings in declaration order and
/// the first match wins.
#[derive(Debug)]
pub struct RouteMap<T> {
    entries: Vec<(String, RouteNode<T>)>,
}

impl<T> Default for RouteMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> RouteMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a terminal under `key`
    pub fn route<K: Into<String>>(mut self, key: K, terminal: T) -> Self {
        self.entries.push((key.into(), RouteNode::Terminal(terminal)));
        self
    }

    /// Declare a sub-tree under `key`. An empty key inside `map` acts as
    /// its index entry.
    pub fn nest<K: Into<String>>(mut self, key: K, map: RouteMap<T>) -> Self {
        self.entries.push((key.into(), RouteNode::Nested(map)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compile recursively, preserving declaration order at every level
    pub fn compile(self) -> CompiledTree<T> {
        CompiledTree {
            entries: self
                .entries
                .into_iter()
                .map(|(key, node)| CompiledEntry {
                    template: RouteTemplate::parse(&key),
                    node: match node {
                        RouteNode::Terminal(terminal) => CompiledNode::Terminal(Arc::new(terminal)),
                        RouteNode::Nested(map) => CompiledNode::Subtree(map.compile()),
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug)]
pub enum CompiledNode<T> {
    Terminal(Arc<T>),
    Subtree(CompiledTree<T>),
}

impl<T> CompiledNode<T> {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CompiledNode::Terminal(_))
    }
}

#[derive(Debug)]
pub struct CompiledEntry<T> {
    pub template: RouteTemplate,
    pub node: CompiledNode<T>,
}

/// Immutable compiled route tree
#[derive(Debug)]
pub struct CompiledTree<T> {
    entries: Vec<CompiledEntry<T>>,
}

impl<T> CompiledTree<T> {
    pub fn entries(&self) -> &[CompiledEntry<T>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattened template of every terminal, in match order
    pub fn routes(&self) -> Vec<String> {
        let mut routes = Vec::new();
        self.collect_routes(&[], &mut routes);
        routes
    }

    fn collect_routes(&self, prefix: &[String], out: &mut Vec<String>) {
        for entry in &self.entries {
            let mut path = prefix.to_vec();
            path.extend(entry.template.segments().iter().map(ToString::to_string));

            match &entry.node {
                CompiledNode::Terminal(_) => out.push(format!("/{}", path.join("/"))),
                CompiledNode::Subtree(tree) => tree.collect_routes(&path, out),
            }
        }
    }
}
