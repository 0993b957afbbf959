//! Route tree declaration, compilation and matching
//!
//! Routes are declared as a nested [`RouteMap`], compiled once into a
//! [`CompiledTree`] and resolved with first-match-wins semantics over sibling
//! entries in declaration order.

pub mod compiler;
pub mod matcher;
pub mod table;
pub mod template;

pub use compiler::{CompiledEntry, CompiledNode, CompiledTree, RouteMap, RouteNode};
pub use matcher::{match_segments, split_path, RouteMatch};
pub use table::RouteTable;
pub use template::{RouteTemplate, Segment};
