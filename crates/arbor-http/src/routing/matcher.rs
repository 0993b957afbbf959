//! First-match-wins path resolution over a compiled tree
//!
//! Siblings are tried in declaration order. A failed entry, including a
//! subtree whose recursive match fails, falls through to the next sibling.

use super::compiler::{CompiledNode, CompiledTree};
use super::template::{RouteTemplate, Segment};
use crate::foundation::constants::PATH_SEPARATOR;
use std::collections::HashMap;
use std::sync::Arc;

/// Terminal selected for a path and the variables bound on the way
#[derive(Debug)]
pub struct RouteMatch<'a, T> {
    pub params: HashMap<String, String>,
    pub terminal: &'a Arc<T>,
}

/// Resolve `input` against `tree`
pub fn match_segments<'a, T>(tree: &'a CompiledTree<T>, input: &[&str]) -> Option<RouteMatch<'a, T>> {
    for entry in tree.entries() {
        let width = entry.template.len();

        if width > input.len() {
            continue;
        }
        if width < input.len() && entry.node.is_terminal() {
            continue;
        }

        let Some(mut params) = bind(&entry.template, &input[..width]) else {
            continue;
        };

        let found = match &entry.node {
            CompiledNode::Terminal(terminal) => Some(RouteMatch {
                params: HashMap::new(),
                terminal,
            }),
            // Exact width into a subtree resolves through its index entry;
            // longer input recurses with the unconsumed remainder
            CompiledNode::Subtree(subtree) => match_segments(subtree, &input[width..]),
        };

        if let Some(mut found) = found {
            // Inner bindings take precedence
            params.extend(found.params.drain());
            found.params = params;
            return Some(found);
        }
    }

    None
}

fn bind(template: &RouteTemplate, input: &[&str]) -> Option<HashMap<String, String>> {
    let mut params = HashMap::new();

    for (segment, value) in template.segments().iter().zip(input) {
        match segment {
            Segment::Literal(literal) if literal != value => return None,
            Segment::Literal(_) => {}
            Segment::Variable(name) => {
                params.insert(name.clone(), (*value).to_string());
            }
        }
    }

    Some(params)
}

/// Split a request path into segments after removing `base_path`.
///
/// Returns `None` for paths outside the base path. One leading and one
/// trailing separator are stripped; the root path yields no segments.
/// Segments are not percent-decoded.
pub fn split_path<'p>(path: &'p str, base_path: &str) -> Option<Vec<&'p str>> {
    let path = if base_path.is_empty() {
        path
    } else {
        let rest = path.strip_prefix(base_path)?;
        if !rest.is_empty() && !rest.starts_with(PATH_SEPARATOR) {
            return None;
        }
        rest
    };

    let path = path.strip_prefix(PATH_SEPARATOR).unwrap_or(path);
    let path = path.strip_suffix(PATH_SEPARATOR).unwrap_or(path);

    if path.is_empty() {
        return Some(Vec::new());
    }

    Some(path.split(PATH_SEPARATOR).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteMap;

    fn resolve<'a>(tree: &'a CompiledTree<&'static str>, path: &str) -> Option<RouteMatch<'a, &'static str>> {
        let segments = split_path(path, "")?;
        match_segments(tree, &segments)
    }

    #[test]
    fn test_nested_variables() {
        let tree = RouteMap::new()
            .nest("/user/:id", RouteMap::new().route("/msg/:mid", "handlerA"))
            .compile();

        let found = resolve(&tree, "/user/7/msg/9").unwrap();
        assert_eq!(**found.terminal, "handlerA");
        assert_eq!(found.params.len(), 2);
        assert_eq!(found.params["id"], "7");
        assert_eq!(found.params["mid"], "9");
    }

    #[test]
    fn test_declaration_order_wins() {
        let tree = RouteMap::new()
            .route("/files/:name", "variable")
            .route("/files/readme", "literal")
            .compile();

        let found = resolve(&tree, "/files/readme").unwrap();
        assert_eq!(**found.terminal, "variable");

        let tree = RouteMap::new()
            .route("/files/readme", "literal")
            .route("/files/:name", "variable")
            .compile();

        assert_eq!(**resolve(&tree, "/files/readme").unwrap().terminal, "literal");
        assert_eq!(**resolve(&tree, "/files/other").unwrap().terminal, "variable");
    }

    #[test]
    fn test_terminal_does_not_absorb_trailing_segments() {
        let tree = RouteMap::new().route("/user/:id", "user").compile();

        assert!(resolve(&tree, "/user/7").is_some());
        assert!(resolve(&tree, "/user/7/extra").is_none());
        assert!(resolve(&tree, "/user").is_none());
    }

    #[test]
    fn test_index_entry() {
        let tree = RouteMap::new()
            .nest(
                "/posts",
                RouteMap::new().route("", "list").route("/:id", "show"),
            )
            .nest("/empty", RouteMap::new().route("/:id", "only"))
            .compile();

        assert_eq!(**resolve(&tree, "/posts").unwrap().terminal, "list");
        assert_eq!(**resolve(&tree, "/posts/").unwrap().terminal, "list");
        assert_eq!(**resolve(&tree, "/posts/3").unwrap().terminal, "show");
        // No index entry means no match at that width
        assert!(resolve(&tree, "/empty").is_none());
    }

    #[test]
    fn test_root_index() {
        let tree = RouteMap::new().route("/", "home").route("/about", "about").compile();

        assert_eq!(**resolve(&tree, "/").unwrap().terminal, "home");
        assert_eq!(**resolve(&tree, "").unwrap().terminal, "home");
    }

    #[test]
    fn test_inner_bindings_take_precedence() {
        let tree = RouteMap::new()
            .nest("/org/:id", RouteMap::new().route("/team/:id", "team"))
            .compile();

        let found = resolve(&tree, "/org/acme/team/core").unwrap();
        assert_eq!(found.params.len(), 1);
        assert_eq!(found.params["id"], "core");
    }

    #[test]
    fn test_failed_subtree_falls_through_to_next_sibling() {
        let tree = RouteMap::new()
            .nest("/a/:x", RouteMap::new().route("/only", "first"))
            .route("/a/:y/other", "second")
            .compile();

        let found = resolve(&tree, "/a/1/other").unwrap();
        assert_eq!(**found.terminal, "second");
        // Bindings from the abandoned entry are not retained
        assert!(!found.params.contains_key("x"));
        assert_eq!(found.params["y"], "1");
    }

    #[test]
    fn test_literal_mismatch() {
        let tree = RouteMap::new().route("/users/:id", "user").compile();
        assert!(resolve(&tree, "/accounts/1").is_none());
        assert!(resolve(&RouteMap::<&str>::new().compile(), "/").is_none());
    }

    #[test]
    fn test_split_path_with_base_path() {
        assert_eq!(split_path("/api/users/1", "/api"), Some(vec!["users", "1"]));
        assert_eq!(split_path("/api", "/api"), Some(vec![]));
        assert_eq!(split_path("/api/", "/api"), Some(vec![]));
        assert_eq!(split_path("/apiary/x", "/api"), None);
        assert_eq!(split_path("/other", "/api"), None);
        assert_eq!(split_path("/users/", ""), Some(vec!["users"]));
    }
}
