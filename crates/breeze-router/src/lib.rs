//! breeze-router: Zero-dependency method-aware path trie
//!
//! Routes are bucketed by HTTP method, then matched segment-by-segment
//! against a trie. Bindings are registered once at startup and looked up
//! read-only per request.
//!
//! ## Path Syntax
//! - `:name` - Named parameter (captures one segment)
//! - `*` or `*name` - Wildcard (captures the remaining path)
//!
//! ## Priority
//! 1. Exact static match (highest)
//! 2. Parameter match
//! 3. Wildcard match (lowest)
//!
//! Unlike a plain matcher, [`Router::allowed_methods`] reports which verbs
//! a path is registered under, so callers can answer 405 for a known path
//! hit with the wrong verb instead of a blanket 404.
//!
//! ## Example
//! ```
//! use breeze_router::Router;
//!
//! let mut router = Router::new();
//! router.insert("GET", "/api/hello", 0);
//!
//! let hit = router.find("GET", "/api/hello").unwrap();
//! assert_eq!(hit.handler, 0);
//! assert!(router.find("POST", "/api/hello").is_none());
//! assert_eq!(router.allowed_methods("/api/hello"), vec!["GET".to_string()]);
//! ```

use std::collections::HashMap;

/// A successful route lookup
#[derive(Debug, Clone, PartialEq)]
pub struct RouteHit {
    /// Handler ID the path was registered with
    pub handler: u32,
    /// Captured path parameters as (name, value) pairs, in path order
    pub params: Vec<(String, String)>,
}

impl RouteHit {
    /// Params as a map for keyed access
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params.iter().cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Node {
    /// Static children keyed by path segment
    children: HashMap<String, Node>,
    /// `:name` child, at most one per node
    param: Option<Box<ParamChild>>,
    /// `*name` child, terminal
    wildcard: Option<WildcardChild>,
    /// Handler bound at this node, if any
    handler: Option<u32>,
}

#[derive(Debug)]
struct ParamChild {
    name: String,
    node: Node,
}

#[derive(Debug)]
struct WildcardChild {
    name: String,
    handler: u32,
}

/// Method-aware path trie
#[derive(Debug, Default)]
pub struct Router {
    /// Uppercased method -> trie root
    trees: HashMap<String, Node>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding. Later insertions for the same method and path
    /// replace the earlier handler ID.
    pub fn insert(&mut self, method: &str, path: &str, handler: u32) {
        let root = self.trees.entry(method.to_uppercase()).or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        Self::insert_at(root, &segments, handler);
    }

    fn insert_at(node: &mut Node, segments: &[&str], handler: u32) {
        let Some((segment, rest)) = segments.split_first() else {
            node.handler = Some(handler);
            return;
        };

        if let Some(name) = segment.strip_prefix(':') {
            let param = node.param.get_or_insert_with(|| {
                Box::new(ParamChild {
                    name: name.to_string(),
                    node: Node::default(),
                })
            });
            Self::insert_at(&mut param.node, rest, handler);
        } else if let Some(name) = segment.strip_prefix('*') {
            let name = if name.is_empty() { "*" } else { name };
            node.wildcard = Some(WildcardChild {
                name: name.to_string(),
                handler,
            });
        } else {
            let child = node.children.entry(segment.to_string()).or_default();
            Self::insert_at(child, rest, handler);
        }
    }

    /// Look up a binding for the given method and path.
    ///
    /// Returns `None` when the method has no tree or the path does not
    /// match under it; use [`allowed_methods`](Self::allowed_methods) to
    /// tell the two cases apart.
    pub fn find(&self, method: &str, path: &str) -> Option<RouteHit> {
        let root = self.trees.get(&method.to_uppercase())?;
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Vec::new();
        Self::find_at(root, &segments, &mut params)
    }

    fn find_at(node: &Node, segments: &[&str], params: &mut Vec<(String, String)>) -> Option<RouteHit> {
        let Some((segment, rest)) = segments.split_first() else {
            return node.handler.map(|handler| RouteHit {
                handler,
                params: params.clone(),
            });
        };

        if let Some(child) = node.children.get(*segment) {
            if let Some(hit) = Self::find_at(child, rest, params) {
                return Some(hit);
            }
        }

        if let Some(param) = &node.param {
            params.push((param.name.clone(), segment.to_string()));
            if let Some(hit) = Self::find_at(&param.node, rest, params) {
                return Some(hit);
            }
            params.pop();
        }

        if let Some(wildcard) = &node.wildcard {
            params.push((wildcard.name.clone(), segments.join("/")));
            return Some(RouteHit {
                handler: wildcard.handler,
                params: params.clone(),
            });
        }

        None
    }

    /// Methods the path is registered under, sorted for stable output.
    ///
    /// An empty result means the path matches no binding under any method.
    pub fn allowed_methods(&self, path: &str) -> Vec<String> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut methods: Vec<String> = self
            .trees
            .iter()
            .filter(|(_, root)| Self::find_at(root, &segments, &mut Vec::new()).is_some())
            .map(|(method, _)| method.clone())
            .collect();
        methods.sort();
        methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_routes() {
        let mut router = Router::new();
        router.insert("GET", "/", 0);
        router.insert("GET", "/api/hello", 1);
        router.insert("POST", "/api/hello", 2);

        assert_eq!(router.find("GET", "/").unwrap().handler, 0);
        assert_eq!(router.find("GET", "/api/hello").unwrap().handler, 1);
        assert_eq!(router.find("POST", "/api/hello").unwrap().handler, 2);
        assert!(router.find("GET", "/api/unknown").is_none());
        assert!(router.find("DELETE", "/api/hello").is_none());
    }

    #[test]
    fn param_routes() {
        let mut router = Router::new();
        router.insert("GET", "/users/:id", 1);
        router.insert("GET", "/users/:id/posts/:post_id", 2);

        let hit = router.find("GET", "/users/42").unwrap();
        assert_eq!(hit.handler, 1);
        assert_eq!(hit.params, vec![("id".to_string(), "42".to_string())]);

        let hit = router.find("GET", "/users/42/posts/99").unwrap();
        assert_eq!(hit.handler, 2);
        assert_eq!(
            hit.params,
            vec![
                ("id".to_string(), "42".to_string()),
                ("post_id".to_string(), "99".to_string()),
            ]
        );
    }

    #[test]
    fn wildcard_routes() {
        let mut router = Router::new();
        router.insert("GET", "/files/*path", 1);
        router.insert("GET", "/static/*", 2);

        let hit = router.find("GET", "/files/docs/readme.md").unwrap();
        assert_eq!(hit.handler, 1);
        assert_eq!(
            hit.params,
            vec![("path".to_string(), "docs/readme.md".to_string())]
        );

        let hit = router.find("GET", "/static/js/app.js").unwrap();
        assert_eq!(hit.params, vec![("*".to_string(), "js/app.js".to_string())]);
    }

    #[test]
    fn exact_wins_over_param() {
        let mut router = Router::new();
        router.insert("GET", "/users/:id", 1);
        router.insert("GET", "/users/me", 2);

        assert_eq!(router.find("GET", "/users/me").unwrap().handler, 2);
        assert_eq!(router.find("GET", "/users/123").unwrap().handler, 1);
    }

    #[test]
    fn param_wins_over_wildcard() {
        let mut router = Router::new();
        router.insert("GET", "/api/:version", 1);
        router.insert("GET", "/api/*", 2);

        assert_eq!(router.find("GET", "/api/v1").unwrap().handler, 1);
        assert_eq!(router.find("GET", "/api/v1/users").unwrap().handler, 2);
    }

    #[test]
    fn allowed_methods_for_known_path() {
        let mut router = Router::new();
        router.insert("GET", "/api/hello", 1);
        router.insert("POST", "/api/items", 2);
        router.insert("DELETE", "/api/items", 3);

        assert_eq!(router.allowed_methods("/api/hello"), vec!["GET"]);
        assert_eq!(router.allowed_methods("/api/items"), vec!["DELETE", "POST"]);
        assert!(router.allowed_methods("/api/unknown").is_empty());
    }

    #[test]
    fn no_head_fallback() {
        // HEAD is rejected unless explicitly registered
        let mut router = Router::new();
        router.insert("GET", "/api/hello", 1);

        assert!(router.find("HEAD", "/api/hello").is_none());
        assert_eq!(router.allowed_methods("/api/hello"), vec!["GET"]);
    }

    #[test]
    fn method_case_insensitive() {
        let mut router = Router::new();
        router.insert("get", "/api/hello", 1);

        assert_eq!(router.find("GET", "/api/hello").unwrap().handler, 1);
        assert_eq!(router.find("Get", "/api/hello").unwrap().handler, 1);
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let mut router = Router::new();
        router.insert("GET", "/users/", 1);

        assert_eq!(router.find("GET", "/users").unwrap().handler, 1);
        assert_eq!(router.find("GET", "/users/").unwrap().handler, 1);
    }

    #[test]
    fn reinsert_replaces_handler() {
        let mut router = Router::new();
        router.insert("GET", "/api/hello", 1);
        router.insert("GET", "/api/hello", 7);

        assert_eq!(router.find("GET", "/api/hello").unwrap().handler, 7);
    }
}
