//! Typed route registry
//!
//! Wraps the breeze-router trie with owned handler values and turns a
//! lookup into a three-way dispatch outcome, so the server can answer 405
//! for a known path hit with the wrong verb and 404 for an unknown path.

use crate::{Error, Method, Result};
use std::collections::HashMap;

/// Outcome of dispatching a method + path against the registry
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome<T> {
    /// A binding matched; `params` holds captured path segments
    Matched {
        value: T,
        params: HashMap<String, String>,
    },
    /// The path is registered, but not under this verb
    MethodNotAllowed { allow: Vec<String> },
    /// No binding knows this path
    NotFound,
}

/// Route registry: (method, path pattern) -> value.
///
/// Registered once at startup and immutable afterwards; dispatch is
/// read-only. Values are stored once and referenced by ID in the trie.
pub struct Router<T> {
    matcher: breeze_router::Router,
    values: Vec<T>,
}

impl<T: Clone> Router<T> {
    pub fn new() -> Self {
        Self {
            matcher: breeze_router::Router::new(),
            values: Vec::new(),
        }
    }

    /// Register a binding. Paths must be absolute.
    pub fn route(&mut self, method: Method, path: &str, value: T) -> Result<()> {
        if !path.starts_with('/') {
            return Err(Error::InvalidPath(path.to_string()));
        }
        let id = u32::try_from(self.values.len())
            .map_err(|_| Error::Internal("route table overflow".to_string()))?;
        self.values.push(value);
        self.matcher.insert(method.as_str(), path, id);
        Ok(())
    }

    /// Register a GET binding
    pub fn get(&mut self, path: &str, value: T) -> Result<()> {
        self.route(Method::Get, path, value)
    }

    /// Register a POST binding
    pub fn post(&mut self, path: &str, value: T) -> Result<()> {
        self.route(Method::Post, path, value)
    }

    /// Register a PUT binding
    pub fn put(&mut self, path: &str, value: T) -> Result<()> {
        self.route(Method::Put, path, value)
    }

    /// Register a DELETE binding
    pub fn delete(&mut self, path: &str, value: T) -> Result<()> {
        self.route(Method::Delete, path, value)
    }

    /// Dispatch a request's method and path against the registry
    pub fn dispatch(&self, method: Method, path: &str) -> RouteOutcome<T> {
        if let Some(hit) = self.matcher.find(method.as_str(), path) {
            return RouteOutcome::Matched {
                value: self.values[hit.handler as usize].clone(),
                params: hit.params_map(),
            };
        }

        let allow = self.matcher.allowed_methods(path);
        if allow.is_empty() {
            RouteOutcome::NotFound
        } else {
            RouteOutcome::MethodNotAllowed { allow }
        }
    }
}

impl<T: Clone> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_route_carries_value_and_params() {
        let mut router: Router<&str> = Router::new();
        router.get("/api/hello", "hello").unwrap();
        router.get("/users/:id", "user").unwrap();

        match router.dispatch(Method::Get, "/api/hello") {
            RouteOutcome::Matched { value, params } => {
                assert_eq!(value, "hello");
                assert!(params.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        match router.dispatch(Method::Get, "/users/42") {
            RouteOutcome::Matched { value, params } => {
                assert_eq!(value, "user");
                assert_eq!(params.get("id").map(String::as_str), Some("42"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn wrong_verb_is_method_not_allowed() {
        let mut router: Router<&str> = Router::new();
        router.get("/api/hello", "hello").unwrap();

        for method in [
            Method::Post,
            Method::Put,
            Method::Delete,
            Method::Patch,
            Method::Head,
            Method::Options,
        ] {
            match router.dispatch(method, "/api/hello") {
                RouteOutcome::MethodNotAllowed { allow } => {
                    assert_eq!(allow, vec!["GET".to_string()]);
                }
                other => panic!("{method}: unexpected outcome: {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_path_is_not_found() {
        let mut router: Router<&str> = Router::new();
        router.get("/api/hello", "hello").unwrap();

        assert_eq!(
            router.dispatch(Method::Get, "/api/missing"),
            RouteOutcome::NotFound
        );
    }

    #[test]
    fn relative_path_is_rejected() {
        let mut router: Router<&str> = Router::new();
        assert!(matches!(
            router.route(Method::Get, "api/hello", "hello"),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn multiple_verbs_on_one_path() {
        let mut router: Router<&str> = Router::new();
        router.get("/items", "list").unwrap();
        router.post("/items", "create").unwrap();

        match router.dispatch(Method::Delete, "/items") {
            RouteOutcome::MethodNotAllowed { allow } => {
                assert_eq!(allow, vec!["GET".to_string(), "POST".to_string()]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
