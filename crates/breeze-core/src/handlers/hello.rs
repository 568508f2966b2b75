//! The hello endpoint
//!
//! Greets the caller by a query parameter, demonstrating the dispatch
//! pipeline end to end: verb filtering happens in the router, parameter
//! extraction in [`QueryMap`](crate::QueryMap), and this handler only
//! formats the body.

use crate::{Request, Response};

/// Greeting handler: `Hello {name}!` from a named query parameter.
///
/// The parameter defaults to `name` and the fallback to `Anonymous`; when
/// the key repeats, the first value wins.
#[derive(Debug, Clone)]
pub struct Greeting {
    param: String,
    fallback: String,
}

impl Default for Greeting {
    fn default() -> Self {
        Self {
            param: "name".to_string(),
            fallback: "Anonymous".to_string(),
        }
    }
}

impl Greeting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query parameter to greet by
    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    /// Name used when the parameter is absent
    pub fn fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Format the greeting for a request
    pub fn respond(&self, req: &Request) -> Response {
        let params = req.query_params();
        let name = params.first(&self.param).unwrap_or(&self.fallback);
        Response::text(format!("Hello {name}!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Method, RequestBuilder, StatusCode};

    #[test]
    fn greets_anonymous_without_query() {
        let req = RequestBuilder::new(Method::Get, "/api/hello").build();
        let res = Greeting::default().respond(&req);
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body_string().unwrap(), "Hello Anonymous!");
    }

    #[test]
    fn greets_by_name() {
        let req = RequestBuilder::new(Method::Get, "/api/hello")
            .query("name=Marcin")
            .build();
        let res = Greeting::default().respond(&req);
        assert_eq!(res.body_string().unwrap(), "Hello Marcin!");
    }

    #[test]
    fn repeated_name_picks_the_first() {
        let req = RequestBuilder::new(Method::Get, "/api/hello")
            .query("name=A&name=B")
            .build();
        let res = Greeting::default().respond(&req);
        assert_eq!(res.body_string().unwrap(), "Hello A!");
    }

    #[test]
    fn percent_encoded_name_is_decoded() {
        let req = RequestBuilder::new(Method::Get, "/api/hello")
            .query("name=Marcin%20K")
            .build();
        let res = Greeting::default().respond(&req);
        assert_eq!(res.body_string().unwrap(), "Hello Marcin K!");
    }

    #[test]
    fn configurable_param_and_fallback() {
        let greeting = Greeting::new().param("who").fallback("stranger");

        let req = RequestBuilder::new(Method::Get, "/api/hello").build();
        assert_eq!(
            greeting.respond(&req).body_string().unwrap(),
            "Hello stranger!"
        );

        let req = RequestBuilder::new(Method::Get, "/api/hello")
            .query("who=Ada")
            .build();
        assert_eq!(greeting.respond(&req).body_string().unwrap(), "Hello Ada!");
    }
}
