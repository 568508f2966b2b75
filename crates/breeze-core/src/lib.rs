//! breeze-core: hand-rolled REST endpoints over hyper
//!
//! The pieces a web framework would normally hand you, built directly on
//! the HTTP server primitive instead: a route registry with per-verb
//! dispatch (405 for a known path with the wrong verb), reusable query
//! string parsing into a key -> ordered-values map, and a Basic-auth
//! credential gate with an injectable verifier.
//!
//! Route bindings and middleware are registered once at startup; request
//! handling is read-only and lock-free.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod crypto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

// Re-exports
pub use error::{Error, Result};
pub use query::QueryMap;
pub use request::{Method, Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, StatusCode};
pub use router::{RouteOutcome, Router};

// Middleware re-exports
pub use middleware::{BasicAuth, BasicCredentials, CredentialPair, Middleware, MiddlewareChain};

// Handlers re-exports
pub use handlers::Greeting;

// Server re-exports
pub use server::{handler, serve, Handler, ServerConfig, ServerState};
