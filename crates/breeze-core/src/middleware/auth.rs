//! Basic authentication credential gate
//!
//! Intercepts a request before its handler: a missing `Authorization`
//! header, an unparseable header, or rejected credentials all end the
//! request with 401 and the handler is never invoked. The verification
//! itself is injectable, so the hardcoded single-pair setup of the demo
//! can be swapped for a real credential store without touching gate logic.

use super::Middleware;
use crate::crypto::{base64_decode, base64_encode};
use crate::{Request, Response, ResponseBuilder, StatusCode};

/// Credentials carried by a `Basic` Authorization header
#[derive(Debug, Clone, PartialEq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Parse from an Authorization header value.
    ///
    /// Expects scheme `Basic` followed by base64 of `username:password`;
    /// anything else is `None`.
    pub fn parse(header: &str) -> Option<Self> {
        let payload = header.strip_prefix("Basic ")?;
        let decoded = String::from_utf8(base64_decode(payload)?).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Encode to an Authorization header value
    pub fn encode(&self) -> String {
        let combined = format!("{}:{}", self.username, self.password);
        format!("Basic {}", base64_encode(combined.as_bytes()))
    }
}

/// A fixed username/password pair.
///
/// Comparison is verbatim: case-sensitive, byte-for-byte, and NOT
/// constant-time. Fine for a demo credential, not for production secrets.
#[derive(Debug, Clone)]
pub struct CredentialPair {
    username: String,
    password: String,
}

impl CredentialPair {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Basic authentication middleware with an injectable verifier
pub struct BasicAuth<F>
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    realm: String,
    verify: F,
}

impl<F> BasicAuth<F>
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    pub fn new(realm: impl Into<String>, verify: F) -> Self {
        Self {
            realm: realm.into(),
            verify,
        }
    }

    fn unauthorized_response(&self) -> Response {
        ResponseBuilder::new(StatusCode::UNAUTHORIZED)
            .header("WWW-Authenticate", format!("Basic realm=\"{}\"", self.realm))
            .body("Unauthorized")
            .build()
    }
}

impl BasicAuth<Box<dyn Fn(&str, &str) -> bool + Send + Sync>> {
    /// Gate guarding a single fixed credential pair
    pub fn single_user(realm: impl Into<String>, pair: CredentialPair) -> Self {
        Self::new(realm, Box::new(move |u, p| pair.matches(u, p)))
    }
}

impl<F> Middleware for BasicAuth<F>
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn before(&self, req: &mut Request) -> Option<Response> {
        // Absent header rejects immediately; the handler must not run
        let creds = match req.header("authorization") {
            Some(header) => BasicCredentials::parse(header),
            None => return Some(self.unauthorized_response()),
        };

        match creds {
            Some(c) if (self.verify)(&c.username, &c.password) => {
                req.auth_user = Some(c.username);
                None
            }
            _ => Some(self.unauthorized_response()),
        }
    }
}
