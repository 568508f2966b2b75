//! Minimal cryptographic utilities
//!
//! Only what the credential gate needs; no external dependencies.

pub mod base64;

pub use base64::{base64_decode, base64_encode};
