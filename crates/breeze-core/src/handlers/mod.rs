//! Built-in request handlers

pub mod hello;

pub use hello::Greeting;
