//! Hello endpoint behind a Basic-auth gate.
//!
//! ```sh
//! cargo run --example hello
//! curl -u admin:admin 'http://127.0.0.1:3000/api/hello?name=Marcin'
//! ```

use breeze_core::middleware::auth::{BasicAuth, CredentialPair};
use breeze_core::{handler, serve, Greeting, ServerConfig, ServerState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> breeze_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig {
        hostname: "127.0.0.1".to_string(),
        ..ServerConfig::default()
    };

    let mut state = ServerState::new();
    state.middleware(BasicAuth::single_user(
        "api",
        CredentialPair::new("admin", "admin"),
    ));

    let greeting = Greeting::default();
    state.get(
        "/api/hello",
        handler(move |req| {
            let greeting = greeting.clone();
            async move { Ok(greeting.respond(&req)) }
        }),
    )?;

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()?
        .block_on(serve(Arc::new(state), &config))
}
