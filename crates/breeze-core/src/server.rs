//! Request entry point
//!
//! Binds registered paths to handler functions, accepts connections, and
//! passes each request through the middleware chain and route dispatch.
//! State is sealed before serving and shared read-only across connection
//! tasks, so request handling takes no locks.

use crate::router::{RouteOutcome, Router};
use crate::{
    Error, Method, Middleware, MiddlewareChain, Request, Response, ResponseBuilder, Result,
    StatusCode,
};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub hostname: String,
    pub port: u16,
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_string(),
            port: 3000,
            workers: num_cpus::get(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.hostname, self.port).parse().map_err(|_| {
            Error::Internal(format!(
                "invalid listen address {}:{}",
                self.hostname, self.port
            ))
        })
    }
}

/// Boxed asynchronous route handler
pub type Handler = Arc<
    dyn Fn(Request) -> Pin<Box<dyn Future<Output = Result<Response>> + Send>> + Send + Sync,
>;

/// Box an async function or closure into a [`Handler`]
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    Arc::new(move |req| Box::pin(f(req)))
}

/// Server state shared across all connections.
///
/// Routes and middleware are registered before serving; afterwards the
/// state is immutable behind an `Arc` and needs no synchronization.
pub struct ServerState {
    router: Router<Handler>,
    middleware: MiddlewareChain,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            middleware: MiddlewareChain::new(),
        }
    }

    /// Register a handler for a method and path
    pub fn route(&mut self, method: Method, path: &str, handler: Handler) -> Result<()> {
        self.router.route(method, path, handler)
    }

    /// Register a GET handler
    pub fn get(&mut self, path: &str, handler: Handler) -> Result<()> {
        self.route(Method::Get, path, handler)
    }

    /// Register a POST handler
    pub fn post(&mut self, path: &str, handler: Handler) -> Result<()> {
        self.route(Method::Post, path, handler)
    }

    /// Attach a middleware; `before` hooks run in attach order
    pub fn middleware<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middleware.add(middleware);
    }

    /// Run one request through the full pipeline:
    /// middleware `before` -> dispatch -> handler -> middleware `after`.
    pub async fn handle(&self, mut req: Request) -> Response {
        if let Some(early) = self.middleware.run_before(&mut req) {
            tracing::debug!(
                method = %req.method,
                path = %req.path,
                status = early.status.as_u16(),
                "request intercepted"
            );
            return early;
        }

        let mut res = match self.router.dispatch(req.method, &req.path) {
            RouteOutcome::Matched { value, params } => {
                req.params = params;
                match value(req.clone()).await {
                    Ok(res) => res,
                    Err(err) => {
                        tracing::error!(
                            method = %req.method,
                            path = %req.path,
                            error = %err,
                            "handler failed"
                        );
                        error_response(&err)
                    }
                }
            }
            RouteOutcome::MethodNotAllowed { allow } => Response::method_not_allowed(&allow),
            RouteOutcome::NotFound => Response::not_found(),
        };

        self.middleware.run_after(&req, &mut res);
        tracing::debug!(
            method = %req.method,
            path = %req.path,
            status = res.status.as_u16(),
            "request served"
        );
        res
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an error to its HTTP surface; anything unmapped is a generic 500
fn error_response(err: &Error) -> Response {
    let status = err.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        Response::internal_error("Internal Server Error")
    } else {
        ResponseBuilder::new(status).build()
    }
}

/// Create a TCP listener socket with the usual server options
pub fn create_listener_socket(addr: &SocketAddr) -> Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to an address in TIME_WAIT
    socket.set_reuse_address(true)?;

    // SO_REUSEPORT - kernel load balancing across processes
    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    // TCP_NODELAY - disable Nagle's algorithm
    socket.set_nodelay(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;

    Ok(socket)
}

/// Convert collected hyper request parts to our Request type.
///
/// An unrecognized method token is an error; the caller maps it to 405.
pub fn from_hyper_parts(parts: http::request::Parts, body: Bytes) -> Result<Request> {
    let method: Method = parts.method.as_str().parse()?;
    let path = parts.uri.path().to_string();

    let mut request = Request::new(method, path);
    request.query = parts.uri.query().map(|s| s.to_string());
    request.body = body;

    for (name, value) in &parts.headers {
        if let Ok(v) = value.to_str() {
            request.headers.push((name.to_string(), v.to_string()));
        }
    }

    Ok(request)
}

/// Convert our Response to a hyper response
pub fn to_hyper_response(res: Response) -> hyper::Response<Full<Bytes>> {
    let mut builder = hyper::Response::builder().status(res.status.as_u16());

    for (name, value) in &res.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder.body(Full::new(res.body)).unwrap_or_else(|_| {
        let mut fallback = hyper::Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

async fn serve_request(state: Arc<ServerState>, hreq: hyper::Request<Incoming>) -> Response {
    let (parts, body) = hreq.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            tracing::debug!(error = %err, "failed to read request body");
            return Response::internal_error("Internal Server Error");
        }
    };

    match from_hyper_parts(parts, body) {
        Ok(req) => state.handle(req).await,
        Err(err) => error_response(&err),
    }
}

/// Accept connections and serve requests until the task is dropped.
///
/// Each connection runs http1 in its own task; request handling reads the
/// shared state only.
pub async fn serve(state: Arc<ServerState>, config: &ServerConfig) -> Result<()> {
    let addr = config.addr()?;
    let socket = create_listener_socket(&addr)?;
    socket.set_nonblocking(true)?;
    let listener = TcpListener::from_std(socket.into())?;
    tracing::info!(%addr, "listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = hyper::service::service_fn(move |hreq: hyper::Request<Incoming>| {
                let state = Arc::clone(&state);
                async move {
                    Ok::<_, std::convert::Infallible>(to_hyper_response(
                        serve_request(state, hreq).await,
                    ))
                }
            });

            if let Err(err) = hyper::server::conn::http1::Builder::new()
                .serve_connection(io, service)
                .await
            {
                tracing::debug!(%peer, error = %err, "connection closed with error");
            }
        });
    }
}
