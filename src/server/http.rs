//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling.

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Args;
use crate::lists::{ListResolver, MutationService, TodoStore};
use crate::routes;
use crate::types::TodoError;
use crate::views::{HtmlRenderer, ListRenderer};

/// Largest request body accepted; forms here are a few short fields
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Name resolution and lazy creation
    pub resolver: ListResolver,
    /// Item add/delete
    pub mutations: MutationService,
    /// Page renderer
    pub renderer: Arc<dyn ListRenderer>,
    pub started_at: Instant,
}

impl AppState {
    /// Create AppState over a store with the built-in HTML renderer
    pub fn new(args: Args, store: Arc<dyn TodoStore>) -> Self {
        Self::with_renderer(args, store, Arc::new(HtmlRenderer))
    }

    /// Create AppState with a custom renderer
    pub fn with_renderer(
        args: Args,
        store: Arc<dyn TodoStore>,
        renderer: Arc<dyn ListRenderer>,
    ) -> Self {
        let resolver = ListResolver::new(store, args.default_list.clone());
        let mutations = MutationService::new(resolver.clone());
        Self {
            args,
            resolver,
            mutations,
            renderer,
            started_at: Instant::now(),
        }
    }
}

/// Start the HTTP server. Returns after Ctrl-C.
pub async fn run(state: Arc<AppState>) -> Result<(), TodoError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Todolist listening on {} (store: {})",
        state.args.listen,
        state.resolver.store().backend()
    );

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = service_fn(move |req| {
                            let state = Arc::clone(&state);
                            async move { handle_request(state, addr, req).await }
                        });

                        if let Err(err) = http1::Builder::new()
                            .serve_connection(io, service)
                            .await
                        {
                            error!("Error serving connection from {}: {:?}", addr, err);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {:?}", e);
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                return Ok(());
            }
        }
    }
}

/// Collect the body and dispatch
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    let body = match read_body(req.into_body(), MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(status) => {
            debug!("Rejected body from {}: {}", addr, status);
            return Ok(routes::error_page(status));
        }
    };

    Ok(route(state, method, &path, body).await)
}

/// Collect at most `limit` bytes of a body
async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, StatusCode>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(StatusCode::PAYLOAD_TOO_LARGE),
        Err(_) => Err(StatusCode::BAD_REQUEST),
    }
}

/// Route a request with an already-collected body
pub async fn route(
    state: Arc<AppState>,
    method: Method,
    path: &str,
    body: Bytes,
) -> Response<Full<Bytes>> {
    match (method, path) {
        (Method::GET, "/healthz") => routes::health_check(&state),

        (Method::GET, "/") => routes::handle_show_list(state, None).await,
        (Method::POST, "/") => routes::handle_add_item(state, body).await,
        (Method::POST, "/delete") => routes::handle_delete_item(state, body).await,

        // Browsers ask for this unprompted; it must not become a list
        (Method::GET, "/favicon.ico") => routes::error_page(StatusCode::NOT_FOUND),

        (Method::GET, p) => match list_segment(p) {
            Some(segment) => routes::handle_show_list(state, Some(segment)).await,
            None => routes::error_page(StatusCode::NOT_FOUND),
        },

        (_, "/") | (_, "/delete") => routes::error_page(StatusCode::METHOD_NOT_ALLOWED),
        _ => routes::error_page(StatusCode::NOT_FOUND),
    }
}

/// The `{name}` of `/{name}` or `/{name}/`; `None` for deeper paths
fn list_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('/')?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() || rest.contains('/') {
        None
    } else {
        Some(rest)
    }
}
