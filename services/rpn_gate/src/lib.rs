pub mod api;
pub mod config;
pub mod error;

use axum::{
    extract::Request,
    http::header,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use config::{GateConfig, StoreKind};
use error::AppError;
use rpn_store::{FileStore, MemoryStore, StackStore, StoreError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Max request body size: 64 KiB
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StackStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn StackStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

pub async fn open_store(kind: &StoreKind) -> Result<Arc<dyn StackStore>, StoreError> {
    let store: Arc<dyn StackStore> = match kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::File(path) => Arc::new(FileStore::open(path.clone()).await?),
    };
    Ok(store)
}

pub fn app(state: AppState, cfg: &GateConfig) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/rpn/op", get(api::list_operators))
        .route("/rpn/op/:op/stack/:id", post(api::apply_operator))
        .route("/rpn/stack", get(api::list_stacks).post(api::create_stack))
        .route(
            "/rpn/stack/:id",
            get(api::get_stack)
                .post(api::update_stack)
                .delete(api::delete_stack),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(cfg.request_timeout))
        .layer(middleware::from_fn(require_json_content_type))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Middleware: reject POST/PUT/PATCH requests that carry a body without an
/// application/json content-type. Bodiless POSTs (operator application) pass.
async fn require_json_content_type(req: Request, next: Next) -> Response {
    let needs_json = matches!(req.method().as_str(), "POST" | "PUT" | "PATCH") && has_body(&req);
    if needs_json {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);
        if !is_json {
            return AppError::unsupported_media_type().into_response();
        }
    }
    next.run(req).await
}

fn has_body(req: &Request) -> bool {
    match req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
    {
        Some(len) => len > 0,
        None => req.headers().contains_key(header::TRANSFER_ENCODING),
    }
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({"ok": true}))
}

pub mod test {
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    /// Spawn the server on a random port with an in-memory store. Returns the
    /// address and a JoinHandle that keeps the server alive until dropped.
    pub async fn spawn() -> (SocketAddr, tokio::task::JoinHandle<()>) {
        spawn_with(super::AppState::in_memory()).await
    }

    pub async fn spawn_with(state: super::AppState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let app = super::app(state, &super::GateConfig::default());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, handle)
    }
}
