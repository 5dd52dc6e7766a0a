//! API Layer
//!
//! HTTP handlers that bridge the frontend to the in-memory store.

mod error;
mod item_routes;
mod queue_routes;
mod request;
mod selection_routes;


use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use axum::http::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::repository::MemoryStore;

pub use error::ApiError;
pub use request::{IdsRequest, UpdateSelectionRequest, DEFAULT_LIMIT, MAX_LIMIT};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
}

impl AppState {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

/// Build the full application: `/api` routes plus either the frontend
/// bundle or a plain status message at `/`.
pub fn router(state: AppState, frontend_dist: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/items", get(item_routes::list_items))
        .route("/items/batch", post(item_routes::get_items_batch))
        .route("/queue", get(queue_routes::queue_status))
        .route("/queue/add", post(queue_routes::add_to_queue))
        .route("/selection", get(selection_routes::get_selection))
        .route("/selection/update", post(selection_routes::update_selection))
        .route("/selection/remove", post(selection_routes::remove_from_selection))
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-cache, no-store, must-revalidate"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    PRAGMA,
                    HeaderValue::from_static("no-cache"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    EXPIRES,
                    HeaderValue::from_static("0"),
                )),
        );

    let app = Router::new().nest("/api", api);
    let app = match frontend_dist {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            app.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => app.route("/", get(root)),
    };

    app.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(CorsLayer::permissive()),
    )
    .with_state(state)
}

/// GET /api/health
async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// GET /
async fn root() -> Json<Value> {
    Json(json!({ "message": "Backend server is running" }))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal(detail).into_response()
}
