//! Queue Routes

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::domain::ItemId;

use super::error::ApiError;
use super::request::{IdsRequest, JsonBody};
use super::AppState;

#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub accepted: Vec<ItemId>,
}

#[derive(Debug, Serialize)]
pub struct QueueStatusResponse {
    pub size: usize,
}

/// POST /api/queue/add
pub async fn add_to_queue(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<AcceptedResponse>, ApiError> {
    let request = IdsRequest::from_body(&body, false)?;
    let accepted = state.store.enqueue_add(&request.ids).await;

    Ok(Json(AcceptedResponse { accepted }))
}

/// GET /api/queue
pub async fn queue_status(State(state): State<AppState>) -> Json<QueueStatusResponse> {
    Json(QueueStatusResponse {
        size: state.store.queue_size().await,
    })
}
