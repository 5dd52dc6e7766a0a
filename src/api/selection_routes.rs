//! Selection Routes
//!
//! Reads always return the committed selection. Updates are staged for the
//! next commit tick; removals apply immediately.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::domain::{RemovalOutcome, Selection};

use super::error::ApiError;
use super::request::{IdsRequest, JsonBody, UpdateSelectionRequest};
use super::AppState;

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub outcome: RemovalOutcome,
}

/// GET /api/selection
pub async fn get_selection(State(state): State<AppState>) -> Json<Selection> {
    Json(state.store.selection().await)
}

/// POST /api/selection/update
pub async fn update_selection(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<OkResponse>, ApiError> {
    let request = UpdateSelectionRequest::from_body(&body)?;
    state.store.stage_selection(request.selection).await;

    Ok(Json(OkResponse { ok: true }))
}

/// POST /api/selection/remove
pub async fn remove_from_selection(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<RemoveResponse>, ApiError> {
    let request = IdsRequest::from_body(&body, true)?;
    let outcome = state.store.remove_from_selection(&request.ids).await;

    Ok(Json(RemoveResponse { ok: true, outcome }))
}
