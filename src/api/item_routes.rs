//! Item Routes
//!
//! Catalog listing and batch lookup.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::domain::Item;
use crate::repository::ItemPage;

use super::error::ApiError;
use super::request::{list_query_from_pairs, IdsRequest, JsonBody};
use super::AppState;

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}

/// GET /api/items
pub async fn list_items(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ItemPage>, ApiError> {
    let Query(pairs) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let query = list_query_from_pairs(&pairs)?;

    Ok(Json(state.store.list_items(&query).await))
}

/// POST /api/items/batch
pub async fn get_items_batch(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Json<ItemsResponse>, ApiError> {
    let request = IdsRequest::from_body(&body, true)?;
    let items = state.store.get_items_by_ids(&request.ids).await;

    Ok(Json(ItemsResponse { items }))
}
