//! HTTP API routes
//!
//! Defines the favorites REST endpoints. Every response body is an
//! [`Envelope`]; failures carry only a `message`.

use crate::constants::api::{FAVORITES_PATH, FAVORITES_SORT_ORDER_PATH};
use crate::constants::messages;
use crate::favorites::store::StoreError;
use crate::favorites::Envelope;
use crate::model::{Coordinates, FavoriteLocation, FavoriteLocationRequest, SortOrderUpdate};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            FAVORITES_PATH,
            get(list_handler).post(add_handler).delete(delete_handler),
        )
        .route(FAVORITES_SORT_ORDER_PATH, patch(sort_order_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn internal(err: crate::error::Error) -> Self {
        tracing::error!("Favorites store failure: {}", err);
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: messages::OPERATION_FAILED.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::Duplicate => StatusCode::CONFLICT,
            StoreError::LimitReached(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::NotFound => StatusCode::NOT_FOUND,
            StoreError::InvalidSortOrder { .. }
            | StoreError::InvalidCoordinates(_)
            | StoreError::MissingDevice => StatusCode::BAD_REQUEST,
        };
        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

/// `?deviceId=..`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceQuery {
    pub device_id: Option<String>,
}

/// `?deviceId=..&latitude=..&longitude=..`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    pub device_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

fn require_device(device_id: Option<String>) -> Result<String, ApiError> {
    device_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::from(StoreError::MissingDevice))
}

/// List a device's favorites in sort order
///
/// GET /api/favorites?deviceId=..
async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<Envelope<Vec<FavoriteLocation>>>, ApiError> {
    let device_id = require_device(query.device_id)?;
    let items = state.store.read().await.list(&device_id);
    Ok(Json(Envelope::new("", items)))
}

/// Add a favorite at the end of the device's list
///
/// POST /api/favorites
async fn add_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FavoriteLocationRequest>,
) -> Result<(StatusCode, Json<Envelope<FavoriteLocation>>), ApiError> {
    let mut store = state.store.write().await;
    let snapshot = store.snapshot();
    let favorite = store.add(&req)?;
    store.save_or_restore(snapshot).map_err(ApiError::internal)?;

    tracing::info!(device = %req.device_id, address = %favorite.address_name, "Favorite added");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(messages::FAVORITE_ADDED, favorite)),
    ))
}

/// Delete the favorite at a coordinate
///
/// DELETE /api/favorites?deviceId=..&latitude=..&longitude=..
async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Envelope<Option<FavoriteLocation>>>, ApiError> {
    let device_id = require_device(query.device_id)?;
    let mut store = state.store.write().await;
    let snapshot = store.snapshot();
    let removed = store
        .remove(&device_id, Coordinates::new(query.latitude, query.longitude))
        .ok_or(StoreError::NotFound)?;
    store.save_or_restore(snapshot).map_err(ApiError::internal)?;

    tracing::info!(device = %device_id, address = %removed.address_name, "Favorite deleted");
    Ok(Json(Envelope::new(messages::FAVORITE_DELETED, Some(removed))))
}

/// Overwrite one favorite's sort order
///
/// PATCH /api/favorites/sort-order
async fn sort_order_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SortOrderUpdate>,
) -> Result<Json<Envelope<Option<FavoriteLocation>>>, ApiError> {
    let device_id = require_device(Some(req.device_id))?;
    let mut store = state.store.write().await;
    let snapshot = store.snapshot();
    store.set_sort_order(
        &device_id,
        Coordinates::new(req.latitude, req.longitude),
        req.sort_order,
    )?;
    store.save_or_restore(snapshot).map_err(ApiError::internal)?;

    tracing::debug!(device = %device_id, sort_order = req.sort_order, "Sort order updated");
    Ok(Json(Envelope::new("", None)))
}
