use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::{
    db,
    error::{AppError, AppResult},
    models::{CreateIceCream, IceCream, UpdateIceCream},
    AppState,
};

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_ice_cream(
    State(state): State<AppState>,
    payload: Result<Json<CreateIceCream>, JsonRejection>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    // A missing or malformed body is a client error, not a 422/500.
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    if payload.price < 0.0 {
        return Err(AppError::BadRequest("price must be >= 0".to_string()));
    }

    let ice_cream = db::insert_ice_cream(&state.db, &payload)
        .await
        .map_err(AppError::into_bad_request)?;

    info!(id = ice_cream.id, name = %ice_cream.name, "Created ice cream");

    Ok((StatusCode::CREATED, Json(json!({ "id": ice_cream.id }))))
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_ice_creams(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<IceCream>>)> {
    let ice_creams = db::fetch_all_ice_creams(&state.db).await?;

    info!(count = ice_creams.len(), "Listed ice creams");

    Ok((StatusCode::OK, Json(ice_creams)))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_ice_cream(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateIceCream>, JsonRejection>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    db::update_ice_cream(&state.db, id, &payload)
        .await
        .map_err(AppError::into_bad_request)?;

    info!(id, "Updated ice cream");

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Updated successfully" })),
    ))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_ice_cream(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    db::delete_ice_cream(&state.db, id)
        .await
        .map_err(AppError::into_bad_request)?;

    info!(id, "Deleted ice cream");

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Deleted successfully" })),
    ))
}
