//! Queue endpoints

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use clinic_staff_core::rbac;
use serde::Deserialize;
use serde_json::json;

use crate::api::{parse_day_param, principal_from_headers, AppState};
use crate::error::QueueError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub patient_id: String,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub target_index: i64,
}

/// `GET /api/appointments?date=`: both views of a day's queue
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, QueueError> {
    principal_from_headers(&state, &headers)?;

    let day = parse_day_param(params.date.as_deref(), state.clock.now())?;
    let queue = state.engine.list_day(day).await?;
    Ok(Json(queue))
}

/// `POST /api/appointments`: append a walk-in at the tail
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateRequest>,
) -> Result<impl IntoResponse, QueueError> {
    let principal = principal_from_headers(&state, &headers)?;
    if !rbac::can_add_to_queue(Some(&principal)) {
        return Err(QueueError::Forbidden(principal.role.to_string()));
    }

    if body.patient_id.trim().is_empty() {
        return Err(QueueError::Invalid("patient_id is required".to_string()));
    }

    let day = parse_day_param(body.date.as_deref(), state.clock.now())?;
    let entry = state
        .engine
        .insert(day, body.patient_id.trim(), Some(&principal.staff_id))
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// `PATCH /api/appointments/:id/reorder`: move an entry within its day
pub async fn reorder(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ReorderRequest>,
) -> Result<impl IntoResponse, QueueError> {
    let principal = principal_from_headers(&state, &headers)?;
    if !rbac::can_manage_queue(Some(&principal)) {
        return Err(QueueError::Forbidden(principal.role.to_string()));
    }

    if body.target_index < 0 {
        return Err(QueueError::Invalid(
            "target_index must be non-negative".to_string(),
        ));
    }

    let entry = state
        .engine
        .reorder(&id, body.target_index as usize)
        .await?;
    Ok(Json(entry))
}

/// `PATCH /api/appointments/:id/promote`: mark an entry visited
pub async fn promote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, QueueError> {
    let principal = principal_from_headers(&state, &headers)?;
    if !rbac::can_manage_queue(Some(&principal)) {
        return Err(QueueError::Forbidden(principal.role.to_string()));
    }

    let entry = state.engine.promote(&id).await?;
    Ok(Json(entry))
}

/// `DELETE /api/appointments/:id`: drop a still-queued entry
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, QueueError> {
    let principal = principal_from_headers(&state, &headers)?;
    if !rbac::can_manage_queue(Some(&principal)) {
        return Err(QueueError::Forbidden(principal.role.to_string()));
    }

    state.engine.remove(&id).await?;
    Ok(Json(json!({ "success": true })))
}
