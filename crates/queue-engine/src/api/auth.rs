//! Session endpoints
//!
//! Obtaining a principal is the one flow open to unauthenticated callers.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use clinic_staff_core::Error as StaffError;
use serde::Deserialize;
use serde_json::json;

use crate::api::{principal_from_headers, AppState};
use crate::error::QueueError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn map_staff_error(e: StaffError) -> QueueError {
    match e {
        StaffError::InvalidCredentials | StaffError::AccountDisabled | StaffError::InvalidToken(_) => {
            QueueError::Unauthenticated
        }
        StaffError::StaffNotFound(_) => QueueError::NotFound("Staff".to_string()),
        StaffError::Database(e) => QueueError::Database(e),
        other => QueueError::Internal(other.to_string()),
    }
}

/// `POST /api/auth/login`: exchange credentials for a session token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, QueueError> {
    let result = state
        .auth
        .login(body.email.trim(), &body.password)
        .await
        .map_err(map_staff_error)?;

    Ok(Json(json!({
        "token": result.token,
        "staff": result.staff,
    })))
}

/// `GET /api/auth/me`: the staff record behind the presented token
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, QueueError> {
    let principal = principal_from_headers(&state, &headers)?;
    let staff = state
        .auth
        .staff_for(&principal)
        .await
        .map_err(map_staff_error)?;

    Ok(Json(staff))
}
