//! REST API for the clinic queue service
//!
//! Thin route handlers over the queue engine. Every handler authenticates
//! the bearer token into a principal first; the mutating handlers then apply
//! the role policy before touching the engine. That check-before-call is the
//! caller contract the engine relies on: the engine itself never re-checks
//! roles, and a mutating route without a policy check is a defect.

pub mod appointments;
pub mod auth;

use std::sync::Arc;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clinic_staff_core::{AuthenticationService, Principal};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::clock::Clock;
use crate::engine::QueueEngine;
use crate::error::QueueError;

/// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueueEngine>,
    pub auth: Arc<AuthenticationService>,
    pub clock: Arc<dyn Clock>,
}

/// Create the REST API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/appointments",
            get(appointments::list).post(appointments::create),
        )
        .route("/api/appointments/:id/reorder", patch(appointments::reorder))
        .route("/api/appointments/:id/promote", patch(appointments::promote))
        .route("/api/appointments/:id", delete(appointments::remove))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for QueueError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            QueueError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            QueueError::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            QueueError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            QueueError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            QueueError::Invalid(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            QueueError::Database(e) => {
                error!("Storage failure surfaced to client: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            QueueError::Internal(e) => {
                error!("Internal failure surfaced to client: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Authenticate the request's bearer token into a principal
pub(crate) fn principal_from_headers(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, QueueError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(QueueError::Unauthenticated)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(QueueError::Unauthenticated)?;

    state
        .auth
        .verify_token(token)
        .map_err(|_| QueueError::Unauthenticated)
}

/// Parse an optional `date` query/body parameter
///
/// Accepts a calendar date (`2024-06-01`) or a full RFC 3339 timestamp;
/// anything else is `Invalid`. Absent means the current day.
pub(crate) fn parse_day_param(
    raw: Option<&str>,
    fallback: DateTime<Utc>,
) -> Result<DateTime<Utc>, QueueError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(fallback);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(QueueError::Invalid(format!("invalid date {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_day_accepts_plain_dates_and_timestamps() {
        let fallback = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        let plain = parse_day_param(Some("2024-03-09"), fallback).unwrap();
        assert_eq!(plain, Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap());

        let stamped = parse_day_param(Some("2024-03-09T15:30:00Z"), fallback).unwrap();
        assert_eq!(stamped, Utc.with_ymd_and_hms(2024, 3, 9, 15, 30, 0).unwrap());

        assert_eq!(parse_day_param(None, fallback).unwrap(), fallback);
        assert_eq!(parse_day_param(Some("  "), fallback).unwrap(), fallback);
    }

    #[test]
    fn parse_day_rejects_garbage() {
        let fallback = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert!(parse_day_param(Some("tomorrow"), fallback).is_err());
        assert!(parse_day_param(Some("2024-13-40"), fallback).is_err());
    }
}
