use axum::{Json, http::Uri};
use bson::oid::ObjectId;
use serde::Serialize;

use crate::{error::AppError, models::HealthResponse};

pub mod analytics;
pub mod applications;
pub mod auth;
pub mod payments;
pub mod reviews;
pub mod scholarships;
pub mod users;

/// Parses a path identifier, answering 400 when it is not a valid ObjectId.
pub(crate) fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::validation(format!("Invalid id: {raw}")))
}

/// Rejects a PATCH body that sets nothing.
pub(crate) fn ensure_patch_not_empty<T: Serialize>(patch: &T) -> Result<(), AppError> {
    let empty = match serde_json::to_value(patch) {
        Ok(serde_json::Value::Object(fields)) => fields.is_empty(),
        _ => true,
    };
    if empty {
        Err(AppError::validation("No updatable fields provided"))
    } else {
        Ok(())
    }
}

/// root
///
/// Plain-text liveness probe.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Server is running", body = String)),
    tag = "health"
)]
pub async fn root() -> &'static str {
    "ScholarStream server is running"
}

/// health
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Health check", body = HealthResponse)),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "ScholarStream API is healthy".to_string(),
    })
}

/// not_found
///
/// Router fallback. Unknown routes still answer with the JSON envelope.
pub async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "no route matched");
    AppError::not_found("Route not found")
}
