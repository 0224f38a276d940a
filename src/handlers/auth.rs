use axum::{Json, extract::State};
use chrono::Utc;

use crate::{
    auth::issue_token,
    config::AppConfig,
    error::{AppError, ErrorBody},
    extract::ApiJson,
    guard::validate_email,
    models::{TokenRequest, TokenResponse},
};

/// issue_jwt
///
/// [Public Route] Exchanges an identity-provider-verified email for the API
/// bearer token (HS256, seven days).
#[utoipa::path(
    post,
    path = "/api/v1/auth/jwt",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid email", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn issue_jwt(
    State(config): State<AppConfig>,
    ApiJson(payload): ApiJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = payload.email.trim();
    validate_email(email)?;

    let token = issue_token(email, &config.jwt_secret, Utc::now())?;
    tracing::debug!(email = %email, "issued bearer token");

    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}
