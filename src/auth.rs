use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::Role};

/// Tokens stay valid for seven days.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Claims
///
/// Payload of the API bearer token. The email is the caller's identity; the
/// role is never embedded and is always read from the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub email: String,
    /// Issued At (iat), seconds since the epoch.
    pub iat: usize,
    /// Expiration Time (exp), seconds since the epoch.
    pub exp: usize,
}

/// issue_token
///
/// Signs an HS256 token for `email`, valid from `now` for `TOKEN_TTL_SECS`.
pub fn issue_token(email: &str, secret: &str, now: DateTime<Utc>) -> Result<String, AppError> {
    let iat = now.timestamp();
    let claims = Claims {
        email: email.to_string(),
        iat: iat.max(0) as usize,
        exp: (iat + TOKEN_TTL_SECS).max(0) as usize,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// bearer_token
///
/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Unauthorized: no token provided"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Unauthorized: malformed authorization header"))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| AppError::unauthorized("Unauthorized: expected a Bearer token"))?;

    if token.is_empty() {
        return Err(AppError::unauthorized("Unauthorized: no token provided"));
    }
    Ok(token)
}

/// verify_token
///
/// Checks the signature and expiry of `token` against `secret` and returns its
/// claims. Every failure is a 401.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized("Unauthorized: token expired"),
        _ => AppError::unauthorized("Unauthorized: invalid token"),
    })
}

/// Token Verifier entry point used by the policy middleware.
pub fn verify_bearer(headers: &HeaderMap, secret: &str) -> Result<Claims, AppError> {
    verify_token(bearer_token(headers)?, secret)
}

/// Caller
///
/// The verified identity of the current request, inserted into the request
/// extensions by `policy::authorize`. `role` is `None` when the token is valid
/// but no user record exists yet for its email.
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    pub email: String,
    pub role: Option<Role>,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_some_and(Role::is_staff)
    }

    pub fn owns(&self, email: &str) -> bool {
        self.email == email
    }
}

/// Handlers take `Caller` as an ordinary argument. A route that was not run
/// through the policy middleware has no caller and is rejected with 401.
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Unauthorized: no verified caller"))
    }
}
