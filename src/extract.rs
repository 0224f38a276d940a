use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// ApiJson
///
/// `axum::Json` with its rejection mapped onto `AppError`, so a malformed body
/// answers with the JSON envelope instead of axum's plain-text 400/422.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// ApiQuery
///
/// Same treatment for query strings.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
