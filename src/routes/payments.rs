use axum::{Router, routing::post};

use crate::{AppState, handlers::payments};

/// Payment Router
pub fn payment_routes() -> Router<AppState> {
    Router::new().route(
        "/payments/create-payment-intent",
        post(payments::create_payment_intent),
    )
}
