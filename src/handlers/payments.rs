use axum::{Json, extract::State};

use crate::{
    auth::Caller,
    error::{AppError, ErrorBody},
    extract::ApiJson,
    models::{PaymentIntentRequest, PaymentIntentResponse},
    payments::{PaymentState, to_minor_units},
};

const CURRENCY: &str = "usd";

/// create_payment_intent
///
/// [Authenticated Route] Opens a card payment intent for `amount` dollars and
/// hands the client secret back to the browser.
#[utoipa::path(
    post,
    path = "/api/v1/payments/create-payment-intent",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, description = "Payment intent created", body = PaymentIntentResponse),
        (status = 400, description = "Invalid amount", body = ErrorBody),
        (status = 500, description = "Processor failure", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "payments"
)]
pub async fn create_payment_intent(
    caller: Caller,
    State(gateway): State<PaymentState>,
    ApiJson(payload): ApiJson<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    let amount_cents = to_minor_units(payload.amount)?;

    let intent = gateway.create_payment_intent(amount_cents, CURRENCY).await?;
    tracing::info!(email = %caller.email, amount_cents, "payment intent issued");

    Ok(Json(PaymentIntentResponse {
        success: true,
        client_secret: intent.client_secret,
    }))
}
