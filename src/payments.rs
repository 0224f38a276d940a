use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::error::AppError;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// PaymentError
///
/// Failures talking to the payment processor. Surfaced to clients only as a
/// generic 500; the detail goes to the log.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment processor request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("payment processor rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("payment processor secret key is not configured")]
    NotConfigured,

    #[error("simulated payment processor failure")]
    Simulated,
}

/// PaymentIntent
///
/// The part of a processor intent the browser needs to confirm the charge.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

// 1. PaymentGateway Contract
/// PaymentGateway
///
/// Abstract contract for the payment processor, so handlers can be exercised
/// against `MockPaymentGateway` without network access.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a card-only payment intent for `amount_cents` in `currency`.
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}

// 2. The Real Implementation (Stripe REST API)
/// StripeClient
///
/// Calls `POST /v1/payment_intents` with a form-encoded body, authenticated
/// with the secret key as the basic-auth user.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct StripeIntentResponse {
    id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
}

impl StripeClient {
    pub fn new(secret_key: &str) -> Self {
        Self::with_base_url(secret_key, STRIPE_API_BASE)
    }

    pub fn with_base_url(secret_key: &str, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        if self.secret_key.is_empty() {
            return Err(PaymentError::NotConfigured);
        }

        let amount = amount_cents.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", currency),
            ("payment_method_types[]", "card"),
        ];

        let response = self
            .http
            .post(format!("{}/payment_intents", self.base_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StripeErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(PaymentError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let intent: StripeIntentResponse = response.json().await?;
        tracing::info!(intent_id = %intent.id, amount_cents, "payment intent created");

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
        })
    }
}

// 3. The Mock Implementation (For Tests)
/// MockPaymentGateway
///
/// Returns deterministic intents, or a simulated failure when `should_fail` is set.
#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    pub should_fail: bool,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        if self.should_fail {
            return Err(PaymentError::Simulated);
        }

        Ok(PaymentIntent {
            id: format!("pi_mock_{amount_cents}"),
            client_secret: format!("pi_mock_{amount_cents}_secret_{currency}"),
        })
    }
}

/// PaymentState
///
/// Shared handle to the payment gateway held in the application state.
pub type PaymentState = Arc<dyn PaymentGateway>;

/// to_minor_units
///
/// Converts a major-unit amount (dollars) to cents, rounding to the nearest cent.
///
/// # Errors
/// `AppError::Validation` unless the amount is finite and strictly positive.
pub fn to_minor_units(amount: f64) -> Result<i64, AppError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::validation("Amount must be a positive number"));
    }

    let cents = (amount * 100.0).round();
    if cents < 1.0 || cents > i64::MAX as f64 {
        return Err(AppError::validation("Amount is out of range"));
    }
    Ok(cents as i64)
}
