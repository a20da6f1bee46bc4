use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::domain::Decimal;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
    pub payment_intent_id: String,
}

/// Create a card payment intent for `price` in the configured currency.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    let amount_minor = body
        .price
        .to_minor_units()
        .filter(|amount| *amount > 0)
        .ok_or_else(|| AppError::BadRequest("price must be positive".to_string()))?;

    let intent = state
        .payments
        .create_intent(amount_minor, &state.config.payment_currency)
        .await?;

    info!(
        email = %auth.email,
        intent_id = %intent.id,
        amount_minor,
        "Payment intent created"
    );
    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
        payment_intent_id: intent.id,
    }))
}
