use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::api::AppState;
use crate::domain::Decimal;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct IncreaseIncomeRequest {
    pub amount: Decimal,
}

/// Credit the platform admin's income.
pub async fn increase_income(
    State(state): State<AppState>,
    Json(body): Json<IncreaseIncomeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.amount.is_negative() || body.amount.is_zero() {
        return Err(AppError::BadRequest("amount must be positive".to_string()));
    }
    let cents = body
        .amount
        .to_minor_units()
        .ok_or_else(|| AppError::BadRequest("amount is out of range".to_string()))?;

    let admin = &state.config.admin_email;
    if !state.repo.credit_admin_income(admin, cents).await? {
        return Err(AppError::Internal(format!(
            "admin account {} is missing",
            admin
        )));
    }

    info!(amount_cents = cents, "Admin income credited");
    Ok(Json(serde_json::json!({"modifiedCount": 1})))
}
