use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::domain::{Decimal, Shop, ShopDraft};
use crate::error::AppError;

/// Create the caller's shop. Each owner may have exactly one.
pub async fn create_shop(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(draft): Json<ShopDraft>,
) -> Result<(StatusCode, Json<Shop>), AppError> {
    if draft.name.trim().is_empty() {
        return Err(AppError::BadRequest("shop name is required".to_string()));
    }

    let shop = draft.into_shop(auth.email, Utc::now());
    if !state.repo.create_shop(&shop).await? {
        return Err(AppError::Forbidden(
            "you can not create more than one shop".to_string(),
        ));
    }

    info!(shop_id = %shop.id, owner = %shop.owner_email, "Shop created");
    Ok((StatusCode::CREATED, Json(shop)))
}

pub async fn get_my_shop(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Shop>, AppError> {
    state
        .repo
        .shop_for_owner(&auth.email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("you do not have a shop".to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncreaseLimitRequest {
    pub limit_increase: i64,
    /// Amount paid for the upgrade; credited to the admin account.
    pub price: Decimal,
}

/// Raise the caller's product limit after a paid upgrade.
pub async fn increase_product_limit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<IncreaseLimitRequest>,
) -> Result<Json<Shop>, AppError> {
    if body.limit_increase <= 0 {
        return Err(AppError::BadRequest(
            "limitIncrease must be positive".to_string(),
        ));
    }
    if body.price.is_negative() {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }
    let price_cents = body
        .price
        .to_minor_units()
        .ok_or_else(|| AppError::BadRequest("price is out of range".to_string()))?;

    state
        .repo
        .increase_product_limit(
            &auth.email,
            body.limit_increase,
            &state.config.admin_email,
            price_cents,
        )
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("you do not have a shop".to_string()))
}
