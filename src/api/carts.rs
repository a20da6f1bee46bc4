use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::domain::CartLine;
use crate::error::AppError;

pub async fn list_cart(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<CartLine>>, AppError> {
    Ok(Json(state.repo.cart_lines(&auth.email).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
}

/// Add one unit of one of the caller's products to their cart.
///
/// The product's current cost and price are frozen on the first add.
pub async fn add_to_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartLine>, AppError> {
    let product = state
        .repo
        .get_product(&body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {} not found", body.product_id)))?;

    if product.owner_email != auth.email {
        return Err(AppError::Forbidden(
            "products can only be sold by their shop owner".to_string(),
        ));
    }

    let line = CartLine::snapshot(&auth.email, &product, Utc::now());
    Ok(Json(state.repo.upsert_cart_line(&line).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
    pub deleted_count: u64,
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(product_id): Path<String>,
) -> Result<Json<RemoveResponse>, AppError> {
    let deleted_count = state.repo.remove_cart_line(&auth.email, &product_id).await?;
    Ok(Json(RemoveResponse { deleted_count }))
}
