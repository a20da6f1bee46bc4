use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::domain::{Product, ProductDraft, ProductPatch};
use crate::error::AppError;

pub async fn list_products(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.repo.products_for_owner(&auth.email).await?))
}

/// Add a product to the caller's shop, pricing it from cost and margin.
///
/// 404 without a shop, 403 once the shop's product limit is reached.
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let shop = state
        .repo
        .shop_for_owner(&auth.email)
        .await?
        .ok_or_else(|| AppError::NotFound("create a shop before adding products".to_string()))?;

    let product = draft.into_product(&shop.id, &auth.email, Utc::now())?;
    if !state.repo.insert_product_within_limit(&product).await? {
        return Err(AppError::Forbidden(format!(
            "product limit of {} reached, upgrade to add more",
            shop.product_limit
        )));
    }

    info!(
        product_id = %product.id,
        shop_id = %shop.id,
        selling_price = %product.selling_price,
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    state
        .repo
        .get_owned_product(&id, &auth.email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {} not found", id)))
}

/// Edit one of the caller's products. The selling price is always recomputed.
pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, AppError> {
    let mut product = state
        .repo
        .get_owned_product(&id, &auth.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {} not found", id)))?;

    let quantity_override = patch.quantity;
    product.apply_patch(patch)?;

    if !state.repo.update_product(&product, quantity_override).await? {
        return Err(AppError::NotFound(format!("product {} not found", id)));
    }

    // Re-read so concurrently applied sales show in the response.
    let stored = state
        .repo
        .get_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {} not found", id)))?;
    info!(product_id = %id, selling_price = %stored.selling_price, "Product updated");
    Ok(Json(stored))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted_count = state.repo.delete_product(&id).await?;
    if deleted_count > 0 {
        info!(product_id = %id, "Product deleted");
    }
    Ok(Json(DeleteResponse { deleted_count }))
}
