use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::auth::AuthUser;
use crate::domain::SaleLine;
use crate::error::AppError;
use crate::orchestration::CheckoutReport;

/// Check out the caller's cart.
///
/// Responds 200 with per-line outcomes even when some inventory or cart
/// updates failed. Only a failed sale commit is an error.
pub async fn checkout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CheckoutReport>, AppError> {
    let lines = state.repo.cart_lines(&auth.email).await?;
    let seller_name = state
        .repo
        .get_user(&auth.email)
        .await?
        .and_then(|user| user.name);

    let report = state
        .checkout
        .checkout(&auth.email, seller_name.as_deref(), lines)
        .await?;
    Ok(Json(report))
}

/// Sale history of the caller's shop, newest first.
pub async fn list_sales(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SaleLine>>, AppError> {
    let shop = state
        .repo
        .shop_for_owner(&auth.email)
        .await?
        .ok_or_else(|| AppError::NotFound("you do not have a shop".to_string()))?;
    Ok(Json(state.repo.sales_for_shop(&shop.id).await?))
}
