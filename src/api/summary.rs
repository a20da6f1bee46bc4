use axum::extract::State;
use axum::Json;
use futures::try_join;

use crate::api::AppState;
use crate::auth::{AdminUser, AuthUser};
use crate::domain::Decimal;
use crate::engine::{lifetime_sales, summarize_shop, AdminSummary, ShopSalesSummary};
use crate::error::AppError;

/// Per-seller revenue for the caller's shop.
pub async fn shop_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ShopSalesSummary>, AppError> {
    let shop = state
        .repo
        .shop_for_owner(&auth.email)
        .await?
        .ok_or_else(|| AppError::NotFound("you do not have a shop".to_string()))?;
    let lines = state.repo.sales_for_shop(&shop.id).await?;
    Ok(Json(summarize_shop(&lines)))
}

/// Platform-wide totals for the admin.
pub async fn admin_summary(
    State(state): State<AppState>,
    AdminUser { user }: AdminUser,
) -> Result<Json<AdminSummary>, AppError> {
    let repo = &state.repo;
    let (counters, shop_count, user_count) = try_join!(
        repo.product_sales_counters(),
        repo.count_shops(),
        repo.count_users(),
    )?;

    Ok(Json(AdminSummary {
        total_sales: lifetime_sales(&counters),
        admin_income: user.income.unwrap_or_else(Decimal::zero),
        product_count: counters.len() as i64,
        shop_count,
        user_count,
    }))
}
