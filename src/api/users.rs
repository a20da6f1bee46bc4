use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::AppState;
use crate::auth::{AdminUser, AuthUser};
use crate::domain::{NewUser, ShopLink, User};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub inserted: bool,
}

/// Register a user. Re-registering an existing email is a no-op.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let inserted = state.repo.insert_user(&body).await?;
    if inserted {
        info!(email = %body.email, "User registered");
        Ok((StatusCode::CREATED, Json(CreateUserResponse { inserted })))
    } else {
        Ok((StatusCode::OK, Json(CreateUserResponse { inserted })))
    }
}

pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, AppError> {
    state
        .repo
        .get_user(&auth.email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", auth.email)))
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.repo.list_users().await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub modified_count: u64,
}

/// Merge shop linkage fields into the caller's user record.
pub async fn add_shop_info(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(link): Json<ShopLink>,
) -> Result<Json<UpdateResponse>, AppError> {
    if link.is_empty() {
        return Err(AppError::BadRequest(
            "one of shopId, shopName or shopLogo is required".to_string(),
        ));
    }
    if !state.repo.link_shop(&auth.email, &link).await? {
        return Err(AppError::NotFound(format!("user {} not found", auth.email)));
    }
    Ok(Json(UpdateResponse { modified_count: 1 }))
}
