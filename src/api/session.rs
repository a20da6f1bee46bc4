use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::AppState;
use crate::auth::{clear_session_cookie, session_cookie};
use crate::domain::Email;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: Email,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub message: String,
    pub user_token: String,
}

/// Issue a session token for `email` and set it as the session cookie.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Response, AppError> {
    let token = state.tokens.issue(&body.email)?;
    let cookie = session_cookie(&token, state.tokens.ttl_secs());
    info!(email = %body.email, "Session token issued");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(TokenResponse {
            message: "Token generated successfully.".to_string(),
            user_token: token,
        }),
    )
        .into_response())
}

pub async fn logout() -> Response {
    (
        [(SET_COOKIE, clear_session_cookie())],
        Json(serde_json::json!({"success": true})),
    )
        .into_response()
}
