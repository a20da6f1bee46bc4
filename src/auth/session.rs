//! Cookie-carried sessions and the request extractors built on them.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use cookie::time::Duration;
use cookie::{Cookie, CookieBuilder, SameSite};
use tracing::debug;

use crate::api::AppState;
use crate::domain::{Email, User};
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "userToken";

fn session_cookie_builder<'c>(value: String) -> CookieBuilder<'c> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
}

/// `Set-Cookie` value carrying a fresh session token.
///
/// `SameSite=None` with `Secure` so the browser sends it on cross-site API calls.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    session_cookie_builder(token.to_string())
        .max_age(Duration::seconds(max_age_secs))
        .build()
        .to_string()
}

pub fn clear_session_cookie() -> String {
    let mut cookie = session_cookie_builder(String::new()).build();
    cookie.make_removal();
    cookie.to_string()
}

/// Find the session token among the request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|token| !token.is_empty())
}

/// The caller identified by a valid session cookie.
///
/// Rejects with 401 when the cookie is missing, expired or forged.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: Email,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("missing session cookie".to_string()))?;

        let email = state.tokens.verify(&token).map_err(|e| {
            debug!(error = %e, "Rejected session token");
            AppError::from(e)
        })?;

        Ok(AuthUser { email })
    }
}

/// A session whose user record carries the admin role.
///
/// 401 without a session, 403 for any other role or an unknown user.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user: User,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser { email } = AuthUser::from_request_parts(parts, state).await?;

        match state.repo.get_user(&email).await? {
            Some(user) if user.is_admin() => Ok(AdminUser { user }),
            _ => Err(AppError::Forbidden("admin role required".to_string())),
        }
    }
}
