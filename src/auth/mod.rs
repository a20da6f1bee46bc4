//! Session authentication: signed tokens carried in an HTTP-only cookie.

pub mod jwt;
pub mod session;

pub use jwt::{Claims, TokenError, TokenIssuer};
pub use session::{
    clear_session_cookie, session_cookie, token_from_headers, AdminUser, AuthUser,
    SESSION_COOKIE,
};
