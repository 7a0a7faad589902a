//! Cookie-based session authentication.
//!
//! Dual-token system: short-lived access tokens (15 min) and long-lived
//! refresh tokens (7 days), both stateless JWTs held in HttpOnly cookies.
//! A third, client-readable cookie carries a version marker so frontend
//! code can detect session renewal.

mod cookie;
mod engine;
mod policy;
mod session;

pub use cookie::{
    AUTH_TOKEN_COOKIE, CookieOptions, REFRESH_TOKEN_COOKIE, SameSite, TOKEN_VERSION_COOKIE,
    encode_removal, get_cookie,
};
pub use engine::{AuthStatus, evaluate};
pub use policy::{AUTH_ENDPOINT_PATH, CookiePolicy};
pub use session::{MemoryJar, ResponseJar, SessionStore, issue_session};
