mod error;
mod session;

use axum::Router;
use std::sync::Arc;

use crate::auth::CookiePolicy;
use crate::jwt::JwtConfig;

pub use error::ApiError;

/// Create the API router.
pub fn create_api_router(jwt: Arc<JwtConfig>, policy: CookiePolicy) -> Router {
    let session_state = session::SessionState { jwt, policy };

    Router::new().nest("/auth", session::router(session_state))
}
