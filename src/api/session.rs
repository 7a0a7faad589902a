//! Session API endpoints.
//!
//! - POST `/login` - Presence-check credentials and issue the session cookies
//! - POST `/logout` - Clear the session cookies
//! - POST `/refresh` - Rotate a refresh token into a fresh access+refresh pair

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use tracing::warn;

use super::error::ApiError;
use crate::auth::{
    CookiePolicy, REFRESH_TOKEN_COOKIE, ResponseJar, SessionStore, issue_session,
};
use crate::jwt::{JwtConfig, TokenKind};

#[derive(Clone)]
pub struct SessionState {
    pub jwt: Arc<JwtConfig>,
    pub policy: CookiePolicy,
}

pub fn router(state: SessionState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh))
        .with_state(state)
}

/// Take a completed jar and a JSON body and build the response, attaching
/// the buffered Set-Cookie headers as one atomic set.
fn respond(status: StatusCode, jar: ResponseJar, body: Value) -> Response {
    let mut response = (status, Json(body)).into_response();
    jar.write_to(response.headers_mut());
    response
}

/// Issue a session for the submitted username. Credentials are only
/// presence-checked here; verifying them belongs to an identity provider
/// this service does not include.
async fn login(
    State(state): State<SessionState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let username = body.get("username").and_then(Value::as_str).unwrap_or("");
    let password = body.get("password").and_then(Value::as_str).unwrap_or("");

    if username.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Missing username or password"));
    }

    let mut jar = ResponseJar::new(&headers, &state.policy);
    issue_session(&mut jar, &state.jwt, &state.policy, username)
        .map_err(|e| ApiError::internal("Authentication failed", e))?;

    Ok(respond(StatusCode::OK, jar, json!({ "success": true })))
}

/// Clear the session cookies. Always succeeds, even with no session present.
async fn logout(State(state): State<SessionState>, headers: HeaderMap) -> Response {
    let mut jar = ResponseJar::new(&headers, &state.policy);
    jar.clear_all();
    respond(StatusCode::OK, jar, json!({ "success": true }))
}

/// Rotate the refresh token into a new access+refresh pair.
///
/// No refresh cookie: 401 with no cookie mutation, nothing was trusted.
/// Failed verification: 401 and all three cookies cleared, the session is
/// stale. Success: new pair set, old refresh token superseded. There is no
/// revocation list, so a captured pre-rotation refresh token stays
/// cryptographically valid until its own expiry.
async fn refresh(
    State(state): State<SessionState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let mut jar = ResponseJar::new(&headers, &state.policy);

    let Some(refresh_token) = jar.get(REFRESH_TOKEN_COOKIE) else {
        return Err(ApiError::unauthorized("No refresh token provided"));
    };

    let claims = match state.jwt.verify(&refresh_token, TokenKind::Refresh) {
        Ok(claims) => claims,
        Err(reason) => {
            warn!(%reason, "Refresh token rejected, clearing session");
            jar.clear_all();
            return Ok(respond(
                StatusCode::UNAUTHORIZED,
                jar,
                json!({ "error": "Invalid refresh token" }),
            ));
        }
    };

    issue_session(&mut jar, &state.jwt, &state.policy, &claims.sub)
        .map_err(|e| ApiError::internal("Failed to refresh token", e))?;

    Ok(respond(StatusCode::OK, jar, json!({ "success": true })))
}
