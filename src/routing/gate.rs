//! The routing gate: per-request middleware combining locale resolution,
//! route classification, and auth evaluation.
//!
//! Every inbound request terminates in exactly one of two actions: forward
//! to locale negotiation (and ultimately the page router) or redirect. Faults
//! inside the gate never propagate to the caller; they degrade to a safe
//! redirect or a plain pass-through.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::error;
use url::form_urlencoded;

use super::classify::{RouteConfig, RouteKind};
use super::locale::LocaleConfig;
use crate::auth::{CookiePolicy, ResponseJar, evaluate};
use crate::jwt::JwtConfig;

const LOGIN_MESSAGE: &str = "Please login to access this page";
const GATE_FAULT_MESSAGE: &str = "Authentication error occurred";

/// Immutable configuration injected into the gate at construction.
#[derive(Clone)]
pub struct GateState {
    pub jwt: Arc<JwtConfig>,
    pub routes: Arc<RouteConfig>,
    pub locales: Arc<LocaleConfig>,
    pub policy: CookiePolicy,
}

enum Action {
    Forward,
    Redirect(Response),
}

#[derive(Debug)]
enum GateError {
    BadRedirectTarget,
}

impl std::fmt::Display for GateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateError::BadRedirectTarget => write!(f, "Redirect target is not a valid header value"),
        }
    }
}

/// Axum middleware entry point.
pub async fn routing_gate(State(gate): State<GateState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    // API routes, framework internals, and static assets skip auth entirely
    if is_bypassed(&path) {
        return negotiate_and_forward(&gate, &path, query.as_deref(), request, next, false).await;
    }

    match decide(&gate, &path, query.as_deref(), &request) {
        Ok(Action::Redirect(response)) => response,
        Ok(Action::Forward) => {
            negotiate_and_forward(&gate, &path, query.as_deref(), request, next, true).await
        }
        Err(e) => {
            error!(path = %path, error = %e, "Routing gate fault");
            fallback(&gate, &path, query.as_deref(), request, next).await
        }
    }
}

/// Steps 2-5 of the per-request state machine. Cookie reads happen before
/// the auth decision, which happens before the redirect decision.
fn decide(
    gate: &GateState,
    path: &str,
    query: Option<&str>,
    request: &Request,
) -> Result<Action, GateError> {
    let resolved = gate.locales.resolve(path);
    let jar = ResponseJar::new(request.headers(), &gate.policy);
    let auth = evaluate(&jar, &gate.jwt);

    let kind = gate.routes.classify(&resolved.path_without_locale);

    if kind == RouteKind::Protected && !auth.authenticated {
        let redirect = localized_redirect(
            &resolved.locale,
            "/login",
            &[("from", path), ("message", LOGIN_MESSAGE)],
        )?;
        return Ok(Action::Redirect(redirect));
    }

    if kind == RouteKind::AuthOnly && auth.authenticated {
        // Honor the intended destination if the request carries one
        if let Some(from) = query_param(query, "from") {
            let target = gate.locales.resolve(&from);
            let redirect =
                localized_redirect(&resolved.locale, &target.path_without_locale, &[])?;
            return Ok(Action::Redirect(redirect));
        }
        let redirect = localized_redirect(&resolved.locale, "/dashboard", &[])?;
        return Ok(Action::Redirect(redirect));
    }

    Ok(Action::Forward)
}

/// Terminal pass-through: run locale negotiation, then hand the request to
/// the inner router. Security headers are attached on the gated path only,
/// to whatever response comes back (including negotiation redirects).
async fn negotiate_and_forward(
    gate: &GateState,
    path: &str,
    query: Option<&str>,
    request: Request,
    next: Next,
    security_headers: bool,
) -> Response {
    let mut response = match negotiate_locale(&gate.locales, path, query) {
        Some(redirect) => redirect,
        None => next.run(request).await,
    };

    if security_headers {
        attach_security_headers(response.headers_mut());
    }
    response
}

/// Failure path: a fault on a protected route still redirects to login;
/// anywhere else degrades to plain locale negotiation.
async fn fallback(
    gate: &GateState,
    path: &str,
    query: Option<&str>,
    request: Request,
    next: Next,
) -> Response {
    let resolved = gate.locales.resolve(path);
    if gate.routes.classify(&resolved.path_without_locale) == RouteKind::Protected {
        if let Ok(redirect) =
            localized_redirect(&resolved.locale, "/login", &[("error", GATE_FAULT_MESSAGE)])
        {
            return redirect;
        }
    }
    negotiate_and_forward(gate, path, query, request, next, false).await
}

/// Paths the gate never applies auth logic to.
fn is_bypassed(path: &str) -> bool {
    path.starts_with("/api/")
        || path.starts_with("/_next/")
        || path.starts_with("/_vercel/")
        || path.contains('.')
}

/// Locale negotiation: a non-bypassed path without a supported locale prefix
/// redirects to the same path under the default locale, query preserved.
/// Returns None when the request should continue to the inner router.
fn negotiate_locale(locales: &LocaleConfig, path: &str, query: Option<&str>) -> Option<Response> {
    if is_bypassed(path) {
        return None;
    }

    let first = path.split('/').find(|s| !s.is_empty());
    if first.is_some_and(|segment| locales.is_supported(segment)) {
        return None;
    }

    let mut location = if path == "/" {
        format!("/{}", locales.default)
    } else {
        format!("/{}{}", locales.default, path)
    };
    if let Some(query) = query {
        location.push('?');
        location.push_str(query);
    }

    found(&location).ok()
}

/// Build a 302 redirect to a locale-prefixed path with optional query params.
fn localized_redirect(
    locale: &str,
    target: &str,
    params: &[(&str, &str)],
) -> Result<Response, GateError> {
    let mut location = format!("/{}{}", locale, target);
    if !params.is_empty() {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        location.push('?');
        location.push_str(&query);
    }
    found(&location)
}

/// 302 Found. The axum redirect helpers emit 303/307/308, so build it directly.
fn found(location: &str) -> Result<Response, GateError> {
    let value = HeaderValue::from_str(location).map_err(|_| GateError::BadRedirectTarget)?;
    let mut response = StatusCode::FOUND.into_response();
    response.headers_mut().insert(header::LOCATION, value);
    Ok(response)
}

fn attach_security_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        "X-Frame-Options",
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
}

fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    let query = query?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bypass_paths() {
        assert!(is_bypassed("/api/auth/login"));
        assert!(is_bypassed("/_next/static/chunk.js"));
        assert!(is_bypassed("/_vercel/insights"));
        assert!(is_bypassed("/favicon.ico"));
        assert!(!is_bypassed("/en/dashboard"));
        assert!(!is_bypassed("/dashboard"));
    }

    #[test]
    fn test_negotiate_redirects_unprefixed_path() {
        let locales = LocaleConfig::default();
        let response = negotiate_locale(&locales, "/dashboard", None).unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/en/dashboard"
        );
    }

    #[test]
    fn test_negotiate_preserves_query() {
        let locales = LocaleConfig::default();
        let response = negotiate_locale(&locales, "/login", Some("from=%2Fen%2Fdashboard")).unwrap();

        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/en/login?from=%2Fen%2Fdashboard"
        );
    }

    #[test]
    fn test_negotiate_skips_prefixed_and_bypassed_paths() {
        let locales = LocaleConfig::default();
        assert!(negotiate_locale(&locales, "/vi/dashboard", None).is_none());
        assert!(negotiate_locale(&locales, "/api/auth/login", None).is_none());
        assert!(negotiate_locale(&locales, "/robots.txt", None).is_none());
    }

    #[test]
    fn test_negotiate_root_path() {
        let locales = LocaleConfig::default();
        let response = negotiate_locale(&locales, "/", None).unwrap();
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/en");
    }

    #[test]
    fn test_localized_redirect_encodes_params() {
        let response =
            localized_redirect("en", "/login", &[("from", "/en/dashboard"), ("message", LOGIN_MESSAGE)])
                .unwrap();

        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.starts_with("/en/login?from=%2Fen%2Fdashboard&message="));
    }

    #[test]
    fn test_query_param_lookup() {
        assert_eq!(
            query_param(Some("from=%2Fvi%2Fprofile&x=1"), "from").as_deref(),
            Some("/vi/profile")
        );
        assert_eq!(query_param(Some("x=1"), "from"), None);
        assert_eq!(query_param(None, "from"), None);
    }
}
