//! Localized page shell.
//!
//! The real frontend is presentation glue outside this service's scope; these
//! handlers give pass-through requests a concrete destination. By the time a
//! request lands here the gate has already negotiated its locale prefix, but
//! bypassed paths (static assets, framework internals) reach the router
//! unprefixed, so the captured segment is still checked against the
//! configured locales.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::routing::LocaleConfig;

fn page_title(locale: &str) -> &'static str {
    match locale {
        "vi" => "Trang chủ",
        _ => "Home",
    }
}

fn render(locale: &str, path: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"{locale}\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body data-path=\"{path}\"></body>\n</html>\n",
        title = page_title(locale),
    ))
}

async fn index(State(locales): State<Arc<LocaleConfig>>, Path(locale): Path<String>) -> Response {
    if !locales.is_supported(&locale) {
        return StatusCode::NOT_FOUND.into_response();
    }
    render(&locale, "/").into_response()
}

async fn page(
    State(locales): State<Arc<LocaleConfig>>,
    Path((locale, rest)): Path<(String, String)>,
) -> Response {
    if !locales.is_supported(&locale) {
        return StatusCode::NOT_FOUND.into_response();
    }
    render(&locale, &format!("/{}", rest)).into_response()
}

pub fn router(locales: Arc<LocaleConfig>) -> Router {
    Router::new()
        .route("/{locale}", get(index))
        .route("/{locale}/{*rest}", get(page))
        .with_state(locales)
}
