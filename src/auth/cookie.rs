//! Cookie names, Cookie-header parsing, and Set-Cookie encoding.

use axum::http::header;

/// Cookie name for the access token (short-lived, 15 minutes).
pub const AUTH_TOKEN_COOKIE: &str = "authToken";

/// Cookie name for the refresh token (long-lived, 7 days).
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Cookie name for the token version marker. Readable by client code
/// (not HttpOnly) so the frontend can detect session renewal.
pub const TOKEN_VERSION_COOKIE: &str = "tokenVersion";

/// SameSite attribute for session cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
        }
    }
}

/// Transport security attributes for a session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: &'static str,
    /// None means a session-length cookie (no Max-Age attribute).
    pub max_age: Option<u64>,
}

impl CookieOptions {
    /// Encode a Set-Cookie header value for this cookie.
    pub fn encode(&self, name: &str, value: &str) -> String {
        let mut out = format!("{}={}", name, value);
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        out.push_str("; SameSite=");
        out.push_str(self.same_site.as_str());
        out.push_str("; Path=");
        out.push_str(self.path);
        if let Some(max_age) = self.max_age {
            out.push_str(&format!("; Max-Age={}", max_age));
        }
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }
}

/// Encode a Set-Cookie header value that deletes a cookie on the given path.
pub fn encode_removal(name: &str, path: &str, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path={}; Max-Age=0{}",
        name, path, secure
    )
}

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}
