//! Cookie policy: transport security attributes per token class.

use super::cookie::{CookieOptions, SameSite};
use crate::jwt::{ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS, TokenKind};

/// Path prefix the refresh token cookie is scoped to. The browser only sends
/// it to the auth endpoints, never alongside ordinary page requests.
pub const AUTH_ENDPOINT_PATH: &str = "/api/auth";

/// Derives cookie attributes from the deployment environment.
///
/// `secure_override` forces the Secure flag outside production, for staging
/// behind TLS-terminating proxies.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    production: bool,
    secure_override: bool,
}

impl CookiePolicy {
    pub fn new(production: bool, secure_override: bool) -> Self {
        Self {
            production,
            secure_override,
        }
    }

    /// Whether cookies carry the Secure flag.
    pub fn secure(&self) -> bool {
        self.production || self.secure_override
    }

    fn same_site(&self) -> SameSite {
        if self.production {
            SameSite::Strict
        } else {
            SameSite::Lax
        }
    }

    /// Attributes for a token cookie of the given kind.
    pub fn options_for(&self, kind: TokenKind) -> CookieOptions {
        let (path, max_age) = match kind {
            TokenKind::Access => ("/", ACCESS_TOKEN_TTL_SECS),
            TokenKind::Refresh => (AUTH_ENDPOINT_PATH, REFRESH_TOKEN_TTL_SECS),
        };

        CookieOptions {
            http_only: true,
            secure: self.secure(),
            same_site: self.same_site(),
            path,
            max_age: Some(max_age),
        }
    }

    /// Attributes for the token version marker. Not HttpOnly (client code
    /// reads it to detect session renewal) and session-length.
    pub fn version_options(&self) -> CookieOptions {
        CookieOptions {
            http_only: false,
            secure: self.secure(),
            same_site: self.same_site(),
            path: "/",
            max_age: None,
        }
    }
}
