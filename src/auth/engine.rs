//! Auth decision engine: is this request authenticated right now?

use super::cookie::AUTH_TOKEN_COOKIE;
use super::session::SessionStore;
use crate::jwt::{JwtConfig, TokenKind};

/// Outcome of evaluating a request's authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub subject: Option<String>,
}

impl AuthStatus {
    fn anonymous() -> Self {
        Self {
            authenticated: false,
            subject: None,
        }
    }
}

/// Evaluate the access token in the store. A missing, expired, malformed, or
/// forged token all mean "not authenticated" — verification failure is a
/// normal outcome here and never escapes as an error. Refresh is a separate
/// explicit flow; this is a pure read of current access-token validity.
pub fn evaluate(store: &dyn SessionStore, jwt: &JwtConfig) -> AuthStatus {
    let Some(token) = store.get(AUTH_TOKEN_COOKIE) else {
        return AuthStatus::anonymous();
    };

    match jwt.verify(&token, TokenKind::Access) {
        Ok(claims) => AuthStatus {
            authenticated: true,
            subject: Some(claims.sub),
        },
        Err(reason) => {
            tracing::debug!(%reason, "Access token rejected");
            AuthStatus::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::policy::CookiePolicy;
    use crate::auth::session::MemoryJar;

    fn jwt() -> JwtConfig {
        JwtConfig::new(b"access-secret-access-secret", b"refresh-secret-refresh-secret")
    }

    #[test]
    fn test_no_cookie_is_anonymous() {
        let jar = MemoryJar::new();
        let status = evaluate(&jar, &jwt());

        assert!(!status.authenticated);
        assert_eq!(status.subject, None);
    }

    #[test]
    fn test_valid_access_token_authenticates() {
        let jwt = jwt();
        let mut jar = MemoryJar::new();
        let policy = CookiePolicy::new(false, false);
        let issued = jwt.issue("alice", TokenKind::Access).unwrap();
        jar.set(
            AUTH_TOKEN_COOKIE,
            &issued.token,
            &policy.options_for(TokenKind::Access),
        );

        let status = evaluate(&jar, &jwt);
        assert!(status.authenticated);
        assert_eq!(status.subject.as_deref(), Some("alice"));
    }

    #[test]
    fn test_garbage_token_is_anonymous() {
        let mut jar = MemoryJar::new();
        let policy = CookiePolicy::new(false, false);
        jar.set(
            AUTH_TOKEN_COOKIE,
            "garbage",
            &policy.options_for(TokenKind::Access),
        );

        assert!(!evaluate(&jar, &jwt()).authenticated);
    }

    #[test]
    fn test_refresh_token_does_not_authenticate() {
        let jwt = jwt();
        let mut jar = MemoryJar::new();
        let policy = CookiePolicy::new(false, false);

        // A refresh token smuggled into the access slot must not pass
        let issued = jwt.issue("alice", TokenKind::Refresh).unwrap();
        jar.set(
            AUTH_TOKEN_COOKIE,
            &issued.token,
            &policy.options_for(TokenKind::Access),
        );

        assert!(!evaluate(&jar, &jwt).authenticated);
    }
}
