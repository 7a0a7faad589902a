//! Session store adapter: the three session cookies behind one interface.
//!
//! Two variants share the contract: `ResponseJar` operates on the current
//! request/response cookie headers (server context), `MemoryJar` is the
//! synchronous in-memory analogue used by client-side logic and tests.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{HeaderMap, HeaderValue, header};

use super::cookie::{
    AUTH_TOKEN_COOKIE, CookieOptions, REFRESH_TOKEN_COOKIE, TOKEN_VERSION_COOKIE, encode_removal,
    get_cookie,
};
use super::policy::{AUTH_ENDPOINT_PATH, CookiePolicy};
use crate::jwt::{IssueError, JwtConfig, TokenKind};

/// Read/write/delete access to the session cookies.
pub trait SessionStore {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str, options: &CookieOptions);
    /// Delete a cookie. `path_hint` must match the path it was set with;
    /// defaults to `/`. Deleting an absent cookie is not an error.
    fn delete(&mut self, name: &str, path_hint: Option<&str>);
    fn get_all(&self) -> Vec<(String, String)>;

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Delete all three session cookies, each on the path it was set with.
    /// Idempotent: absent cookies are tolerated.
    fn clear_all(&mut self) {
        self.delete(AUTH_TOKEN_COOKIE, Some("/"));
        self.delete(REFRESH_TOKEN_COOKIE, Some(AUTH_ENDPOINT_PATH));
        self.delete(TOKEN_VERSION_COOKIE, Some("/"));
    }
}

/// Server-side jar: reads the request's Cookie header, buffers Set-Cookie
/// values, and releases them onto the response as one atomic set.
pub struct ResponseJar {
    values: HashMap<String, String>,
    pending: Vec<String>,
    secure: bool,
}

impl ResponseJar {
    pub fn new(headers: &HeaderMap, policy: &CookiePolicy) -> Self {
        let mut values = HashMap::new();
        for name in [AUTH_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, TOKEN_VERSION_COOKIE] {
            if let Some(value) = get_cookie(headers, name) {
                values.insert(name.to_string(), value.to_string());
            }
        }
        Self {
            values,
            pending: Vec::new(),
            secure: policy.secure(),
        }
    }

    /// Append the buffered Set-Cookie headers to a response header map.
    pub fn write_to(self, headers: &mut HeaderMap) {
        for cookie in self.pending {
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                headers.append(header::SET_COOKIE, value);
            }
        }
    }
}

impl SessionStore for ResponseJar {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str, options: &CookieOptions) {
        self.values.insert(name.to_string(), value.to_string());
        self.pending.push(options.encode(name, value));
    }

    fn delete(&mut self, name: &str, path_hint: Option<&str>) {
        self.values.remove(name);
        self.pending
            .push(encode_removal(name, path_hint.unwrap_or("/"), self.secure));
    }

    fn get_all(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// In-memory jar with the same contract, synchronous and path-agnostic.
#[derive(Default)]
pub struct MemoryJar {
    values: HashMap<String, String>,
}

impl MemoryJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryJar {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str, _options: &CookieOptions) {
        self.values.insert(name.to_string(), value.to_string());
    }

    fn delete(&mut self, name: &str, _path_hint: Option<&str>) {
        self.values.remove(name);
    }

    fn get_all(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Issue a fresh access+refresh pair for `subject` and store all three
/// session cookies per policy. Used by both login and refresh rotation.
pub fn issue_session(
    store: &mut dyn SessionStore,
    jwt: &JwtConfig,
    policy: &CookiePolicy,
    subject: &str,
) -> Result<(), IssueError> {
    let access = jwt.issue(subject, TokenKind::Access)?;
    let refresh = jwt.issue(subject, TokenKind::Refresh)?;

    store.set(
        AUTH_TOKEN_COOKIE,
        &access.token,
        &policy.options_for(TokenKind::Access),
    );
    store.set(
        REFRESH_TOKEN_COOKIE,
        &refresh.token,
        &policy.options_for(TokenKind::Refresh),
    );
    store.set(
        TOKEN_VERSION_COOKIE,
        &version_marker()?,
        &policy.version_options(),
    );

    Ok(())
}

/// Current epoch milliseconds as the non-secret version marker value.
fn version_marker() -> Result<String, IssueError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| IssueError::TimeError)?
        .as_millis();
    Ok(millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CookiePolicy {
        CookiePolicy::new(false, false)
    }

    #[test]
    fn test_memory_jar_roundtrip() {
        let mut jar = MemoryJar::new();
        let options = policy().options_for(TokenKind::Access);

        jar.set(AUTH_TOKEN_COOKIE, "tok", &options);
        assert_eq!(jar.get(AUTH_TOKEN_COOKIE), Some("tok".to_string()));
        assert!(jar.has(AUTH_TOKEN_COOKIE));

        jar.delete(AUTH_TOKEN_COOKIE, None);
        assert_eq!(jar.get(AUTH_TOKEN_COOKIE), None);
    }

    #[test]
    fn test_clear_all_idempotent_on_empty_jar() {
        let mut jar = MemoryJar::new();

        jar.clear_all();
        jar.clear_all();

        assert!(jar.get_all().is_empty());
    }

    #[test]
    fn test_response_jar_reads_request_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("authToken=abc; refreshToken=def"),
        );

        let jar = ResponseJar::new(&headers, &policy());
        assert_eq!(jar.get(AUTH_TOKEN_COOKIE), Some("abc".to_string()));
        assert_eq!(jar.get(REFRESH_TOKEN_COOKIE), Some("def".to_string()));
        assert!(!jar.has(TOKEN_VERSION_COOKIE));
        assert_eq!(jar.get_all().len(), 2);
    }

    #[test]
    fn test_response_jar_clear_all_emits_three_removals() {
        let headers = HeaderMap::new();
        let mut jar = ResponseJar::new(&headers, &policy());

        jar.clear_all();

        let mut response_headers = HeaderMap::new();
        jar.write_to(&mut response_headers);

        let cookies: Vec<_> = response_headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 3);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
        assert!(
            cookies
                .iter()
                .any(|c| c.starts_with("refreshToken=") && c.contains("Path=/api/auth"))
        );
    }

    #[test]
    fn test_issue_session_sets_three_cookies() {
        let jwt = JwtConfig::new(b"access-secret-access-secret", b"refresh-secret-refresh-secret");
        let mut jar = MemoryJar::new();

        issue_session(&mut jar, &jwt, &policy(), "alice").unwrap();

        assert!(jar.has(AUTH_TOKEN_COOKIE));
        assert!(jar.has(REFRESH_TOKEN_COOKIE));
        assert!(jar.has(TOKEN_VERSION_COOKIE));

        let access = jar.get(AUTH_TOKEN_COOKIE).unwrap();
        let claims = jwt.verify(&access, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "alice");
    }
}
