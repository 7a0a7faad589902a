//! Route classification against configured path lists.

/// Category a locale-stripped path falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Requires authentication
    Protected,
    /// Login/register pages: bounce already-authenticated users away
    AuthOnly,
    /// Explicitly public
    Public,
    /// Unlisted, treated as public by default policy
    Other,
}

/// Configured path lists. Matching is locale-independent: paths are
/// classified after the locale prefix has been stripped.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub protected: Vec<String>,
    pub auth_only: Vec<String>,
    pub public: Vec<String>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        let list = |paths: &[&str]| paths.iter().map(|p| p.to_string()).collect();
        Self {
            protected: list(&["/dashboard", "/profile", "/settings", "/account", "/admin"]),
            auth_only: list(&["/login", "/register", "/forgot-password", "/reset-password"]),
            public: list(&["/", "/about", "/contact"]),
        }
    }
}

impl RouteConfig {
    /// Classify a path. Precedence: protected > auth-only > public.
    pub fn classify(&self, path: &str) -> RouteKind {
        if matches_any(path, &self.protected) {
            RouteKind::Protected
        } else if matches_any(path, &self.auth_only) {
            RouteKind::AuthOnly
        } else if matches_any(path, &self.public) {
            RouteKind::Public
        } else {
            RouteKind::Other
        }
    }
}

/// Root stays `/`; any other path loses its trailing slash.
fn normalize(path: &str) -> &str {
    if path == "/" {
        path
    } else {
        path.strip_suffix('/').unwrap_or(path)
    }
}

/// A path matches an entry if it equals it or continues it past a `/`
/// separator. `/dashboarding` does not match `/dashboard`.
fn matches_any(path: &str, entries: &[String]) -> bool {
    let path = normalize(path);
    entries.iter().any(|entry| {
        let entry = normalize(entry);
        path == entry || path.starts_with(&format!("{}/", entry))
    })
}
