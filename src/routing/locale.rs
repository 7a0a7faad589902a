//! Locale resolution: strip or derive the locale segment of a path.

/// Supported locales and the default used when a path carries no prefix.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    pub supported: Vec<String>,
    pub default: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            supported: vec!["en".to_string(), "vi".to_string()],
            default: "en".to_string(),
        }
    }
}

/// A pathname split into its locale and the remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub locale: String,
    pub path_without_locale: String,
}

impl LocaleConfig {
    pub fn is_supported(&self, locale: &str) -> bool {
        self.supported.iter().any(|l| l == locale)
    }

    /// If the first path segment is a supported locale, consume it and
    /// rejoin the rest (`/` when nothing remains). Otherwise the default
    /// locale applies and the pathname is returned untouched.
    pub fn resolve(&self, pathname: &str) -> Resolved {
        let mut segments = pathname.split('/').filter(|s| !s.is_empty());

        if let Some(first) = segments.next() {
            if self.is_supported(first) {
                let rest: Vec<&str> = segments.collect();
                let path_without_locale = if rest.is_empty() {
                    "/".to_string()
                } else {
                    format!("/{}", rest.join("/"))
                };
                return Resolved {
                    locale: first.to_string(),
                    path_without_locale,
                };
            }
        }

        Resolved {
            locale: self.default.clone(),
            path_without_locale: pathname.to_string(),
        }
    }
}
