//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::routing::{LocaleConfig, RouteConfig};
use clap::Parser;
use tracing::error;

const MIN_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "Lingate",
    about = "Localized web frontend behind a token-gated routing edge"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Production deployment mode: Secure cookies with SameSite=Strict
    #[arg(long, env = "PRODUCTION")]
    pub production: bool,

    /// Force the Secure cookie flag outside production (staging behind a
    /// TLS-terminating proxy)
    #[arg(long, env = "USE_SECURE_COOKIES")]
    pub secure_cookies: bool,

    /// Supported locale codes; the first is the default
    #[arg(long, value_delimiter = ',', default_value = "en,vi")]
    pub locales: Vec<String>,

    /// Path to file containing the access token secret.
    /// Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub access_secret_file: Option<String>,

    /// Path to file containing the refresh token secret.
    /// Prefer using JWT_REFRESH_SECRET env var instead
    #[arg(long)]
    pub refresh_secret_file: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load a token secret from an environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_secret(env_var: &str, secret_file: Option<&str>) -> Option<Vec<u8>> {
    let secret = if let Ok(secret) = std::env::var(env_var) {
        // Clear the environment variable to prevent leaking.
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var(env_var) };
        secret
    } else if let Some(path) = secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read secret file");
                return None;
            }
        }
    } else {
        error!(
            "Token secret is required. Set the {} environment variable (recommended) or pass a secret file",
            env_var
        );
        return None;
    };

    if secret.len() < MIN_SECRET_LENGTH {
        error!(
            "{} is shorter than {} characters. Use a longer secret",
            env_var, MIN_SECRET_LENGTH
        );
        return None;
    }

    Some(secret.into_bytes())
}

/// Validate the locale list: non-empty, lowercase codes, no duplicates.
/// The first entry becomes the default locale.
pub fn validate_locales(locales: &[String]) -> Option<LocaleConfig> {
    if locales.is_empty() {
        error!("At least one locale is required");
        return None;
    }

    for locale in locales {
        if locale.is_empty() || !locale.chars().all(|c| c.is_ascii_lowercase() || c == '-') {
            error!(locale = %locale, "Invalid locale code");
            return None;
        }
    }

    let mut seen = std::collections::HashSet::new();
    if !locales.iter().all(|l| seen.insert(l)) {
        error!("Duplicate locale codes");
        return None;
    }

    Some(LocaleConfig {
        supported: locales.to_vec(),
        default: locales[0].clone(),
    })
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    args: &Args,
    access_secret: Vec<u8>,
    refresh_secret: Vec<u8>,
    locales: LocaleConfig,
) -> ServerConfig {
    ServerConfig {
        access_secret,
        refresh_secret,
        production: args.production,
        secure_cookies: args.secure_cookies,
        routes: RouteConfig::default(),
        locales,
    }
}
