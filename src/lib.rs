pub mod api;
pub mod auth;
pub mod cli;
pub mod jwt;
pub mod pages;
pub mod routing;

use std::sync::Arc;

use auth::CookiePolicy;
use axum::{Router, middleware};
use jwt::JwtConfig;
use routing::{GateState, LocaleConfig, RouteConfig, routing_gate};
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Secret for signing access tokens
    pub access_secret: Vec<u8>,
    /// Independent secret for signing refresh tokens
    pub refresh_secret: Vec<u8>,
    /// Production deployment mode (Secure + SameSite=Strict cookies)
    pub production: bool,
    /// Force the Secure cookie flag outside production (TLS-terminating proxies)
    pub secure_cookies: bool,
    /// Path lists driving the routing gate
    pub routes: RouteConfig,
    /// Supported locales and the default
    pub locales: LocaleConfig,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.access_secret, &config.refresh_secret));
    let policy = CookiePolicy::new(config.production, config.secure_cookies);
    let locales = Arc::new(config.locales.clone());

    let gate = GateState {
        jwt: jwt.clone(),
        routes: Arc::new(config.routes.clone()),
        locales: locales.clone(),
        policy,
    };

    let api_router = api::create_api_router(jwt, policy);

    // The gate layers over everything; API and asset paths pass through it
    // on its bypass branch.
    Router::new()
        .nest("/api", api_router)
        .merge(pages::router(locales))
        .layer(middleware::from_fn_with_state(gate, routing_gate))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}
