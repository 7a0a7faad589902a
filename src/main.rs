use clap::Parser;
use lingate::cli::{Args, build_config, init_logging, load_secret, validate_locales};
use lingate::run_server;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(access_secret) = load_secret("JWT_SECRET", args.access_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    let Some(refresh_secret) =
        load_secret("JWT_REFRESH_SECRET", args.refresh_secret_file.as_deref())
    else {
        std::process::exit(1);
    };

    if access_secret == refresh_secret {
        error!("Access and refresh secrets must be distinct");
        std::process::exit(1);
    }

    let Some(locales) = validate_locales(&args.locales) else {
        std::process::exit(1);
    };

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = listener.local_addr().unwrap_or_else(|e| {
        error!(error = %e, "Failed to get local address");
        std::process::exit(1);
    });

    let config = build_config(&args, access_secret, refresh_secret, locales);

    info!(address = %local_addr, "Listening");

    if let Err(e) = run_server(config, listener).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
