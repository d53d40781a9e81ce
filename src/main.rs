//! Security headers server.
//!
//! Serves a demo application behind the security interceptor.
//!
//! ```text
//!   Client Request
//!   ──────────────▶ ┌──────────────┐   ┌──────────────────┐   ┌─────────────┐
//!                   │ TraceLayer   │──▶│ SecureInterceptor│──▶│ application │
//!                   └──────────────┘   │ host / https     │   └──────┬──────┘
//!                                      └────────┬─────────┘          │
//!   Client Response                             │ 404 / 301          │
//!   ◀───────────────────────────────────────────┴── + security headers ◀┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use secure_headers::config::{load_config, Mode, ServerConfig};
use secure_headers::http::HttpServer;
use secure_headers::observability::{logging, metrics};
use secure_headers::security::SecureInterceptor;

#[derive(Parser)]
#[command(name = "secure-headers")]
#[command(about = "HTTP server adding browser security headers", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force production mode (host checks, HTTPS redirects, HSTS/HPKP).
    #[arg(long)]
    production: bool,

    /// Validate the configuration, print the headers a secure request
    /// receives, and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if cli.production {
        config.mode = Mode::Production;
    }

    if cli.check {
        return check(config);
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = ?config.mode,
        policy = config.policy.is_some(),
        "Configuration loaded"
    );

    // Policy errors surface here, before anything is bound.
    let server = HttpServer::new(config)?;
    let config = server.config();

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let interceptor = SecureInterceptor::new(config.policy, config.mode)?;

    let mut headers = axum::http::HeaderMap::new();
    interceptor.apply_headers(&mut headers, true);

    println!("configuration OK ({:?} mode)", interceptor.mode());
    for (name, value) in &headers {
        println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    Ok(())
}
