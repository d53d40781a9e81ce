//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the application handlers
//! - Wire up middleware (tracing, security interceptor)
//! - Bind server to listener with graceful shutdown

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{PolicyError, ServerConfig};
use crate::security::interceptor::{secure_headers_middleware, SecureInterceptor};

/// HTTP server with the security interceptor in front of every route.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a server with the built-in demo application.
    ///
    /// Fails if the security policy is invalid.
    pub fn new(config: ServerConfig) -> Result<Self, PolicyError> {
        Self::with_router(config, default_app())
    }

    /// Create a server protecting the given application router.
    pub fn with_router(config: ServerConfig, app: Router) -> Result<Self, PolicyError> {
        let interceptor = SecureInterceptor::new(config.policy.clone(), config.mode)?;
        let router = Self::build_router(app, interceptor);
        Ok(Self { router, config })
    }

    /// Wrap `app` with all middleware layers.
    fn build_router(app: Router, interceptor: SecureInterceptor) -> Router {
        app.layer(middleware::from_fn_with_state(
            Arc::new(interceptor),
            secure_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, e.g. for driving with `tower::ServiceExt`.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.mode,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

fn default_app() -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/{*path}", get(hello))
}

async fn hello() -> &'static str {
    "Hello, World!"
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
