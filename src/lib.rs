//! Security headers and transport-policy middleware for Axum.

pub mod config;
pub mod http;
pub mod observability;
pub mod security;

pub use config::{Mode, PolicyConfiguration, ServerConfig};
pub use http::HttpServer;
pub use security::{secure_headers_middleware, SecureInterceptor};
