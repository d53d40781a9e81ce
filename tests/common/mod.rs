//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use tower::ServiceExt;

use secure_headers::config::{KeyPinningPolicy, PolicyConfiguration, TransportSecurityPolicy};
use secure_headers::{HttpServer, Mode, ServerConfig};

/// A production-style policy for `example.com` with HPKP, HSTS and CSP.
pub fn hardened_policy() -> PolicyConfiguration {
    PolicyConfiguration {
        allowed_hosts: vec!["example.com".into()],
        content_security_policy: "default-src 'self'".into(),
        ssl_forced: true,
        key_pinning: Some(KeyPinningPolicy {
            pinned_keys: vec!["abc=".into(), "def=".into()],
            max_age: Duration::from_secs(5_184_000),
            include_subdomains: true,
            report_uri: Some("https://example.com/r".into()),
        }),
        transport_security: Some(TransportSecurityPolicy {
            max_age: Duration::from_secs(10_886_400),
            include_subdomains: true,
            preload: true,
        }),
        ..Default::default()
    }
}

pub fn server(policy: Option<PolicyConfiguration>, mode: Mode) -> HttpServer {
    let config = ServerConfig {
        mode,
        policy,
        ..Default::default()
    };
    HttpServer::new(config).unwrap()
}

/// Drive one request through the fully layered router.
pub async fn send(server: &HttpServer, request: Request<Body>) -> Response<Body> {
    server.router().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, host: &str) -> axum::http::request::Builder {
    Request::builder().uri(uri).header("Host", host)
}

/// Security headers this crate may emit.
pub const SECURITY_HEADERS: [&str; 8] = [
    "public-key-pins",
    "strict-transport-security",
    "content-security-policy",
    "x-content-security-policy",
    "x-webkit-csp",
    "x-frame-options",
    "x-content-type-options",
    "x-xss-protection",
];
