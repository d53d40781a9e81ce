//! Per-request security interceptor.
//!
//! # Decision Order
//! ```text
//! production only:
//!     host allow-list     → 404 Not Found
//!     secure transport?   → insecure + ssl_forced → 301 to https
//!     Public-Key-Pins     (secure requests)
//!     Strict-Transport-Security
//! every mode:
//!     CSP (three names), X-Frame-Options, X-Content-Type-Options,
//!     X-XSS-Protection
//!     → next handler
//! ```
//!
//! # Design Decisions
//! - Policy is validated and compiled in `SecureInterceptor::new`; an
//!   invalid policy never reaches request handling
//! - Rejections and redirects are terminal: no security headers are set
//! - The interceptor holds no mutable state; share it through an `Arc`

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::LOCATION, request::Parts, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::schema::{Mode, PolicyConfiguration};
use crate::config::validation::PolicyError;
use crate::observability::metrics;
use crate::security::headers::SecurityHeaders;
use crate::security::hosts::AllowedHosts;
use crate::security::transport::{https_redirect_location, is_secure_request, request_host};

/// Outcome of evaluating a request against the policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Host not in the allow-list.
    NotFound,
    /// Insecure request while HTTPS is forced; carries the `Location`.
    Redirect(HeaderValue),
    /// HTTPS is forced but the request names no host to redirect to.
    MissingHost,
    /// Serve the request, then add the security headers.
    Continue { secure: bool },
}

#[derive(Debug, Clone)]
pub struct SecureInterceptor {
    mode: Mode,
    allowed_hosts: AllowedHosts,
    ssl_forced: bool,
    trust_forwarded_proto: bool,
    headers: SecurityHeaders,
}

impl SecureInterceptor {
    /// Validate `policy` and build the interceptor.
    ///
    /// `None` applies only the default frame, MIME sniffing and XSS headers.
    pub fn new(policy: Option<PolicyConfiguration>, mode: Mode) -> Result<Self, PolicyError> {
        let headers = SecurityHeaders::compile(policy.as_ref())?;
        let policy = policy.unwrap_or_default();

        tracing::debug!(
            mode = ?mode,
            allowed_hosts = policy.allowed_hosts.len(),
            ssl_forced = policy.ssl_forced,
            key_pinning = policy.key_pinning.is_some(),
            transport_security = policy.transport_security.is_some(),
            "Security policy compiled"
        );

        Ok(Self {
            mode,
            allowed_hosts: AllowedHosts::new(&policy.allowed_hosts),
            ssl_forced: policy.ssl_forced,
            trust_forwarded_proto: policy.trust_forwarded_proto,
            headers,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Decide how to handle a request.
    pub fn evaluate(&self, parts: &Parts) -> Decision {
        if !self.mode.is_production() {
            return Decision::Continue { secure: false };
        }

        if !self.allowed_hosts.permits(request_host(parts)) {
            return Decision::NotFound;
        }

        let secure = is_secure_request(parts, self.trust_forwarded_proto);
        if !secure && self.ssl_forced {
            return match https_redirect_location(parts) {
                Some(location) => Decision::Redirect(location),
                None => Decision::MissingHost,
            };
        }

        Decision::Continue { secure }
    }

    /// Write the security headers for a request that was allowed through.
    pub fn apply_headers(&self, headers: &mut HeaderMap, secure: bool) {
        if self.mode.is_production() {
            self.headers.apply_transport(headers, secure);
        }
        self.headers.apply_content(headers);
    }
}

/// Axum middleware enforcing the interceptor's decisions.
///
/// Install with `axum::middleware::from_fn_with_state`.
pub async fn secure_headers_middleware(
    State(interceptor): State<Arc<SecureInterceptor>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    match interceptor.evaluate(&parts) {
        Decision::NotFound => {
            let host = request_host(&parts).unwrap_or("");
            tracing::warn!(host = %host, path = %parts.uri.path(), "Host not allowed");
            metrics::record_host_rejected();
            StatusCode::NOT_FOUND.into_response()
        }
        Decision::Redirect(location) => {
            tracing::debug!(path = %parts.uri.path(), location = ?location, "Redirecting to HTTPS");
            metrics::record_https_redirect();
            (StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response()
        }
        Decision::MissingHost => {
            tracing::warn!(path = %parts.uri.path(), "Cannot redirect to HTTPS without a host");
            (StatusCode::BAD_REQUEST, "Missing Host header").into_response()
        }
        Decision::Continue { secure } => {
            let mut response = next.run(Request::from_parts(parts, body)).await;
            interceptor.apply_headers(response.headers_mut(), secure);
            response
        }
    }
}
