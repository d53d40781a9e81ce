//! Security header construction.
//!
//! # Responsibilities
//! - Build `Public-Key-Pins` and `Strict-Transport-Security` values
//! - Compile every configured header once at startup
//! - Write the compiled headers into response header maps
//!
//! # Design Decisions
//! - Builders are pure and assume validated input; the `build_*` forms
//!   validate first for callers holding unchecked policies
//! - Per-request work only clones precomputed `HeaderValue`s
//! - Policy values overwrite headers the application handler set
//! - Max-age is rounded to the nearest whole second, ties to even

use std::fmt::Write as _;
use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, CONTENT_SECURITY_POLICY, STRICT_TRANSPORT_SECURITY,
    X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
};

use crate::config::schema::{
    whole_seconds, KeyPinningPolicy, PolicyConfiguration, TransportSecurityPolicy,
};
use crate::config::validation::{
    validate_key_pinning, validate_policy, validate_transport_security, PolicyError,
};

pub const PUBLIC_KEY_PINS: HeaderName = HeaderName::from_static("public-key-pins");
pub const X_CONTENT_SECURITY_POLICY: HeaderName =
    HeaderName::from_static("x-content-security-policy");
pub const X_WEBKIT_CSP: HeaderName = HeaderName::from_static("x-webkit-csp");

/// Build the `Public-Key-Pins` value for an already validated policy.
pub fn key_pinning_header_value(pins: &KeyPinningPolicy) -> String {
    let mut value = pins
        .pinned_keys
        .iter()
        .map(|key| format!("pin-sha256=\"{key}\""))
        .collect::<Vec<_>>()
        .join("; ");

    let _ = write!(value, "; max-age={}", whole_seconds(pins.max_age));

    if pins.include_subdomains {
        value.push_str("; includeSubdomains");
    }
    if let Some(uri) = &pins.report_uri {
        let _ = write!(value, "; report-uri=\"{uri}\"");
    }
    value
}

/// Build the `Strict-Transport-Security` value for an already validated policy.
pub fn transport_security_header_value(hsts: &TransportSecurityPolicy) -> String {
    let mut value = format!("max-age={}", whole_seconds(hsts.max_age));

    if hsts.include_subdomains {
        value.push_str("; includeSubdomains");
    }
    if hsts.preload {
        value.push_str("; preload");
    }
    value
}

/// Validate the pinning policy, then build its header value.
pub fn build_key_pinning_header(pins: &KeyPinningPolicy) -> Result<String, PolicyError> {
    validate_key_pinning(pins)?;
    Ok(key_pinning_header_value(pins))
}

/// Validate the transport security policy, then build its header value.
pub fn build_transport_security_header(
    hsts: &TransportSecurityPolicy,
    ssl_forced: bool,
) -> Result<String, PolicyError> {
    validate_transport_security(hsts, ssl_forced)?;
    Ok(transport_security_header_value(hsts))
}

/// Header values compiled from a validated policy.
#[derive(Debug, Clone, Default)]
pub struct SecurityHeaders {
    key_pinning: Option<HeaderValue>,
    transport_security: Option<HeaderValue>,
    content_security_policy: Option<HeaderValue>,
    frame_embedding_allowed: bool,
}

impl SecurityHeaders {
    /// Validate `policy` and compile its header values.
    ///
    /// `None` yields the minimal defaults: frame, MIME sniffing and XSS
    /// protection.
    pub fn compile(policy: Option<&PolicyConfiguration>) -> Result<Self, PolicyError> {
        let Some(policy) = policy else {
            return Ok(Self::default());
        };
        validate_policy(policy)?;

        let key_pinning = policy
            .key_pinning
            .as_ref()
            .map(|pins| to_header_value("Public-Key-Pins", key_pinning_header_value(pins)))
            .transpose()?;
        let transport_security = policy
            .transport_security
            .as_ref()
            .map(|hsts| {
                to_header_value(
                    "Strict-Transport-Security",
                    transport_security_header_value(hsts),
                )
            })
            .transpose()?;
        let content_security_policy = (!policy.content_security_policy.is_empty())
            .then(|| {
                to_header_value(
                    "Content-Security-Policy",
                    policy.content_security_policy.clone(),
                )
            })
            .transpose()?;

        Ok(Self {
            key_pinning,
            transport_security,
            content_security_policy,
            frame_embedding_allowed: policy.frame_embedding_allowed,
        })
    }

    /// Write the pinning (secure requests only) and HSTS headers.
    pub fn apply_transport(&self, headers: &mut HeaderMap, secure: bool) {
        if secure {
            if let Some(value) = &self.key_pinning {
                headers.insert(PUBLIC_KEY_PINS, value.clone());
            }
        }
        if let Some(value) = &self.transport_security {
            headers.insert(STRICT_TRANSPORT_SECURITY, value.clone());
        }
    }

    /// Write the headers that apply in every mode.
    pub fn apply_content(&self, headers: &mut HeaderMap) {
        if let Some(csp) = &self.content_security_policy {
            headers.insert(CONTENT_SECURITY_POLICY, csp.clone());
            headers.insert(X_CONTENT_SECURITY_POLICY, csp.clone());
            headers.insert(X_WEBKIT_CSP, csp.clone());
        }
        if !self.frame_embedding_allowed {
            headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
        }
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
    }
}

fn to_header_value(header: &'static str, value: String) -> Result<HeaderValue, PolicyError> {
    HeaderValue::try_from(value).map_err(|_| PolicyError::InvalidHeaderValue { header })
}
