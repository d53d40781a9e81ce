//! Policy validation.
//!
//! # Responsibilities
//! - Reject pinning policies without keys or max-age
//! - Reject transport security without forced HTTPS
//! - Enforce preload requirements (minimum age, subdomains)
//! - Ensure configured strings are encodable as header values
//!
//! # Design Decisions
//! - Returns the first violated rule, not all of them
//! - Validation is a pure function: PolicyConfiguration → Result<(), PolicyError>
//! - Runs once at startup; a failure must stop the server from starting

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::{
    whole_seconds, KeyPinningPolicy, PolicyConfiguration, TransportSecurityPolicy,
    HSTS_PRELOAD_MIN_AGE,
};

/// Which sub-policy an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    KeyPinning,
    TransportSecurity,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::KeyPinning => f.write_str("HPKP"),
            PolicyKind::TransportSecurity => f.write_str("HSTS"),
        }
    }
}

/// Errors in a security policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A required field is empty or zero.
    #[error("{field} must be set when using {policy}")]
    MissingRequiredField {
        policy: PolicyKind,
        field: &'static str,
    },

    /// Fields that are individually valid but conflict.
    #[error("invalid {policy} configuration: {reason}")]
    InvalidCombination {
        policy: PolicyKind,
        reason: &'static str,
    },

    /// A configured string contains characters not allowed in a header.
    #[error("value for {header} is not a valid HTTP header value")]
    InvalidHeaderValue { header: &'static str },
}

/// Validate a complete policy configuration.
///
/// Key pinning is checked before transport security.
pub fn validate_policy(policy: &PolicyConfiguration) -> Result<(), PolicyError> {
    if let Some(pins) = &policy.key_pinning {
        validate_key_pinning(pins)?;
    }
    if let Some(hsts) = &policy.transport_security {
        validate_transport_security(hsts, policy.ssl_forced)?;
    }
    if !policy.content_security_policy.is_empty() {
        ensure_header_value("Content-Security-Policy", &policy.content_security_policy)?;
    }
    Ok(())
}

pub fn validate_key_pinning(pins: &KeyPinningPolicy) -> Result<(), PolicyError> {
    if pins.pinned_keys.is_empty() {
        return Err(PolicyError::MissingRequiredField {
            policy: PolicyKind::KeyPinning,
            field: "at least one pinned key",
        });
    }
    // A max-age that serializes as 0 tells browsers to drop the policy.
    if whole_seconds(pins.max_age) == 0 {
        return Err(PolicyError::MissingRequiredField {
            policy: PolicyKind::KeyPinning,
            field: "max age",
        });
    }
    for key in &pins.pinned_keys {
        ensure_quoted_value("Public-Key-Pins", key)?;
    }
    if let Some(uri) = &pins.report_uri {
        ensure_quoted_value("Public-Key-Pins", uri)?;
    }
    Ok(())
}

pub fn validate_transport_security(
    hsts: &TransportSecurityPolicy,
    ssl_forced: bool,
) -> Result<(), PolicyError> {
    if !ssl_forced {
        return Err(PolicyError::InvalidCombination {
            policy: PolicyKind::TransportSecurity,
            reason: "ssl_forced must be true",
        });
    }
    if whole_seconds(hsts.max_age) == 0 {
        return Err(PolicyError::MissingRequiredField {
            policy: PolicyKind::TransportSecurity,
            field: "max age",
        });
    }
    if hsts.preload {
        if hsts.max_age < HSTS_PRELOAD_MIN_AGE {
            return Err(PolicyError::InvalidCombination {
                policy: PolicyKind::TransportSecurity,
                reason: "max age must be at least eighteen weeks for preload",
            });
        }
        if !hsts.include_subdomains {
            return Err(PolicyError::InvalidCombination {
                policy: PolicyKind::TransportSecurity,
                reason: "subdomains must be included for preload",
            });
        }
    }
    Ok(())
}

fn ensure_header_value(header: &'static str, value: &str) -> Result<(), PolicyError> {
    HeaderValue::from_str(value)
        .map(drop)
        .map_err(|_| PolicyError::InvalidHeaderValue { header })
}

// Pinned keys and the report URI are emitted inside double quotes.
fn ensure_quoted_value(header: &'static str, value: &str) -> Result<(), PolicyError> {
    if value.contains(['"', '\\']) {
        return Err(PolicyError::InvalidHeaderValue { header });
    }
    ensure_header_value(header, value)
}
