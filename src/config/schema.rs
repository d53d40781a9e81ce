//! Configuration schema definitions.
//!
//! This module defines the server configuration and the security policy
//! it carries. All types derive Serde traits for deserialization from
//! config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default HPKP max-age: 30 days.
pub const HPKP_DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Default HSTS max-age: 30 days.
pub const HSTS_DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Lowest max-age accepted for HSTS preload (eighteen weeks).
pub const HSTS_PRELOAD_MIN_AGE: Duration = Duration::from_secs(10_886_400);

/// Root configuration for the server binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Development or production behaviour of the interceptor.
    pub mode: Mode,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Security policy. Absent means minimal default protections only.
    pub policy: Option<PolicyConfiguration>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Deployment mode.
///
/// Host enforcement, forced HTTPS and transport pinning only run in
/// `Production`, so plaintext local development keeps working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    pub fn is_production(self) -> bool {
        matches!(self, Mode::Production)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security policy applied to every response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfiguration {
    /// Hostnames allowed to reach this server. Empty allows all.
    pub allowed_hosts: Vec<String>,

    /// Content Security Policy. Empty disables the CSP headers.
    pub content_security_policy: String,

    /// Whether responses may be displayed inside a frame of another origin.
    pub frame_embedding_allowed: bool,

    /// HTTP Public Key Pinning.
    pub key_pinning: Option<KeyPinningPolicy>,

    /// HTTP Strict Transport Security.
    pub transport_security: Option<TransportSecurityPolicy>,

    /// Redirect insecure requests to HTTPS.
    pub ssl_forced: bool,

    /// Treat `X-Forwarded-Proto: https` as proof of a secure connection.
    /// Only safe behind a proxy that overwrites the header.
    pub trust_forwarded_proto: bool,
}

impl Default for PolicyConfiguration {
    fn default() -> Self {
        Self {
            allowed_hosts: Vec::new(),
            content_security_policy: String::new(),
            frame_embedding_allowed: false,
            key_pinning: None,
            transport_security: None,
            ssl_forced: false,
            trust_forwarded_proto: true,
        }
    }
}

/// HTTP Public Key Pinning options (RFC 7469).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KeyPinningPolicy {
    /// Base64 encoded SPKI fingerprints. Required.
    #[serde(default)]
    pub pinned_keys: Vec<String>,

    /// How long browsers remember the pins. Required.
    #[serde(
        rename = "max_age_secs",
        with = "duration_secs",
        default = "default_hpkp_max_age"
    )]
    pub max_age: Duration,

    #[serde(default)]
    pub include_subdomains: bool,

    /// Where browsers report pin validation failures.
    #[serde(default)]
    pub report_uri: Option<String>,
}

/// HTTP Strict Transport Security options (RFC 6797).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransportSecurityPolicy {
    /// How long browsers only use HTTPS for this site. Required.
    #[serde(
        rename = "max_age_secs",
        with = "duration_secs",
        default = "default_hsts_max_age"
    )]
    pub max_age: Duration,

    #[serde(default)]
    pub include_subdomains: bool,

    /// Opt into browser preload lists (not part of RFC 6797).
    #[serde(default)]
    pub preload: bool,
}

impl Default for TransportSecurityPolicy {
    fn default() -> Self {
        Self {
            max_age: HSTS_DEFAULT_MAX_AGE,
            include_subdomains: false,
            preload: false,
        }
    }
}

/// Whole seconds of `duration`, rounded to nearest with ties to even.
pub fn whole_seconds(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    match duration.subsec_nanos().cmp(&500_000_000) {
        std::cmp::Ordering::Less => secs,
        std::cmp::Ordering::Greater => secs + 1,
        std::cmp::Ordering::Equal => secs + secs % 2,
    }
}

fn default_hpkp_max_age() -> Duration {
    HPKP_DEFAULT_MAX_AGE
}

fn default_hsts_max_age() -> Duration {
    HSTS_DEFAULT_MAX_AGE
}

/// Durations as (possibly fractional) seconds.
mod duration_secs {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if value.subsec_nanos() == 0 {
            serializer.serialize_u64(value.as_secs())
        } else {
            serializer.serialize_f64(value.as_secs_f64())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_from_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            mode = "production"

            [policy]
            allowed_hosts = ["example.com"]
            content_security_policy = "default-src 'self'"
            ssl_forced = true

            [policy.key_pinning]
            pinned_keys = ["abc=", "def="]
            max_age_secs = 5184000
            include_subdomains = true
            report_uri = "https://example.com/r"

            [policy.transport_security]
            include_subdomains = true
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, Mode::Production);
        let policy = config.policy.unwrap();
        assert_eq!(policy.allowed_hosts, vec!["example.com".to_string()]);
        assert!(policy.trust_forwarded_proto);

        let pins = policy.key_pinning.unwrap();
        assert_eq!(pins.max_age, Duration::from_secs(5_184_000));
        assert_eq!(pins.report_uri.as_deref(), Some("https://example.com/r"));

        let hsts = policy.transport_security.unwrap();
        assert_eq!(hsts.max_age, HSTS_DEFAULT_MAX_AGE);
        assert!(!hsts.preload);
    }

    #[test]
    fn fractional_max_age() {
        let hsts: TransportSecurityPolicy = toml::from_str("max_age_secs = 1.5").unwrap();
        assert_eq!(hsts.max_age, Duration::from_millis(1500));
    }

    #[test]
    fn negative_max_age_rejected() {
        assert!(toml::from_str::<TransportSecurityPolicy>("max_age_secs = -1").is_err());
    }

    #[test]
    fn empty_config_is_development_without_policy() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.mode, Mode::Development);
        assert!(config.policy.is_none());
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
