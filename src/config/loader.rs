//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_policy, PolicyError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid security policy: {0}")]
    Policy(#[from] PolicyError),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;

    if let Some(policy) = &config.policy {
        validate_policy(policy)?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsts_without_forced_ssl_fails_to_load() {
        let err = parse_config(
            r#"
            [policy.transport_security]
            max_age_secs = 60
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Policy(PolicyError::InvalidCombination { .. })
        ));
    }

    #[test]
    fn syntax_error_is_parse_error() {
        assert!(matches!(parse_config("mode = "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/secure-headers.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
