//! Configuration loading from disk and overrides.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values supplied on the command line or through the environment.
/// Each one, when present, wins over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Raw upstream address.
    pub upstream_url: Option<String>,
    /// Full bind address.
    pub bind_address: Option<String>,
    /// Port only; replaces the port of the bind address.
    pub port: Option<u16>,
}

impl ConfigOverrides {
    /// Apply the overrides in place.
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(url) = &self.upstream_url {
            config.upstream.url = Some(url.clone());
        }

        if let Some(bind_address) = &self.bind_address {
            config.listener.bind_address = bind_address.clone();
        }

        if let Some(port) = self.port {
            // An unparseable bind address is left for validation to report.
            if let Ok(mut addr) = config.listener.bind_address.parse::<SocketAddr>() {
                addr.set_port(port);
                config.listener.bind_address = addr.to_string();
            }
        }
    }
}

/// Parse configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Build the effective configuration: defaults, then the optional file,
/// then overrides, validated as a whole.
pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => ProxyConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
