//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Allowed client origins for CORS, comma-separated. Any origin when unset.
    pub client_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };

        let server_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(host))?;

        Ok(Self {
            server_addr,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            client_origin: lookup("CLIENT_ORIGIN").filter(|origin| !origin.trim().is_empty()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server host: {0}")]
    InvalidAddress(String),

    #[error("Invalid port: {0}")]
    InvalidPort(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_listen_on_3000() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.log_level, "info");
        assert!(config.client_origin.is_none());
    }

    #[test]
    fn reads_host_port_and_origins() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8081"),
            ("LOG_LEVEL", "debug"),
            ("CLIENT_ORIGIN", "http://localhost:5173,https://pong.example"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:8081".parse().unwrap());
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.client_origin.as_deref(),
            Some("http://localhost:5173,https://pong.example")
        );
    }

    #[test]
    fn rejects_bad_port_and_host() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("HOST", "not a host")])),
            Err(ConfigError::InvalidAddress(_))
        ));
    }
}
