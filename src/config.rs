use crate::fact::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PERIODIC_HOST is not an IP address: {0:?}")]
    InvalidHost(String),
    #[error("PERIODIC_PORT is not a port number: {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_dir: PathBuf,
    pub public_url: String,
    pub fact_endpoint: String,
    pub fact_model: String,
    pub fact_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source; unset and blank values
    /// take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = match var("PERIODIC_HOST") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(raw))?,
            None => IpAddr::from([127, 0, 0, 1]),
        };
        let port = match var("PERIODIC_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3000,
        };
        let addr = SocketAddr::new(host, port);

        let data_dir = var("PERIODIC_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let public_url = var("PERIODIC_PUBLIC_URL").unwrap_or_else(|| format!("http://{addr}"));

        Ok(Config {
            addr,
            data_dir,
            public_url,
            fact_endpoint: var("PERIODIC_FACT_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            fact_model: var("PERIODIC_FACT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            fact_api_key: var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")),
        })
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("periodic"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_bind_loopback() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.public_url, "http://127.0.0.1:3000");
        assert_eq!(config.fact_model, DEFAULT_MODEL);
        assert_eq!(config.fact_api_key, None);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("PERIODIC_HOST", "0.0.0.0"),
            ("PERIODIC_PORT", "8080"),
            ("PERIODIC_DATA_DIR", "/tmp/periodic"),
            ("GOOGLE_API_KEY", "k2"),
            ("PERIODIC_PUBLIC_URL", "https://table.example"),
        ])
        .unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/periodic"));
        assert_eq!(config.fact_api_key.as_deref(), Some("k2"));
        assert_eq!(config.public_url, "https://table.example");
    }

    #[test]
    fn gemini_key_wins_over_google_key() {
        let config = config(&[("GEMINI_API_KEY", "k1"), ("GOOGLE_API_KEY", "k2")]).unwrap();
        assert_eq!(config.fact_api_key.as_deref(), Some("k1"));
    }

    #[test]
    fn rejects_bad_port_and_host() {
        assert_eq!(
            config(&[("PERIODIC_PORT", "http")]),
            Err(ConfigError::InvalidPort("http".to_string()))
        );
        assert_eq!(
            config(&[("PERIODIC_PORT", "70000")]),
            Err(ConfigError::InvalidPort("70000".to_string()))
        );
        assert!(matches!(
            config(&[("PERIODIC_HOST", "localhost")]),
            Err(ConfigError::InvalidHost(_))
        ));
    }
}
