//! Process configuration, read from the environment.
//!
//! | variable                | default          |
//! |-------------------------|------------------|
//! | `CATALOG_ADDR`          | `0.0.0.0:8080`   |
//! | `CATALOG_PRODUCTS_PATH` | `products.json`  |
//! | `CATALOG_LOG_FORMAT`    | `json`           |
//!
//! Unset and empty values both fall back to the default.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use catalog_observability::{LogFormat, ParseLogFormatError};

pub const ADDR_VAR: &str = "CATALOG_ADDR";
pub const PRODUCTS_PATH_VAR: &str = "CATALOG_PRODUCTS_PATH";
pub const LOG_FORMAT_VAR: &str = "CATALOG_LOG_FORMAT";

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PRODUCTS_PATH: &str = "products.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CATALOG_ADDR: invalid listen address `{value}`: {source}")]
    InvalidAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("CATALOG_LOG_FORMAT: {0}")]
    InvalidLogFormat(#[from] ParseLogFormatError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub products_path: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (environment, map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = match get(ADDR_VAR) {
            Some(raw) => parse_addr(&raw)?,
            None => parse_addr(DEFAULT_ADDR)?,
        };

        let products_path = get(PRODUCTS_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PRODUCTS_PATH));

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            addr,
            products_path,
            log_format,
        })
    }
}

/// Parse a listen address; a bare `:port` binds all interfaces.
fn parse_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    let raw = raw.trim();
    let full = match raw.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => raw.to_string(),
    };

    full.parse().map_err(|source| ConfigError::InvalidAddr {
        value: raw.to_string(),
        source,
    })
}
