//! Environment configuration, read once at start-up.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use imdb_engine::{ClientSettings, FetchSettings};
use log::LevelFilter;
use serde::Serialize;

use crate::logging::LogDestination;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}={value:?}: {message}")]
    Invalid {
        name: &'static str,
        value: String,
        message: String,
    },
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub credits: String,
    pub version: String,
    pub website: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            credits: "Made with ❤️ by Chintamani Pala".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website: "https://chintamanipala.in".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub fetch: FetchSettings,
    pub client: ClientSettings,
    pub info: ServiceInfo,
    pub log_level: LevelFilter,
    pub log_destination: LogDestination,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            fetch: FetchSettings::default(),
            client: ClientSettings::default(),
            info: ServiceInfo::default(),
            log_level: LevelFilter::Info,
            log_destination: LogDestination::Terminal,
        }
    }
}

impl ServerConfig {
    /// Reads `IMDB_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = parse_var(&lookup, "IMDB_BIND_ADDR")? {
            config.bind_addr = addr;
        }
        if let Some(base_url) = lookup("IMDB_BASE_URL") {
            config.client.base_url = base_url;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "IMDB_REQUEST_TIMEOUT_SECS")? {
            config.fetch.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "IMDB_CONNECT_TIMEOUT_SECS")? {
            config.fetch.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = parse_var(&lookup, "IMDB_FULL_INFO_LIMIT")? {
            config.client.full_info_limit = limit;
        }
        if let Some(concurrency) = parse_var::<usize>(&lookup, "IMDB_FULL_INFO_CONCURRENCY")? {
            if concurrency == 0 {
                return Err(ConfigError::Invalid {
                    name: "IMDB_FULL_INFO_CONCURRENCY",
                    value: concurrency.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
            config.client.full_info_concurrency = concurrency;
        }
        if let Some(credits) = lookup("IMDB_CREDITS") {
            config.info.credits = credits;
        }
        if let Some(website) = lookup("IMDB_WEBSITE") {
            config.info.website = website;
        }
        if let Some(level) = parse_var(&lookup, "IMDB_LOG_LEVEL")? {
            config.log_level = level;
        }
        if let Some(destination) = parse_var(&lookup, "IMDB_LOG_DESTINATION")? {
            config.log_destination = destination;
        }

        Ok(config)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|err: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            message: err.to_string(),
        })
}
