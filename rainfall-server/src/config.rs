//! Server configuration from the environment.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use crate::cache::{CacheConfig, DEFAULT_TTL};
use crate::upstream::EnvironmentConfig;

/// Default listen address.
const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000));

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything `main` needs to wire the service together.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: SocketAddr,
    /// Upstream client settings
    pub upstream: EnvironmentConfig,
    /// Result cache settings
    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `RAINFALL_UPSTREAM_BASE_URL` | Environment Agency flood-monitoring API |
    /// | `RAINFALL_BIND_ADDR` | `127.0.0.1:3000` |
    /// | `RAINFALL_CACHE_TTL_SECS` | `300` |
    /// | `RAINFALL_UPSTREAM_TIMEOUT_SECS` | unset (reqwest default) |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_var(&lookup, "RAINFALL_BIND_ADDR")?.unwrap_or(DEFAULT_BIND_ADDR);

        let mut upstream = EnvironmentConfig::new();
        if let Some(url) = lookup("RAINFALL_UPSTREAM_BASE_URL") {
            upstream = upstream.with_base_url(url);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "RAINFALL_UPSTREAM_TIMEOUT_SECS")? {
            upstream = upstream.with_timeout(secs);
        }

        let ttl = parse_var::<u64>(&lookup, "RAINFALL_CACHE_TTL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL);

        Ok(Self {
            bind_addr,
            upstream,
            cache: CacheConfig::new(ttl),
        })
    }
}

/// Parse an optional variable, failing if it is set but malformed.
fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(name) else {
        return Ok(None);
    };

    match value.trim().parse() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => Err(ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
