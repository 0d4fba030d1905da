//! Server configuration.

use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::Verbosity;

use super::error::ConfigError;
use super::routing::RoutingConfig;

/// Well-known rendezvous port clients connect to first.
pub const RENDEZVOUS_PORT: u16 = 55600;

/// IANA dynamic/private port range, used for per-session listeners.
pub const EPHEMERAL_PORTS: RangeInclusive<u16> = 49152..=65535;

/// Configuration for the whole server process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address of the rendezvous listener.
    pub rendezvous_addr: SocketAddr,

    /// Ports that per-session listeners may be bound to.
    pub session_ports: RangeInclusive<u16>,

    /// Delay between attempts to bind the rendezvous listener.
    pub bind_retry_delay: Duration,

    /// Path of the JSON network description.
    pub network_path: PathBuf,

    /// Log severity threshold.
    pub verbosity: Verbosity,

    /// Edge weight constants.
    pub routing: RoutingConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable | Meaning | Default |
    /// |---|---|---|
    /// | `TRANSIT_ADDR` | rendezvous listen address | `0.0.0.0:55600` |
    /// | `TRANSIT_SESSION_PORTS` | session port range, `low-high` | `49152-65535` |
    /// | `TRANSIT_NETWORK` | network description path | `stations.json` |
    /// | `TRANSIT_LOG_LEVEL` | verbosity, `1`..`5` | `5` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("TRANSIT_ADDR") {
            config.rendezvous_addr = value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    var: "TRANSIT_ADDR",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(value) = lookup("TRANSIT_SESSION_PORTS") {
            config.session_ports =
                parse_port_range(&value).map_err(|reason| ConfigError::Invalid {
                    var: "TRANSIT_SESSION_PORTS",
                    value: value.clone(),
                    reason: reason.to_string(),
                })?;
        }

        if let Some(value) = lookup("TRANSIT_NETWORK") {
            config.network_path = PathBuf::from(value);
        }

        if let Some(value) = lookup("TRANSIT_LOG_LEVEL") {
            config.verbosity = value.parse().map_err(|e: crate::logging::InvalidVerbosity| {
                ConfigError::Invalid {
                    var: "TRANSIT_LOG_LEVEL",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rendezvous_addr: SocketAddr::from(([0, 0, 0, 0], RENDEZVOUS_PORT)),
            session_ports: EPHEMERAL_PORTS,
            bind_retry_delay: Duration::from_secs(5),
            network_path: PathBuf::from("stations.json"),
            verbosity: Verbosity::default(),
            routing: RoutingConfig::default(),
        }
    }
}

/// Parse `low-high` into an inclusive port range.
fn parse_port_range(value: &str) -> Result<RangeInclusive<u16>, &'static str> {
    let (low, high) = value
        .split_once('-')
        .ok_or("expected a range of the form low-high")?;
    let low: u16 = low.trim().parse().map_err(|_| "low port is not a port number")?;
    let high: u16 = high
        .trim()
        .parse()
        .map_err(|_| "high port is not a port number")?;
    if low == 0 || low > high {
        return Err("range must be non-empty and above port 0");
    }
    Ok(low..=high)
}
