//! Gateway configuration from environment variables

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use relay_engine::RelayConfig;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub relay: RelayConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `HOST` (default: 0.0.0.0)
    /// - `PORT` (default: 8080)
    /// - `RELAY_QUEUE_CAPACITY` (default: 50)
    /// - `RELAY_TRACKER_CAPACITY` (default: 200)
    /// - `RELAY_RETENTION_SECS` (default: 600)
    /// - `RELAY_SWEEP_INTERVAL_SECS` (default: 60)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = RelayConfig::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let relay = RelayConfig {
            queue_capacity: parsed("RELAY_QUEUE_CAPACITY")
                .map(|v| v as usize)
                .unwrap_or(defaults.queue_capacity),
            tracker_capacity: parsed("RELAY_TRACKER_CAPACITY")
                .map(|v| v as usize)
                .unwrap_or(defaults.tracker_capacity),
            retention: parsed("RELAY_RETENTION_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.retention),
            sweep_interval: parsed("RELAY_SWEEP_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
        }
        .normalized();

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(8080),
            relay,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip = IpAddr::from_str(&self.host)
            .with_context(|| format!("invalid HOST address: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
