//! Node configuration types.

use anyhow::Context;
use bazaar_peer::PeerConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

/// Registry settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistrySection {
    /// Interface the join server binds to.
    pub bind_ip: IpAddr,
    /// The registry's join port; peers are assigned ports
    /// monotonically above it.
    pub port_start: u16,
    /// Peer limit; also the flood hop budget handed to joiners.
    pub limit: usize,
    /// Neighbor radius of the band topology.
    pub radius: u32,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port_start: 10250,
            limit: 10,
            radius: 3,
        }
    }
}

/// Full node configuration, loadable from a YAML file. Missing keys
/// fall back to defaults; command-line flags override file values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Log level.
    pub log_level: String,
    /// Registry settings, used by the `registry` subcommand.
    pub registry: RegistrySection,
    /// Peer settings, used by the `peer` subcommand.
    pub peer: PeerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            registry: RegistrySection::default(),
            peer: PeerConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`; a missing file means all
    /// defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
