//! Bazaar node - entry point for the registry and for trading peers.

use anyhow::Result;
use bazaar_peer::Role;
use bazaar_registry::{RegistryConfig, RegistryServer};
use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::Config;

/// Bazaar - an unstructured peer-to-peer marketplace overlay
#[derive(Parser, Debug)]
#[command(name = "bazaar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "bazaar.yaml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the topology registry
    Registry {
        /// Join port; peers get ports monotonically above it
        #[arg(long)]
        port_start: Option<u16>,

        /// Maximum number of peers admitted to the overlay
        #[arg(long)]
        limit: Option<usize>,

        /// Neighbor radius of the band topology
        #[arg(long)]
        radius: Option<u32>,
    },

    /// Run a trading peer
    Peer {
        /// Registry join address
        #[arg(long)]
        registry_addr: Option<SocketAddr>,

        /// Market role; omitted means a coin flip
        #[arg(long, value_enum)]
        role: Option<RoleArg>,

        /// Directory for trade logs
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RoleArg {
    Buyer,
    Seller,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Buyer => Role::Buyer,
            RoleArg::Seller => Role::Seller,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let log_level = cli.log_level.unwrap_or_else(|| config.log_level.clone());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "bazaar_node={log_level},bazaar_peer={log_level},bazaar_registry={log_level}"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting bazaar node");

    match cli.command {
        Commands::Registry {
            port_start,
            limit,
            radius,
        } => {
            let mut section = config.registry;
            if let Some(port_start) = port_start {
                section.port_start = port_start;
            }
            if let Some(limit) = limit {
                section.limit = limit;
            }
            if let Some(radius) = radius {
                section.radius = radius;
            }
            let server = RegistryServer::bind(RegistryConfig {
                bind_ip: section.bind_ip,
                port_start: section.port_start,
                limit: section.limit,
                radius: section.radius,
            })
            .await?;
            server.run().await;
            Ok(())
        }
        Commands::Peer {
            registry_addr,
            role,
            output_dir,
        } => {
            let mut peer = config.peer;
            if let Some(registry_addr) = registry_addr {
                peer.registry_addr = registry_addr;
            }
            if let Some(output_dir) = output_dir {
                peer.output_dir = output_dir;
            }
            std::fs::create_dir_all(&peer.output_dir)?;
            bazaar_peer::run(peer, role.map(Role::from)).await?;
            Ok(())
        }
    }
}
