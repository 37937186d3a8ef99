//! RPC endpoint configuration
//!
//! Endpoints resolve in this order:
//! 1. Overrides from the config file (`rpc_urls`)
//! 2. Per-network env vars (`SUI_MAINNET_RPC_URL`, `SUI_TESTNET_RPC_URL`, ...)
//! 3. Public fullnodes
//!
//! # Examples
//!
//! ```bash
//! export SUI_TESTNET_RPC_URL="https://sui-testnet.example.com"
//! ```

use super::Network;
use crate::{Error, Result};
use std::collections::HashMap;

/// RPC configuration for every Sui network
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// RPC URLs indexed by network
    urls: HashMap<Network, String>,
}

/// Environment variable names
mod env_vars {
    pub const MAINNET_RPC_URL: &str = "SUI_MAINNET_RPC_URL";
    pub const TESTNET_RPC_URL: &str = "SUI_TESTNET_RPC_URL";
    pub const DEVNET_RPC_URL: &str = "SUI_DEVNET_RPC_URL";
    pub const LOCALNET_RPC_URL: &str = "SUI_LOCALNET_RPC_URL";
}

/// Public fullnode endpoints (rate limited)
pub mod public_rpcs {
    pub const MAINNET: &str = "https://fullnode.mainnet.sui.io:443";
    pub const TESTNET: &str = "https://fullnode.testnet.sui.io:443";
    pub const DEVNET: &str = "https://fullnode.devnet.sui.io:443";
    pub const LOCALNET: &str = "http://127.0.0.1:9000";
}

const ALL_NETWORKS: [(Network, &str, &str); 4] = [
    (Network::Mainnet, env_vars::MAINNET_RPC_URL, public_rpcs::MAINNET),
    (Network::Testnet, env_vars::TESTNET_RPC_URL, public_rpcs::TESTNET),
    (Network::Devnet, env_vars::DEVNET_RPC_URL, public_rpcs::DEVNET),
    (Network::Localnet, env_vars::LOCALNET_RPC_URL, public_rpcs::LOCALNET),
];

impl RpcConfig {
    /// Public fullnodes only, ignoring the environment
    pub fn public() -> Self {
        let urls = ALL_NETWORKS
            .iter()
            .map(|(network, _, url)| (*network, url.to_string()))
            .collect();
        Self { urls }
    }

    /// Create RPC config from environment variables, falling back to public fullnodes
    pub fn from_env() -> Self {
        let mut urls = HashMap::new();

        for (network, var, public) in ALL_NETWORKS {
            match std::env::var(var) {
                Ok(url) => {
                    tracing::debug!(%network, "Using {} for RPC", var);
                    urls.insert(network, url);
                }
                Err(_) => {
                    urls.insert(network, public.to_string());
                }
            }
        }

        Self { urls }
    }

    /// Create with explicit RPC URLs
    pub fn with_urls(urls: HashMap<Network, String>) -> Self {
        Self { urls }
    }

    /// Replace endpoints for the networks present in `overrides`
    pub fn with_overrides(mut self, overrides: &HashMap<Network, String>) -> Self {
        for (network, url) in overrides {
            self.urls.insert(*network, url.clone());
        }
        self
    }

    /// Get RPC URL for a network
    pub fn get(&self, network: Network) -> Option<&str> {
        self.urls.get(&network).map(|s| s.as_str())
    }

    /// Get a parsed RPC URL for a network
    pub fn endpoint(&self, network: Network) -> Result<url::Url> {
        let raw = self
            .get(network)
            .ok_or_else(|| Error::Config(format!("No RPC URL configured for {}", network)))?;
        raw.parse()
            .map_err(|e| Error::Config(format!("Invalid RPC URL {}: {}", raw, e)))
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
