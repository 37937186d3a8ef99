//! Configuration for wallet sessions

pub mod rpc;

use crate::units::BalanceFormat;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// Re-export RPC config
pub use rpc::RpcConfig;

/// Environment variable holding a base64 private key for the local connector
pub const PRIVATE_KEY_ENV: &str = "SUI_PRIVATE_KEY";

/// Supported Sui networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    /// Chain identifier used in connector namespaces, e.g. `sui:mainnet`
    pub fn chain_id(&self) -> &'static str {
        match self {
            Network::Mainnet => "sui:mainnet",
            Network::Testnet => "sui:testnet",
            Network::Devnet => "sui:devnet",
            Network::Localnet => "sui:localnet",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }

    /// Parse a chain identifier (`sui:testnet`) back into a network
    pub fn from_chain_id(chain_id: &str) -> Option<Self> {
        chain_id
            .strip_prefix("sui:")
            .and_then(|name| name.parse().ok())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            _ => Err(Error::Config(format!("Unknown network: {}", s))),
        }
    }
}

/// Connector modal colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

/// Which connector modals are shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModalMode {
    #[default]
    All,
    Before,
    Success,
    Error,
}

/// Metadata the connector shows to the user when asking for approval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DappMetadata {
    pub icon: String,
    pub name: String,
}

impl Default for DappMetadata {
    fn default() -> Self {
        Self {
            icon: "https://static.okx.com/cdn/assets/imgs/247/58E63FEA47A2B7D7.png".to_string(),
            name: "WheatChain Dapp".to_string(),
        }
    }
}

/// Options handed to the wallet connector at initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Dapp icon and display name
    #[serde(default)]
    pub dapp: DappMetadata,
    /// Where the wallet returns after approval (`none` stays in the wallet)
    #[serde(default = "default_return_strategy")]
    pub return_strategy: String,
    #[serde(default)]
    pub modals: ModalMode,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub theme: Theme,
}

fn default_return_strategy() -> String {
    "none".to_string()
}

fn default_language() -> String {
    "en_US".to_string()
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            dapp: DappMetadata::default(),
            return_strategy: default_return_strategy(),
            modals: ModalMode::All,
            language: default_language(),
            theme: Theme::Light,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Network the session connects to first
    #[serde(default)]
    pub network: Network,
    /// Connector initialization options
    #[serde(default)]
    pub connector: ConnectorConfig,
    /// How base-unit balances are rendered
    #[serde(default)]
    pub balance_format: BalanceFormat,
    /// Per-network RPC endpoint overrides
    #[serde(default)]
    pub rpc_urls: HashMap<Network, String>,
}

impl Config {
    /// Load a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// RPC endpoints with this config's overrides applied
    pub fn rpc(&self) -> RpcConfig {
        RpcConfig::from_env().with_overrides(&self.rpc_urls)
    }
}
