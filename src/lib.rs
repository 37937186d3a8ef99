//! Sui Wallet Session
//!
//! Two ways to hold a Sui account:
//! - a connect-and-query `WalletSession` that talks to a wallet connector,
//!   mirrors the connected account's balances and first owned objects, and
//!   submits a fixed test transfer
//! - a local `KeyManager` that generates or imports Ed25519 key pairs in memory
//!
//! # Security Model
//!
//! - Key material lives only in memory and is never persisted
//! - Mnemonics and exported keys are wrapped in `SecretString`
//! - Key types redact themselves in `Debug` output and are never logged

pub mod chain;
pub mod config;
pub mod connector;
pub mod keys;
pub mod session;
pub mod snapshot;
pub mod transaction;
pub mod units;

mod error;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use chain::{ChainClient, SuiRpcClient};
pub use config::{Config, ConnectorConfig, Network, RpcConfig, PRIVATE_KEY_ENV};
pub use connector::{ConnectedAccount, ConnectorFactory, LocalConnector, LocalConnectorFactory, WalletConnector};
pub use error::{Error, Result};
pub use keys::{KeyManager, SuiAddress, SuiKeyPair};
pub use session::{FetchOutcome, SessionState, SessionView, WalletSession};
pub use snapshot::{BalanceSnapshot, ObjectSnapshot, ObjectSummary};
pub use units::BalanceFormat;
