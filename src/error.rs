//! Error types for wallet sessions and local key management

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Wallet connector is not initialized")]
    NotInitialized,

    #[error("No wallet is connected")]
    NotConnected,

    #[error("Connection rejected: {0}")]
    ConnectionRejected(String),

    #[error("Connector error: {0}")]
    Connector(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("No mnemonic available for this account")]
    MnemonicUnavailable,

    #[error("No account selected")]
    NoAccount,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
