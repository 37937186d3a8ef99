//! Wallet connector seam
//!
//! A connector is whatever holds the user's keys and approves sessions: a
//! browser extension bridge, a mobile wallet relay, or the in-process
//! `LocalConnector`. The session only talks to it through `WalletConnector`.

mod local;

pub use local::{LocalConnector, LocalConnectorFactory};

use crate::config::{ConnectorConfig, Network};
use crate::transaction::{SubmittedTransaction, TransferRequest};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Namespace name for Sui chains
pub const SUI_NAMESPACE: &str = "sui";

/// Chains requested per namespace, e.g. `sui -> [sui:mainnet]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Namespaces {
    pub namespaces: BTreeMap<String, Vec<String>>,
}

impl Namespaces {
    /// Request the `sui` namespace restricted to one network
    pub fn sui(network: Network) -> Self {
        let mut namespaces = BTreeMap::new();
        namespaces.insert(
            SUI_NAMESPACE.to_string(),
            vec![network.chain_id().to_string()],
        );
        Self { namespaces }
    }

    /// Requested chains of a namespace
    pub fn chains(&self, namespace: &str) -> &[String] {
        self.namespaces
            .get(namespace)
            .map(|chains| chains.as_slice())
            .unwrap_or(&[])
    }
}

/// An approved connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorSession {
    /// Connector-assigned session identifier
    pub topic: String,
    /// Chains the user approved
    pub chains: Vec<String>,
}

/// The account a connector exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedAccount {
    pub address: String,
    pub public_key: String,
}

#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Ask the user to approve a session; `Ok(None)` means they dismissed the prompt
    async fn open_session(&self, namespaces: &Namespaces) -> Result<Option<ConnectorSession>>;

    /// The account of the open session
    async fn account(&self) -> Result<ConnectedAccount>;

    /// Move the open session to another chain, e.g. `sui:testnet`
    async fn switch_chain(&self, chain_id: &str) -> Result<()>;

    /// Sign and broadcast a transfer; returns once the connector has submitted it
    async fn sign_and_submit(&self, request: &TransferRequest) -> Result<SubmittedTransaction>;

    async fn disconnect(&self) -> Result<()>;
}

/// Builds a connector from its configuration, once per session
#[async_trait]
pub trait ConnectorFactory: Send + Sync {
    type Connector: WalletConnector;

    async fn initialize(&self, config: &ConnectorConfig) -> Result<Self::Connector>;
}

#[async_trait]
impl<T: WalletConnector + ?Sized> WalletConnector for Arc<T> {
    async fn open_session(&self, namespaces: &Namespaces) -> Result<Option<ConnectorSession>> {
        (**self).open_session(namespaces).await
    }

    async fn account(&self) -> Result<ConnectedAccount> {
        (**self).account().await
    }

    async fn switch_chain(&self, chain_id: &str) -> Result<()> {
        (**self).switch_chain(chain_id).await
    }

    async fn sign_and_submit(&self, request: &TransferRequest) -> Result<SubmittedTransaction> {
        (**self).sign_and_submit(request).await
    }

    async fn disconnect(&self) -> Result<()> {
        (**self).disconnect().await
    }
}
