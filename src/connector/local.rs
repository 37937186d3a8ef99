//! In-process connector backed by a local key pair
//!
//! Approves every session request immediately and signs with the key pair it
//! was built with. Transfers are assembled by the fullnode
//! (`unsafe_transferSui`), signed locally, then executed.

use super::{ConnectedAccount, ConnectorFactory, ConnectorSession, Namespaces, WalletConnector, SUI_NAMESPACE};
use crate::chain::{SuiRpcClient, SUI_COIN_TYPE};
use crate::config::{ConnectorConfig, Network, RpcConfig};
use crate::keys::SuiKeyPair;
use crate::transaction::{SubmittedTransaction, TransferRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Connector that holds the key pair itself
pub struct LocalConnector {
    keypair: Arc<SuiKeyPair>,
    rpc: SuiRpcClient,
    network: RwLock<Network>,
    session: RwLock<Option<ConnectorSession>>,
}

impl LocalConnector {
    pub fn new(keypair: Arc<SuiKeyPair>, rpc: RpcConfig) -> Self {
        Self {
            keypair,
            rpc: SuiRpcClient::new(rpc),
            network: RwLock::new(Network::default()),
            session: RwLock::new(None),
        }
    }

    pub async fn network(&self) -> Network {
        *self.network.read().await
    }

    async fn require_session(&self) -> Result<()> {
        if self.session.read().await.is_some() {
            Ok(())
        } else {
            Err(Error::NotConnected)
        }
    }

    fn parse_chain(chain_id: &str) -> Result<Network> {
        Network::from_chain_id(chain_id)
            .ok_or_else(|| Error::Connector(format!("Unsupported chain: {}", chain_id)))
    }
}

#[async_trait]
impl WalletConnector for LocalConnector {
    async fn open_session(&self, namespaces: &Namespaces) -> Result<Option<ConnectorSession>> {
        let chains = namespaces.chains(SUI_NAMESPACE);
        let first = chains
            .first()
            .ok_or_else(|| Error::Connector("No sui chain requested".to_string()))?;
        let network = Self::parse_chain(first)?;

        let session = ConnectorSession {
            topic: uuid::Uuid::new_v4().to_string(),
            chains: chains.to_vec(),
        };

        *self.network.write().await = network;
        *self.session.write().await = Some(session.clone());

        tracing::info!(
            topic = %session.topic,
            %network,
            address = %self.keypair.address(),
            "Local connector approved session"
        );
        Ok(Some(session))
    }

    async fn account(&self) -> Result<ConnectedAccount> {
        self.require_session().await?;
        Ok(ConnectedAccount {
            address: self.keypair.address().to_hex(),
            public_key: self.keypair.public_key_base64(),
        })
    }

    async fn switch_chain(&self, chain_id: &str) -> Result<()> {
        self.require_session().await?;
        let network = Self::parse_chain(chain_id)?;
        *self.network.write().await = network;
        tracing::info!(%network, "Local connector switched chain");
        Ok(())
    }

    async fn sign_and_submit(&self, request: &TransferRequest) -> Result<SubmittedTransaction> {
        self.require_session().await?;
        let network = self.network().await;
        let signer = self.keypair.address().to_hex();

        let needed = u128::from(request.amount) + u128::from(request.gas_budget);
        let coin = self
            .rpc
            .get_coins(network, &signer, SUI_COIN_TYPE)
            .await?
            .into_iter()
            .max_by_key(|coin| coin.balance)
            .filter(|coin| coin.balance >= needed)
            .ok_or_else(|| {
                Error::Transaction(format!("No SUI coin with at least {} MIST", needed))
            })?;

        let tx_bytes = self
            .rpc
            .unsafe_transfer_sui(
                network,
                &signer,
                &coin.coin_object_id,
                request.gas_budget,
                &request.recipient,
                request.amount,
            )
            .await?;

        let signature = self.keypair.sign_transaction(&tx_bytes);
        let digest = self
            .rpc
            .execute_transaction_block(network, &tx_bytes, signature)
            .await?;

        tracing::info!(%digest, %network, "Submitted transfer");
        Ok(SubmittedTransaction::new(digest))
    }

    async fn disconnect(&self) -> Result<()> {
        if let Some(session) = self.session.write().await.take() {
            tracing::info!(topic = %session.topic, "Local connector closed session");
        }
        Ok(())
    }
}

/// Builds `LocalConnector`s for one key pair
pub struct LocalConnectorFactory {
    keypair: Arc<SuiKeyPair>,
    rpc: RpcConfig,
}

impl LocalConnectorFactory {
    pub fn new(keypair: Arc<SuiKeyPair>, rpc: RpcConfig) -> Self {
        Self { keypair, rpc }
    }
}

#[async_trait]
impl ConnectorFactory for LocalConnectorFactory {
    type Connector = LocalConnector;

    async fn initialize(&self, config: &ConnectorConfig) -> Result<LocalConnector> {
        tracing::debug!(
            dapp = %config.dapp.name,
            language = %config.language,
            return_strategy = %config.return_strategy,
            "Initializing local connector"
        );
        Ok(LocalConnector::new(Arc::clone(&self.keypair), self.rpc.clone()))
    }
}
