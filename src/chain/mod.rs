//! Chain queries
//!
//! `ChainClient` is the seam between the session and whatever answers balance
//! and object queries. `SuiRpcClient` answers them over fullnode JSON-RPC;
//! paging, retries and caching are left to the node.

mod rpc;

pub use rpc::{CoinObject, SuiRpcClient, SUI_COIN_TYPE};

use crate::config::Network;
use crate::snapshot::{CoinBalance, ObjectSummary};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only queries against a network
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Total balance per coin type owned by `owner`
    async fn get_all_balances(&self, network: Network, owner: &str) -> Result<Vec<CoinBalance>>;

    /// Up to `limit` owned objects, in the order the node returns them
    async fn get_owned_objects(
        &self,
        network: Network,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<ObjectSummary>>;
}

#[async_trait]
impl<T: ChainClient + ?Sized> ChainClient for Arc<T> {
    async fn get_all_balances(&self, network: Network, owner: &str) -> Result<Vec<CoinBalance>> {
        (**self).get_all_balances(network, owner).await
    }

    async fn get_owned_objects(
        &self,
        network: Network,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<ObjectSummary>> {
        (**self).get_owned_objects(network, owner, limit).await
    }
}
