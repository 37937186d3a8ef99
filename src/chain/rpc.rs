//! Sui fullnode JSON-RPC client

use super::ChainClient;
use crate::config::{Network, RpcConfig};
use crate::snapshot::{CoinBalance, ObjectSummary};
use crate::units::parse_base_units;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

/// Coin type of the native gas coin
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceEntry {
    coin_type: String,
    total_balance: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectsPage {
    data: Vec<ObjectResponse>,
}

#[derive(Debug, Deserialize)]
struct ObjectResponse {
    data: Option<ObjectData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectData {
    object_id: String,
    #[serde(rename = "type")]
    object_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinsPage {
    data: Vec<CoinEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinEntry {
    coin_object_id: String,
    balance: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionBytes {
    tx_bytes: String,
}

#[derive(Debug, Deserialize)]
struct ExecutionResponse {
    digest: String,
    effects: Option<ExecutionEffects>,
}

#[derive(Debug, Deserialize)]
struct ExecutionEffects {
    status: ExecutionStatus,
}

#[derive(Debug, Deserialize)]
struct ExecutionStatus {
    status: String,
    error: Option<String>,
}

/// A single coin object, used to pay for and fund transfers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinObject {
    pub coin_object_id: String,
    pub balance: u128,
}

/// JSON-RPC client for Sui fullnodes, one endpoint per network
#[derive(Debug, Clone)]
pub struct SuiRpcClient {
    client: Client,
    rpc: RpcConfig,
}

impl SuiRpcClient {
    pub fn new(rpc: RpcConfig) -> Self {
        Self {
            client: Client::new(),
            rpc,
        }
    }

    /// Issue a JSON-RPC call and decode its `result`
    pub async fn call<T: DeserializeOwned>(
        &self,
        network: Network,
        method: &str,
        params: Value,
    ) -> Result<T> {
        let url = self.rpc.endpoint(network)?;
        tracing::debug!(%network, method, "Sending RPC request");

        let response = self
            .client
            .post(url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params
            }))
            .send()
            .await?
            .error_for_status()?;

        let body: RpcResponse<T> = response.json().await?;
        unwrap_response(method, body)
    }

    /// Coin objects of one type owned by `owner` (first page only)
    pub async fn get_coins(
        &self,
        network: Network,
        owner: &str,
        coin_type: &str,
    ) -> Result<Vec<CoinObject>> {
        let page: CoinsPage = self
            .call(
                network,
                "suix_getCoins",
                json!([owner, coin_type, Value::Null, Value::Null]),
            )
            .await?;
        page.data
            .into_iter()
            .map(|coin| {
                Ok(CoinObject {
                    coin_object_id: coin.coin_object_id,
                    balance: parse_base_units(&coin.balance)?,
                })
            })
            .collect()
    }

    /// Let the node build a SUI transfer paid from `coin_object_id`; returns BCS bytes
    pub async fn unsafe_transfer_sui(
        &self,
        network: Network,
        signer: &str,
        coin_object_id: &str,
        gas_budget: u64,
        recipient: &str,
        amount: u64,
    ) -> Result<Vec<u8>> {
        let built: TransactionBytes = self
            .call(
                network,
                "unsafe_transferSui",
                json!([
                    signer,
                    coin_object_id,
                    gas_budget.to_string(),
                    recipient,
                    amount.to_string()
                ]),
            )
            .await?;
        BASE64
            .decode(&built.tx_bytes)
            .map_err(|e| Error::Rpc(format!("Invalid txBytes from node: {}", e)))
    }

    /// Broadcast signed transaction bytes and return the digest
    pub async fn execute_transaction_block(
        &self,
        network: Network,
        tx_bytes: &[u8],
        signature: String,
    ) -> Result<String> {
        let response: ExecutionResponse = self
            .call(
                network,
                "sui_executeTransactionBlock",
                json!([
                    BASE64.encode(tx_bytes),
                    [signature],
                    { "showEffects": true },
                    "WaitForEffectsCert"
                ]),
            )
            .await?;
        check_execution(response)
    }
}

fn unwrap_response<T>(method: &str, body: RpcResponse<T>) -> Result<T> {
    if let Some(error) = body.error {
        return Err(Error::Rpc(format!(
            "{} failed ({}): {}",
            method, error.code, error.message
        )));
    }
    body.result
        .ok_or_else(|| Error::Rpc(format!("{} returned no result", method)))
}

fn balances_from_entries(entries: Vec<BalanceEntry>) -> Result<Vec<CoinBalance>> {
    entries
        .into_iter()
        .map(|entry| {
            Ok(CoinBalance {
                total_balance: parse_base_units(&entry.total_balance)?,
                coin_type: entry.coin_type,
            })
        })
        .collect()
}

fn objects_from_page(page: ObjectsPage) -> Vec<ObjectSummary> {
    page.data
        .into_iter()
        .filter_map(|object| object.data)
        .map(|data| ObjectSummary {
            object_id: data.object_id,
            object_type: data.object_type,
        })
        .collect()
}

fn check_execution(response: ExecutionResponse) -> Result<String> {
    match response.effects {
        Some(effects) if effects.status.status != "success" => Err(Error::Transaction(format!(
            "{}: {}",
            response.digest,
            effects
                .status
                .error
                .unwrap_or_else(|| effects.status.status.clone())
        ))),
        _ => Ok(response.digest),
    }
}

#[async_trait]
impl ChainClient for SuiRpcClient {
    async fn get_all_balances(&self, network: Network, owner: &str) -> Result<Vec<CoinBalance>> {
        let entries: Vec<BalanceEntry> = self
            .call(network, "suix_getAllBalances", json!([owner]))
            .await?;
        balances_from_entries(entries)
    }

    async fn get_owned_objects(
        &self,
        network: Network,
        owner: &str,
        limit: usize,
    ) -> Result<Vec<ObjectSummary>> {
        let page: ObjectsPage = self
            .call(
                network,
                "suix_getOwnedObjects",
                json!([
                    owner,
                    { "filter": Value::Null, "options": { "showType": true } },
                    Value::Null,
                    limit
                ]),
            )
            .await?;
        Ok(objects_from_page(page))
    }
}
