//! Display snapshots of account balances and owned objects

use crate::units::{format_base_units, BalanceFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of owned objects kept for display
pub const MAX_DISPLAYED_OBJECTS: usize = 5;

/// Total balance of one coin type as reported by the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinBalance {
    pub coin_type: String,
    /// Amount in base units
    pub total_balance: u128,
}

impl CoinBalance {
    pub fn new(coin_type: impl Into<String>, total_balance: u128) -> Self {
        Self {
            coin_type: coin_type.into(),
            total_balance,
        }
    }
}

/// A balance with its rendered form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayBalance {
    pub raw: u128,
    pub formatted: String,
}

/// Coin type -> balance, replaced wholesale on every successful fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    balances: BTreeMap<String, DisplayBalance>,
}

impl BalanceSnapshot {
    pub fn from_coins(coins: impl IntoIterator<Item = CoinBalance>, format: BalanceFormat) -> Self {
        let balances = coins
            .into_iter()
            .map(|coin| {
                let display = DisplayBalance {
                    raw: coin.total_balance,
                    formatted: format_base_units(coin.total_balance, format),
                };
                (coin.coin_type, display)
            })
            .collect();
        Self { balances }
    }

    /// Formatted balance for a coin type
    pub fn get(&self, coin_type: &str) -> Option<&str> {
        self.balances.get(coin_type).map(|b| b.formatted.as_str())
    }

    pub fn raw(&self, coin_type: &str) -> Option<u128> {
        self.balances.get(coin_type).map(|b| b.raw)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DisplayBalance)> {
        self.balances.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// Summary of an owned on-chain object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub object_id: String,
    #[serde(rename = "type")]
    pub object_type: Option<String>,
}

impl ObjectSummary {
    pub fn new(object_id: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            object_type: Some(object_type.into()),
        }
    }
}

/// The first few owned objects, in the order the chain returned them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    objects: Vec<ObjectSummary>,
}

impl ObjectSnapshot {
    pub fn from_objects(objects: impl IntoIterator<Item = ObjectSummary>) -> Self {
        Self {
            objects: objects.into_iter().take(MAX_DISPLAYED_OBJECTS).collect(),
        }
    }

    pub fn objects(&self) -> &[ObjectSummary] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
