//! Transfer payloads handed to a connector for signing and broadcast

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Amount moved by the test transfer: 0.001 SUI
pub const TEST_TRANSFER_AMOUNT_MIST: u64 = 1_000_000;

/// Gas budget of the test transfer, in MIST
pub const TEST_TRANSFER_GAS_BUDGET: u64 = 10_000;

/// A SUI transfer ready to be signed by a connector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub recipient: String,
    /// Amount in MIST
    pub amount: u64,
    /// Gas budget in MIST
    pub gas_budget: u64,
}

impl TransferRequest {
    /// The fixed-shape smoke-test transfer: a small amount sent back to `owner`
    pub fn test_transfer(owner: impl Into<String>) -> Self {
        Self {
            recipient: owner.into(),
            amount: TEST_TRANSFER_AMOUNT_MIST,
            gas_budget: TEST_TRANSFER_GAS_BUDGET,
        }
    }
}

/// What the connector reports after broadcasting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedTransaction {
    pub digest: String,
    pub submitted_at: DateTime<Utc>,
}

impl SubmittedTransaction {
    pub fn new(digest: impl Into<String>) -> Self {
        Self {
            digest: digest.into(),
            submitted_at: Utc::now(),
        }
    }
}
