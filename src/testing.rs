//! Shared fixtures and in-memory doubles for unit tests

use crate::chain::ChainClient;
use crate::config::{ConnectorConfig, Network};
use crate::connector::{
    ConnectedAccount, ConnectorFactory, ConnectorSession, Namespaces, WalletConnector,
    SUI_NAMESPACE,
};
use crate::snapshot::{CoinBalance, ObjectSummary};
use crate::transaction::{SubmittedTransaction, TransferRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// 24-word phrase with a known Sui address
pub const TEST_MNEMONIC: &str = "film crazy soon outside stand loop subway crumble thrive popular green nuclear struggle pistol arm wife phrase warfare march wheat nephew ask sunny firm";
pub const TEST_MNEMONIC_ADDRESS: &str =
    "0xa2d14fad60c56049ecf75246a481934691214ce413e6a8ae2fe6834c173a6133";

/// Secret key bytes 0x00..=0x1f
pub const TEST_SECRET_BASE64: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";
pub const TEST_SECRET_ADDRESS: &str =
    "0x160179a1565ea7cff27ead23f54cc7f50893bf58155cd7285156e57afa31c3ac";

pub const SUI: &str = "0x2::sui::SUI";

/// How the mock answers a session request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionReply {
    Approve,
    Dismiss,
    Fail,
}

/// Scriptable connector that records what the session asked of it
pub struct MockConnector {
    reply: Mutex<SessionReply>,
    account: Mutex<ConnectedAccount>,
    fail_account: AtomicBool,
    fail_switch: AtomicBool,
    fail_submit: AtomicBool,
    gate: Mutex<Option<Gate>>,
    calls: Mutex<Vec<String>>,
    submitted: Mutex<Vec<TransferRequest>>,
}

impl MockConnector {
    pub fn new(address: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(SessionReply::Approve),
            account: Mutex::new(Self::account_for(address)),
            fail_account: AtomicBool::new(false),
            fail_switch: AtomicBool::new(false),
            fail_submit: AtomicBool::new(false),
            gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        })
    }

    fn account_for(address: &str) -> ConnectedAccount {
        ConnectedAccount {
            address: address.to_string(),
            public_key: "AA==".to_string(),
        }
    }

    pub fn set_reply(&self, reply: SessionReply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn set_address(&self, address: &str) {
        *self.account.lock().unwrap() = Self::account_for(address);
    }

    pub fn fail_account(&self, fail: bool) {
        self.fail_account.store(fail, Ordering::SeqCst);
    }

    /// Hold the next session request until `Gate::release` is notified
    pub fn arm_gate(&self) -> Gate {
        let gate = Gate::default();
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn fail_switch(&self, fail: bool) {
        self.fail_switch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_submit(&self, fail: bool) {
        self.fail_submit.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<TransferRequest> {
        self.submitted.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl WalletConnector for MockConnector {
    async fn open_session(&self, namespaces: &Namespaces) -> Result<Option<ConnectorSession>> {
        let chains = namespaces.chains(SUI_NAMESPACE).to_vec();
        self.record(format!("open_session:{}", chains.join(",")));

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let reply = *self.reply.lock().unwrap();
        match reply {
            SessionReply::Approve => Ok(Some(ConnectorSession {
                topic: "mock-topic".to_string(),
                chains,
            })),
            SessionReply::Dismiss => Ok(None),
            SessionReply::Fail => Err(Error::Connector("relay unreachable".to_string())),
        }
    }

    async fn account(&self) -> Result<ConnectedAccount> {
        if self.fail_account.load(Ordering::SeqCst) {
            return Err(Error::Connector("session has no accounts".to_string()));
        }
        Ok(self.account.lock().unwrap().clone())
    }

    async fn switch_chain(&self, chain_id: &str) -> Result<()> {
        self.record(format!("switch_chain:{}", chain_id));
        if self.fail_switch.load(Ordering::SeqCst) {
            return Err(Error::Connector("wallet refused chain".to_string()));
        }
        Ok(())
    }

    async fn sign_and_submit(&self, request: &TransferRequest) -> Result<SubmittedTransaction> {
        self.record("sign_and_submit");
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(Error::Transaction("user rejected signing".to_string()));
        }
        self.submitted.lock().unwrap().push(request.clone());
        Ok(SubmittedTransaction::new("MockDigest111"))
    }

    async fn disconnect(&self) -> Result<()> {
        self.record("disconnect");
        Ok(())
    }
}

/// Hands out one shared `MockConnector`
pub struct MockConnectorFactory {
    pub connector: Arc<MockConnector>,
    pub fail: bool,
}

impl MockConnectorFactory {
    pub fn new(connector: Arc<MockConnector>) -> Self {
        Self {
            connector,
            fail: false,
        }
    }

    pub fn failing(connector: Arc<MockConnector>) -> Self {
        Self {
            connector,
            fail: true,
        }
    }
}

#[async_trait]
impl ConnectorFactory for MockConnectorFactory {
    type Connector = Arc<MockConnector>;

    async fn initialize(&self, _config: &ConnectorConfig) -> Result<Arc<MockConnector>> {
        if self.fail {
            return Err(Error::Connector("project id rejected".to_string()));
        }
        Ok(Arc::clone(&self.connector))
    }
}

/// Holds the next gated call until released
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// In-memory chain keyed by owner address
///
/// Returns every stored object regardless of `limit`.
#[derive(Default)]
pub struct MockChain {
    balances: Mutex<HashMap<String, Vec<CoinBalance>>>,
    objects: Mutex<HashMap<String, Vec<ObjectSummary>>>,
    fail: AtomicBool,
    gate: Mutex<Option<Gate>>,
    queries: Mutex<Vec<(Network, String)>>,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_balances(&self, owner: &str, balances: Vec<CoinBalance>) {
        self.balances
            .lock()
            .unwrap()
            .insert(owner.to_string(), balances);
    }

    pub fn set_objects(&self, owner: &str, objects: Vec<ObjectSummary>) {
        self.objects
            .lock()
            .unwrap()
            .insert(owner.to_string(), objects);
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Block the next balance query until `Gate::release` is notified
    pub fn arm_gate(&self) -> Gate {
        let gate = Gate::default();
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Balance queries seen so far
    pub fn queries(&self) -> Vec<(Network, String)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_all_balances(&self, network: Network, owner: &str) -> Result<Vec<CoinBalance>> {
        self.queries
            .lock()
            .unwrap()
            .push((network, owner.to_string()));

        // Answer with what was stored when the query arrived
        let failed = self.fail.load(Ordering::SeqCst);
        let balances = self
            .balances
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_default();

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        if failed {
            return Err(Error::Rpc("fullnode unavailable".to_string()));
        }
        Ok(balances)
    }

    async fn get_owned_objects(
        &self,
        _network: Network,
        owner: &str,
        _limit: usize,
    ) -> Result<Vec<ObjectSummary>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Rpc("fullnode unavailable".to_string()));
        }
        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }
}
