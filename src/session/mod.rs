//! Wallet session
//!
//! Owns one connector and one chain client and mirrors what they report:
//! the connected account, its balances and its first few owned objects.
//!
//! State machine:
//!
//! ```text
//! Uninitialized --initialize--> Initialized --connect--> Connected <--switch_network
//!                                                          |
//!                                   Disconnected <--disconnect
//! ```
//!
//! `connect` may be retried from `Initialized` or `Disconnected`.
//!
//! # Stale responses
//!
//! Every fetch takes a ticket `(epoch, seq)` before it suspends. The epoch
//! moves on connect, disconnect and network switch; `seq` grows per snapshot.
//! A response is applied only if its epoch is still current and no newer
//! request for the same snapshot has been applied, so nothing fetched before a
//! disconnect can repopulate the cleared state.

use crate::chain::ChainClient;
use crate::config::{Config, ConnectorConfig, Network};
use crate::connector::{ConnectedAccount, ConnectorFactory, Namespaces, WalletConnector};
use crate::snapshot::{BalanceSnapshot, ObjectSnapshot, MAX_DISPLAYED_OBJECTS};
use crate::transaction::{SubmittedTransaction, TransferRequest};
use crate::units::BalanceFormat;
use crate::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    Initialized,
    Connected,
    Disconnected,
}

/// Whether a fetch result made it into the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// Overtaken by a newer request or a session change, or not for the connected account
    Discarded,
}

#[derive(Debug, Clone, Copy)]
struct Ticket {
    epoch: u64,
    seq: u64,
}

#[derive(Debug, Default)]
struct RequestSequence {
    issued: u64,
    applied: u64,
}

impl RequestSequence {
    fn issue(&mut self, epoch: u64) -> Ticket {
        self.issued += 1;
        Ticket {
            epoch,
            seq: self.issued,
        }
    }

    fn accept(&mut self, ticket: Ticket, epoch: u64) -> bool {
        if ticket.epoch != epoch || ticket.seq <= self.applied {
            return false;
        }
        self.applied = ticket.seq;
        true
    }
}

struct Inner<C> {
    state: SessionState,
    connector: Option<Arc<C>>,
    network: Network,
    account: Option<ConnectedAccount>,
    balances: BalanceSnapshot,
    objects: ObjectSnapshot,
    epoch: u64,
    balance_requests: RequestSequence,
    object_requests: RequestSequence,
}

impl<C> Inner<C> {
    /// Drop the account and both snapshots and invalidate in-flight fetches
    fn reset(&mut self) {
        self.account = None;
        self.clear_snapshots();
    }

    fn clear_snapshots(&mut self) {
        self.balances = BalanceSnapshot::default();
        self.objects = ObjectSnapshot::default();
        self.epoch += 1;
    }

    fn connected_account(&self) -> Result<&ConnectedAccount> {
        match (self.state, &self.account) {
            (SessionState::Connected, Some(account)) => Ok(account),
            _ => Err(Error::NotConnected),
        }
    }

    fn is_connected_address(&self, address: &str) -> Result<bool> {
        Ok(self.connected_account()?.address == address)
    }
}

/// Close the connector's session; errors are only logged
async fn close_quietly<C: WalletConnector + ?Sized>(connector: &C) {
    if let Err(e) = connector.disconnect().await {
        warn!(error = %e, "Connector reported an error while disconnecting");
    }
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub state: SessionState,
    pub network: Network,
    pub account: Option<ConnectedAccount>,
    pub balances: BalanceSnapshot,
    pub objects: ObjectSnapshot,
}

/// A connect-and-query wallet session
///
/// Cheap to clone; clones share the same state, connector and chain client.
pub struct WalletSession<C, Q> {
    inner: Arc<RwLock<Inner<C>>>,
    chain: Arc<Q>,
    connector_config: Arc<ConnectorConfig>,
    balance_format: BalanceFormat,
}

impl<C, Q> Clone for WalletSession<C, Q> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            chain: Arc::clone(&self.chain),
            connector_config: Arc::clone(&self.connector_config),
            balance_format: self.balance_format,
        }
    }
}

impl<C, Q> WalletSession<C, Q>
where
    C: WalletConnector + 'static,
    Q: ChainClient + 'static,
{
    pub fn new(chain: Q, connector_config: ConnectorConfig, network: Network) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state: SessionState::Uninitialized,
                connector: None,
                network,
                account: None,
                balances: BalanceSnapshot::default(),
                objects: ObjectSnapshot::default(),
                epoch: 0,
                balance_requests: RequestSequence::default(),
                object_requests: RequestSequence::default(),
            })),
            chain: Arc::new(chain),
            connector_config: Arc::new(connector_config),
            balance_format: BalanceFormat::default(),
        }
    }

    /// Build from the crate config: network, connector options and balance format
    pub fn from_config(chain: Q, config: &Config) -> Self {
        Self::new(chain, config.connector.clone(), config.network)
            .with_balance_format(config.balance_format)
    }

    pub fn with_balance_format(mut self, format: BalanceFormat) -> Self {
        self.balance_format = format;
        self
    }

    /// Bring up the connector; later calls keep the first connector
    pub async fn initialize<F>(&self, factory: &F) -> Result<()>
    where
        F: ConnectorFactory<Connector = C>,
    {
        if self.inner.read().await.connector.is_some() {
            debug!("Connector already initialized");
            return Ok(());
        }

        let connector = factory
            .initialize(&self.connector_config)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to initialize wallet connector"))?;

        let mut inner = self.inner.write().await;
        if inner.connector.is_none() {
            inner.connector = Some(Arc::new(connector));
            inner.state = SessionState::Initialized;
            info!(dapp = %self.connector_config.dapp.name, "Wallet connector initialized");
        }
        Ok(())
    }

    /// Open a connector session and load the account's data
    ///
    /// Fetch failures after a successful connection are logged and leave the
    /// snapshots empty; they do not fail the connection. A `disconnect` that
    /// lands while the request is pending wins: the connector session is
    /// closed again and the call fails with `ConnectionRejected`.
    pub async fn connect(&self) -> Result<ConnectedAccount> {
        let (connector, network, started) = {
            let inner = self.inner.read().await;
            let connector = inner.connector.clone().ok_or(Error::NotInitialized)?;
            if let Ok(account) = inner.connected_account() {
                debug!(address = %account.address, "Already connected");
                return Ok(account.clone());
            }
            (connector, inner.network, inner.epoch)
        };

        let session = match connector.open_session(&Namespaces::sui(network)).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                warn!(%network, "Connection request dismissed");
                return Err(Error::ConnectionRejected(
                    "connection request was dismissed".to_string(),
                ));
            }
            Err(e) => {
                error!(error = %e, %network, "Failed to connect wallet");
                return Err(e);
            }
        };

        let account = match connector.account().await {
            Ok(account) => account,
            Err(e) => {
                error!(error = %e, "Connected but could not read account");
                close_quietly(&*connector).await;
                return Err(e);
            }
        };

        {
            let mut inner = self.inner.write().await;
            if inner.epoch != started {
                // Another connect finished first; its session is the live one
                if let Ok(current) = inner.connected_account() {
                    debug!(address = %current.address, "Connect overtaken by another connect");
                    return Ok(current.clone());
                }
                drop(inner);
                warn!(%network, "Disconnected while the connection request was pending");
                close_quietly(&*connector).await;
                return Err(Error::ConnectionRejected(
                    "disconnected while the connection request was pending".to_string(),
                ));
            }
            inner.reset();
            inner.account = Some(account.clone());
            inner.state = SessionState::Connected;
        }
        info!(
            address = %account.address,
            topic = %session.topic,
            %network,
            "Wallet connected"
        );

        self.refresh_quietly().await;
        Ok(account)
    }

    /// Forget the account and both snapshots; safe to call in any state
    pub async fn disconnect(&self) {
        let connector = {
            let mut inner = self.inner.write().await;
            let was_connected = inner.state == SessionState::Connected;
            inner.reset();
            if was_connected {
                inner.state = SessionState::Disconnected;
                inner.connector.clone()
            } else {
                None
            }
        };

        if let Some(connector) = connector {
            close_quietly(&*connector).await;
            info!("Wallet disconnected");
        }
    }

    /// Move the session to another network and reload its data
    ///
    /// The network label changes before the connector is asked to switch and
    /// is not rolled back if the connector fails.
    pub async fn switch_network(&self, target: Network) -> Result<()> {
        let (connector, previous) = {
            let mut inner = self.inner.write().await;
            inner.connected_account()?;
            let connector = inner.connector.clone().ok_or(Error::NotInitialized)?;
            let previous = inner.network;
            inner.network = target;
            inner.clear_snapshots();
            (connector, previous)
        };

        info!(from = %previous, to = %target, "Switching network");
        connector
            .switch_chain(target.chain_id())
            .await
            .inspect_err(|e| error!(error = %e, to = %target, "Connector failed to switch network"))?;

        self.refresh_quietly().await;
        Ok(())
    }

    /// Replace the balance snapshot with a fresh query for `address`
    ///
    /// Only the connected account's address is fetched; any other address is
    /// `Discarded` without a query.
    pub async fn fetch_balances(&self, address: &str) -> Result<FetchOutcome> {
        let (ticket, network) = {
            let mut inner = self.inner.write().await;
            if !inner.is_connected_address(address)? {
                debug!(%address, "Skipping balance fetch for an address that is not connected");
                return Ok(FetchOutcome::Discarded);
            }
            let epoch = inner.epoch;
            (inner.balance_requests.issue(epoch), inner.network)
        };

        let coins = self
            .chain
            .get_all_balances(network, address)
            .await
            .inspect_err(|e| warn!(error = %e, %address, %network, "Failed to fetch balances"))?;
        let snapshot = BalanceSnapshot::from_coins(coins, self.balance_format);

        let mut inner = self.inner.write().await;
        let epoch = inner.epoch;
        if !inner.balance_requests.accept(ticket, epoch) {
            debug!(%address, "Discarding stale balance response");
            return Ok(FetchOutcome::Discarded);
        }
        inner.balances = snapshot;
        Ok(FetchOutcome::Applied)
    }

    /// Replace the object snapshot with the first owned objects of `address`
    pub async fn fetch_objects(&self, address: &str) -> Result<FetchOutcome> {
        let (ticket, network) = {
            let mut inner = self.inner.write().await;
            if !inner.is_connected_address(address)? {
                debug!(%address, "Skipping object fetch for an address that is not connected");
                return Ok(FetchOutcome::Discarded);
            }
            let epoch = inner.epoch;
            (inner.object_requests.issue(epoch), inner.network)
        };

        let objects = self
            .chain
            .get_owned_objects(network, address, MAX_DISPLAYED_OBJECTS)
            .await
            .inspect_err(|e| warn!(error = %e, %address, %network, "Failed to fetch objects"))?;
        let snapshot = ObjectSnapshot::from_objects(objects);

        let mut inner = self.inner.write().await;
        let epoch = inner.epoch;
        if !inner.object_requests.accept(ticket, epoch) {
            debug!(%address, "Discarding stale object response");
            return Ok(FetchOutcome::Discarded);
        }
        inner.objects = snapshot;
        Ok(FetchOutcome::Applied)
    }

    /// Re-run both fetches for the connected account
    pub async fn refresh(&self) -> Result<()> {
        let address = self.inner.read().await.connected_account()?.address.clone();
        let (balances, objects) = futures::join!(
            self.fetch_balances(&address),
            self.fetch_objects(&address)
        );
        balances?;
        objects?;
        Ok(())
    }

    async fn refresh_quietly(&self) {
        if let Err(e) = self.refresh().await {
            debug!(error = %e, "Keeping previous snapshots");
        }
    }

    /// Send the fixed self-transfer and reload the account's data
    pub async fn send_test_transaction(&self) -> Result<SubmittedTransaction> {
        let (connector, address) = {
            let inner = self.inner.read().await;
            let address = inner.connected_account()?.address.clone();
            let connector = inner.connector.clone().ok_or(Error::NotInitialized)?;
            (connector, address)
        };

        let request = TransferRequest::test_transfer(&address);
        let submitted = connector
            .sign_and_submit(&request)
            .await
            .inspect_err(|e| error!(error = %e, %address, "Test transaction failed"))?;

        info!(digest = %submitted.digest, %address, "Test transaction submitted");
        self.refresh_quietly().await;
        Ok(submitted)
    }

    /// Disconnect and release the connector
    pub async fn shutdown(&self) {
        self.disconnect().await;
        let mut inner = self.inner.write().await;
        inner.connector = None;
        inner.state = SessionState::Uninitialized;
    }

    pub async fn state(&self) -> SessionState {
        self.inner.read().await.state
    }

    pub async fn network(&self) -> Network {
        self.inner.read().await.network
    }

    pub async fn account(&self) -> Option<ConnectedAccount> {
        self.inner.read().await.account.clone()
    }

    pub async fn balances(&self) -> BalanceSnapshot {
        self.inner.read().await.balances.clone()
    }

    pub async fn objects(&self) -> ObjectSnapshot {
        self.inner.read().await.objects.clone()
    }

    pub async fn view(&self) -> SessionView {
        let inner = self.inner.read().await;
        SessionView {
            state: inner.state,
            network: inner.network,
            account: inner.account.clone(),
            balances: inner.balances.clone(),
            objects: inner.objects.clone(),
        }
    }
}
