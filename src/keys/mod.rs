//! Local key management
//!
//! Generates and imports Ed25519 key pairs and keeps them in memory only.
//! Nothing here is persisted; dropping the `KeyManager` forgets every account.

mod address;
mod keypair;

pub use address::{SuiAddress, ED25519_FLAG};
pub use keypair::{SuiKeyPair, DERIVATION_PATH};

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Prompt shown when an import is attempted with nothing to import
pub const MISSING_IMPORT_INPUT: &str = "Please enter a mnemonic or private key";

/// Prompt shown when both import inputs are filled in
pub const AMBIGUOUS_IMPORT_INPUT: &str = "Enter either a mnemonic or a private key, not both";

/// How an account's key material came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    Generated,
    ImportedMnemonic,
    ImportedPrivateKey,
}

/// Key material to import
pub enum ImportSource {
    Mnemonic(SecretString),
    PrivateKey(SecretString),
}

/// An in-memory account
pub struct LocalAccount {
    keypair: Arc<SuiKeyPair>,
    mnemonic: Option<SecretString>,
    origin: KeyOrigin,
}

impl LocalAccount {
    pub fn address(&self) -> SuiAddress {
        self.keypair.address()
    }

    /// Shared handle to the key pair, e.g. for a local connector
    pub fn keypair(&self) -> Arc<SuiKeyPair> {
        Arc::clone(&self.keypair)
    }

    pub fn has_mnemonic(&self) -> bool {
        self.mnemonic.is_some()
    }

    pub fn origin(&self) -> KeyOrigin {
        self.origin
    }
}

impl std::fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAccount")
            .field("address", &self.address())
            .field("origin", &self.origin)
            .field("has_mnemonic", &self.has_mnemonic())
            .finish()
    }
}

/// Accounts created or imported in this process, plus the active one
#[derive(Default)]
pub struct KeyManager {
    accounts: Vec<LocalAccount>,
    current: Option<usize>,
    mnemonic_input: Option<SecretString>,
    private_key_input: Option<SecretString>,
}

impl KeyManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new mnemonic-backed account and make it current
    pub fn create_wallet(&mut self) -> SuiAddress {
        let (keypair, mnemonic) = SuiKeyPair::generate();
        let address = keypair.address();
        self.push(LocalAccount {
            keypair: Arc::new(keypair),
            mnemonic: Some(mnemonic),
            origin: KeyOrigin::Generated,
        });
        tracing::info!(%address, "Created new wallet");
        address
    }

    /// Fill the pending mnemonic field
    pub fn set_mnemonic_input(&mut self, value: impl Into<String>) {
        self.mnemonic_input = non_empty_secret(value.into());
    }

    /// Fill the pending private key field
    pub fn set_private_key_input(&mut self, value: impl Into<String>) {
        self.private_key_input = non_empty_secret(value.into());
    }

    pub fn has_pending_input(&self) -> bool {
        self.mnemonic_input.is_some() || self.private_key_input.is_some()
    }

    /// Import from the pending input fields
    ///
    /// Exactly one of the fields must be filled in. Both fields are cleared
    /// only when the import succeeds.
    pub fn import_wallet(&mut self) -> Result<SuiAddress> {
        let source = match (&self.mnemonic_input, &self.private_key_input) {
            (Some(mnemonic), None) => ImportSource::Mnemonic(copy_secret(mnemonic)),
            (None, Some(key)) => ImportSource::PrivateKey(copy_secret(key)),
            (None, None) => {
                tracing::warn!("Import attempted without a mnemonic or private key");
                return Err(Error::Validation(MISSING_IMPORT_INPUT.to_string()));
            }
            (Some(_), Some(_)) => {
                tracing::warn!("Import attempted with both a mnemonic and a private key");
                return Err(Error::Validation(AMBIGUOUS_IMPORT_INPUT.to_string()));
            }
        };

        let address = self.import_from(source)?;
        self.mnemonic_input = None;
        self.private_key_input = None;
        Ok(address)
    }

    /// Import key material directly and make it current
    ///
    /// An address that is already in the list is rejected, so every entry
    /// can be selected with `switch_account`.
    pub fn import_from(&mut self, source: ImportSource) -> Result<SuiAddress> {
        let account = match source {
            ImportSource::Mnemonic(phrase) => {
                let keypair = SuiKeyPair::from_mnemonic(phrase.expose_secret())
                    .inspect_err(|e| tracing::warn!(error = %e, "Mnemonic import failed"))?;
                LocalAccount {
                    keypair: Arc::new(keypair),
                    mnemonic: Some(phrase),
                    origin: KeyOrigin::ImportedMnemonic,
                }
            }
            ImportSource::PrivateKey(encoded) => {
                let keypair = SuiKeyPair::from_base64(encoded.expose_secret())
                    .inspect_err(|e| tracing::warn!(error = %e, "Private key import failed"))?;
                LocalAccount {
                    keypair: Arc::new(keypair),
                    mnemonic: None,
                    origin: KeyOrigin::ImportedPrivateKey,
                }
            }
        };

        let address = account.address();
        if self.accounts.iter().any(|known| known.address() == address) {
            tracing::warn!(%address, "Import of an account that is already known");
            return Err(Error::Validation(format!(
                "Account {} is already imported",
                address.short()
            )));
        }
        tracing::info!(%address, origin = ?account.origin, "Imported wallet");
        self.push(account);
        Ok(address)
    }

    fn push(&mut self, account: LocalAccount) {
        self.accounts.push(account);
        self.current = Some(self.accounts.len() - 1);
    }

    /// Make a known account current; the account list is left untouched
    pub fn switch_account(&mut self, address: &SuiAddress) -> Result<()> {
        let index = self
            .accounts
            .iter()
            .position(|account| account.address() == *address)
            .ok_or_else(|| Error::UnknownAccount(address.to_hex()))?;
        self.current = Some(index);
        tracing::debug!(%address, "Switched account");
        Ok(())
    }

    pub fn accounts(&self) -> &[LocalAccount] {
        &self.accounts
    }

    pub fn current(&self) -> Option<&LocalAccount> {
        self.current.and_then(|index| self.accounts.get(index))
    }

    pub fn is_current(&self, index: usize) -> bool {
        self.current == Some(index)
    }

    /// List label, e.g. `Account 1: 0xa2d1...6133`
    pub fn label(&self, index: usize) -> Option<String> {
        self.accounts
            .get(index)
            .map(|account| format!("Account {}: {}", index + 1, account.address().short()))
    }

    /// Base64 secret key of the current account
    pub fn reveal_private_key(&self) -> Result<SecretString> {
        let account = self.current().ok_or(Error::NoAccount)?;
        Ok(account.keypair.export_private_key())
    }

    /// Mnemonic of the current account, if it was created from one
    pub fn reveal_mnemonic(&self) -> Result<SecretString> {
        self.current()
            .and_then(|account| account.mnemonic.as_ref())
            .map(copy_secret)
            .ok_or(Error::MnemonicUnavailable)
    }
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager")
            .field("accounts", &self.accounts)
            .field("current", &self.current)
            .field("pending_input", &self.has_pending_input())
            .finish()
    }
}

fn non_empty_secret(value: String) -> Option<SecretString> {
    if value.trim().is_empty() {
        None
    } else {
        Some(SecretString::from(value))
    }
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        TEST_MNEMONIC, TEST_MNEMONIC_ADDRESS, TEST_SECRET_ADDRESS, TEST_SECRET_BASE64,
    };

    fn addresses(manager: &KeyManager) -> Vec<SuiAddress> {
        manager.accounts().iter().map(|a| a.address()).collect()
    }

    #[test]
    fn test_create_wallet_becomes_current() {
        let mut manager = KeyManager::new();
        let first = manager.create_wallet();
        let second = manager.create_wallet();

        assert_ne!(first, second);
        assert_eq!(manager.accounts().len(), 2);
        assert_eq!(manager.current().unwrap().address(), second);
        assert_eq!(manager.current().unwrap().origin(), KeyOrigin::Generated);
        assert!(manager.reveal_mnemonic().is_ok());
    }

    #[test]
    fn test_import_without_input_is_rejected() {
        let mut manager = KeyManager::new();
        manager.create_wallet();
        let before = addresses(&manager);

        manager.set_mnemonic_input("   ");
        let err = manager.import_wallet().unwrap_err();

        assert!(matches!(err, Error::Validation(ref msg) if msg == MISSING_IMPORT_INPUT));
        assert_eq!(addresses(&manager), before);
    }

    #[test]
    fn test_import_with_both_inputs_is_rejected() {
        let mut manager = KeyManager::new();
        manager.set_mnemonic_input(TEST_MNEMONIC);
        manager.set_private_key_input(TEST_SECRET_BASE64);

        let err = manager.import_wallet().unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg == AMBIGUOUS_IMPORT_INPUT));
        assert!(manager.accounts().is_empty());
        assert!(manager.has_pending_input());
    }

    #[test]
    fn test_import_mnemonic_clears_inputs() {
        let mut manager = KeyManager::new();
        manager.set_mnemonic_input(TEST_MNEMONIC);

        let address = manager.import_wallet().unwrap();

        assert_eq!(address.to_hex(), TEST_MNEMONIC_ADDRESS);
        assert!(!manager.has_pending_input());
        assert_eq!(
            manager.reveal_mnemonic().unwrap().expose_secret(),
            TEST_MNEMONIC
        );
    }

    #[test]
    fn test_import_private_key_has_no_mnemonic() {
        let mut manager = KeyManager::new();
        manager.set_private_key_input(TEST_SECRET_BASE64);

        let address = manager.import_wallet().unwrap();
        let current = manager.current().unwrap();

        assert_eq!(address.to_hex(), TEST_SECRET_ADDRESS);
        assert!(!current.has_mnemonic());
        assert_eq!(current.origin(), KeyOrigin::ImportedPrivateKey);

        let err = manager.reveal_mnemonic().unwrap_err();
        assert!(matches!(err, Error::MnemonicUnavailable));
        assert_eq!(err.to_string(), "No mnemonic available for this account");

        assert_eq!(
            manager.reveal_private_key().unwrap().expose_secret(),
            TEST_SECRET_BASE64
        );
    }

    #[test]
    fn test_failed_import_keeps_inputs_and_accounts() {
        let mut manager = KeyManager::new();
        manager.set_private_key_input("AAAA");

        assert!(matches!(
            manager.import_wallet(),
            Err(Error::InvalidPrivateKey(_))
        ));
        assert!(manager.accounts().is_empty());
        assert!(manager.has_pending_input());
    }

    #[test]
    fn test_switch_account_only_moves_pointer() {
        let mut manager = KeyManager::new();
        let first = manager
            .import_from(ImportSource::Mnemonic(SecretString::from(TEST_MNEMONIC.to_string())))
            .unwrap();
        let second = manager
            .import_from(ImportSource::PrivateKey(SecretString::from(
                TEST_SECRET_BASE64.to_string(),
            )))
            .unwrap();
        let before = addresses(&manager);

        manager.switch_account(&first).unwrap();
        assert_eq!(manager.current().unwrap().address(), first);
        assert!(manager.is_current(0));
        assert_eq!(addresses(&manager), before);

        manager.switch_account(&second).unwrap();
        assert_eq!(manager.current().unwrap().address(), second);
        assert_eq!(addresses(&manager), before);
    }

    #[test]
    fn test_duplicate_import_is_rejected() {
        let mut manager = KeyManager::new();
        manager.set_private_key_input(TEST_SECRET_BASE64);
        let first = manager.import_wallet().unwrap();
        let other = manager.create_wallet();

        manager.set_private_key_input(TEST_SECRET_BASE64);
        let err = manager.import_wallet().unwrap_err();

        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("already imported")));
        assert_eq!(addresses(&manager), vec![first, other]);
        assert_eq!(manager.current().unwrap().address(), other);
        assert!(manager.has_pending_input());

        manager.switch_account(&first).unwrap();
        assert!(manager.is_current(0));
    }

    #[test]
    fn test_switch_to_unknown_account() {
        let mut manager = KeyManager::new();
        let known = manager.create_wallet();
        let unknown = SuiAddress::from_hex("0x2").unwrap();

        assert!(matches!(
            manager.switch_account(&unknown),
            Err(Error::UnknownAccount(_))
        ));
        assert_eq!(manager.current().unwrap().address(), known);
    }

    #[test]
    fn test_reveal_without_account() {
        let manager = KeyManager::new();
        assert!(matches!(manager.reveal_private_key(), Err(Error::NoAccount)));
        assert!(matches!(
            manager.reveal_mnemonic(),
            Err(Error::MnemonicUnavailable)
        ));
    }

    #[test]
    fn test_labels() {
        let mut manager = KeyManager::new();
        manager.set_mnemonic_input(TEST_MNEMONIC);
        manager.import_wallet().unwrap();

        assert_eq!(manager.label(0).unwrap(), "Account 1: 0xa2d1...6133");
        assert!(manager.label(1).is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut manager = KeyManager::new();
        manager.set_mnemonic_input(TEST_MNEMONIC);
        manager.import_wallet().unwrap();

        let debug_str = format!("{:?}", manager);
        assert!(!debug_str.contains("film"));
    }
}
