//! Ed25519 key pairs
//!
//! SECURITY: secret key bytes only leave this module through
//! `export_private_key`, wrapped in a `SecretString`.
//! - No Serialize impl
//! - Debug output is redacted
//! - Keys are never logged

use super::address::{Blake2b256, SuiAddress, ED25519_FLAG};
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bip39::{Language, Mnemonic, MnemonicType, Seed};
use blake2::Digest;
use ed25519_dalek::{Signer, SigningKey};
use secrecy::SecretString;

/// SLIP-10 path `m/44'/784'/0'/0'/0'`, every level hardened
pub const DERIVATION_PATH: [u32; 5] = [44, 784, 0, 0, 0];

const HARDENED: u32 = 0x8000_0000;

/// Intent prefix for transaction data: scope 0, version 0, app id 0
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// An Ed25519 key pair and the Sui address derived from it
pub struct SuiKeyPair {
    signing_key: SigningKey,
    address: SuiAddress,
}

impl SuiKeyPair {
    /// Generate a fresh 12-word mnemonic and the key pair derived from it
    pub fn generate() -> (Self, SecretString) {
        let mnemonic = Mnemonic::new(MnemonicType::Words12, Language::English);
        let keypair = Self::from_parsed_mnemonic(&mnemonic);
        (keypair, SecretString::from(mnemonic.phrase().to_string()))
    }

    /// Derive the key pair for an English BIP-39 phrase
    pub fn from_mnemonic(phrase: &str) -> Result<Self> {
        let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        let mnemonic = Mnemonic::from_phrase(&normalized, Language::English)
            .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;
        Ok(Self::from_parsed_mnemonic(&mnemonic))
    }

    fn from_parsed_mnemonic(mnemonic: &Mnemonic) -> Self {
        let seed = Seed::new(mnemonic, "");
        let indexes = DERIVATION_PATH.map(|index| index | HARDENED);
        let secret = slip10_ed25519::derive_ed25519_private_key(seed.as_bytes(), &indexes);
        Self::from_signing_key(SigningKey::from_bytes(&secret))
    }

    /// Build from raw secret bytes
    ///
    /// Accepts the 32-byte Ed25519 secret, or the 33-byte keystore form with a
    /// leading scheme flag.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secret: [u8; 32] = match bytes.len() {
            32 => bytes.try_into().map_err(|_| Self::bad_length(bytes.len()))?,
            33 if bytes[0] == ED25519_FLAG => {
                bytes[1..].try_into().map_err(|_| Self::bad_length(bytes.len()))?
            }
            33 => {
                return Err(Error::InvalidPrivateKey(format!(
                    "Unsupported key scheme flag {:#04x}",
                    bytes[0]
                )))
            }
            len => return Err(Self::bad_length(len)),
        };
        Ok(Self::from_signing_key(SigningKey::from_bytes(&secret)))
    }

    /// Build from a base64-encoded secret key
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| Error::InvalidPrivateKey(format!("Invalid base64: {}", e)))?;
        Self::from_secret_bytes(&bytes)
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = SuiAddress::from_ed25519(&signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    fn bad_length(len: usize) -> Error {
        Error::InvalidPrivateKey(format!("Expected 32 bytes, got {}", len))
    }

    /// The public address (safe to share)
    pub fn address(&self) -> SuiAddress {
        self.address
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub fn public_key_base64(&self) -> String {
        BASE64.encode(self.public_key_bytes())
    }

    /// Base64 of the 32-byte secret key
    pub fn export_private_key(&self) -> SecretString {
        SecretString::from(BASE64.encode(self.signing_key.to_bytes()))
    }

    /// Sign BCS transaction bytes
    ///
    /// Returns the serialized signature `base64(flag || signature || public key)`
    /// expected by `sui_executeTransactionBlock`.
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> String {
        let mut hasher = Blake2b256::new();
        hasher.update(TRANSACTION_INTENT);
        hasher.update(tx_bytes);
        let digest = hasher.finalize();

        let signature = self.signing_key.sign(&digest);

        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(&self.public_key_bytes());
        BASE64.encode(serialized)
    }
}

// Implement Debug manually to avoid exposing the secret key
impl std::fmt::Debug for SuiKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiKeyPair")
            .field("address", &self.address)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}
