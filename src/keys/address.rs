//! Sui account addresses

use crate::{Error, Result};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::VerifyingKey;
use std::fmt;
use std::str::FromStr;

/// Blake2b with 256-bit output
pub(crate) type Blake2b256 = Blake2b<U32>;

/// Signature scheme flag for Ed25519 keys
pub const ED25519_FLAG: u8 = 0x00;

/// 32-byte Sui address
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuiAddress([u8; 32]);

impl SuiAddress {
    /// `Blake2b-256(flag || public key)`
    pub fn from_ed25519(public_key: &VerifyingKey) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update([ED25519_FLAG]);
        hasher.update(public_key.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Parse a hex address, with or without `0x`; short forms like `0x2` are left-padded
    pub fn from_hex(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > 64 {
            return Err(Error::InvalidAddress(input.to_string()));
        }
        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", input, e)))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Abbreviated form for account lists, e.g. `0xa2d1...6133`
    pub fn short(&self) -> String {
        let full = self.to_hex();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self.to_hex())
    }
}

impl FromStr for SuiAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let hex = "0xa2d14fad60c56049ecf75246a481934691214ce413e6a8ae2fe6834c173a6133";
        let address: SuiAddress = hex.parse().unwrap();
        assert_eq!(address.to_string(), hex);
        assert_eq!(address.short(), "0xa2d1...6133");
    }

    #[test]
    fn test_short_form_is_padded() {
        let address = SuiAddress::from_hex("0x2").unwrap();
        assert_eq!(
            address.to_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(SuiAddress::from_hex("0x").is_err());
        assert!(SuiAddress::from_hex("0xzz").is_err());
        assert!(SuiAddress::from_hex(&format!("0x{}", "a".repeat(65))).is_err());
    }
}
