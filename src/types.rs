//! Shared types for Keyforge
//!
//! All data structures that cross module boundaries are defined here
//! for consistent serialization with the host's persistence layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroize;

use crate::crypto::curves::CurveType;
use crate::error::ForgeError;
use crate::wallet::{DerivationPath, Mnemonic};

// =============================================================================
// Chain Types
// =============================================================================

/// Supported account models.
///
/// The chain tag drives every variant choice in the engine: the curve
/// deriver, the address encoder and the fixed path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    Ethereum,
    Solana,
}

impl ChainId {
    pub const ALL: [ChainId; 2] = [ChainId::Ethereum, ChainId::Solana];

    pub fn name(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "ethereum",
            ChainId::Solana => "solana",
        }
    }

    /// SLIP-0044 coin type
    pub fn coin_type(&self) -> u32 {
        match self {
            ChainId::Ethereum => 60,
            ChainId::Solana => 501,
        }
    }

    pub fn curve(&self) -> CurveType {
        match self {
            ChainId::Ethereum => CurveType::Secp256k1,
            ChainId::Solana => CurveType::Ed25519,
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChainId {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ethereum" | "eth" => Ok(ChainId::Ethereum),
            "solana" | "sol" => Ok(ChainId::Solana),
            other => Err(ForgeError::invalid_chain(format!(
                "Unsupported chain '{}'. Expected 'ethereum' or 'solana'",
                other
            ))),
        }
    }
}

// =============================================================================
// Wallet Records
// =============================================================================

/// One derived wallet, in the flat shape the host stores verbatim.
///
/// `(mnemonic, path)` is sufficient to regenerate every key field; see
/// [`WalletRecord::rederive`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    pub id: String,
    pub chain: ChainId,
    /// Ethereum: `0x` + 40 lowercase hex. Solana: Base58 public key.
    #[serde(alias = "publicKey")]
    pub address: String,
    #[serde(default)]
    pub public_key_hex: String,
    /// Ethereum: 32-byte secret. Solana: 64-byte `secret || public` keypair.
    pub private_key_hex: String,
    pub mnemonic: Mnemonic,
    pub path: DerivationPath,
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("id", &self.id)
            .field("chain", &self.chain)
            .field("address", &self.address)
            .field("path", &self.path.to_string())
            .field("private_key_hex", &"[REDACTED]")
            .field("mnemonic", &self.mnemonic)
            .finish()
    }
}

impl Drop for WalletRecord {
    fn drop(&mut self) {
        self.private_key_hex.zeroize();
    }
}
