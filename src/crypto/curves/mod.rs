//! Hierarchical Deterministic Curve Derivation
//!
//! This module walks a derivation path from a BIP-39 seed to a child
//! private key for each supported curve:
//!
//! - `secp256k1`: BIP-32, hardened and non-hardened steps (Ethereum)
//! - `ed25519`: SLIP-0010, hardened steps only (Solana)
//!
//! # Architecture
//!
//! Both curves implement the `HdCurve` trait, which provides:
//! - Master key generation from seed
//! - Single child step (`derive_child`)
//! - A left-to-right fold over the path (`derive_path`)
//! - Public key computation for the final key
//!
//! `CurveType` is the tagged dispatch the rest of the crate uses.
//!
//! # Example
//!
//! ```rust,ignore
//! use keyforge::crypto::curves::CurveType;
//! use keyforge::wallet::DerivationPath;
//!
//! let path: DerivationPath = "m/44'/501'/0'/0'".parse()?;
//! let key = CurveType::Ed25519.derive(seed.as_bytes(), &path)?;
//! ```

pub mod ed25519;
pub mod secp256k1;
pub mod traits;

pub use ed25519::Ed25519Curve;
pub use secp256k1::Secp256k1Curve;
pub use traits::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::wallet::DerivationPath;

// MARK: - Curve Type Enum

/// Supported elliptic curve types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// secp256k1 with BIP-32 derivation
    Secp256k1,
    /// Ed25519 with SLIP-0010 derivation
    Ed25519,
}

impl CurveType {
    /// Get the curve name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Ed25519 => "ed25519",
        }
    }

    /// Derive the extended key at `path` from `seed`
    pub fn derive(&self, seed: &[u8], path: &DerivationPath) -> Result<ExtendedKey, CurveError> {
        match self {
            Self::Secp256k1 => Secp256k1Curve::derive_path(seed, path),
            Self::Ed25519 => Ed25519Curve::derive_path(seed, path),
        }
    }

    /// Derive the public key for a private key on this curve
    pub fn public_key(&self, private_key: &[u8; 32]) -> Result<Vec<u8>, CurveError> {
        match self {
            Self::Secp256k1 => Secp256k1Curve::public_key(private_key),
            Self::Ed25519 => Ed25519Curve::public_key(private_key),
        }
    }
}

impl std::fmt::Display for CurveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// MARK: - Extended Key

/// A private key paired with its chain code. Both halves are wiped on drop.
#[derive(Clone)]
pub struct ExtendedKey {
    pub private_key: Zeroizing<[u8; 32]>,
    pub chain_code: Zeroizing<[u8; 32]>,
}

impl ExtendedKey {
    /// Split a 64-byte HMAC-SHA512 output into `IL` (key) and `IR` (chain code)
    pub fn from_hmac_output(output: &[u8]) -> Result<Self, CurveError> {
        if output.len() != 64 {
            return Err(CurveError::DerivationFailed(format!(
                "HMAC output must be 64 bytes, got {}",
                output.len()
            )));
        }

        let mut private_key = Zeroizing::new([0u8; 32]);
        private_key.copy_from_slice(&output[..32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(&output[32..]);

        Ok(Self {
            private_key,
            chain_code,
        })
    }
}

impl std::fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ExtendedKey([REDACTED])")
    }
}

// MARK: - Curve Errors

/// Errors that can occur during curve operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    /// Ed25519 (SLIP-0010) defines hardened children only
    #[error("Non-hardened segment {0} is not supported on ed25519")]
    NonHardenedSegment(u32),
}

// MARK: - Tests
