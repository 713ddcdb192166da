//! HD Curve Traits
//!
//! Defines the common derivation interface for all curve implementations.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use super::{CurveError, ExtendedKey};
use crate::wallet::{DerivationComponent, DerivationPath};

pub(crate) type HmacSha512 = Hmac<Sha512>;

/// HMAC-SHA512 over a list of message parts
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<ExtendedKey, CurveError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;
    for part in parts {
        mac.update(part);
    }
    let mut output = zeroize::Zeroizing::new([0u8; 64]);
    output.copy_from_slice(&mac.finalize().into_bytes());
    ExtendedKey::from_hmac_output(&output[..])
}

/// Hierarchical deterministic derivation over one curve
pub trait HdCurve {
    /// HMAC key used for master key generation from the seed
    const SEED_KEY: &'static [u8];

    /// Validate a master key candidate. Curves whose private keys are
    /// scalars modulo a group order reject out-of-range values here.
    fn check_master(key: ExtendedKey) -> Result<ExtendedKey, CurveError> {
        Ok(key)
    }

    /// Generate the master extended key from a seed
    fn master_key(seed: &[u8]) -> Result<ExtendedKey, CurveError> {
        if !(16..=64).contains(&seed.len()) {
            return Err(CurveError::InvalidSeed(format!(
                "Seed must be 16..=64 bytes, got {}",
                seed.len()
            )));
        }
        Self::check_master(hmac_sha512(Self::SEED_KEY, &[seed])?)
    }

    /// Take one step down the tree
    fn derive_child(parent: &ExtendedKey, segment: DerivationComponent) -> Result<ExtendedKey, CurveError>;

    /// Fold `derive_child` over the path, left to right, from the master key
    fn derive_path(seed: &[u8], path: &DerivationPath) -> Result<ExtendedKey, CurveError> {
        path.components()
            .iter()
            .try_fold(Self::master_key(seed)?, |key, segment| {
                Self::derive_child(&key, *segment)
            })
    }

    /// Public key bytes in the form the curve's chains use
    fn public_key(private_key: &[u8; 32]) -> Result<Vec<u8>, CurveError>;
}
