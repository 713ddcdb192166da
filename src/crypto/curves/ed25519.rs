//! Ed25519 Curve Implementation
//!
//! Used by: Solana
//!
//! Features:
//! - SLIP-0010 master key generation (`"ed25519 seed"`)
//! - Hardened-only child derivation
//! - RFC 8032 public key computation

use ed25519_dalek::SigningKey;

use super::traits::hmac_sha512;
use super::{CurveError, ExtendedKey, HdCurve};
use crate::wallet::DerivationComponent;

/// Ed25519 curve implementation
pub struct Ed25519Curve;

impl HdCurve for Ed25519Curve {
    const SEED_KEY: &'static [u8] = b"ed25519 seed";

    fn derive_child(parent: &ExtendedKey, segment: DerivationComponent) -> Result<ExtendedKey, CurveError> {
        // Ed25519 only supports hardened derivation (SLIP-0010)
        if !segment.is_hardened() {
            return Err(CurveError::NonHardenedSegment(segment.index()));
        }

        // SLIP-0010: 0x00 || private_key || index
        let index = segment.full_index().to_be_bytes();
        let parts: [&[u8]; 3] = [&[0x00], &parent.private_key[..], &index];
        hmac_sha512(&parent.chain_code[..], &parts)
    }

    /// Raw 32-byte Edwards point
    fn public_key(private_key: &[u8; 32]) -> Result<Vec<u8>, CurveError> {
        Ok(Self::verifying_key(private_key).to_vec())
    }
}

// MARK: - Helper Functions

impl Ed25519Curve {
    /// Public key as a fixed-size array
    pub fn verifying_key(private_key: &[u8; 32]) -> [u8; 32] {
        SigningKey::from_bytes(private_key).verifying_key().to_bytes()
    }

    /// Solana keypair format (64 bytes = secret + public)
    pub fn to_keypair_bytes(private_key: &[u8; 32]) -> zeroize::Zeroizing<[u8; 64]> {
        let mut keypair = zeroize::Zeroizing::new([0u8; 64]);
        keypair[..32].copy_from_slice(private_key);
        keypair[32..].copy_from_slice(&Self::verifying_key(private_key));
        keypair
    }
}

// MARK: - Tests
