//! secp256k1 Curve Implementation
//!
//! Used by: Ethereum
//!
//! Features:
//! - BIP-32 master key generation (`"Bitcoin seed"`)
//! - Hardened and non-hardened child derivation
//! - Compressed and uncompressed public keys

use secp256k1::{All, PublicKey, Scalar, Secp256k1, SecretKey};
use std::sync::OnceLock;

use super::traits::hmac_sha512;
use super::{CurveError, ExtendedKey, HdCurve};
use crate::wallet::DerivationComponent;

/// Shared signing/verification context
fn context() -> &'static Secp256k1<All> {
    static CONTEXT: OnceLock<Secp256k1<All>> = OnceLock::new();
    CONTEXT.get_or_init(Secp256k1::new)
}

fn secret_key(private_key: &[u8]) -> Result<SecretKey, CurveError> {
    SecretKey::from_slice(private_key).map_err(|e| CurveError::InvalidPrivateKey(e.to_string()))
}

/// secp256k1 curve implementation
pub struct Secp256k1Curve;

impl HdCurve for Secp256k1Curve {
    const SEED_KEY: &'static [u8] = b"Bitcoin seed";

    fn check_master(key: ExtendedKey) -> Result<ExtendedKey, CurveError> {
        // IL must be a valid scalar: non-zero and below the group order
        secret_key(&key.private_key[..])
            .map_err(|_| CurveError::InvalidSeed("Master key is not a valid secp256k1 scalar".into()))?;
        Ok(key)
    }

    fn derive_child(parent: &ExtendedKey, segment: DerivationComponent) -> Result<ExtendedKey, CurveError> {
        let parent_sk = secret_key(&parent.private_key[..])?;
        let index = segment.full_index().to_be_bytes();

        let child = if segment.is_hardened() {
            // Hardened: 0x00 || private_key || index
            let parts: [&[u8]; 3] = [&[0x00], &parent.private_key[..], &index];
            hmac_sha512(&parent.chain_code[..], &parts)?
        } else {
            // Normal: compressed public_key || index
            let parent_pk = PublicKey::from_secret_key(context(), &parent_sk);
            let serialized = parent_pk.serialize();
            let parts: [&[u8]; 2] = [&serialized, &index];
            hmac_sha512(&parent.chain_code[..], &parts)?
        };

        // child_key = parse256(IL) + parent_key (mod n)
        let tweak = Scalar::from_be_bytes(*child.private_key)
            .map_err(|_| CurveError::DerivationFailed(format!("IL out of range at {}", segment)))?;
        let child_sk = parent_sk
            .add_tweak(&tweak)
            .map_err(|e| CurveError::DerivationFailed(format!("Tweak failed at {}: {}", segment, e)))?;

        let mut child = child;
        child.private_key.copy_from_slice(&child_sk.secret_bytes());
        Ok(child)
    }

    /// Compressed SEC1 encoding (33 bytes)
    fn public_key(private_key: &[u8; 32]) -> Result<Vec<u8>, CurveError> {
        let sk = secret_key(private_key)?;
        Ok(PublicKey::from_secret_key(context(), &sk).serialize().to_vec())
    }
}

// MARK: - Helper Functions

impl Secp256k1Curve {
    /// Uncompressed public key without the `0x04` prefix (64 bytes, x || y)
    pub fn public_key_xy(private_key: &[u8; 32]) -> Result<[u8; 64], CurveError> {
        let sk = secret_key(private_key)?;
        let uncompressed = PublicKey::from_secret_key(context(), &sk).serialize_uncompressed();

        let mut xy = [0u8; 64];
        xy.copy_from_slice(&uncompressed[1..]);
        Ok(xy)
    }
}

// MARK: - Tests
