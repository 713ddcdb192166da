//! Cryptographic primitives for Keyforge
//!
//! - Per-curve HD derivation (BIP-32 secp256k1, SLIP-0010 ed25519)
//! - Hash helpers shared by the address encoders

pub mod curves;

pub use curves::{
    CurveError, CurveType, Ed25519Curve, ExtendedKey, HdCurve, Secp256k1Curve,
};

use tiny_keccak::{Hasher, Keccak};

/// Keccak256 hash (used for Ethereum addresses)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
