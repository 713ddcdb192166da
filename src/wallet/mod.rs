//! Wallet Module
//!
//! Handles mnemonic generation and validation, seed derivation, index
//! allocation, per-chain key derivation and address encoding, and the
//! wallet registry that ties them together.

mod address;
mod allocator;
mod derivation;
mod derivation_path;
mod mnemonic;
mod registry;
mod seed;
mod wordlist;

pub use address::*;
pub use allocator::*;
pub use derivation::*;
pub use derivation_path::*;
pub use mnemonic::*;
pub use registry::*;
pub use seed::*;
pub use wordlist::*;

use crate::error::{ForgeError, ForgeResult};

/// Generate a new phrase with `entropy_bits` of CSPRNG entropy (128 or 256)
pub fn generate_mnemonic(entropy_bits: usize) -> ForgeResult<Mnemonic> {
    let strength = MnemonicStrength::from_bits(entropy_bits).ok_or_else(|| {
        ForgeError::invalid_input(format!(
            "Entropy must be 128 or 256 bits, got {}",
            entropy_bits
        ))
    })?;
    Mnemonic::generate(strength)
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> bool {
    is_valid_mnemonic(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_mnemonic_bits() {
        assert_eq!(generate_mnemonic(128).unwrap().word_count(), 12);
        assert_eq!(generate_mnemonic(256).unwrap().word_count(), 24);
        assert!(generate_mnemonic(192).is_err());
    }

    #[test]
    fn test_validate_mnemonic() {
        let phrase = generate_mnemonic(256).unwrap().phrase();
        assert!(validate_mnemonic(&phrase));
        assert!(!validate_mnemonic(""));
        assert!(!validate_mnemonic("abandon abandon abandon"));
    }
}
