//! Key Derivation
//!
//! Seed → curve walk → chain encoding, with the curve and encoder both
//! selected by the chain tag.
//!
//! SECURITY: intermediate private keys live in `Zeroizing` buffers.

use super::address::{encode_keys, DerivedKeys};
use super::derivation_path::DerivationPath;
use super::mnemonic::Mnemonic;
use super::seed::{derive_seed, Seed};
use crate::error::ForgeResult;
use crate::types::ChainId;

/// Derive the account keys at `path` for `chain`
pub fn derive_keys(chain: ChainId, seed: &Seed, path: &DerivationPath) -> ForgeResult<DerivedKeys> {
    let extended = chain.curve().derive(seed.as_bytes(), path)?;
    encode_keys(chain, &extended.private_key)
}

/// Full pipeline from a phrase: seed stretching then [`derive_keys`]
pub fn derive_from_mnemonic(
    chain: ChainId,
    mnemonic: &Mnemonic,
    passphrase: &str,
    path: &DerivationPath,
) -> ForgeResult<DerivedKeys> {
    let seed = derive_seed(mnemonic, passphrase)?;
    derive_keys(chain, &seed, path)
}
