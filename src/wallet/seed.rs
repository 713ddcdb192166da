//! BIP-39 seed derivation (PBKDF2-HMAC-SHA512)

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha512;
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use super::mnemonic::Mnemonic;
use crate::error::{ForgeError, ForgeResult};

pub const SEED_LEN: usize = 64;
pub const PBKDF2_ROUNDS: u32 = 2048;

/// 64-byte root of the key tree. Wiped on drop.
#[derive(Clone)]
pub struct Seed(Zeroizing<[u8; SEED_LEN]>);

impl Seed {
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.0[..]))
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

/// Stretch a validated mnemonic and optional passphrase into a seed.
///
/// Both inputs are NFKD-normalized; the salt is `"mnemonic" + passphrase`.
pub fn derive_seed(mnemonic: &Mnemonic, passphrase: &str) -> ForgeResult<Seed> {
    let password: Zeroizing<String> = Zeroizing::new(mnemonic.phrase().nfkd().collect());
    let salt: Zeroizing<String> = Zeroizing::new(format!(
        "mnemonic{}",
        passphrase.nfkd().collect::<String>()
    ));

    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    pbkdf2::<Hmac<Sha512>>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed[..])
        .map_err(|e| ForgeError::crypto_error(format!("PBKDF2 failed: {}", e)))?;

    Ok(Seed(seed))
}
