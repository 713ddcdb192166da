//! Chain address encoding
//!
//! - Ethereum: last 20 bytes of keccak256(x || y), lowercase hex with `0x`.
//!   Records are never EIP-55 checksummed; [`to_checksum_address`] is a
//!   display helper only.
//! - Solana: Base58 of the 32-byte ed25519 public key.

use zeroize::Zeroizing;

use crate::crypto::curves::{Ed25519Curve, Secp256k1Curve};
use crate::crypto::keccak256;
use crate::error::{ForgeError, ForgeResult};
use crate::types::ChainId;

/// Key material for one derived account, in the chain's export format
pub struct DerivedKeys {
    /// Ethereum: 32-byte secret. Solana: 64-byte `secret || public` keypair.
    pub private_key: Zeroizing<Vec<u8>>,
    /// Ethereum: 64-byte uncompressed `x || y`. Solana: 32-byte point.
    pub public_key: Vec<u8>,
    pub address: String,
}

impl std::fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKeys")
            .field("private_key", &"[REDACTED]")
            .field("public_key", &hex::encode(&self.public_key))
            .field("address", &self.address)
            .finish()
    }
}

/// Turns a derived private key into a chain's account identity
pub trait AddressEncoder {
    const CHAIN: ChainId;

    /// Public key bytes hashed or encoded into the address
    fn public_key(private_key: &[u8; 32]) -> ForgeResult<Vec<u8>>;

    /// Address string for a public key produced by [`Self::public_key`]
    fn encode(public_key: &[u8]) -> ForgeResult<String>;

    /// Private key bytes as the chain's wallets import them
    fn export_private_key(private_key: &[u8; 32]) -> Zeroizing<Vec<u8>>;

    fn validate(address: &str) -> bool;

    fn derive_keys(private_key: &[u8; 32]) -> ForgeResult<DerivedKeys> {
        let public_key = Self::public_key(private_key)?;
        let address = Self::encode(&public_key)?;
        Ok(DerivedKeys {
            private_key: Self::export_private_key(private_key),
            public_key,
            address,
        })
    }
}

// MARK: - Ethereum

pub struct EthereumEncoder;

impl AddressEncoder for EthereumEncoder {
    const CHAIN: ChainId = ChainId::Ethereum;

    fn public_key(private_key: &[u8; 32]) -> ForgeResult<Vec<u8>> {
        Ok(Secp256k1Curve::public_key_xy(private_key)?.to_vec())
    }

    fn encode(public_key: &[u8]) -> ForgeResult<String> {
        if public_key.len() != 64 {
            return Err(ForgeError::crypto_error(format!(
                "Ethereum public key must be 64 bytes (x || y), got {}",
                public_key.len()
            )));
        }
        let hash = keccak256(public_key);
        Ok(format!("0x{}", hex::encode(&hash[12..])))
    }

    fn export_private_key(private_key: &[u8; 32]) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(private_key.to_vec())
    }

    fn validate(address: &str) -> bool {
        let Some(body) = address.strip_prefix("0x") else {
            return false;
        };
        if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return false;
        }

        let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            // Mixed case must be a correct EIP-55 checksum
            return to_checksum_address(address).map_or(false, |c| c == address);
        }
        true
    }
}

/// EIP-55 mixed-case rendering of an Ethereum address
pub fn to_checksum_address(address: &str) -> ForgeResult<String> {
    let body = address
        .strip_prefix("0x")
        .filter(|b| b.len() == 40 && b.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| ForgeError::invalid_input(format!("Not an Ethereum address: {}", address)))?;

    let lower = body.to_ascii_lowercase();
    let hash = keccak256(lower.as_bytes());

    let mut result = String::from("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_alphabetic() && nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

// MARK: - Solana

pub struct SolanaEncoder;

impl AddressEncoder for SolanaEncoder {
    const CHAIN: ChainId = ChainId::Solana;

    fn public_key(private_key: &[u8; 32]) -> ForgeResult<Vec<u8>> {
        Ok(Ed25519Curve::verifying_key(private_key).to_vec())
    }

    fn encode(public_key: &[u8]) -> ForgeResult<String> {
        if public_key.len() != 32 {
            return Err(ForgeError::crypto_error(format!(
                "Solana public key must be 32 bytes, got {}",
                public_key.len()
            )));
        }
        Ok(bs58::encode(public_key).into_string())
    }

    fn export_private_key(private_key: &[u8; 32]) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(Ed25519Curve::to_keypair_bytes(private_key).to_vec())
    }

    fn validate(address: &str) -> bool {
        bs58::decode(address)
            .into_vec()
            .map(|bytes| bytes.len() == 32)
            .unwrap_or(false)
    }
}

// MARK: - Dispatch

/// Public key, address and exportable private key for `chain`
pub fn encode_keys(chain: ChainId, private_key: &[u8; 32]) -> ForgeResult<DerivedKeys> {
    match chain {
        ChainId::Ethereum => EthereumEncoder::derive_keys(private_key),
        ChainId::Solana => SolanaEncoder::derive_keys(private_key),
    }
}

/// Syntactic address check for `chain`
pub fn validate_address(chain: ChainId, address: &str) -> bool {
    let trimmed = address.trim();
    match chain {
        ChainId::Ethereum => EthereumEncoder::validate(trimmed),
        ChainId::Solana => SolanaEncoder::validate(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hex_str: &str) -> [u8; 32] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_ethereum_address() {
        let keys = encode_keys(
            ChainId::Ethereum,
            &key("1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"),
        )
        .unwrap();

        assert_eq!(keys.address, "0x9858effd232b4033e47d90003d41ec34ecaeda94");
        assert_eq!(keys.private_key.len(), 32);
        assert_eq!(
            hex::encode(&keys.public_key),
            "37b0bb7a8288d38ed49a524b5dc98cff3eb5ca824c9f9dc0dfdb3d9cd600f299\
             a6179912b7451c09896c4098eca7ce6b2e58330672795e847c4d6af44e024230"
        );
    }

    #[test]
    fn test_checksum_address() {
        let checksummed = to_checksum_address("0x9858effd232b4033e47d90003d41ec34ecaeda94").unwrap();
        assert_eq!(checksummed, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");

        assert!(validate_address(ChainId::Ethereum, &checksummed));
        assert!(!validate_address(ChainId::Ethereum, "0x9858eFFD232B4033E47d90003D41EC34EcaEda94"));
        assert!(to_checksum_address("9858effd").is_err());
    }

    #[test]
    fn test_solana_address() {
        let keys = encode_keys(
            ChainId::Solana,
            &key("37df573b3ac4ad5b522e064e25b63ea16bcbe79d449e81a0268d1047948bb445"),
        )
        .unwrap();

        assert_eq!(keys.address, "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk");
        assert_eq!(
            hex::encode(&keys.public_key),
            "f036276246a75b9de3349ed42b15e232f6518fc20f5fcd4f1d64e81f9bd258f7"
        );
        // Keypair export: secret followed by public key
        assert_eq!(keys.private_key.len(), 64);
        assert_eq!(&keys.private_key[32..], &keys.public_key[..]);
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address(ChainId::Ethereum, "0x9858effd232b4033e47d90003d41ec34ecaeda94"));
        assert!(!validate_address(ChainId::Ethereum, "9858effd232b4033e47d90003d41ec34ecaeda94"));
        assert!(!validate_address(ChainId::Ethereum, "0x9858effd"));
        assert!(!validate_address(ChainId::Ethereum, "0xzz58effd232b4033e47d90003d41ec34ecaeda94"));

        assert!(validate_address(ChainId::Solana, "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk"));
        assert!(!validate_address(ChainId::Solana, "HAgk14JpMQLgt6rVgv7c"));
        assert!(!validate_address(ChainId::Solana, "0OIl"));
    }

    #[test]
    fn test_encoder_rejects_wrong_key_length() {
        assert!(EthereumEncoder::encode(&[0u8; 33]).is_err());
        assert!(SolanaEncoder::encode(&[0u8; 31]).is_err());
    }

    #[test]
    fn test_debug_hides_private_key() {
        let keys = encode_keys(ChainId::Solana, &[7u8; 32]).unwrap();
        let debug = format!("{:?}", keys);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(&hex::encode([7u8; 32])));
    }
}
