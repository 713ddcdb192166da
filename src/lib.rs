//! Keyforge Core Library
//!
//! Hierarchical deterministic key derivation for Ethereum and Solana
//! accounts from a single BIP-39 phrase.
//!
//! # Architecture
//!
//! This crate provides:
//! - **wallet**: Mnemonics, seeds, paths, index allocation, address encoding
//!   and the `WalletRegistry` that orchestrates them
//! - **crypto**: Per-curve HD derivation (BIP-32 secp256k1, SLIP-0010 ed25519)
//! - **config**: Engine settings presets
//! - **utils**: Redacting structured logging
//!
//! # Security
//!
//! This crate uses `zeroize` to securely clear sensitive data from memory.
//! Entropy, seeds and intermediate private keys are zeroed when dropped.
//! Mnemonic generation draws only from the OS CSPRNG.
//!
//! # Example
//!
//! ```rust,ignore
//! use keyforge::{ChainId, WalletRegistry};
//!
//! let registry = WalletRegistry::new();
//! let record = registry.derive_wallet(ChainId::Ethereum, None)?;
//! println!("{} at {}", record.address, record.path);
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod types;
pub mod utils;
pub mod wallet;

// Re-export key types for convenience
pub use config::{EngineConfig, EngineSettings, SecurityLevel};
pub use error::{ErrorCode, ForgeError, ForgeResult};
pub use types::*;

pub use wallet::{
    derive_seed, generate_mnemonic, validate_address, validate_mnemonic, DerivationPath,
    DerivedKeys, Mnemonic, MnemonicStrength, PathAllocator, Seed, WalletRegistry,
};
