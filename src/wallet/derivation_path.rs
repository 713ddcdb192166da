//! Key Derivation Paths
//!
//! Parses and renders BIP-32 style paths and builds the fixed path
//! template each chain derives along:
//! - Ethereum: `m/44'/60'/0'/0/i` (address index varies)
//! - Solana: `m/44'/501'/i'/0'` (account varies, every segment hardened)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{ForgeError, ForgeResult};
use crate::types::ChainId;

/// BIP-44 purpose
pub const BIP44_PURPOSE: u32 = 44;

/// Hardened offset for BIP-32 derivation
pub const HARDENED: u32 = 0x80000000;

/// Single component of a derivation path.
///
/// `index` is always below `HARDENED`; the hardened bit lives in the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationComponent {
    index: u32,
    hardened: bool,
}

impl DerivationComponent {
    pub fn new(index: u32, hardened: bool) -> ForgeResult<Self> {
        if index >= HARDENED {
            return Err(ForgeError::invalid_input(format!(
                "Path component {} exceeds maximum value",
                index
            )));
        }
        Ok(Self { index, hardened })
    }

    // Callers guarantee `index < HARDENED`
    fn hardened(index: u32) -> Self {
        Self { index, hardened: true }
    }

    fn normal(index: u32) -> Self {
        Self { index, hardened: false }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// Get the full index including hardened bit
    pub fn full_index(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED
        } else {
            self.index
        }
    }
}

impl fmt::Display for DerivationComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// Parsed derivation path, rooted at the seed (`m`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath {
    components: Vec<DerivationComponent>,
}

impl DerivationPath {
    pub fn new(components: Vec<DerivationComponent>) -> Self {
        Self { components }
    }

    pub fn components(&self) -> &[DerivationComponent] {
        &self.components
    }

    /// The chain's fixed-shape path with `index` in its variable segment
    pub fn for_chain(chain: ChainId, index: u32) -> ForgeResult<Self> {
        if index >= HARDENED {
            return Err(ForgeError::invalid_input(format!(
                "Derivation index {} exceeds maximum value",
                index
            )));
        }

        let coin_type = DerivationComponent::hardened(chain.coin_type());
        let purpose = DerivationComponent::hardened(BIP44_PURPOSE);

        let components = match chain {
            ChainId::Ethereum => vec![
                purpose,
                coin_type,
                DerivationComponent::hardened(0),
                DerivationComponent::normal(0),
                DerivationComponent::normal(index),
            ],
            ChainId::Solana => vec![
                purpose,
                coin_type,
                DerivationComponent::hardened(index),
                DerivationComponent::hardened(0),
            ],
        };

        Ok(Self { components })
    }

    /// Read back the variable segment if this path matches the chain's template
    pub fn index_for(&self, chain: ChainId) -> Option<u32> {
        let slot = match chain {
            ChainId::Ethereum => 4,
            ChainId::Solana => 2,
        };
        let index = self.components.get(slot)?.index;

        let expected = Self::for_chain(chain, index).ok()?;
        (expected == *self).then_some(index)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn is_fully_hardened(&self) -> bool {
        self.components.iter().all(|c| c.hardened)
    }

    pub fn purpose(&self) -> Option<u32> {
        self.components.first().map(|c| c.index)
    }

    pub fn coin_type(&self) -> Option<u32> {
        self.components.get(1).map(|c| c.index)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s).map_err(|e| {
            ForgeError::invalid_input(format!("Invalid derivation path '{}': {}", s, e))
        })
    }
}

impl Serialize for DerivationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DerivationPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a derivation path string
fn parse_path(path: &str) -> Result<DerivationPath, String> {
    let trimmed = path.trim();

    if trimmed == "m" || trimmed == "M" {
        return Ok(DerivationPath::default());
    }

    // Must start with m/
    let path_part = trimmed
        .strip_prefix("m/")
        .or_else(|| trimmed.strip_prefix("M/"))
        .ok_or_else(|| "Derivation path must start with 'm/'".to_string())?;

    if path_part.is_empty() {
        return Err("Empty derivation path".to_string());
    }

    let components = path_part
        .split('/')
        .map(parse_component)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DerivationPath { components })
}

/// Parse a single path component
fn parse_component(s: &str) -> Result<DerivationComponent, String> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err("Empty path component".to_string());
    }

    // Check for hardened indicator
    let (number_str, hardened) = match trimmed.strip_suffix(['\'', 'h', 'H']) {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };

    if !number_str.chars().all(|c| c.is_ascii_digit()) || number_str.is_empty() {
        return Err(format!("Invalid path component '{}'", s));
    }

    let index: u32 = number_str
        .parse()
        .map_err(|e| format!("Invalid path component '{}': {}", s, e))?;

    DerivationComponent::new(index, hardened).map_err(|e| e.message)
}
