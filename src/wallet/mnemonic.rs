//! BIP-39 Mnemonic Phrases
//!
//! Entropy is extended with the leading `ENT/32` bits of its SHA-256 hash
//! and split into 11-bit groups, each naming one dictionary word.
//!
//! Generation always draws from the operating system CSPRNG. There is no
//! fallback source: if the OS cannot supply entropy, generation fails with
//! `randomness_unavailable`.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use zeroize::Zeroizing;

use super::wordlist::WordlistCodec;
use crate::error::{ForgeError, ForgeResult};

/// Word counts accepted when validating a phrase
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

const BITS_PER_WORD: usize = 11;

/// Size of freshly generated phrases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MnemonicStrength {
    /// 128 bits of entropy
    #[default]
    Words12,
    /// 256 bits of entropy
    Words24,
}

impl MnemonicStrength {
    pub fn from_bits(bits: usize) -> Option<Self> {
        match bits {
            128 => Some(Self::Words12),
            256 => Some(Self::Words24),
            _ => None,
        }
    }

    pub fn from_word_count(words: usize) -> Option<Self> {
        match words {
            12 => Some(Self::Words12),
            24 => Some(Self::Words24),
            _ => None,
        }
    }

    pub fn entropy_bits(&self) -> usize {
        match self {
            Self::Words12 => 128,
            Self::Words24 => 256,
        }
    }

    pub fn entropy_bytes(&self) -> usize {
        self.entropy_bits() / 8
    }

    pub fn word_count(&self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words24 => 24,
        }
    }
}

/// A checksummed phrase, stored as dictionary indices.
///
/// Every `Mnemonic` value has passed checksum validation; there is no way
/// to construct an invalid one.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    indices: Zeroizing<Vec<u16>>,
}

impl Mnemonic {
    /// Generate a fresh phrase from the OS CSPRNG
    pub fn generate(strength: MnemonicStrength) -> ForgeResult<Self> {
        Self::generate_with_rng(&mut OsRng, strength)
    }

    /// Generate a fresh phrase from a caller-supplied CSPRNG
    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        strength: MnemonicStrength,
    ) -> ForgeResult<Self> {
        let mut entropy = Zeroizing::new(vec![0u8; strength.entropy_bytes()]);
        rng.try_fill_bytes(&mut entropy[..]).map_err(|e| {
            ForgeError::randomness_unavailable("Secure random source failed")
                .with_details(e.to_string())
        })?;
        Self::from_entropy(&entropy)
    }

    /// Encode raw entropy (16, 20, 24, 28 or 32 bytes)
    pub fn from_entropy(entropy: &[u8]) -> ForgeResult<Self> {
        if !(16..=32).contains(&entropy.len()) || entropy.len() % 4 != 0 {
            return Err(ForgeError::invalid_input(format!(
                "Entropy must be 16, 20, 24, 28 or 32 bytes, got {}",
                entropy.len()
            )));
        }

        let entropy_bits = entropy.len() * 8;
        let checksum = Sha256::digest(entropy);
        let bit = |i: usize| -> u16 {
            let (bytes, i) = if i < entropy_bits {
                (entropy, i)
            } else {
                (&checksum[..], i - entropy_bits)
            };
            ((bytes[i / 8] >> (7 - i % 8)) & 1) as u16
        };

        let word_count = (entropy_bits + entropy_bits / 32) / BITS_PER_WORD;
        let indices = (0..word_count)
            .map(|w| {
                (0..BITS_PER_WORD).fold(0u16, |acc, b| (acc << 1) | bit(w * BITS_PER_WORD + b))
            })
            .collect();

        Ok(Self {
            indices: Zeroizing::new(indices),
        })
    }

    /// Build from dictionary indices, verifying word count and checksum
    pub fn from_indices(indices: &[u16]) -> ForgeResult<Self> {
        if !VALID_WORD_COUNTS.contains(&indices.len()) {
            return Err(ForgeError::invalid_mnemonic(format!(
                "Expected 12, 15, 18, 21 or 24 words, got {}",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= super::wordlist::WORDLIST_SIZE) {
            return Err(ForgeError::invalid_mnemonic(format!("Word index {} out of range", bad)));
        }

        let entropy = unpack_entropy(indices);
        let expected = Self::from_entropy(&entropy)?;
        if expected.indices.as_slice() != indices {
            return Err(ForgeError::invalid_mnemonic("Checksum mismatch"));
        }

        Ok(expected)
    }

    /// Parse a user-supplied phrase, reporting why it is rejected
    pub fn parse(phrase: &str) -> ForgeResult<Self> {
        let normalized = Zeroizing::new(normalize_phrase(phrase));
        let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();

        if !VALID_WORD_COUNTS.contains(&words.len()) {
            return Err(ForgeError::invalid_mnemonic(format!(
                "Expected 12, 15, 18, 21 or 24 words, got {}",
                words.len()
            )));
        }

        let indices = Zeroizing::new(WordlistCodec::words_to_indices(&words)?);
        Self::from_indices(&indices)
    }

    /// Recover the encoded entropy
    pub fn to_entropy(&self) -> Zeroizing<Vec<u8>> {
        unpack_entropy(&self.indices)
    }

    pub fn word_count(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn words(&self) -> Vec<&'static str> {
        // Indices are validated on construction
        self.indices
            .iter()
            .filter_map(|&i| WordlistCodec::word(i).ok())
            .collect()
    }

    /// Canonical form: lowercase words joined by single spaces
    pub fn phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.words().join(" "))
    }

    /// Stable identity of this phrase that does not reveal it
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"keyforge/mnemonic-fingerprint");
        for index in self.indices.iter() {
            hasher.update(index.to_be_bytes());
        }
        hasher.finalize().into()
    }
}

/// Unpack the entropy half of the 11-bit groups, discarding the checksum bits
fn unpack_entropy(indices: &[u16]) -> Zeroizing<Vec<u8>> {
    let total_bits = indices.len() * BITS_PER_WORD;
    let entropy_bits = total_bits * 32 / 33;

    let mut entropy = Zeroizing::new(vec![0u8; entropy_bits / 8]);
    for i in 0..entropy_bits {
        let word = indices[i / BITS_PER_WORD];
        let bit = (word >> (BITS_PER_WORD - 1 - i % BITS_PER_WORD)) & 1;
        if bit == 1 {
            entropy[i / 8] |= 1 << (7 - i % 8);
        }
    }
    entropy
}

/// Trim, collapse internal whitespace to single spaces and lowercase
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Predicate form of [`Mnemonic::parse`]. Never panics or errors.
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse(phrase).is_ok()
}

impl FromStr for Mnemonic {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Hash for Mnemonic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.indices.as_slice().hash(state);
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic([REDACTED] {} words)", self.word_count())
    }
}

impl Serialize for Mnemonic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.phrase())
    }
}

impl<'de> Deserialize<'de> for Mnemonic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let phrase = Zeroizing::new(String::deserialize(deserializer)?);
        Mnemonic::parse(&phrase).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_bip39_entropy_vectors() {
        let cases: [(&[u8], &str); 3] = [
            (&[0u8; 16], ABANDON),
            (
                &[0x7f; 16],
                "legal winner thank year wave sausage worth useful legal winner thank yellow",
            ),
            (&[0xff; 16], "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong"),
        ];

        for (entropy, phrase) in cases {
            let mnemonic = Mnemonic::from_entropy(entropy).unwrap();
            assert_eq!(mnemonic.phrase().as_str(), phrase);
            assert_eq!(mnemonic.to_entropy().as_slice(), entropy);
        }
    }

    #[test]
    fn test_24_word_vector() {
        let mnemonic = Mnemonic::from_entropy(&[0u8; 32]).unwrap();
        let words = mnemonic.words();
        assert_eq!(words.len(), 24);
        assert!(words[..23].iter().all(|w| *w == "abandon"));
        assert_eq!(words[23], "art");
    }

    #[test]
    fn test_generate_is_valid() {
        for strength in [MnemonicStrength::Words12, MnemonicStrength::Words24] {
            let mnemonic = Mnemonic::generate(strength).unwrap();
            assert_eq!(mnemonic.word_count(), strength.word_count());
            assert!(is_valid_mnemonic(&mnemonic.phrase()));
        }
    }

    #[test]
    fn test_generate_differs() {
        let a = Mnemonic::generate(MnemonicStrength::Words12).unwrap();
        let b = Mnemonic::generate(MnemonicStrength::Words12).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_word_count() {
        assert!(!is_valid_mnemonic("abandon abandon abandon"));
        let err = Mnemonic::parse("abandon abandon abandon").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMnemonic);
    }

    #[test]
    fn test_bad_checksum() {
        let phrase = ABANDON.replace("about", "abandon");
        assert!(!is_valid_mnemonic(&phrase));
        let err = Mnemonic::parse(&phrase).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMnemonic);
        assert!(err.message.contains("Checksum"));
    }

    #[test]
    fn test_unknown_word_surfaces_word() {
        let phrase = ABANDON.replace("about", "abuot");
        let err = Mnemonic::parse(&phrase).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownWord);
        assert_eq!(err.details.as_deref(), Some("abuot"));
    }

    #[test]
    fn test_normalization() {
        let messy = format!("  {}  ", ABANDON.to_uppercase().replace(' ', "   \t"));
        assert_eq!(normalize_phrase(&messy), ABANDON);
        assert_eq!(Mnemonic::parse(&messy).unwrap(), Mnemonic::parse(ABANDON).unwrap());
    }

    #[test]
    fn test_debug_is_redacted() {
        let mnemonic = Mnemonic::parse(ABANDON).unwrap();
        let debug = format!("{:?}", mnemonic);
        assert!(!debug.contains("abandon"));
        assert!(debug.contains("12 words"));
    }

    #[test]
    fn test_serde_as_phrase() {
        let mnemonic = Mnemonic::parse(ABANDON).unwrap();
        let json = serde_json::to_string(&mnemonic).unwrap();
        assert_eq!(json, format!("\"{}\"", ABANDON));

        let back: Mnemonic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mnemonic);
        assert!(serde_json::from_str::<Mnemonic>("\"abandon abandon\"").is_err());
    }

    #[test]
    fn test_fingerprint_stable_and_distinct() {
        let a = Mnemonic::parse(ABANDON).unwrap();
        let b = Mnemonic::from_entropy(&[0xff; 16]).unwrap();
        assert_eq!(a.fingerprint(), Mnemonic::parse(ABANDON).unwrap().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_rejects_bad_entropy_length() {
        assert!(Mnemonic::from_entropy(&[0u8; 15]).is_err());
        assert!(Mnemonic::from_entropy(&[0u8; 17]).is_err());
        assert!(Mnemonic::from_entropy(&[0u8; 36]).is_err());
    }

    #[test]
    fn test_strength_mapping() {
        assert_eq!(MnemonicStrength::from_bits(128), Some(MnemonicStrength::Words12));
        assert_eq!(MnemonicStrength::from_bits(256), Some(MnemonicStrength::Words24));
        assert_eq!(MnemonicStrength::from_bits(160), None);
        assert_eq!(MnemonicStrength::Words24.entropy_bytes(), 32);
    }

    struct OfflineRng;

    impl RngCore for OfflineRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source offline"))
        }
    }

    impl CryptoRng for OfflineRng {}

    #[test]
    fn test_failing_rng_aborts_generation() {
        let err = Mnemonic::generate_with_rng(&mut OfflineRng, MnemonicStrength::Words12).unwrap_err();

        assert_eq!(err.code, ErrorCode::RandomnessUnavailable);
        assert!(err.is_fatal());
        assert!(err.details.unwrap_or_default().contains("offline"));
    }
}
