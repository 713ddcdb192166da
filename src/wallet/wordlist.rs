//! English BIP-39 wordlist codec
//!
//! Maps 11-bit indices to dictionary words and back. The 2048-entry table
//! itself comes from the `bip39` crate.

use bip39::Language;
use thiserror::Error;

/// Number of words in the dictionary (2^11)
pub const WORDLIST_SIZE: usize = 2048;

/// Errors decoding or encoding word indices
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordlistError {
    #[error("Unknown word '{word}' at position {position}")]
    UnknownWord { word: String, position: usize },

    #[error("Word index {0} is out of range (max 2047)")]
    IndexOutOfRange(u16),
}

/// Bijection between 11-bit indices and the English dictionary
#[derive(Debug, Clone, Copy, Default)]
pub struct WordlistCodec;

impl WordlistCodec {
    fn words() -> &'static [&'static str; WORDLIST_SIZE] {
        Language::English.word_list()
    }

    /// Word for a single index
    pub fn word(index: u16) -> Result<&'static str, WordlistError> {
        Self::words()
            .get(index as usize)
            .copied()
            .ok_or(WordlistError::IndexOutOfRange(index))
    }

    /// Index of a single word. Matching is exact; callers normalize first.
    pub fn index_of(word: &str) -> Option<u16> {
        Language::English.find_word(word)
    }

    pub fn indices_to_words(indices: &[u16]) -> Result<Vec<&'static str>, WordlistError> {
        indices.iter().map(|&i| Self::word(i)).collect()
    }

    pub fn words_to_indices<S: AsRef<str>>(words: &[S]) -> Result<Vec<u16>, WordlistError> {
        words
            .iter()
            .enumerate()
            .map(|(position, word)| {
                let word = word.as_ref();
                Self::index_of(word).ok_or_else(|| WordlistError::UnknownWord {
                    word: word.to_string(),
                    position,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_bounds() {
        assert_eq!(WordlistCodec::word(0).unwrap(), "abandon");
        assert_eq!(WordlistCodec::word(3).unwrap(), "about");
        assert_eq!(WordlistCodec::word(2047).unwrap(), "zoo");
        assert_eq!(
            WordlistCodec::word(2048).unwrap_err(),
            WordlistError::IndexOutOfRange(2048)
        );
    }

    #[test]
    fn test_words_to_indices() {
        let indices = WordlistCodec::words_to_indices(&["abandon", "about", "zoo"]).unwrap();
        assert_eq!(indices, vec![0, 3, 2047]);

        let words = WordlistCodec::indices_to_words(&indices).unwrap();
        assert_eq!(words, vec!["abandon", "about", "zoo"]);
    }

    #[test]
    fn test_unknown_word_reports_position() {
        let err = WordlistCodec::words_to_indices(&["abandon", "bitcoinz"]).unwrap_err();
        assert_eq!(
            err,
            WordlistError::UnknownWord {
                word: "bitcoinz".to_string(),
                position: 1
            }
        );
    }
}
