//! Unified error types for Keyforge
//!
//! All errors flow through this module so hosts (UI, CLI, persistence)
//! get a single serializable failure value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::curves::CurveError;
use crate::wallet::WordlistError;

/// Main error type for all Keyforge operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ForgeError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidMnemonic, msg)
    }

    /// A word outside the dictionary. The offending word travels in `details`.
    pub fn unknown_word(word: impl Into<String>) -> Self {
        let word = word.into();
        Self::new(ErrorCode::UnknownWord, format!("Unknown mnemonic word '{}'", word))
            .with_details(word)
    }

    pub fn unsupported_path(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedPath, msg)
    }

    pub fn randomness_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RandomnessUnavailable, msg)
    }

    pub fn invalid_chain(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidChain, msg)
    }

    pub fn crypto_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    /// Internal-invariant failures. These indicate a bug or a broken
    /// environment and must not be caught-and-continued.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::UnsupportedPath
                | ErrorCode::RandomnessUnavailable
                | ErrorCode::CryptoError
                | ErrorCode::Internal
        )
    }
}

impl fmt::Display for ForgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ForgeError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidMnemonic,
    UnknownWord,
    InvalidChain,

    // Derivation errors
    UnsupportedPath,
    RandomnessUnavailable,
    CryptoError,

    // Parse errors
    JsonError,
    HexError,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Failures caused by what the user typed. Always recoverable, surfaced
    /// to the caller for display, no state mutated.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::InvalidInput
                | ErrorCode::InvalidMnemonic
                | ErrorCode::UnknownWord
                | ErrorCode::InvalidChain
        )
    }
}

/// Result type alias for Keyforge operations
pub type ForgeResult<T> = Result<T, ForgeError>;

// Conversions from common error types

impl From<serde_json::Error> for ForgeError {
    fn from(e: serde_json::Error) -> Self {
        ForgeError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for ForgeError {
    fn from(e: hex::FromHexError) -> Self {
        ForgeError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for ForgeError {
    fn from(e: std::io::Error) -> Self {
        ForgeError::new(ErrorCode::Internal, e.to_string())
    }
}

impl From<WordlistError> for ForgeError {
    fn from(e: WordlistError) -> Self {
        match e {
            WordlistError::UnknownWord { word, .. } => ForgeError::unknown_word(word),
            WordlistError::IndexOutOfRange(_) => ForgeError::invalid_mnemonic(e.to_string()),
        }
    }
}

impl From<CurveError> for ForgeError {
    fn from(e: CurveError) -> Self {
        match e {
            CurveError::NonHardenedSegment(_) => ForgeError::unsupported_path(e.to_string()),
            _ => ForgeError::crypto_error(e.to_string()),
        }
    }
}
