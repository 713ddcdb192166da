//! Engine Configuration
//!
//! Settings presets and a runtime-updatable holder:
//! - `standard`: 12-word generated phrases
//! - `high`: 24-word generated phrases
//!
//! Settings load from JSON so a host can keep them next to its store.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;

use crate::error::{ForgeError, ForgeResult};
use crate::utils::logging;
use crate::wallet::MnemonicStrength;

/// Preset the settings were built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    #[default]
    Standard,
    High,
    Custom,
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub level: SecurityLevel,
    /// Size of phrases generated when the caller supplies none
    pub mnemonic_strength: MnemonicStrength,
    /// Partially redact addresses in log output. Secrets are always redacted.
    pub redact_logs: bool,
    pub debug_logging: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::standard()
    }
}

impl EngineSettings {
    pub fn standard() -> Self {
        Self {
            level: SecurityLevel::Standard,
            mnemonic_strength: MnemonicStrength::Words12,
            redact_logs: true,
            debug_logging: false,
        }
    }

    pub fn high() -> Self {
        Self {
            level: SecurityLevel::High,
            mnemonic_strength: MnemonicStrength::Words24,
            redact_logs: true,
            debug_logging: false,
        }
    }

    pub fn from_json(json: &str) -> ForgeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Push the logging flags into the process-wide logger
    pub fn apply_logging(&self) {
        if self.debug_logging {
            logging::enable_debug();
        } else {
            logging::disable_debug();
        }
        logging::set_address_redaction(self.redact_logs);
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.level == SecurityLevel::High && self.mnemonic_strength != MnemonicStrength::Words24 {
            warnings.push("Warning: High security level with 12-word mnemonics".to_string());
        }

        if !self.redact_logs && self.debug_logging {
            warnings.push("Warning: Debug logging enabled without address redaction".to_string());
        }

        warnings
    }
}

/// Shared, runtime-updatable settings
pub struct EngineConfig {
    config: RwLock<EngineSettings>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::with_settings(EngineSettings::default())
    }
}

impl EngineConfig {
    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            config: RwLock::new(settings),
        }
    }

    pub fn settings(&self) -> EngineSettings {
        self.config
            .read()
            .map(|c| c.clone())
            .unwrap_or_else(|_| EngineSettings::standard())
    }

    pub fn mnemonic_strength(&self) -> MnemonicStrength {
        self.config
            .read()
            .map(|c| c.mnemonic_strength)
            .unwrap_or_default()
    }

    /// Apply a manual change. The edited copy is validated first and only
    /// committed when it raises no warnings.
    pub fn update<F>(&self, updater: F) -> ForgeResult<EngineSettings>
    where
        F: FnOnce(&mut EngineSettings),
    {
        let mut config = self
            .config
            .write()
            .map_err(|_| ForgeError::internal("Config lock failed"))?;

        let mut candidate = config.clone();
        candidate.level = SecurityLevel::Custom;
        updater(&mut candidate);

        let warnings = candidate.validate();
        if !warnings.is_empty() {
            return Err(ForgeError::invalid_input(warnings.join("; ")));
        }

        *config = candidate.clone();
        Ok(candidate)
    }
}
