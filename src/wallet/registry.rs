//! Wallet Registry
//!
//! Orchestrates phrase resolution, seed stretching, index allocation,
//! curve derivation and address encoding into one `derive_wallet` call,
//! and owns the in-memory record list.
//!
//! Allocation commits before the curve walk. A derivation that fails after
//! that point burns its index rather than rolling the counter back.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::address::DerivedKeys;
use super::allocator::{AllocationMark, PathAllocator};
use super::derivation::derive_from_mnemonic;
use super::derivation_path::DerivationPath;
use super::mnemonic::Mnemonic;
use crate::config::{EngineConfig, EngineSettings};
use crate::error::{ForgeError, ForgeResult};
use crate::types::{ChainId, WalletRecord};
use crate::{log_debug, log_info, log_warn};

const LOG_MODULE: &str = "registry";

pub struct WalletRegistry {
    records: RwLock<Vec<WalletRecord>>,
    allocator: PathAllocator,
    config: EngineConfig,
}

impl Default for WalletRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::standard())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            allocator: PathAllocator::new(),
            config: EngineConfig::with_settings(settings),
        }
    }

    pub fn settings(&self) -> EngineSettings {
        self.config.settings()
    }

    /// Change settings at runtime. Rejected edits leave the current ones in place.
    pub fn update_settings<F>(&self, updater: F) -> ForgeResult<EngineSettings>
    where
        F: FnOnce(&mut EngineSettings),
    {
        let settings = self.config.update(updater)?;
        log_debug!(LOG_MODULE, "Settings updated", strength = format!("{:?}", settings.mnemonic_strength));
        Ok(settings)
    }

    fn read(&self) -> ForgeResult<RwLockReadGuard<'_, Vec<WalletRecord>>> {
        self.records
            .read()
            .map_err(|_| ForgeError::internal("Registry lock failed"))
    }

    fn write(&self) -> ForgeResult<RwLockWriteGuard<'_, Vec<WalletRecord>>> {
        self.records
            .write()
            .map_err(|_| ForgeError::internal("Registry lock failed"))
    }

    // MARK: - Derivation

    /// Derive the next wallet for `chain`. An absent or blank phrase
    /// generates a fresh one at the configured strength.
    pub fn derive_wallet(&self, chain: ChainId, mnemonic_input: Option<&str>) -> ForgeResult<WalletRecord> {
        self.derive_wallet_with_passphrase(chain, mnemonic_input, "")
    }

    pub fn derive_wallet_with_passphrase(
        &self,
        chain: ChainId,
        mnemonic_input: Option<&str>,
        passphrase: &str,
    ) -> ForgeResult<WalletRecord> {
        let mnemonic = self.resolve_mnemonic(mnemonic_input)?;

        let index = self.allocator.next_index(&mnemonic, chain)?;
        let path = DerivationPath::for_chain(chain, index)?;
        log_debug!(LOG_MODULE, "Index allocated", chain = chain, path = path);

        let keys = derive_from_mnemonic(chain, &mnemonic, passphrase, &path).map_err(|e| {
            log_warn!(
                LOG_MODULE,
                "Derivation failed, index burned",
                chain = chain,
                path = path,
                code = format!("{:?}", e.code),
            );
            e
        })?;

        let record = build_record(chain, mnemonic, path, &keys);
        self.write()?.push(record.clone());

        log_info!(
            LOG_MODULE,
            "Wallet derived",
            chain = record.chain,
            path = record.path,
            address = record.address,
        );
        Ok(record)
    }

    fn resolve_mnemonic(&self, mnemonic_input: Option<&str>) -> ForgeResult<Mnemonic> {
        match mnemonic_input.map(str::trim).filter(|s| !s.is_empty()) {
            Some(phrase) => Mnemonic::parse(phrase).map_err(|e| {
                log_warn!(LOG_MODULE, "Mnemonic rejected", code = format!("{:?}", e.code));
                e
            }),
            None => Mnemonic::generate(self.config.mnemonic_strength()),
        }
    }

    /// Next index that would be allocated, without consuming it
    pub fn next_index_peek(&self, mnemonic: &Mnemonic, chain: ChainId) -> ForgeResult<u32> {
        self.allocator.peek(mnemonic, chain)
    }

    // MARK: - Record Management

    /// Remove a record by id. Its index stays allocated.
    pub fn remove_wallet(&self, id: &str) -> ForgeResult<bool> {
        let mut records = self.write()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        let removed = records.len() != before;

        if removed {
            log_info!(LOG_MODULE, "Wallet removed", id = id);
        }
        Ok(removed)
    }

    /// Drop every record. Allocation history is kept.
    pub fn clear_all(&self) -> ForgeResult<usize> {
        let mut records = self.write()?;
        let count = records.len();
        records.clear();

        log_info!(LOG_MODULE, "Registry cleared", count = count);
        Ok(count)
    }

    pub fn records(&self) -> ForgeResult<Vec<WalletRecord>> {
        Ok(self.read()?.clone())
    }

    pub fn records_for(&self, chain: ChainId) -> ForgeResult<Vec<WalletRecord>> {
        Ok(self.read()?.iter().filter(|r| r.chain == chain).cloned().collect())
    }

    pub fn get(&self, id: &str) -> ForgeResult<Option<WalletRecord>> {
        Ok(self.read()?.iter().find(|r| r.id == id).cloned())
    }

    pub fn len(&self) -> ForgeResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> ForgeResult<bool> {
        Ok(self.read()?.is_empty())
    }

    // MARK: - Persistence

    /// Flat JSON array of every record, secrets included
    pub fn export_json(&self) -> ForgeResult<String> {
        Ok(serde_json::to_string_pretty(&*self.read()?)?)
    }

    pub fn import_json(&self, json: &str) -> ForgeResult<usize> {
        let records: Vec<WalletRecord> = serde_json::from_str(json)?;
        self.import_records(records)
    }

    /// Adopt previously exported records. Ids already present are skipped.
    /// Allocation advances past every imported index so none is reissued.
    pub fn import_records(&self, records: Vec<WalletRecord>) -> ForgeResult<usize> {
        let mut existing = self.write()?;
        let mut imported = 0;

        for record in records {
            if let Some(index) = record.path.index_for(record.chain) {
                self.allocator.reserve_through(&record.mnemonic, record.chain, index)?;
            }
            if existing.iter().any(|r| r.id == record.id) {
                continue;
            }
            existing.push(record);
            imported += 1;
        }

        log_info!(LOG_MODULE, "Records imported", count = imported, total = existing.len());
        Ok(imported)
    }

    /// Allocation counters as JSON. Holds fingerprints only, no phrases.
    pub fn export_allocations_json(&self) -> ForgeResult<String> {
        Ok(serde_json::to_string_pretty(&self.allocator.marks()?)?)
    }

    /// Raise allocation counters from a previous export
    pub fn import_allocations_json(&self, json: &str) -> ForgeResult<usize> {
        let marks: Vec<AllocationMark> = serde_json::from_str(json)?;
        self.allocator.restore(&marks)?;
        log_debug!(LOG_MODULE, "Allocations restored", count = marks.len());
        Ok(marks.len())
    }
}

fn build_record(chain: ChainId, mnemonic: Mnemonic, path: DerivationPath, keys: &DerivedKeys) -> WalletRecord {
    WalletRecord {
        id: Uuid::new_v4().to_string(),
        chain,
        address: keys.address.clone(),
        public_key_hex: hex::encode(&keys.public_key),
        private_key_hex: hex::encode(&keys.private_key[..]),
        mnemonic,
        path,
    }
}

// MARK: - Record Re-derivation

impl WalletRecord {
    /// Regenerate this record's keys from its own mnemonic and path
    pub fn rederive(&self) -> ForgeResult<DerivedKeys> {
        self.rederive_with_passphrase("")
    }

    pub fn rederive_with_passphrase(&self, passphrase: &str) -> ForgeResult<DerivedKeys> {
        derive_from_mnemonic(self.chain, &self.mnemonic, passphrase, &self.path)
    }

    /// Whether the stored keys match a fresh derivation bit-for-bit
    pub fn verify(&self) -> ForgeResult<bool> {
        self.verify_with_passphrase("")
    }

    pub fn verify_with_passphrase(&self, passphrase: &str) -> ForgeResult<bool> {
        let keys = self.rederive_with_passphrase(passphrase)?;
        let public_matches =
            self.public_key_hex.is_empty() || self.public_key_hex == hex::encode(&keys.public_key);

        Ok(keys.address == self.address
            && public_matches
            && self.private_key_hex.eq_ignore_ascii_case(&hex::encode(&keys.private_key[..])))
    }
}
