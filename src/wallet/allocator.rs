//! Per-mnemonic derivation index allocation
//!
//! Indices are handed out in increasing order from 0 for every
//! (mnemonic, chain) pair and are never returned to the pool, so deleting
//! a wallet and deriving again never reproduces an old address.
//!
//! Counters can be exported as `AllocationMark`s so a host that persists
//! records can also persist how far each pair has advanced.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::derivation_path::HARDENED;
use super::mnemonic::Mnemonic;
use crate::error::{ForgeError, ForgeResult};
use crate::types::ChainId;

type AllocationKey = ([u8; 32], ChainId);

/// High-water mark for one (mnemonic, chain) pair. The mnemonic appears
/// only as its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationMark {
    pub fingerprint: String,
    pub chain: ChainId,
    pub next_index: u32,
}

/// Mutex-guarded counter map. Read-and-increment is one critical section.
///
/// Keyed by the mnemonic alone: every passphrase used with the same phrase
/// draws from one shared counter.
#[derive(Debug, Default)]
pub struct PathAllocator {
    next: Mutex<HashMap<AllocationKey, u32>>,
}

impl PathAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(mnemonic: &Mnemonic, chain: ChainId) -> AllocationKey {
        (mnemonic.fingerprint(), chain)
    }

    fn lock(&self) -> ForgeResult<MutexGuard<'_, HashMap<AllocationKey, u32>>> {
        self.next
            .lock()
            .map_err(|_| ForgeError::internal("Allocation lock failed"))
    }

    /// Consume and return the next unused index for the pair
    pub fn next_index(&self, mnemonic: &Mnemonic, chain: ChainId) -> ForgeResult<u32> {
        let mut next = self.lock()?;

        let slot = next.entry(Self::key(mnemonic, chain)).or_insert(0);
        let index = *slot;
        if index >= HARDENED {
            return Err(ForgeError::invalid_input(format!(
                "All {} indices for this {} mnemonic are used",
                HARDENED, chain
            )));
        }
        *slot += 1;
        Ok(index)
    }

    /// The index `next_index` would return, without consuming it
    pub fn peek(&self, mnemonic: &Mnemonic, chain: ChainId) -> ForgeResult<u32> {
        let next = self.lock()?;
        Ok(next.get(&Self::key(mnemonic, chain)).copied().unwrap_or(0))
    }

    /// Mark every index up to and including `index` as used.
    /// Never moves the counter backwards.
    pub fn reserve_through(&self, mnemonic: &Mnemonic, chain: ChainId, index: u32) -> ForgeResult<()> {
        let mut next = self.lock()?;

        let slot = next.entry(Self::key(mnemonic, chain)).or_insert(0);
        *slot = (*slot).max(index.saturating_add(1));
        Ok(())
    }

    /// Every counter, ordered by fingerprint then chain
    pub fn marks(&self) -> ForgeResult<Vec<AllocationMark>> {
        let next = self.lock()?;
        let mut marks: Vec<_> = next
            .iter()
            .map(|((fingerprint, chain), next_index)| AllocationMark {
                fingerprint: hex::encode(fingerprint),
                chain: *chain,
                next_index: *next_index,
            })
            .collect();
        marks.sort_by(|a, b| (&a.fingerprint, a.chain).cmp(&(&b.fingerprint, b.chain)));
        Ok(marks)
    }

    /// Raise counters to at least the given marks. Never moves one backwards.
    pub fn restore(&self, marks: &[AllocationMark]) -> ForgeResult<()> {
        let mut keyed = Vec::with_capacity(marks.len());
        for mark in marks {
            let mut fingerprint = [0u8; 32];
            hex::decode_to_slice(&mark.fingerprint, &mut fingerprint).map_err(|e| {
                ForgeError::invalid_input("Malformed allocation fingerprint").with_details(e.to_string())
            })?;
            if mark.next_index > HARDENED {
                return Err(ForgeError::invalid_input(format!(
                    "Allocation mark {} is past the last index",
                    mark.next_index
                )));
            }
            keyed.push(((fingerprint, mark.chain), mark.next_index));
        }

        let mut next = self.lock()?;
        for (key, next_index) in keyed {
            let slot = next.entry(key).or_insert(0);
            *slot = (*slot).max(next_index);
        }
        Ok(())
    }
}
