//! Vault record store
//!
//! An arena of records keyed by derived address. Records are found by
//! deriving the address from a password hash; the store offers no lookup by
//! owner or claimer.

use escrow_types::ids::Pubkey;
use std::collections::BTreeMap;

use crate::state::VaultRecord;

/// Records keyed by their derived address.
#[derive(Debug, Clone, Default)]
pub struct VaultStore {
    records: BTreeMap<Pubkey, VaultRecord>,
}

impl VaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &Pubkey) -> Option<&VaultRecord> {
        self.records.get(address)
    }

    pub fn get_mut(&mut self, address: &Pubkey) -> Option<&mut VaultRecord> {
        self.records.get_mut(address)
    }

    /// Store a newly created record. Existing records are never replaced.
    pub fn create(&mut self, address: Pubkey, record: VaultRecord) -> &mut VaultRecord {
        self.records.entry(address).or_insert(record)
    }

    pub fn contains(&self, address: &Pubkey) -> bool {
        self.records.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
