//! Vault and fee records
//!
//! In memory a record's lifecycle is the tagged `VaultState`, so a claimed
//! record without a claimer cannot be built. On the wire records use a flat
//! bincode layout:
//!
//! | field        | width                          |
//! |--------------|--------------------------------|
//! | owner        | 32                             |
//! | passwordHash | 32                             |
//! | claimer      | 1 (presence) + 32              |
//! | isClaimed    | 1                              |
//! | bump         | 1                              |
//! | assets       | 8 (length) + n × 41            |
//!
//! Integers are fixed width and decoding rejects trailing bytes, so each
//! record has exactly one encoding. Decoding also checks the lifecycle
//! invariants and rejects layouts that violate them.

use bincode::Options;
use escrow_types::asset::AssetEntry;
use escrow_types::ids::Pubkey;
use serde::{Deserialize, Serialize};

use crate::errors::VaultError;
use crate::hash::PasswordHash;

fn layout_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Lifecycle of a vault record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// Funded, no claimant bound yet
    Locked,
    /// Secret proven; `claimer` alone may claim
    Unlocked { claimer: Pubkey },
    /// Assets paid out; terminal
    Claimed { claimer: Pubkey },
}

impl VaultState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Unlocked { .. } => "unlocked",
            Self::Claimed { .. } => "claimed",
        }
    }
}

/// Escrow entry for one password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultRecord {
    pub owner: Pubkey,
    pub password_hash: PasswordHash,
    pub state: VaultState,
    pub assets: Vec<AssetEntry>,
    pub bump: u8,
}

#[derive(Serialize, Deserialize)]
struct VaultRecordLayout {
    owner: Pubkey,
    password_hash: PasswordHash,
    has_claimer: bool,
    claimer: Pubkey,
    is_claimed: bool,
    bump: u8,
    assets: Vec<AssetEntry>,
}

impl VaultRecord {
    /// Fixed part of the persisted layout.
    pub const BASE_LEN: usize = 32 + 32 + (1 + 32) + 1 + 1 + 8;

    /// Fresh, empty, locked record.
    pub fn new(owner: Pubkey, password_hash: PasswordHash, bump: u8) -> Self {
        Self {
            owner,
            password_hash,
            state: VaultState::Locked,
            assets: Vec::new(),
            bump,
        }
    }

    /// Persisted size of a record holding `asset_count` entries.
    pub fn space(asset_count: usize) -> usize {
        Self::BASE_LEN + asset_count * AssetEntry::LEN
    }

    pub fn claimer(&self) -> Option<&Pubkey> {
        match &self.state {
            VaultState::Locked => None,
            VaultState::Unlocked { claimer } | VaultState::Claimed { claimer } => Some(claimer),
        }
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self.state, VaultState::Claimed { .. })
    }

    /// Encode to the persisted layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>, VaultError> {
        let layout = VaultRecordLayout {
            owner: self.owner,
            password_hash: self.password_hash,
            has_claimer: self.claimer().is_some(),
            claimer: self.claimer().copied().unwrap_or_default(),
            is_claimed: self.is_claimed(),
            bump: self.bump,
            assets: self.assets.clone(),
        };
        layout_options().serialize(&layout).map_err(|e| VaultError::MalformedRecord {
            reason: e.to_string(),
        })
    }

    /// Decode from the persisted layout, enforcing lifecycle invariants.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        let layout: VaultRecordLayout =
            layout_options()
                .deserialize(bytes)
                .map_err(|e| VaultError::MalformedRecord {
                    reason: e.to_string(),
                })?;

        let claimer = layout.claimer;
        let state = match (layout.has_claimer, layout.is_claimed) {
            (false, false) if claimer == Pubkey::default() => VaultState::Locked,
            (false, false) => {
                return Err(VaultError::MalformedRecord {
                    reason: "claimer bytes set without presence flag".to_string(),
                })
            }
            (true, false) => VaultState::Unlocked { claimer },
            (true, true) => VaultState::Claimed { claimer },
            (false, true) => {
                return Err(VaultError::MalformedRecord {
                    reason: "claimed record without claimer".to_string(),
                })
            }
        };

        if layout.is_claimed && !layout.assets.is_empty() {
            return Err(VaultError::MalformedRecord {
                reason: "claimed record still holds assets".to_string(),
            });
        }

        Ok(Self {
            owner: layout.owner,
            password_hash: layout.password_hash,
            state,
            assets: layout.assets,
            bump: layout.bump,
        })
    }
}

/// Process-wide fee accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRecord {
    pub accumulated: u64,
    pub bump: u8,
}

impl FeeRecord {
    /// Persisted size: accumulated (8) + bump (1).
    pub const LEN: usize = 8 + 1;

    pub fn new(bump: u8) -> Self {
        Self {
            accumulated: 0,
            bump,
        }
    }

    /// Total after adding `fee`, without applying it.
    pub fn checked_accrue(&self, fee: u64) -> Result<u64, VaultError> {
        self.accumulated
            .checked_add(fee)
            .ok_or(VaultError::ArithmeticOverflow)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, VaultError> {
        layout_options().serialize(self).map_err(|e| VaultError::MalformedRecord {
            reason: e.to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        layout_options().deserialize(bytes).map_err(|e| VaultError::MalformedRecord {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_password;
    use escrow_types::asset::AssetType;

    fn sample_record() -> VaultRecord {
        let mut record = VaultRecord::new(Pubkey::new_unique(), hash_password(b"pw"), 254);
        record
            .assets
            .push(AssetEntry::new(Pubkey::new_unique(), AssetType::Fungible, 50));
        record
    }

    #[test]
    fn test_new_record_is_locked() {
        let record = VaultRecord::new(Pubkey::new_unique(), hash_password(b"pw"), 255);
        assert_eq!(record.state, VaultState::Locked);
        assert!(record.claimer().is_none());
        assert!(!record.is_claimed());
        assert!(record.assets.is_empty());
    }

    #[test]
    fn test_layout_width() {
        let record = sample_record();
        let bytes = record.to_bytes().unwrap();
        assert_eq!(bytes.len(), VaultRecord::space(1));

        let unlocked = VaultRecord {
            state: VaultState::Unlocked {
                claimer: Pubkey::new_unique(),
            },
            ..record
        };
        // Claimer slot is fixed width whether or not it is set
        assert_eq!(unlocked.to_bytes().unwrap().len(), VaultRecord::space(1));
    }

    #[test]
    fn test_layout_round_trip_each_state() {
        let claimer = Pubkey::new_unique();
        let locked = sample_record();
        let unlocked = VaultRecord {
            state: VaultState::Unlocked { claimer },
            ..locked.clone()
        };
        let claimed = VaultRecord {
            state: VaultState::Claimed { claimer },
            assets: Vec::new(),
            ..locked.clone()
        };

        for record in [locked, unlocked, claimed] {
            let decoded = VaultRecord::from_bytes(&record.to_bytes().unwrap()).unwrap();
            assert_eq!(decoded, record);
        }
    }

    #[test]
    fn test_decode_rejects_claimed_without_claimer() {
        let layout = VaultRecordLayout {
            owner: Pubkey::new_unique(),
            password_hash: hash_password(b"pw"),
            has_claimer: false,
            claimer: Pubkey::default(),
            is_claimed: true,
            bump: 255,
            assets: Vec::new(),
        };
        let bytes = layout_options().serialize(&layout).unwrap();
        assert!(matches!(
            VaultRecord::from_bytes(&bytes),
            Err(VaultError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_claimed_with_assets() {
        let mut record = sample_record();
        let claimer = Pubkey::new_unique();
        record.state = VaultState::Claimed { claimer };
        let bytes = record.to_bytes().unwrap();
        assert!(matches!(
            VaultRecord::from_bytes(&bytes),
            Err(VaultError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated() {
        let bytes = sample_record().to_bytes().unwrap();
        assert!(VaultRecord::from_bytes(&bytes[..40]).is_err());
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = sample_record().to_bytes().unwrap();
        bytes.extend_from_slice(&[0xde, 0xad]);
        assert!(matches!(
            VaultRecord::from_bytes(&bytes),
            Err(VaultError::MalformedRecord { .. })
        ));

        let mut fee_bytes = FeeRecord::new(255).to_bytes().unwrap();
        fee_bytes.push(0);
        assert!(matches!(
            FeeRecord::from_bytes(&fee_bytes),
            Err(VaultError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_fee_record_layout() {
        let record = FeeRecord {
            accumulated: 42,
            bump: 253,
        };
        let bytes = record.to_bytes().unwrap();
        assert_eq!(bytes.len(), FeeRecord::LEN);
        assert_eq!(FeeRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn test_fee_record_overflow() {
        let record = FeeRecord {
            accumulated: u64::MAX,
            bump: 255,
        };
        assert_eq!(record.checked_accrue(1), Err(VaultError::ArithmeticOverflow));
        assert_eq!(record.checked_accrue(0), Ok(u64::MAX));
    }
}
