//! Vault events
//!
//! Immutable records emitted by successful instructions. Failed instructions
//! emit nothing.

use escrow_types::asset::AssetType;
use escrow_types::ids::Pubkey;
use serde::{Deserialize, Serialize};

/// Asset escrowed under a password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultHidden {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub asset_type: AssetType,
    pub amount: u64,
    /// Number of entries in the record after this deposit
    pub entry_count: usize,
}

/// Claimant bound to a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultUnlocked {
    pub vault: Pubkey,
    pub claimer: Pubkey,
}

/// One paid-out entry of a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub mint: Pubkey,
    pub destination: Pubkey,
    pub net: u64,
    pub fee: u64,
}

/// Record paid out and finalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultClaimed {
    pub vault: Pubkey,
    pub claimer: Pubkey,
    pub payouts: Vec<Payout>,
    pub total_fee: u64,
}

/// Enum wrapper for all vault events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEvent {
    Hidden(VaultHidden),
    Unlocked(VaultUnlocked),
    Claimed(VaultClaimed),
}

impl VaultEvent {
    pub fn vault(&self) -> &Pubkey {
        match self {
            Self::Hidden(e) => &e.vault,
            Self::Unlocked(e) => &e.vault,
            Self::Claimed(e) => &e.vault,
        }
    }
}
