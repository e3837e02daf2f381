//! Escrowed asset types
//!
//! An `AssetEntry` is one deposited balance inside a vault record. It is
//! consumed as a whole on claim, never partially.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::TypeError;
use crate::ids::Pubkey;

/// Asset category tag, persisted as a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum AssetType {
    /// Divisible token balance
    Fungible = 1,
    /// Single-unit collectible
    NonFungible = 2,
}

impl AssetType {
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for AssetType {
    type Error = TypeError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::Fungible),
            2 => Ok(Self::NonFungible),
            other => Err(TypeError::InvalidAssetType(other)),
        }
    }
}

impl From<AssetType> for u8 {
    fn from(asset_type: AssetType) -> Self {
        asset_type.tag()
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fungible => write!(f, "fungible"),
            Self::NonFungible => write!(f, "non-fungible"),
        }
    }
}

/// One escrowed balance: `mint` (32 bytes), `asset_type` (1 byte), `amount` (8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub mint: Pubkey,
    pub asset_type: AssetType,
    pub amount: u64,
}

impl AssetEntry {
    /// Persisted width of a single entry.
    pub const LEN: usize = 32 + 1 + 8;

    pub fn new(mint: Pubkey, asset_type: AssetType, amount: u64) -> Self {
        Self {
            mint,
            asset_type,
            amount,
        }
    }
}
