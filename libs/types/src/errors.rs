//! Error types for the shared vault types

use thiserror::Error;

/// Decoding errors for identities and asset tags
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("Invalid pubkey encoding: {0}")]
    InvalidPubkey(String),

    #[error("Invalid pubkey length: expected 32 bytes, got {len}")]
    InvalidPubkeyLength { len: usize },

    #[error("Unknown asset type tag: {0}")]
    InvalidAssetType(u8),
}
