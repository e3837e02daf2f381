//! Contract-specific error types
//!
//! `VaultError` is the taxonomy surfaced to callers. Lower layers (address
//! derivation, the asset transfer gateway, configuration) have their own
//! enums; derivation and transfer failures convert into `VaultError` so that
//! every failed instruction reports one of the vault kinds.

use thiserror::Error;

/// Errors returned by Hide, Unlock and Claim
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VaultError {
    #[error("Invalid password")]
    InvalidPassword,

    #[error("Vault already unlocked")]
    AlreadyUnlocked,

    #[error("Unauthorized: caller may not perform this action")]
    Unauthorized,

    #[error("Vault already claimed")]
    AlreadyClaimed,

    #[error("Asset mismatch: {reason}")]
    AssetMismatch { reason: String },

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("Invalid mint: {mint}")]
    InvalidMint { mint: String },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Vault already hidden by another owner")]
    AlreadyHidden,

    #[error("Deposit amount must be positive")]
    InvalidAmount,

    #[error("Invalid derivation nonce: expected {expected}, got {actual}")]
    InvalidDerivation { expected: u8, actual: u8 },

    #[error("Account not found: {address}")]
    AccountNotFound { address: String },

    #[error("Account already in use: {address}")]
    AccountInUse { address: String },

    #[error("Invalid caller signature")]
    InvalidSignature,

    #[error("Nonce {nonce} already used by {signer}")]
    NonceReused { signer: String, nonce: u64 },

    #[error("Malformed record: {reason}")]
    MalformedRecord { reason: String },

    #[error("Address derivation failed: {0}")]
    Derivation(#[from] DerivationError),
}

/// Address derivation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DerivationError {
    #[error("Too many seeds: {count} (max {max})")]
    TooManySeeds { count: usize, max: usize },

    #[error("Seed {index} too long: {len} bytes (max {max})")]
    SeedTooLong { index: usize, len: usize, max: usize },

    #[error("Derived address lies on the ed25519 curve")]
    OnCurve,

    #[error("No viable derivation nonce found")]
    NoViableBump,
}

/// Asset transfer gateway errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Token account not found: {address}")]
    AccountNotFound { address: String },

    #[error("Unknown mint: {mint}")]
    UnknownMint { mint: String },

    #[error("Authority does not own the source account")]
    OwnerMismatch,

    #[error("Mint mismatch: expected {expected}, got {actual}")]
    MintMismatch { expected: String, actual: String },

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Token account already exists with different mint or owner: {address}")]
    AccountInUse { address: String },
}

impl From<TransferError> for VaultError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::AccountNotFound { address } => VaultError::AccountNotFound { address },
            TransferError::UnknownMint { mint } => VaultError::InvalidMint { mint },
            TransferError::OwnerMismatch => VaultError::Unauthorized,
            TransferError::MintMismatch { expected, actual } => VaultError::AssetMismatch {
                reason: format!("account holds {actual}, expected {expected}"),
            },
            TransferError::InsufficientFunds {
                required,
                available,
            } => VaultError::InsufficientFunds {
                required,
                available,
            },
            TransferError::Overflow => VaultError::ArithmeticOverflow,
            TransferError::AccountInUse { address } => VaultError::AccountInUse { address },
        }
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Fee rate must lie in [0, 1): {rate}")]
    InvalidFeeRate { rate: String },
}
