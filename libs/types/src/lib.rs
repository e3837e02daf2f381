//! Types library for the treasure vault
//!
//! Shared type definitions used by the vault program and its callers.
//!
//! # Modules
//! - `ids`: Fixed-width identities (`Pubkey`)
//! - `asset`: Escrowed asset entries and category tags
//! - `fee`: Claim fee policy
//! - `errors`: Decoding errors

pub mod asset;
pub mod errors;
pub mod fee;
pub mod ids;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::asset::*;
    pub use crate::errors::*;
    pub use crate::fee::*;
    pub use crate::ids::*;
}
