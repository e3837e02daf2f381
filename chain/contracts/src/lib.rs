//! Password-gated asset escrow
//!
//! A depositor escrows fungible or non-fungible assets under the hash of a
//! secret. Anyone who later presents the secret binds themselves as the sole
//! claimant, and the claimant withdraws everything in one atomic step, minus
//! a protocol fee.
//!
//! # Modules
//! - `config`: Program identity and fee rate
//! - `derivation`: Deterministic off-curve address derivation
//! - `errors`: Contract-specific error types
//! - `events`: Events emitted by successful instructions
//! - `gateway`: Asset transfer gateway and the in-memory token ledger
//! - `hash`: Password digests
//! - `instruction`: Instruction wire format and signed envelopes
//! - `runtime`: Atomic sequential executor holding all state
//! - `security`: Constant-time password checks, signatures, replay nonces
//! - `state`: Vault and fee records with their persisted layout
//! - `store`: Vault records keyed by derived address
//! - `vault`: The Hide / Unlock / Claim state machine

pub mod config;
pub mod derivation;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod hash;
pub mod instruction;
pub mod runtime;
pub mod security;
pub mod state;
pub mod store;
pub mod vault;

/// Contract ABI version, bound into every signed instruction
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";

pub use config::VaultConfig;
pub use errors::VaultError;
pub use runtime::Runtime;
pub use vault::VaultProgram;
