//! Shared security primitives for the vault program
//!
//! Constant-time password verification and caller signature checks. Nothing
//! here branches on secret-dependent data before the final verdict.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use escrow_types::ids::Pubkey;
use std::collections::HashSet;
use subtle::{Choice, ConstantTimeEq};

use crate::derivation;
use crate::errors::VaultError;
use crate::hash::{hash_password, PasswordHash};

/// Constant-time comparison of two identities.
pub fn keys_match(a: &Pubkey, b: &Pubkey) -> Choice {
    a.as_ref().ct_eq(b.as_ref())
}

/// Check a plaintext secret against a vault record.
///
/// The secret must hash to `stored`, and the record address derived from that
/// digest must equal `target`. Both comparisons run to completion before the
/// result is read.
pub fn verify_password(
    secret: &[u8],
    target: &Pubkey,
    stored: &PasswordHash,
    program_id: &Pubkey,
) -> Result<bool, VaultError> {
    let digest = hash_password(secret);
    let (derived, _) = derivation::vault_address(&digest, program_id)?;

    let matches = keys_match(&derived, target) & digest.ct_eq(stored);
    Ok(matches.into())
}

/// Verify an Ed25519 signature by `signer` over `message`.
///
/// `signature` is hex encoded. Every decoding failure is reported as
/// `InvalidSignature`.
pub fn verify_caller_signature(
    signer: &Pubkey,
    message: &[u8],
    signature: &str,
) -> Result<(), VaultError> {
    let verifying_key =
        VerifyingKey::from_bytes(signer.as_bytes()).map_err(|_| VaultError::InvalidSignature)?;
    let sig_bytes = hex::decode(signature).map_err(|_| VaultError::InvalidSignature)?;
    let signature =
        Signature::from_slice(&sig_bytes).map_err(|_| VaultError::InvalidSignature)?;

    verifying_key
        .verify(message, &signature)
        .map_err(|_| VaultError::InvalidSignature)
}

/// Per-signer nonce tracker for replay protection.
///
/// A nonce can only be consumed once per signer.
#[derive(Debug, Clone, Default)]
pub struct NonceTracker {
    used_nonces: HashSet<(Pubkey, u64)>,
}

impl NonceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_used(&self, signer: &Pubkey, nonce: u64) -> bool {
        self.used_nonces.contains(&(*signer, nonce))
    }

    /// Mark a nonce as used. Returns `false` if it was already consumed.
    pub fn use_nonce(&mut self, signer: Pubkey, nonce: u64) -> bool {
        self.used_nonces.insert((signer, nonce))
    }

    pub fn count(&self) -> usize {
        self.used_nonces.len()
    }
}
