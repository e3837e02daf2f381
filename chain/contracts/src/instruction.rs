//! Instruction wire format
//!
//! The three operation contracts as serde types, plus the signed envelope the
//! runtime authenticates callers with. The signed message is the JSON
//! encoding of `(abi version, signer, nonce, instruction)`.

use ed25519_dalek::{Signer, SigningKey};
use escrow_types::ids::Pubkey;
use serde::{Deserialize, Serialize};

use crate::errors::VaultError;
use crate::hash::PasswordHash;
use crate::security;
use crate::CONTRACT_ABI_VERSION;

/// Deposit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideArgs {
    /// Digest of the secret, computed off-system
    pub password_hash: PasswordHash,
    pub mint: Pubkey,
    /// Raw asset category tag; unknown tags fail with `InvalidMint`
    pub asset_type: u8,
    pub amount: u64,
    /// Caller-owned token account funding the deposit
    pub source: Pubkey,
}

/// Claimant binding request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockArgs {
    /// Address of the targeted vault record
    pub vault: Pubkey,
    /// Plaintext secret bytes, hex encoded on the wire
    #[serde(with = "hex::serde")]
    pub password: Vec<u8>,
}

/// Where one escrowed entry is paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub mint: Pubkey,
    pub account: Pubkey,
}

/// Withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimArgs {
    pub vault: Pubkey,
    /// Derivation nonce of the vault record
    pub bump: u8,
    /// One destination per recorded entry, in record order
    pub destinations: Vec<Destination>,
}

/// A vault operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    Hide(HideArgs),
    Unlock(UnlockArgs),
    Claim(ClaimArgs),
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hide(_) => "hide",
            Self::Unlock(_) => "unlock",
            Self::Claim(_) => "claim",
        }
    }
}

#[derive(Serialize)]
struct SigningPayload<'a> {
    version: &'a str,
    signer: &'a Pubkey,
    nonce: u64,
    instruction: &'a Instruction,
}

fn signing_bytes(signer: &Pubkey, nonce: u64, instruction: &Instruction) -> Result<Vec<u8>, VaultError> {
    let payload = SigningPayload {
        version: CONTRACT_ABI_VERSION,
        signer,
        nonce,
        instruction,
    };
    serde_json::to_vec(&payload).map_err(|e| VaultError::MalformedRecord {
        reason: format!("instruction encoding failed: {e}"),
    })
}

/// An instruction authenticated by its caller's Ed25519 signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInstruction {
    pub signer: Pubkey,
    /// Per-signer replay nonce
    pub nonce: u64,
    pub instruction: Instruction,
    /// Hex-encoded signature
    pub signature: String,
}

impl SignedInstruction {
    /// Sign `instruction` as the holder of `key`.
    pub fn sign(instruction: Instruction, nonce: u64, key: &SigningKey) -> Result<Self, VaultError> {
        let signer = Pubkey::new(key.verifying_key().to_bytes());
        let message = signing_bytes(&signer, nonce, &instruction)?;
        let signature = hex::encode(key.sign(&message).to_bytes());
        Ok(Self {
            signer,
            nonce,
            instruction,
            signature,
        })
    }

    /// Check the signature against the envelope's contents.
    pub fn verify(&self) -> Result<(), VaultError> {
        let message = signing_bytes(&self.signer, self.nonce, &self.instruction)?;
        security::verify_caller_signature(&self.signer, &message, &self.signature)
    }
}
