//! Password hasher
//!
//! SHA-256 over the raw secret bytes. Depositors compute the digest off-system
//! and submit only the digest; the plaintext reaches the program once, at
//! unlock time.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use subtle::{Choice, ConstantTimeEq};

use crate::errors::VaultError;

/// Digest width in bytes.
pub const HASH_BYTES: usize = 32;

/// SHA-256 digest of a vault password.
///
/// Equality is constant-time: `==` on two digests never exits early.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash([u8; HASH_BYTES]);

impl PasswordHash {
    pub const fn new(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; HASH_BYTES] {
        self.0
    }
}

impl ConstantTimeEq for PasswordHash {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for PasswordHash {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for PasswordHash {}

impl AsRef<[u8]> for PasswordHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_BYTES]> for PasswordHash {
    fn from(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordHash({})", hex::encode(self.0))
    }
}

impl FromStr for PasswordHash {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| VaultError::MalformedRecord {
            reason: format!("password hash is not hex: {e}"),
        })?;
        let array: [u8; HASH_BYTES] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| VaultError::MalformedRecord {
                    reason: format!("password hash must be {HASH_BYTES} bytes, got {}", bytes.len()),
                })?;
        Ok(Self(array))
    }
}

/// Digest of a plaintext secret.
pub fn hash_password(secret: &[u8]) -> PasswordHash {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    PasswordHash(hasher.finalize().into())
}
