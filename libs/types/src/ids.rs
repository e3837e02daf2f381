//! Fixed-width identifiers for vault entities
//!
//! Every caller identity, mint, token account and derived record address is a
//! 32-byte `Pubkey`. Human-readable encodings (JSON, `Display`) use lowercase
//! hex; binary encodings (bincode record layouts) use the raw 32 bytes so the
//! persisted width stays fixed.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypeError;

/// Width of every identity in bytes.
pub const PUBKEY_BYTES: usize = 32;

/// 32-byte identity of a caller, mint, token account or derived address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    /// Wrap raw bytes.
    pub const fn new(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Random identity, for fresh mints and test actors.
    pub fn new_unique() -> Self {
        Self(rand::random())
    }

    /// Build from a slice, failing if the length is not 32.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        let array: [u8; PUBKEY_BYTES] = bytes
            .try_into()
            .map_err(|_| TypeError::InvalidPubkeyLength { len: bytes.len() })?;
        Ok(Self(array))
    }

    pub fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PUBKEY_BYTES]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", hex::encode(self.0))
    }
}

impl FromStr for Pubkey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidPubkey(e.to_string()))?;
        Self::try_from_slice(&bytes)
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(de::Error::custom)
        } else {
            <[u8; PUBKEY_BYTES]>::deserialize(deserializer).map(Self)
        }
    }
}
