//! Deterministic address derivation
//!
//! A record address is `sha256(seeds ‖ bump ‖ program_id ‖ marker)`, accepted
//! only when the result is not a valid Ed25519 point. No private key exists
//! for such an address, so only this program can act for it. The bump is the
//! first value, counting down from 255, that yields an off-curve address.

use ed25519_dalek::VerifyingKey;
use escrow_types::ids::Pubkey;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::errors::DerivationError;
use crate::hash::PasswordHash;

/// Maximum number of seeds, bump included.
pub const MAX_SEEDS: usize = 16;
/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

const DERIVED_ADDRESS_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Namespace of vault records, keyed by password hash.
pub const VAULT_SEED: &[u8] = b"vault";
/// Namespace of the fee record singleton.
pub const FEE_SEED: &[u8] = b"fee_account";
/// Namespace of per-mint holding accounts for escrowed assets.
pub const HOLDING_SEED: &[u8] = b"holding";
/// Namespace of per-mint accounts receiving collected fees.
pub const FEE_HOLDING_SEED: &[u8] = b"fee_holding";

/// Derive an address from `seeds` and an explicit `bump`.
pub fn create_program_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Pubkey,
) -> Result<Pubkey, DerivationError> {
    if seeds.len() + 1 > MAX_SEEDS {
        return Err(DerivationError::TooManySeeds {
            count: seeds.len() + 1,
            max: MAX_SEEDS,
        });
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(DerivationError::SeedTooLong {
            index,
            len: seed.len(),
            max: MAX_SEED_LEN,
        });
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_ref());
    hasher.update(DERIVED_ADDRESS_MARKER);
    let bytes: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&bytes) {
        return Err(DerivationError::OnCurve);
    }
    Ok(Pubkey::new(bytes))
}

/// Find the canonical address and bump for `seeds`.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), DerivationError> {
    for bump in (0..=u8::MAX).rev() {
        match create_program_address(seeds, bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(DerivationError::OnCurve) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(DerivationError::NoViableBump)
}

/// Address of the vault record for a password hash.
pub fn vault_address(
    password_hash: &PasswordHash,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), DerivationError> {
    let derived = find_program_address(&[VAULT_SEED, password_hash.as_ref()], program_id)?;
    debug!(vault = %derived.0, bump = derived.1, "Derived vault address");
    Ok(derived)
}

/// Address of the fee record singleton.
pub fn fee_address(program_id: &Pubkey) -> Result<(Pubkey, u8), DerivationError> {
    find_program_address(&[FEE_SEED], program_id)
}

/// Address of the account holding escrowed units of `mint`.
pub fn holding_address(mint: &Pubkey, program_id: &Pubkey) -> Result<Pubkey, DerivationError> {
    find_program_address(&[HOLDING_SEED, mint.as_ref()], program_id).map(|(address, _)| address)
}

/// Address of the account collecting fees in `mint`.
pub fn fee_holding_address(mint: &Pubkey, program_id: &Pubkey) -> Result<Pubkey, DerivationError> {
    find_program_address(&[FEE_HOLDING_SEED, mint.as_ref()], program_id)
        .map(|(address, _)| address)
}

fn is_on_curve(bytes: &[u8; 32]) -> bool {
    VerifyingKey::from_bytes(bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_password;

    const SEED: &[u8] = b"seed";

    fn program_id() -> Pubkey {
        Pubkey::new([3u8; 32])
    }

    #[test]
    fn test_vault_address_deterministic() {
        let hash = hash_password(b"secret_password_3");
        let first = vault_address(&hash, &program_id()).unwrap();
        let second = vault_address(&hash, &program_id()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_hashes_distinct_addresses() {
        let a = vault_address(&hash_password(b"a"), &program_id()).unwrap();
        let b = vault_address(&hash_password(b"b"), &program_id()).unwrap();
        assert_ne!(a.0, b.0);
    }

    #[test]
    fn test_program_id_scopes_addresses() {
        let hash = hash_password(b"a");
        let a = vault_address(&hash, &program_id()).unwrap();
        let b = vault_address(&hash, &Pubkey::new([4u8; 32])).unwrap();
        assert_ne!(a.0, b.0);
    }

    #[test]
    fn test_found_address_is_off_curve_and_reproducible() {
        let (address, bump) = find_program_address(&[SEED], &program_id()).unwrap();
        assert!(!is_on_curve(address.as_bytes()));
        assert_eq!(
            create_program_address(&[SEED], bump, &program_id()),
            Ok(address)
        );
    }

    #[test]
    fn test_higher_bumps_were_on_curve() {
        let (_, bump) = find_program_address(&[SEED], &program_id()).unwrap();
        for higher in bump.saturating_add(1)..=u8::MAX {
            if higher == bump {
                continue;
            }
            assert_eq!(
                create_program_address(&[SEED], higher, &program_id()),
                Err(DerivationError::OnCurve)
            );
        }
    }

    #[test]
    fn test_seed_too_long() {
        let long = [0u8; MAX_SEED_LEN + 1];
        let result = create_program_address(&[&b"ok"[..], &long[..]], 255, &program_id());
        assert_eq!(
            result,
            Err(DerivationError::SeedTooLong {
                index: 1,
                len: MAX_SEED_LEN + 1,
                max: MAX_SEED_LEN,
            })
        );
    }

    #[test]
    fn test_too_many_seeds() {
        let seeds: Vec<&[u8]> = vec![&b"s"[..]; MAX_SEEDS];
        let result = find_program_address(&seeds, &program_id());
        assert!(matches!(result, Err(DerivationError::TooManySeeds { .. })));
    }

    #[test]
    fn test_namespaces_are_separate() {
        let mint = Pubkey::new([5u8; 32]);
        let holding = holding_address(&mint, &program_id()).unwrap();
        let fee_holding = fee_holding_address(&mint, &program_id()).unwrap();
        let (fee, _) = fee_address(&program_id()).unwrap();
        assert_ne!(holding, fee_holding);
        assert_ne!(holding, fee);
    }
}
