//! Vault program: the Hide / Unlock / Claim state machine
//!
//! Records move `Locked -> Unlocked -> Claimed`. Each operation validates
//! everything it can before touching balances; the runtime additionally
//! executes it against a staged copy of state, so a failure part-way through
//! a claim leaves nothing applied.

use escrow_types::asset::{AssetEntry, AssetType};
use escrow_types::fee::{FeePolicy, FeeSplit};
use escrow_types::ids::Pubkey;
use tracing::{debug, info};

use crate::config::VaultConfig;
use crate::derivation;
use crate::errors::{ConfigError, VaultError};
use crate::events::{Payout, VaultClaimed, VaultEvent, VaultHidden, VaultUnlocked};
use crate::gateway::AssetGateway;
use crate::hash::PasswordHash;
use crate::instruction::{ClaimArgs, Destination, HideArgs, UnlockArgs};
use crate::security;
use crate::state::{FeeRecord, VaultRecord, VaultState};
use crate::store::VaultStore;

/// The vault program.
///
/// Stateless apart from its identity and fee policy; all records live in the
/// `VaultStore` and fee record handed to each call.
#[derive(Debug, Clone)]
pub struct VaultProgram {
    program_id: Pubkey,
    fee_policy: FeePolicy,
}

impl VaultProgram {
    pub fn new(config: &VaultConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            program_id: config.program_id,
            fee_policy: config.fee_policy(),
        })
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn fee_policy(&self) -> &FeePolicy {
        &self.fee_policy
    }

    /// Address and derivation nonce of the record for `password_hash`.
    pub fn vault_address(&self, password_hash: &PasswordHash) -> Result<(Pubkey, u8), VaultError> {
        Ok(derivation::vault_address(password_hash, &self.program_id)?)
    }

    // ───────────────────────── Hide ─────────────────────────

    /// Escrow `amount` of `mint` under a password hash.
    ///
    /// Creates the record on first deposit. Further deposits by the same
    /// owner append entries while the record is still locked.
    pub fn hide<G: AssetGateway>(
        &self,
        caller: &Pubkey,
        vaults: &mut VaultStore,
        gateway: &mut G,
        args: &HideArgs,
    ) -> Result<VaultEvent, VaultError> {
        if args.amount == 0 {
            return Err(VaultError::InvalidAmount);
        }
        let asset_type = self.check_mint(&*gateway, &args.mint, args.asset_type)?;

        let source = gateway
            .account(&args.source)
            .ok_or_else(|| VaultError::AccountNotFound {
                address: args.source.to_string(),
            })?;
        if source.mint != args.mint {
            return Err(VaultError::InvalidMint {
                mint: source.mint.to_string(),
            });
        }

        let (address, bump) = self.vault_address(&args.password_hash)?;
        if let Some(existing) = vaults.get(&address) {
            match existing.state {
                VaultState::Claimed { .. } => return Err(VaultError::AlreadyClaimed),
                VaultState::Unlocked { .. } => return Err(VaultError::AlreadyUnlocked),
                VaultState::Locked => {}
            }
            if existing.owner != *caller {
                return Err(VaultError::AlreadyHidden);
            }
        }

        let holding = derivation::holding_address(&args.mint, &self.program_id)?;
        gateway.open_account(holding, args.mint, self.program_id)?;
        gateway.transfer(&args.source, &holding, caller, args.amount)?;

        if !vaults.contains(&address) {
            info!(vault = %address, owner = %caller, bump, "Vault record created");
        }
        let record = vaults.create(address, VaultRecord::new(*caller, args.password_hash, bump));
        record
            .assets
            .push(AssetEntry::new(args.mint, asset_type, args.amount));

        info!(
            vault = %address,
            mint = %args.mint,
            asset_type = %asset_type,
            amount = args.amount,
            entries = record.assets.len(),
            "Asset hidden"
        );

        Ok(VaultEvent::Hidden(VaultHidden {
            vault: address,
            owner: *caller,
            mint: args.mint,
            asset_type,
            amount: args.amount,
            entry_count: record.assets.len(),
        }))
    }

    fn check_mint<G: AssetGateway>(
        &self,
        gateway: &G,
        mint: &Pubkey,
        tag: u8,
    ) -> Result<AssetType, VaultError> {
        let invalid = || VaultError::InvalidMint {
            mint: mint.to_string(),
        };
        let requested = AssetType::try_from(tag).map_err(|_| invalid())?;
        match gateway.mint_kind(mint) {
            Some(kind) if kind == requested => Ok(kind),
            _ => Err(invalid()),
        }
    }

    // ───────────────────────── Unlock ─────────────────────────

    /// Bind the caller as claimant after proving knowledge of the secret.
    ///
    /// A record accepts one successful unlock. Once a claimer is bound every
    /// further attempt fails with `AlreadyUnlocked`, whatever the secret.
    pub fn unlock(
        &self,
        caller: &Pubkey,
        vaults: &mut VaultStore,
        args: &UnlockArgs,
    ) -> Result<VaultEvent, VaultError> {
        let record = vaults
            .get_mut(&args.vault)
            .ok_or_else(|| VaultError::AccountNotFound {
                address: args.vault.to_string(),
            })?;

        if record.claimer().is_some() {
            return Err(VaultError::AlreadyUnlocked);
        }

        let valid = security::verify_password(
            &args.password,
            &args.vault,
            &record.password_hash,
            &self.program_id,
        )?;
        if !valid {
            return Err(VaultError::InvalidPassword);
        }

        record.state = VaultState::Unlocked { claimer: *caller };
        info!(vault = %args.vault, claimer = %caller, "Vault unlocked");

        Ok(VaultEvent::Unlocked(VaultUnlocked {
            vault: args.vault,
            claimer: *caller,
        }))
    }

    // ───────────────────────── Claim ─────────────────────────

    /// Pay out every entry of an unlocked record to the bound claimer.
    ///
    /// Each entry is split into fee and net payout; nets go to the supplied
    /// destinations, fees to the program's fee holdings, and the fee record
    /// accrues their sum. The fee record is created on first use.
    pub fn claim<G: AssetGateway>(
        &self,
        caller: &Pubkey,
        vaults: &mut VaultStore,
        fee_record: &mut Option<FeeRecord>,
        gateway: &mut G,
        args: &ClaimArgs,
    ) -> Result<VaultEvent, VaultError> {
        let record = vaults
            .get_mut(&args.vault)
            .ok_or_else(|| VaultError::AccountNotFound {
                address: args.vault.to_string(),
            })?;

        match record.state {
            VaultState::Locked => return Err(VaultError::Unauthorized),
            VaultState::Unlocked { claimer } | VaultState::Claimed { claimer }
                if claimer != *caller =>
            {
                return Err(VaultError::Unauthorized)
            }
            VaultState::Claimed { .. } => return Err(VaultError::AlreadyClaimed),
            VaultState::Unlocked { .. } => {}
        }

        if args.bump != record.bump {
            return Err(VaultError::InvalidDerivation {
                expected: record.bump,
                actual: args.bump,
            });
        }

        check_destinations(&*gateway, caller, &record.assets, &args.destinations)?;

        let mut splits: Vec<FeeSplit> = Vec::with_capacity(record.assets.len());
        let mut total_fee: u64 = 0;
        for asset in &record.assets {
            let split = self
                .fee_policy
                .split(asset.amount)
                .ok_or(VaultError::ArithmeticOverflow)?;
            total_fee = total_fee
                .checked_add(split.fee)
                .ok_or(VaultError::ArithmeticOverflow)?;
            splits.push(split);
        }

        let mut fee_account = match *fee_record {
            Some(existing) => existing,
            None => self.new_fee_record()?,
        };
        let accumulated = fee_account.checked_accrue(total_fee)?;

        let mut payouts = Vec::with_capacity(record.assets.len());
        for ((asset, destination), split) in record
            .assets
            .iter()
            .zip(&args.destinations)
            .zip(&splits)
        {
            let holding = derivation::holding_address(&asset.mint, &self.program_id)?;
            gateway.transfer(&holding, &destination.account, &self.program_id, split.net)?;

            if split.fee > 0 {
                let fee_holding = derivation::fee_holding_address(&asset.mint, &self.program_id)?;
                gateway.open_account(fee_holding, asset.mint, self.program_id)?;
                gateway.transfer(&holding, &fee_holding, &self.program_id, split.fee)?;
            }

            payouts.push(Payout {
                mint: asset.mint,
                destination: destination.account,
                net: split.net,
                fee: split.fee,
            });
        }

        fee_account.accumulated = accumulated;
        *fee_record = Some(fee_account);
        record.assets.clear();
        record.state = VaultState::Claimed { claimer: *caller };

        info!(
            vault = %args.vault,
            claimer = %caller,
            entries = payouts.len(),
            total_fee,
            "Vault claimed"
        );

        Ok(VaultEvent::Claimed(VaultClaimed {
            vault: args.vault,
            claimer: *caller,
            payouts,
            total_fee,
        }))
    }

    fn new_fee_record(&self) -> Result<FeeRecord, VaultError> {
        let (address, bump) = derivation::fee_address(&self.program_id)?;
        debug!(fee_record = %address, bump, "Creating fee record");
        Ok(FeeRecord::new(bump))
    }
}

/// Destinations must match the record entry for entry, in order, and each
/// destination account must hold the entry's mint and belong to the claimer.
fn check_destinations<G: AssetGateway>(
    gateway: &G,
    claimer: &Pubkey,
    assets: &[AssetEntry],
    destinations: &[Destination],
) -> Result<(), VaultError> {
    if assets.len() != destinations.len() {
        return Err(VaultError::AssetMismatch {
            reason: format!(
                "record holds {} entries, {} destinations supplied",
                assets.len(),
                destinations.len()
            ),
        });
    }

    for (index, (asset, destination)) in assets.iter().zip(destinations).enumerate() {
        if destination.mint != asset.mint {
            return Err(VaultError::AssetMismatch {
                reason: format!(
                    "destination {index} is for mint {}, entry holds {}",
                    destination.mint, asset.mint
                ),
            });
        }
        let account =
            gateway
                .account(&destination.account)
                .ok_or_else(|| VaultError::AccountNotFound {
                    address: destination.account.to_string(),
                })?;
        if account.mint != asset.mint {
            return Err(VaultError::AssetMismatch {
                reason: format!(
                    "destination account {index} holds mint {}, entry holds {}",
                    account.mint, asset.mint
                ),
            });
        }
        if account.owner != *claimer {
            return Err(VaultError::Unauthorized);
        }
    }
    Ok(())
}
