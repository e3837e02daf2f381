//! Asset Transfer Gateway
//!
//! The vault program never edits balances itself; it asks an `AssetGateway`
//! to move units between token accounts. `TokenLedger` is the in-process
//! implementation: registered mints, token accounts, and checked transfers.

use escrow_types::asset::AssetType;
use escrow_types::ids::Pubkey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::errors::TransferError;

/// A token account: holds units of one mint on behalf of one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

/// Balance-moving primitive used by the vault program.
pub trait AssetGateway {
    /// Category of a registered mint.
    fn mint_kind(&self, mint: &Pubkey) -> Option<AssetType>;

    /// Token account at `address`.
    fn account(&self, address: &Pubkey) -> Option<&TokenAccount>;

    /// Open an empty account at `address`. Reopening with the same mint and
    /// owner is a no-op.
    fn open_account(
        &mut self,
        address: Pubkey,
        mint: Pubkey,
        owner: Pubkey,
    ) -> Result<(), TransferError>;

    /// Move `amount` from `from` to `to`. `authority` must own `from`.
    fn transfer(
        &mut self,
        from: &Pubkey,
        to: &Pubkey,
        authority: &Pubkey,
        amount: u64,
    ) -> Result<(), TransferError>;
}

/// In-memory token ledger.
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    mints: BTreeMap<Pubkey, AssetType>,
    accounts: BTreeMap<Pubkey, TokenAccount>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh mint of the given category.
    pub fn create_mint(&mut self, kind: AssetType) -> Pubkey {
        let mint = Pubkey::new_unique();
        self.mints.insert(mint, kind);
        mint
    }

    /// Register a mint under a known address.
    pub fn register_mint(&mut self, mint: Pubkey, kind: AssetType) {
        self.mints.insert(mint, kind);
    }

    /// Open a fresh account for `owner` and return its address.
    pub fn create_account(&mut self, mint: Pubkey, owner: Pubkey) -> Result<Pubkey, TransferError> {
        let address = Pubkey::new_unique();
        self.open_account(address, mint, owner)?;
        Ok(address)
    }

    /// Issue new units into an account.
    pub fn mint_to(&mut self, address: &Pubkey, amount: u64) -> Result<(), TransferError> {
        let account = self
            .accounts
            .get_mut(address)
            .ok_or_else(|| TransferError::AccountNotFound {
                address: address.to_string(),
            })?;
        account.amount = account
            .amount
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        Ok(())
    }

    /// Balance of an account, zero if it does not exist.
    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.accounts.get(address).map_or(0, |a| a.amount)
    }
}

impl AssetGateway for TokenLedger {
    fn mint_kind(&self, mint: &Pubkey) -> Option<AssetType> {
        self.mints.get(mint).copied()
    }

    fn account(&self, address: &Pubkey) -> Option<&TokenAccount> {
        self.accounts.get(address)
    }

    fn open_account(
        &mut self,
        address: Pubkey,
        mint: Pubkey,
        owner: Pubkey,
    ) -> Result<(), TransferError> {
        if !self.mints.contains_key(&mint) {
            return Err(TransferError::UnknownMint {
                mint: mint.to_string(),
            });
        }

        if let Some(existing) = self.accounts.get(&address) {
            if existing.mint == mint && existing.owner == owner {
                return Ok(());
            }
            return Err(TransferError::AccountInUse {
                address: address.to_string(),
            });
        }

        debug!(account = %address, mint = %mint, owner = %owner, "Opened token account");
        self.accounts.insert(
            address,
            TokenAccount {
                mint,
                owner,
                amount: 0,
            },
        );
        Ok(())
    }

    fn transfer(
        &mut self,
        from: &Pubkey,
        to: &Pubkey,
        authority: &Pubkey,
        amount: u64,
    ) -> Result<(), TransferError> {
        let source = self
            .accounts
            .get(from)
            .ok_or_else(|| TransferError::AccountNotFound {
                address: from.to_string(),
            })?;
        let destination = self
            .accounts
            .get(to)
            .ok_or_else(|| TransferError::AccountNotFound {
                address: to.to_string(),
            })?;

        if source.owner != *authority {
            return Err(TransferError::OwnerMismatch);
        }
        if source.mint != destination.mint {
            return Err(TransferError::MintMismatch {
                expected: source.mint.to_string(),
                actual: destination.mint.to_string(),
            });
        }
        if source.amount < amount {
            return Err(TransferError::InsufficientFunds {
                required: amount,
                available: source.amount,
            });
        }
        if from == to {
            return Ok(());
        }

        let new_destination = destination
            .amount
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        let new_source = source.amount - amount;

        // Both balances validated above; apply together.
        if let Some(account) = self.accounts.get_mut(from) {
            account.amount = new_source;
        }
        if let Some(account) = self.accounts.get_mut(to) {
            account.amount = new_destination;
        }
        Ok(())
    }
}
