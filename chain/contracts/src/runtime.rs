//! Execution runtime
//!
//! Holds all persistent state (vault records, the fee record, token
//! accounts) and runs instructions against it one at a time. Each instruction
//! executes on a staged copy of the state that is committed only when the
//! instruction succeeds, so failures leave no trace. Signed submissions are
//! authenticated and checked for replay before execution.
//!
//! Staging clones the whole bank, every record and token account included,
//! so each instruction costs time proportional to total state rather than to
//! the accounts it touches.

use escrow_types::ids::Pubkey;
use tracing::debug;

use crate::config::VaultConfig;
use crate::derivation;
use crate::errors::{ConfigError, VaultError};
use crate::events::VaultEvent;
use crate::gateway::{AssetGateway, TokenLedger};
use crate::hash::PasswordHash;
use crate::instruction::{Instruction, SignedInstruction};
use crate::security::NonceTracker;
use crate::state::{FeeRecord, VaultRecord};
use crate::store::VaultStore;
use crate::vault::VaultProgram;

/// Persistent state touched by instructions.
#[derive(Debug, Clone, Default)]
pub struct Bank<G> {
    pub vaults: VaultStore,
    pub fee_record: Option<FeeRecord>,
    pub gateway: G,
}

impl<G> Bank<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            vaults: VaultStore::new(),
            fee_record: None,
            gateway,
        }
    }
}

/// Sequential instruction executor.
#[derive(Debug)]
pub struct Runtime<G = TokenLedger> {
    program: VaultProgram,
    bank: Bank<G>,
    nonces: NonceTracker,
    /// Emitted events log (append-only)
    events: Vec<VaultEvent>,
}

impl<G: AssetGateway + Clone> Runtime<G> {
    pub fn new(config: &VaultConfig, gateway: G) -> Result<Self, ConfigError> {
        Ok(Self {
            program: VaultProgram::new(config)?,
            bank: Bank::new(gateway),
            nonces: NonceTracker::new(),
            events: Vec::new(),
        })
    }

    /// Execute `instruction` on behalf of an already authenticated `caller`.
    ///
    /// All-or-nothing: on error the committed state is unchanged.
    pub fn process(
        &mut self,
        caller: &Pubkey,
        instruction: &Instruction,
    ) -> Result<VaultEvent, VaultError> {
        debug!(caller = %caller, instruction = instruction.name(), "Processing instruction");

        let mut staged = self.bank.clone();
        let event = execute(&self.program, caller, &mut staged, instruction)?;

        self.bank = staged;
        self.events.push(event.clone());
        Ok(event)
    }

    /// Authenticate a signed instruction, reject replays, then execute it.
    ///
    /// The nonce is consumed only when execution succeeds.
    pub fn submit(&mut self, signed: &SignedInstruction) -> Result<VaultEvent, VaultError> {
        signed.verify()?;
        if self.nonces.is_used(&signed.signer, signed.nonce) {
            return Err(VaultError::NonceReused {
                signer: signed.signer.to_string(),
                nonce: signed.nonce,
            });
        }

        let event = self.process(&signed.signer, &signed.instruction)?;
        self.nonces.use_nonce(signed.signer, signed.nonce);
        Ok(event)
    }
}

impl<G> Runtime<G> {
    pub fn program(&self) -> &VaultProgram {
        &self.program
    }

    pub fn vault_address(&self, password_hash: &PasswordHash) -> Result<(Pubkey, u8), VaultError> {
        self.program.vault_address(password_hash)
    }

    pub fn vault(&self, address: &Pubkey) -> Option<&VaultRecord> {
        self.bank.vaults.get(address)
    }

    pub fn vault_count(&self) -> usize {
        self.bank.vaults.len()
    }

    /// The fee record, once the first claim has created it.
    pub fn fee_record(&self) -> Option<&FeeRecord> {
        self.bank.fee_record.as_ref()
    }

    pub fn fee_record_address(&self) -> Result<Pubkey, VaultError> {
        let (address, _) = derivation::fee_address(self.program.program_id())?;
        Ok(address)
    }

    pub fn gateway(&self) -> &G {
        &self.bank.gateway
    }

    /// Direct access to the token ledger for setup outside the instruction
    /// flow (minting, opening user accounts).
    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.bank.gateway
    }

    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.events)
    }
}

fn execute<G: AssetGateway>(
    program: &VaultProgram,
    caller: &Pubkey,
    bank: &mut Bank<G>,
    instruction: &Instruction,
) -> Result<VaultEvent, VaultError> {
    match instruction {
        Instruction::Hide(args) => program.hide(caller, &mut bank.vaults, &mut bank.gateway, args),
        Instruction::Unlock(args) => program.unlock(caller, &mut bank.vaults, args),
        Instruction::Claim(args) => program.claim(
            caller,
            &mut bank.vaults,
            &mut bank.fee_record,
            &mut bank.gateway,
            args,
        ),
    }
}
