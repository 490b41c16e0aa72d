use anchor_lang::prelude::*;

use crate::constants::VAULT_SEED;
use crate::errors::VaultError;

/// What a vault address currently holds.
///
/// A vault has no data, so its lamport balance is its entire state: zero
/// lamports means the runtime has deallocated it (or never allocated it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultStatus {
    Absent,
    Funded { lamports: u64 },
}

impl VaultStatus {
    pub fn from_lamports(lamports: u64) -> Self {
        if lamports == 0 {
            VaultStatus::Absent
        } else {
            VaultStatus::Funded { lamports }
        }
    }

    pub fn lamports(&self) -> u64 {
        match self {
            VaultStatus::Absent => 0,
            VaultStatus::Funded { lamports } => *lamports,
        }
    }

    pub fn is_funded(&self) -> bool {
        matches!(self, VaultStatus::Funded { .. })
    }
}

/// Whether an address that was funded and then withdrawn may be funded again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultPolicy {
    pub allow_recreation: bool,
}

impl VaultPolicy {
    /// Behaviour of the deployed program. It is not read at runtime: a
    /// withdrawn vault is garbage collected and leaves nothing to check
    /// against, so the same depositor can always fund it again.
    pub const ON_CHAIN: Self = Self {
        allow_recreation: true,
    };

    /// Every depositor gets exactly one vault lifetime.
    pub const SINGLE_USE: Self = Self {
        allow_recreation: false,
    };
}

impl Default for VaultPolicy {
    fn default() -> Self {
        Self::ON_CHAIN
    }
}

/// Derives the vault PDA and canonical bump for `depositor`.
pub fn find_vault_address(program_id: &Pubkey, depositor: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, depositor.as_ref()], program_id)
}

/// True when `vault` is the PDA `depositor` derives. This is the only
/// ownership check: no owner is ever stored.
pub fn is_vault_of(program_id: &Pubkey, depositor: &Pubkey, vault: &Pubkey) -> bool {
    find_vault_address(program_id, depositor).0 == *vault
}

/// Rules a deposit must pass before any lamports move.
pub fn check_deposit(
    status: VaultStatus,
    amount: u64,
    rent_exempt_minimum: u64,
) -> core::result::Result<(), VaultError> {
    if status.is_funded() {
        return Err(VaultError::VaultAlreadyExists);
    }
    if amount <= rent_exempt_minimum {
        return Err(VaultError::InvalidAmount);
    }
    Ok(())
}

/// Rules a withdrawal must pass. Returns the lamports to hand back, which is
/// always the full balance.
pub fn check_withdraw(status: VaultStatus) -> core::result::Result<u64, VaultError> {
    if !status.is_funded() {
        return Err(VaultError::VaultNotFound);
    }
    Ok(status.lamports())
}
