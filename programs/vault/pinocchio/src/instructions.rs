use core::mem::size_of;

use pinocchio::{
    cpi::{Seed, Signer},
    sysvars::{rent::Rent, Sysvar},
    AccountView, Address, ProgramResult,
};
use pinocchio_system::instructions::Transfer;
use solana_program_error::ProgramError;

use crate::errors::VaultError;
use crate::{ID, VAULT_SEED};

/// Derives the vault PDA and canonical bump for `signer`.
pub fn find_vault_address(signer: &Address) -> (Address, u8) {
    Address::find_program_address(&[VAULT_SEED, signer.as_ref()], &ID)
}

/// Accepts `vault` only if it is the PDA `signer` derives, returning its bump.
pub fn check_vault_address(signer: &Address, vault: &Address) -> Result<u8, ProgramError> {
    let (expected, bump) = find_vault_address(signer);
    if vault != &expected {
        return Err(ProgramError::InvalidSeeds);
    }
    Ok(bump)
}

/// Accounts shared by both instructions: signer, vault, system program.
pub struct VaultAccounts<'a> {
    pub signer: &'a AccountView,
    pub vault: &'a AccountView,
    pub bump: u8,
}

impl<'a> TryFrom<&'a [AccountView]> for VaultAccounts<'a> {
    type Error = ProgramError;

    fn try_from(accounts: &'a [AccountView]) -> Result<Self, Self::Error> {
        let [signer, vault, _system_program] = accounts else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };

        if !signer.is_signer() {
            return Err(ProgramError::MissingRequiredSignature);
        }

        // An unallocated address still reports the system program as owner.
        if !vault.owned_by(&pinocchio_system::ID) {
            return Err(ProgramError::InvalidAccountOwner);
        }

        let bump = check_vault_address(signer.address(), vault.address())?;

        Ok(Self {
            signer,
            vault,
            bump,
        })
    }
}

// ========== Deposit ==========

pub struct DepositInstructionData {
    pub amount: u64,
}

impl<'a> TryFrom<&'a [u8]> for DepositInstructionData {
    type Error = ProgramError;

    fn try_from(data: &'a [u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; size_of::<u64>()] = data
            .try_into()
            .map_err(|_| ProgramError::InvalidInstructionData)?;

        Ok(Self {
            amount: u64::from_le_bytes(bytes),
        })
    }
}

pub struct Deposit<'a> {
    pub accounts: VaultAccounts<'a>,
    pub amount: u64,
}

impl<'a> TryFrom<(&'a [u8], &'a [AccountView])> for Deposit<'a> {
    type Error = ProgramError;

    fn try_from((data, accounts): (&'a [u8], &'a [AccountView])) -> Result<Self, Self::Error> {
        let accounts = VaultAccounts::try_from(accounts)?;
        let DepositInstructionData { amount } = DepositInstructionData::try_from(data)?;

        Ok(Self { accounts, amount })
    }
}

impl<'a> Deposit<'a> {
    pub const DISCRIMINATOR: &'static u8 = &0;

    pub fn process(&self) -> ProgramResult {
        if self.accounts.vault.lamports() != 0 {
            return Err(VaultError::VaultAlreadyExists.into());
        }

        let rent_exempt_minimum = Rent::get()?.try_minimum_balance(0)?;
        if self.amount <= rent_exempt_minimum {
            return Err(VaultError::InvalidAmount.into());
        }

        Transfer {
            from: self.accounts.signer,
            to: self.accounts.vault,
            lamports: self.amount,
        }
        .invoke()
    }
}

// ========== Withdraw ==========

pub struct Withdraw<'a> {
    pub accounts: VaultAccounts<'a>,
}

impl<'a> TryFrom<&'a [AccountView]> for Withdraw<'a> {
    type Error = ProgramError;

    fn try_from(accounts: &'a [AccountView]) -> Result<Self, Self::Error> {
        let accounts = VaultAccounts::try_from(accounts)?;
        Ok(Self { accounts })
    }
}

impl<'a> Withdraw<'a> {
    pub const DISCRIMINATOR: &'static u8 = &1;

    pub fn process(&self) -> ProgramResult {
        let lamports = self.accounts.vault.lamports();
        if lamports == 0 {
            return Err(VaultError::VaultNotFound.into());
        }

        let bump = [self.accounts.bump];
        let seeds = [
            Seed::from(VAULT_SEED),
            Seed::from(self.accounts.signer.address().as_ref()),
            Seed::from(bump.as_slice()),
        ];
        let signers = [Signer::from(&seeds)];

        Transfer {
            from: self.accounts.vault,
            to: self.accounts.signer,
            lamports,
        }
        .invoke_signed(&signers)
    }
}
