//! In-memory ledger for driving the vault rules off-chain.
//!
//! A [`VaultTransaction`] is validated in full and its balance changes staged
//! before anything is written, so a rejected transaction leaves the ledger
//! exactly as it found it. The vault rules come from [`crate::state`], the
//! same checks the on-chain handlers run.

use std::collections::{HashMap, HashSet};

use anchor_lang::prelude::{Pubkey, Rent};
use thiserror::Error;

use crate::constants::VAULT_DATA_LEN;
use crate::errors::VaultError;
use crate::state::{
    check_deposit, check_withdraw, find_vault_address, is_vault_of, VaultPolicy, VaultStatus,
};

/// Default fee charged to the signer of every committed transaction.
pub const DEFAULT_LAMPORTS_PER_SIGNATURE: u64 = 5_000;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{}: {}", .0.name(), .0)]
    Program(VaultError),
    #[error("account {0} not found")]
    AccountNotFound(Pubkey),
    #[error("vault {vault} is not derived from signer {signer}")]
    AddressMismatch { signer: Pubkey, vault: Pubkey },
    #[error("account {account} holds {available} lamports, {required} required")]
    InsufficientFunds {
        account: Pubkey,
        available: u64,
        required: u64,
    },
    #[error("vault {0} was closed and recreation is disabled")]
    VaultClosed(Pubkey),
    #[error("lamport arithmetic overflow")]
    Overflow,
}

impl From<VaultError> for LedgerError {
    fn from(err: VaultError) -> Self {
        LedgerError::Program(err)
    }
}

impl LedgerError {
    /// The program error behind this rejection, if the program raised one.
    pub fn program_error(&self) -> Option<VaultError> {
        match self {
            LedgerError::Program(err) => Some(*err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultInstruction {
    Deposit { amount: u64 },
    Withdraw,
}

/// One signed instruction against one vault account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultTransaction {
    pub signer: Pubkey,
    pub vault: Pubkey,
    pub instruction: VaultInstruction,
}

impl VaultTransaction {
    pub fn deposit(program_id: &Pubkey, signer: Pubkey, amount: u64) -> Self {
        let (vault, _) = find_vault_address(program_id, &signer);
        Self {
            signer,
            vault,
            instruction: VaultInstruction::Deposit { amount },
        }
    }

    pub fn withdraw(program_id: &Pubkey, signer: Pubkey) -> Self {
        let (vault, _) = find_vault_address(program_id, &signer);
        Self {
            signer,
            vault,
            instruction: VaultInstruction::Withdraw,
        }
    }

    /// Points the transaction at a caller-chosen vault account instead of the
    /// derived one.
    pub fn with_vault(mut self, vault: Pubkey) -> Self {
        self.vault = vault;
        self
    }
}

/// Balance writes a transaction will make once every check has passed.
struct Staged {
    balances: Vec<(Pubkey, u64)>,
    closed: Option<Pubkey>,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    program_id: Pubkey,
    rent: Rent,
    lamports_per_signature: u64,
    policy: VaultPolicy,
    balances: HashMap<Pubkey, u64>,
    closed: HashSet<Pubkey>,
}

impl Ledger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            rent: Rent::default(),
            lamports_per_signature: DEFAULT_LAMPORTS_PER_SIGNATURE,
            policy: VaultPolicy::default(),
            balances: HashMap::new(),
            closed: HashSet::new(),
        }
    }

    pub fn with_policy(mut self, policy: VaultPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_lamports_per_signature(mut self, lamports: u64) -> Self {
        self.lamports_per_signature = lamports;
        self
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn policy(&self) -> VaultPolicy {
        self.policy
    }

    pub fn lamports_per_signature(&self) -> u64 {
        self.lamports_per_signature
    }

    pub fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> u64 {
        self.rent.minimum_balance(data_len)
    }

    pub fn airdrop(&mut self, to: &Pubkey, lamports: u64) -> Result<(), LedgerError> {
        let balance = self
            .balance(to)
            .checked_add(lamports)
            .ok_or(LedgerError::Overflow)?;
        self.write(*to, balance);
        Ok(())
    }

    /// Lamports held by `account`; zero for accounts that do not exist.
    pub fn balance(&self, account: &Pubkey) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn exists(&self, account: &Pubkey) -> bool {
        self.balances.contains_key(account)
    }

    pub fn find_vault_address(&self, depositor: &Pubkey) -> (Pubkey, u8) {
        find_vault_address(&self.program_id, depositor)
    }

    pub fn vault_status(&self, depositor: &Pubkey) -> VaultStatus {
        let (vault, _) = self.find_vault_address(depositor);
        VaultStatus::from_lamports(self.balance(&vault))
    }

    /// Applies `tx` in full or not at all.
    pub fn commit(&mut self, tx: &VaultTransaction) -> Result<(), LedgerError> {
        let staged = self.stage(tx)?;
        for (account, lamports) in staged.balances {
            self.write(account, lamports);
        }
        if let Some(vault) = staged.closed {
            self.closed.insert(vault);
        }
        Ok(())
    }

    fn stage(&self, tx: &VaultTransaction) -> Result<Staged, LedgerError> {
        let signer_lamports = self
            .balances
            .get(&tx.signer)
            .copied()
            .ok_or(LedgerError::AccountNotFound(tx.signer))?;
        let after_fee = signer_lamports
            .checked_sub(self.lamports_per_signature)
            .ok_or(LedgerError::InsufficientFunds {
                account: tx.signer,
                available: signer_lamports,
                required: self.lamports_per_signature,
            })?;

        if !is_vault_of(&self.program_id, &tx.signer, &tx.vault) {
            return Err(LedgerError::AddressMismatch {
                signer: tx.signer,
                vault: tx.vault,
            });
        }
        let status = VaultStatus::from_lamports(self.balance(&tx.vault));

        match tx.instruction {
            VaultInstruction::Deposit { amount } => {
                if !self.policy.allow_recreation
                    && !status.is_funded()
                    && self.closed.contains(&tx.vault)
                {
                    return Err(LedgerError::VaultClosed(tx.vault));
                }
                check_deposit(
                    status,
                    amount,
                    self.minimum_balance_for_rent_exemption(VAULT_DATA_LEN),
                )?;
                let signer_after =
                    after_fee
                        .checked_sub(amount)
                        .ok_or(LedgerError::InsufficientFunds {
                            account: tx.signer,
                            available: after_fee,
                            required: amount,
                        })?;
                Ok(Staged {
                    balances: vec![(tx.signer, signer_after), (tx.vault, amount)],
                    closed: None,
                })
            }
            VaultInstruction::Withdraw => {
                let lamports = check_withdraw(status)?;
                let signer_after = after_fee
                    .checked_add(lamports)
                    .ok_or(LedgerError::Overflow)?;
                Ok(Staged {
                    balances: vec![(tx.signer, signer_after), (tx.vault, 0)],
                    closed: Some(tx.vault),
                })
            }
        }
    }

    // Zero-lamport accounts are deallocated, like the runtime does.
    fn write(&mut self, account: Pubkey, lamports: u64) {
        if lamports == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, lamports);
        }
    }
}
