use anchor_lang::prelude::*;

#[event]
pub struct VaultDeposited {
    pub depositor: Pubkey,
    pub vault: Pubkey,
    pub amount: u64,
}

#[event]
pub struct VaultWithdrawn {
    pub depositor: Pubkey,
    pub vault: Pubkey,
    pub amount: u64,
}
