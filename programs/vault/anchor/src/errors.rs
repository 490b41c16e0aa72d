use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Vault already exists")]
    VaultAlreadyExists,
    #[msg("Deposit must exceed the rent-exempt minimum")]
    InvalidAmount,
    #[msg("No vault exists for this signer")]
    VaultNotFound,
}
