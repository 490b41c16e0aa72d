use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;

#[cfg(not(target_os = "solana"))]
pub mod ledger;

pub use instructions::*;

declare_id!("9XdsMh9VXHjLyu9QKaiqg6NmnUnG6gT5Ab1gfRrzGopt");

#[program]
pub mod anchor_vault {
    use super::*;

    /// Creates the signer's vault and funds it with `amount` lamports.
    ///
    /// The vault lives at `[b"vault", signer]` and can only be created once
    /// while it holds funds. Fails with `VaultAlreadyExists` if it is already
    /// funded, and with `InvalidAmount` unless `amount` is strictly greater
    /// than the rent-exempt minimum of a zero-data account.
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit(ctx, amount)
    }

    /// Returns every lamport in the signer's vault and closes it.
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw(ctx)
    }
}
