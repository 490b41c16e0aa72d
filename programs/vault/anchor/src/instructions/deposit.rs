use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};

use crate::constants::{VAULT_DATA_LEN, VAULT_SEED};
use crate::events::VaultDeposited;
use crate::state::{check_deposit, VaultStatus};

pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let status = VaultStatus::from_lamports(ctx.accounts.vault.lamports());
    let rent_exempt_minimum = Rent::get()?.minimum_balance(VAULT_DATA_LEN);
    check_deposit(status, amount, rent_exempt_minimum)?;

    // Funding a system-owned PDA past the rent minimum is what allocates it.
    transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.signer.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    msg!("Deposited {} lamports into vault {}", amount, ctx.accounts.vault.key());
    emit!(VaultDeposited {
        depositor: ctx.accounts.signer.key(),
        vault: ctx.accounts.vault.key(),
        amount,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    /// Seeds tie the vault to the signer; any other address fails here.
    #[account(
        mut,
        seeds = [VAULT_SEED, signer.key().as_ref()],
        bump
    )]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}
