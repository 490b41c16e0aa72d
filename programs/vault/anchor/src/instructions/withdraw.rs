use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};

use crate::constants::VAULT_SEED;
use crate::events::VaultWithdrawn;
use crate::state::{check_withdraw, VaultStatus};

pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
    let lamports = check_withdraw(VaultStatus::from_lamports(ctx.accounts.vault.lamports()))?;

    let signer_key = ctx.accounts.signer.key();
    let bump = [ctx.bumps.vault];
    let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, signer_key.as_ref(), &bump]];

    // Draining to zero lamports closes the vault at the end of the transaction.
    transfer(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault.to_account_info(),
                to: ctx.accounts.signer.to_account_info(),
            },
            signer_seeds,
        ),
        lamports,
    )?;

    msg!("Withdrew {} lamports from vault {}", lamports, ctx.accounts.vault.key());
    emit!(VaultWithdrawn {
        depositor: signer_key,
        vault: ctx.accounts.vault.key(),
        amount: lamports,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    /// Only the PDA re-derived from this signer is accepted, so nobody else
    /// can drain it.
    #[account(
        mut,
        seeds = [VAULT_SEED, signer.key().as_ref()],
        bump
    )]
    pub vault: SystemAccount<'info>,

    pub system_program: Program<'info, System>,
}
