#![cfg_attr(not(test), no_std)]

#[cfg(all(target_os = "solana", not(feature = "no-entrypoint")))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

use pinocchio::{entrypoint, AccountView, Address, ProgramResult};
use solana_program_error::ProgramError;

pub mod errors;
pub mod instructions;

pub use instructions::*;

/// Same id as the Anchor build, so both derive identical vault PDAs.
pub const ID: Address = Address::new_from_array([
    0x7E, 0xB6, 0x9B, 0x51, 0x80, 0x48, 0x1A, 0xFA,
    0x3A, 0x0C, 0x47, 0xFD, 0x3F, 0x04, 0x0F, 0x8E,
    0x95, 0x38, 0xF1, 0xBE, 0x57, 0xFB, 0xC8, 0xB0,
    0x4B, 0xEE, 0x22, 0x0C, 0x86, 0x5E, 0x37, 0xD9,
]);

pub const VAULT_SEED: &[u8] = b"vault";

#[cfg(not(feature = "no-entrypoint"))]
entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Address,
    accounts: &[AccountView],
    instruction_data: &[u8],
) -> ProgramResult {
    if program_id != &ID {
        return Err(ProgramError::IncorrectProgramId);
    }

    match instruction_data.split_first() {
        Some((Deposit::DISCRIMINATOR, data)) => Deposit::try_from((data, accounts))?.process(),
        Some((Withdraw::DISCRIMINATOR, _)) => Withdraw::try_from(accounts)?.process(),
        _ => Err(ProgramError::InvalidInstructionData),
    }
}
