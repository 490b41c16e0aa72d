use solana_program_error::ProgramError;

/// Same codes the Anchor build reports, so clients handle either program
/// identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum VaultError {
    VaultAlreadyExists = 6000,
    InvalidAmount = 6001,
    VaultNotFound = 6002,
}

impl From<VaultError> for ProgramError {
    fn from(err: VaultError) -> Self {
        ProgramError::Custom(err as u32)
    }
}
