/// Seed prefix of every vault PDA: `[VAULT_SEED, depositor]`.
pub const VAULT_SEED: &[u8] = b"vault";

/// Vaults are plain system accounts and never carry data.
pub const VAULT_DATA_LEN: usize = 0;
