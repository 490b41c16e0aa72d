//! Runs the compiled program inside LiteSVM.
//!
//! Build it first with `cargo build-sbf` so that
//! `target/deploy/pinocchio_vault.so` exists; without it these tests skip.

use std::path::PathBuf;

use litesvm::LiteSVM;
use pinocchio_vault::errors::VaultError;
use solana_instruction::{error::InstructionError, AccountMeta, Instruction};
use solana_keypair::Keypair;
use solana_message::Message;
use solana_pubkey::Pubkey;
use solana_signer::Signer;
use solana_transaction::Transaction;
use solana_transaction_error::TransactionError;

const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
const LAMPORTS_PER_SIGNATURE: u64 = 5_000;
// 11111111111111111111111111111111
const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0; 32]);

fn get_program_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/deploy/pinocchio_vault.so")
}

/// Converts between the program's `Address` and the one LiteSVM uses.
fn from_address(address: &pinocchio::Address) -> Pubkey {
    Pubkey::new_from_array(address.as_ref().try_into().unwrap())
}

fn to_address(key: &Pubkey) -> pinocchio::Address {
    pinocchio::Address::new_from_array(key.to_bytes())
}

fn program_id() -> Pubkey {
    from_address(&pinocchio_vault::ID)
}

fn vault_of(depositor: &Pubkey) -> Pubkey {
    let (vault, _) = pinocchio_vault::instructions::find_vault_address(&to_address(depositor));
    from_address(&vault)
}

fn deposit_data(amount: u64) -> Vec<u8> {
    let mut data = vec![*pinocchio_vault::instructions::Deposit::DISCRIMINATOR];
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

fn withdraw_data() -> Vec<u8> {
    vec![*pinocchio_vault::instructions::Withdraw::DISCRIMINATOR]
}

fn code(error: VaultError) -> TransactionError {
    TransactionError::InstructionError(0, InstructionError::Custom(error as u32))
}

struct Env {
    svm: LiteSVM,
    rent_min: u64,
}

impl Env {
    fn start() -> Option<Self> {
        let program_path = get_program_binary_path();
        if !program_path.exists() {
            eprintln!(
                "skipping: {} not found, run `cargo build-sbf` first",
                program_path.display()
            );
            return None;
        }

        let mut svm = LiteSVM::new();
        svm.add_program_from_file(program_id(), program_path).unwrap();
        let rent_min = svm.minimum_balance_for_rent_exemption(0);
        Some(Self { svm, rent_min })
    }

    fn funded_user(&mut self) -> Keypair {
        let user = Keypair::new();
        self.svm
            .airdrop(&user.pubkey(), 10 * LAMPORTS_PER_SOL)
            .unwrap();
        user
    }

    fn balance(&self, key: &Pubkey) -> u64 {
        self.svm.get_balance(key).unwrap_or(0)
    }

    fn send(&mut self, user: &Keypair, vault: Pubkey, data: Vec<u8>) -> Result<(), TransactionError> {
        let ix = Instruction {
            program_id: program_id(),
            accounts: vec![
                AccountMeta::new(user.pubkey(), true),
                AccountMeta::new(vault, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
            data,
        };
        let blockhash = self.svm.latest_blockhash();
        let tx = Transaction::new(&[user], Message::new(&[ix], Some(&user.pubkey())), blockhash);
        let result = self.svm.send_transaction(tx).map(|_| ()).map_err(|failed| failed.err);
        // Identical retries must not be deduplicated as already processed.
        self.svm.expire_blockhash();
        result
    }

    fn deposit(&mut self, user: &Keypair, amount: u64) -> Result<(), TransactionError> {
        let vault = vault_of(&user.pubkey());
        self.send(user, vault, deposit_data(amount))
    }

    fn withdraw(&mut self, user: &Keypair) -> Result<(), TransactionError> {
        let vault = vault_of(&user.pubkey());
        self.send(user, vault, withdraw_data())
    }
}

#[test]
fn deposit_withdraw_lifecycle_on_chain() {
    let Some(mut env) = Env::start() else { return };
    let user = env.funded_user();
    let vault = vault_of(&user.pubkey());
    let rent_min = env.rent_min;

    // 1) deposit succeeds when amount > rent minimum
    let amount = rent_min + 500_000;
    env.deposit(&user, amount).unwrap();
    assert_eq!(env.balance(&vault), amount);

    // 2) second deposit fails with VaultAlreadyExists (6000)
    let err = env.deposit(&user, rent_min + 1).unwrap_err();
    assert_eq!(err, code(VaultError::VaultAlreadyExists));
    assert_eq!(env.balance(&vault), amount);

    // 3) withdraw returns the full balance minus the fee
    let before = env.balance(&user.pubkey());
    env.withdraw(&user).unwrap();
    assert_eq!(env.balance(&vault), 0);
    assert_eq!(
        env.balance(&user.pubkey()),
        before + amount - LAMPORTS_PER_SIGNATURE
    );

    // 4) deposit of exactly the rent minimum fails with InvalidAmount (6001)
    let err = env.deposit(&user, rent_min).unwrap_err();
    assert_eq!(err, code(VaultError::InvalidAmount));
    assert_eq!(env.balance(&vault), 0);
}

#[test]
fn withdraw_without_vault_fails_with_not_found() {
    let Some(mut env) = Env::start() else { return };
    let user = env.funded_user();

    let err = env.withdraw(&user).unwrap_err();

    assert_eq!(err, code(VaultError::VaultNotFound));
}

#[test]
fn closed_vault_can_be_funded_again() {
    let Some(mut env) = Env::start() else { return };
    let user = env.funded_user();
    let vault = vault_of(&user.pubkey());
    let rent_min = env.rent_min;

    env.deposit(&user, rent_min + 1).unwrap();
    env.withdraw(&user).unwrap();
    env.deposit(&user, rent_min + 2).unwrap();

    assert_eq!(env.balance(&vault), rent_min + 2);
}

#[test]
fn foreign_vault_is_rejected_with_invalid_seeds() {
    let Some(mut env) = Env::start() else { return };
    let alice = env.funded_user();
    let mallory = env.funded_user();
    let alice_vault = vault_of(&alice.pubkey());
    let amount = env.rent_min + 500_000;
    env.deposit(&alice, amount).unwrap();

    let err = env.send(&mallory, alice_vault, withdraw_data()).unwrap_err();

    assert_eq!(
        err,
        TransactionError::InstructionError(0, InstructionError::InvalidSeeds)
    );
    assert_eq!(env.balance(&alice_vault), amount);
}

#[test]
fn unknown_discriminator_is_rejected() {
    let Some(mut env) = Env::start() else { return };
    let user = env.funded_user();
    let vault = vault_of(&user.pubkey());

    let err = env.send(&user, vault, vec![2]).unwrap_err();

    assert_eq!(
        err,
        TransactionError::InstructionError(0, InstructionError::InvalidInstructionData)
    );
}
