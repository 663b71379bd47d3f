use crate::domain::account::{AccountNumber, OwnerId};
use thiserror::Error;

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;

/// Errors surfaced by the ledger.
///
/// Business failures are terminal: the engine never retries them internally,
/// and an operation that fails leaves balances and histories untouched.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("account {0} not found")]
    AccountNotFound(AccountNumber),
    #[error("no account for owner {0}")]
    NoAccountForOwner(OwnerId),
    #[error("owner {0} already has an account")]
    DuplicateAccount(OwnerId),
    #[error("pin verification failed")]
    InvalidPin,
    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: u64, requested: u64 },
    #[error("balance overflow: current {current}, credit {credit}")]
    BalanceOverflow { current: u64, credit: u64 },
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("page {page_number} is out of range: {total_pages} page(s) available")]
    EmptyPage {
        page_number: usize,
        total_pages: usize,
    },
    /// Unique-constraint conflict reported by a store on insert.
    #[error("account number or owner already present in the store")]
    DuplicateKey,
    /// Account number generation kept colliding with existing accounts.
    #[error("could not allocate a fresh account number")]
    ExhaustedRetries,
    #[error("storage failure: {0}")]
    StorageFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
