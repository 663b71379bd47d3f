use crate::domain::account::{Account, AccountNumber, OwnerId};
use crate::domain::transaction::{EntryDraft, TransactionRecord};
use crate::error::Result;
use crate::vault::SecretHash;
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of an atomically applied entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedEntry {
    pub record: TransactionRecord,
    /// Account balance after the entry.
    pub balance: u64,
}

/// Persistence port for accounts and their histories.
///
/// Every mutating method is one atomic read-modify-write on the addressed
/// account; callers never compute a new balance outside the store. Balance
/// invariants (non-negativity, overflow) are enforced inside that atomic
/// section, so a failed mutation changes nothing.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn find_by_account_number(&self, number: AccountNumber) -> Result<Option<Account>>;

    async fn find_by_owner(&self, owner: &OwnerId) -> Result<Option<Account>>;

    /// Inserts a brand-new account. `DuplicateKey` when the account number
    /// or the owner is already present.
    async fn insert(&self, account: Account) -> Result<()>;

    /// Applies `delta` to the balance and appends the drafted entry as one
    /// unit, assigning the entry's id and timestamp.
    async fn apply_entry(
        &self,
        number: AccountNumber,
        delta: i64,
        draft: EntryDraft,
    ) -> Result<PostedEntry>;

    /// Compensation hook: applies `delta` (callers pass the inverse of the
    /// entry's original delta) and removes the identified entry.
    async fn revert_entry(&self, number: AccountNumber, delta: i64, entry_id: u64) -> Result<()>;

    async fn set_pin_hash(&self, number: AccountNumber, pin_hash: SecretHash) -> Result<()>;

    /// Removes the account together with its entire history.
    async fn remove(&self, number: AccountNumber) -> Result<()>;
}

/// Lookup into the upstream user-profile system, used to put a human name
/// on the two legs of a transfer.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn display_name(&self, owner: &OwnerId) -> Result<Option<String>>;
}

pub type LedgerStoreRef = Arc<dyn LedgerStore>;
pub type UserDirectoryRef = Arc<dyn UserDirectory>;
