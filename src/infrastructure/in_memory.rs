use crate::domain::account::{Account, AccountNumber, OwnerId};
use crate::domain::ports::{LedgerStore, PostedEntry, UserDirectory};
use crate::domain::transaction::EntryDraft;
use crate::error::{LedgerError, Result};
use crate::vault::SecretHash;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreInner {
    accounts: HashMap<AccountNumber, Account>,
    /// Owner index, kept in step with `accounts` under the same lock.
    owners: HashMap<OwnerId, AccountNumber>,
}

/// A thread-safe in-memory ledger store.
///
/// Both tables live under a single `RwLock`, and every mutating port method
/// runs inside one write-lock section. That realizes the port's per-record
/// atomic read-modify-write: the balance check, the delta, and the history
/// append are indivisible from any other caller's point of view.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn find_by_account_number(&self, number: AccountNumber) -> Result<Option<Account>> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.get(&number).cloned())
    }

    async fn find_by_owner(&self, owner: &OwnerId) -> Result<Option<Account>> {
        let inner = self.inner.read().await;
        let number = match inner.owners.get(owner) {
            Some(number) => *number,
            None => return Ok(None),
        };
        Ok(inner.accounts.get(&number).cloned())
    }

    async fn insert(&self, account: Account) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.accounts.contains_key(&account.account_number)
            || inner.owners.contains_key(&account.owner_id)
        {
            return Err(LedgerError::DuplicateKey);
        }
        inner
            .owners
            .insert(account.owner_id.clone(), account.account_number);
        inner.accounts.insert(account.account_number, account);
        Ok(())
    }

    async fn apply_entry(
        &self,
        number: AccountNumber,
        delta: i64,
        draft: EntryDraft,
    ) -> Result<PostedEntry> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&number)
            .ok_or(LedgerError::AccountNotFound(number))?;
        let record = account.post(delta, draft)?;
        Ok(PostedEntry {
            record,
            balance: account.balance,
        })
    }

    async fn revert_entry(&self, number: AccountNumber, delta: i64, entry_id: u64) -> Result<()> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&number)
            .ok_or(LedgerError::AccountNotFound(number))?;
        account.unpost(delta, entry_id)
    }

    async fn set_pin_hash(&self, number: AccountNumber, pin_hash: SecretHash) -> Result<()> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&number)
            .ok_or(LedgerError::AccountNotFound(number))?;
        account.pin_hash = pin_hash;
        Ok(())
    }

    async fn remove(&self, number: AccountNumber) -> Result<()> {
        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .remove(&number)
            .ok_or(LedgerError::AccountNotFound(number))?;
        inner.owners.remove(&account.owner_id);
        Ok(())
    }
}

/// In-memory stand-in for the upstream user-profile directory.
#[derive(Default, Clone)]
pub struct InMemoryUserDirectory {
    names: Arc<RwLock<HashMap<OwnerId, String>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the display name for an owner.
    pub async fn register(&self, owner: OwnerId, name: impl Into<String>) {
        let mut names = self.names.write().await;
        names.insert(owner, name.into());
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn display_name(&self, owner: &OwnerId) -> Result<Option<String>> {
        let names = self.names.read().await;
        Ok(names.get(owner).cloned())
    }
}
