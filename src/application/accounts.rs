use crate::domain::account::{Account, AccountNumber, OwnerId};
use crate::domain::ports::LedgerStoreRef;
use crate::error::{LedgerError, Result};
use crate::vault::PinVault;
use rand::rngs::OsRng;

/// How many candidate numbers creation draws before giving up. With seven
/// random digits the space is ten million numbers, so hitting this limit
/// means the store is effectively full or misbehaving.
const MAX_GENERATION_ATTEMPTS: usize = 16;

/// Account lifecycle: creation with number allocation, PIN verification and
/// change, lookup, deletion.
pub struct AccountService {
    store: LedgerStoreRef,
    vault: PinVault,
}

impl AccountService {
    pub fn new(store: LedgerStoreRef) -> Self {
        Self {
            store,
            vault: PinVault::new(),
        }
    }

    /// Opens an account for `owner`, protected by `pin`.
    ///
    /// The PIN is shape-checked and hashed before anything touches the
    /// store. Number allocation draws a candidate, checks it against the
    /// store, and lets the store's unique constraint arbitrate races: an
    /// insert that loses re-checks whether the owner won a concurrent
    /// create (then `DuplicateAccount`) or merely lost the number (then a
    /// fresh draw).
    pub async fn create_account(&self, owner: OwnerId, pin: &str) -> Result<Account> {
        let pin_hash = self.vault.hash(pin)?;
        if self.store.find_by_owner(&owner).await?.is_some() {
            return Err(LedgerError::DuplicateAccount(owner));
        }

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let number = AccountNumber::generate(&mut OsRng);
            if self.store.find_by_account_number(number).await?.is_some() {
                continue;
            }
            let account = Account::new(number, owner.clone(), pin_hash.clone());
            match self.store.insert(account.clone()).await {
                Ok(()) => {
                    tracing::info!(account = %number, owner = %owner, "account created");
                    return Ok(account);
                }
                Err(LedgerError::DuplicateKey) => {
                    if self.store.find_by_owner(&owner).await?.is_some() {
                        return Err(LedgerError::DuplicateAccount(owner));
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(LedgerError::ExhaustedRetries)
    }

    pub async fn account(&self, number: AccountNumber) -> Result<Account> {
        self.store
            .find_by_account_number(number)
            .await?
            .ok_or(LedgerError::AccountNotFound(number))
    }

    pub async fn account_by_owner(&self, owner: &OwnerId) -> Result<Account> {
        self.store
            .find_by_owner(owner)
            .await?
            .ok_or_else(|| LedgerError::NoAccountForOwner(owner.clone()))
    }

    /// Whether `pin` unlocks the account. `AccountNotFound` still surfaces
    /// as an error; a wrong PIN is a plain `false`.
    pub async fn verify_pin(&self, number: AccountNumber, pin: &str) -> Result<bool> {
        let account = self.account(number).await?;
        Ok(self.vault.verify(pin, &account.pin_hash))
    }

    /// Replaces the PIN. The old PIN must verify first; the new one must be
    /// well formed. The swap itself is a single store operation.
    pub async fn change_pin(
        &self,
        number: AccountNumber,
        old_pin: &str,
        new_pin: &str,
    ) -> Result<()> {
        let account = self.account(number).await?;
        if !self.vault.verify(old_pin, &account.pin_hash) {
            return Err(LedgerError::InvalidPin);
        }
        let new_hash = self.vault.hash(new_pin)?;
        self.store.set_pin_hash(number, new_hash).await?;
        tracing::info!(account = %number, "pin changed");
        Ok(())
    }

    /// Removes the account and its whole history. Irreversible.
    pub async fn delete_account(&self, number: AccountNumber) -> Result<()> {
        self.store.remove(number).await?;
        tracing::info!(account = %number, "account deleted");
        Ok(())
    }
}
