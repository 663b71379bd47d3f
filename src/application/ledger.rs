use crate::application::accounts::AccountService;
use crate::application::history::{
    HistoryFilter, HistoryPage, PageRequest, SortSpec, query_history,
};
use crate::application::transfers::TransferEngine;
use crate::domain::account::{AccountInfo, AccountNumber, Amount, OwnerId};
use crate::domain::ports::{LedgerStoreRef, UserDirectoryRef};
use crate::error::{LedgerError, Result};

/// The exposed surface of the ledger, wiring account lifecycle, balance
/// mutations, and history queries over one shared store.
///
/// Deposit, withdraw, and transfer require the account's PIN (the sender's
/// for a transfer); changing the PIN proves knowledge of the old one.
/// Reads and deletion rely on the caller's outer authentication. Raw
/// amounts are validated here, so everything past this boundary works with
/// typed values.
pub struct Ledger {
    accounts: AccountService,
    transfers: TransferEngine,
}

impl Ledger {
    pub fn new(store: LedgerStoreRef, directory: UserDirectoryRef) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            transfers: TransferEngine::new(store, directory),
        }
    }

    /// Opens an account and returns its freshly assigned number.
    pub async fn create_account(&self, owner: OwnerId, pin: &str) -> Result<AccountNumber> {
        let account = self.accounts.create_account(owner, pin).await?;
        Ok(account.account_number)
    }

    /// Deposits `amount` and returns the new balance.
    pub async fn deposit(&self, number: AccountNumber, amount: u64, pin: &str) -> Result<u64> {
        self.authorize(number, pin).await?;
        let amount = Amount::new(amount)?;
        let posted = self.transfers.deposit(number, amount).await?;
        Ok(posted.balance)
    }

    /// Withdraws `amount` and returns the new balance.
    pub async fn withdraw(&self, number: AccountNumber, amount: u64, pin: &str) -> Result<u64> {
        self.authorize(number, pin).await?;
        let amount = Amount::new(amount)?;
        let posted = self.transfers.withdraw(number, amount).await?;
        Ok(posted.balance)
    }

    /// Transfers `amount` to `recipient` and returns the sender's new
    /// balance.
    pub async fn transfer(
        &self,
        sender: AccountNumber,
        recipient: AccountNumber,
        amount: u64,
        pin: &str,
    ) -> Result<u64> {
        self.authorize(sender, pin).await?;
        let amount = Amount::new(amount)?;
        let receipt = self.transfers.transfer(sender, recipient, amount).await?;
        Ok(receipt.sender_balance)
    }

    pub async fn change_pin(
        &self,
        number: AccountNumber,
        old_pin: &str,
        new_pin: &str,
    ) -> Result<AccountNumber> {
        self.accounts.change_pin(number, old_pin, new_pin).await?;
        Ok(number)
    }

    pub async fn account_info(&self, number: AccountNumber) -> Result<AccountInfo> {
        let account = self.accounts.account(number).await?;
        Ok(AccountInfo::from(&account))
    }

    /// Runs the query pipeline over a snapshot of the account's history.
    /// The snapshot is read committed; a concurrent mutation lands in the
    /// next query, not this one.
    pub async fn query_history(
        &self,
        number: AccountNumber,
        filter: Option<&HistoryFilter>,
        sort: Option<SortSpec>,
        page: PageRequest,
    ) -> Result<HistoryPage> {
        let account = self.accounts.account(number).await?;
        query_history(account.history, filter, sort, page)
    }

    /// Closes the account, dropping its history. Returns the closed number.
    pub async fn delete_account(&self, number: AccountNumber) -> Result<AccountNumber> {
        self.accounts.delete_account(number).await?;
        Ok(number)
    }

    async fn authorize(&self, number: AccountNumber, pin: &str) -> Result<()> {
        if self.accounts.verify_pin(number, pin).await? {
            Ok(())
        } else {
            Err(LedgerError::InvalidPin)
        }
    }
}
