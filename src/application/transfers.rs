use crate::domain::account::{Account, AccountNumber, Amount};
use crate::domain::ports::{LedgerStoreRef, PostedEntry, UserDirectoryRef};
use crate::domain::transaction::EntryDraft;
use crate::error::{LedgerError, Result};

/// Receipt for a committed transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub sender: AccountNumber,
    pub recipient: AccountNumber,
    pub amount: u64,
    pub sender_balance: u64,
    pub recipient_balance: u64,
}

/// Balance mutations: deposits, withdrawals, and two-leg transfers.
///
/// Single-account operations are one atomic store call each. A transfer is
/// a two-phase unit of work: debit the sender, credit the recipient, and
/// compensate the debit if the credit cannot be applied, so callers never
/// observe a half-applied transfer. No lock is held across the two legs.
pub struct TransferEngine {
    store: LedgerStoreRef,
    directory: UserDirectoryRef,
}

impl TransferEngine {
    pub fn new(store: LedgerStoreRef, directory: UserDirectoryRef) -> Self {
        Self { store, directory }
    }

    pub async fn deposit(&self, number: AccountNumber, amount: Amount) -> Result<PostedEntry> {
        let posted = self
            .store
            .apply_entry(number, amount.as_delta(), EntryDraft::deposit(amount.get()))
            .await?;
        tracing::info!(
            account = %number,
            amount = amount.get(),
            balance = posted.balance,
            "deposit committed"
        );
        Ok(posted)
    }

    pub async fn withdraw(&self, number: AccountNumber, amount: Amount) -> Result<PostedEntry> {
        let posted = self
            .store
            .apply_entry(number, -amount.as_delta(), EntryDraft::withdraw(amount.get()))
            .await?;
        tracing::info!(
            account = %number,
            amount = amount.get(),
            balance = posted.balance,
            "withdrawal committed"
        );
        Ok(posted)
    }

    /// Moves `amount` from `sender` to `recipient`.
    ///
    /// Both parties and their display names are resolved before the first
    /// leg, so a dangling recipient or a directory failure aborts with
    /// nothing written. If the credit leg fails after the debit committed,
    /// the debit is reverted; a failing revert is the one situation that
    /// leaves the ledger needing attention, and its storage error is what
    /// the caller sees.
    pub async fn transfer(
        &self,
        sender: AccountNumber,
        recipient: AccountNumber,
        amount: Amount,
    ) -> Result<TransferReceipt> {
        let sender_account = self
            .store
            .find_by_account_number(sender)
            .await?
            .ok_or(LedgerError::AccountNotFound(sender))?;
        let recipient_account = self
            .store
            .find_by_account_number(recipient)
            .await?
            .ok_or(LedgerError::AccountNotFound(recipient))?;

        let sender_name = self.party_name(&sender_account).await?;
        let recipient_name = self.party_name(&recipient_account).await?;

        let debit = self
            .store
            .apply_entry(
                sender,
                -amount.as_delta(),
                EntryDraft::transfer_out(amount.get(), recipient_name),
            )
            .await?;

        let credit = match self
            .store
            .apply_entry(
                recipient,
                amount.as_delta(),
                EntryDraft::transfer_in(amount.get(), sender_name),
            )
            .await
        {
            Ok(credit) => credit,
            Err(credit_err) => {
                tracing::warn!(
                    sender = %sender,
                    recipient = %recipient,
                    amount = amount.get(),
                    error = %credit_err,
                    "credit leg failed, compensating the debit"
                );
                if let Err(revert_err) = self
                    .store
                    .revert_entry(sender, amount.as_delta(), debit.record.id)
                    .await
                {
                    tracing::error!(
                        sender = %sender,
                        entry = debit.record.id,
                        error = %revert_err,
                        "compensation failed, ledger needs attention"
                    );
                    return Err(revert_err);
                }
                return Err(credit_err);
            }
        };

        // A self-transfer nets to zero; the post-credit balance is the one
        // that holds.
        let sender_balance = if sender == recipient {
            credit.balance
        } else {
            debit.balance
        };

        tracing::info!(
            sender = %sender,
            recipient = %recipient,
            amount = amount.get(),
            "transfer committed"
        );
        Ok(TransferReceipt {
            sender,
            recipient,
            amount: amount.get(),
            sender_balance,
            recipient_balance: credit.balance,
        })
    }

    async fn party_name(&self, account: &Account) -> Result<String> {
        let name = self.directory.display_name(&account.owner_id).await?;
        Ok(name.unwrap_or_else(|| account.account_number.to_string()))
    }
}
