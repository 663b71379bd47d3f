mod common;

use async_trait::async_trait;
use common::ledger_fixture;
use pocketbank::application::history::{PageRequest, SortField, SortOrder, SortSpec};
use pocketbank::application::ledger::Ledger;
use pocketbank::domain::account::{Account, AccountNumber, OwnerId};
use pocketbank::domain::ports::{LedgerStore, PostedEntry};
use pocketbank::domain::transaction::{EntryDraft, TransactionKind};
use pocketbank::error::{LedgerError, Result};
use pocketbank::infrastructure::in_memory::{InMemoryLedgerStore, InMemoryUserDirectory};
use pocketbank::vault::SecretHash;
use std::sync::Arc;

#[tokio::test]
async fn test_deposit_withdraw_transfer_scenario() {
    let (ledger, _, directory) = ledger_fixture();
    directory
        .register(OwnerId::from("alice"), "Alice Doe")
        .await;
    directory.register(OwnerId::from("bob"), "Bob Roe").await;

    let alice = ledger
        .create_account(OwnerId::from("alice"), "123456")
        .await
        .unwrap();
    let bob = ledger
        .create_account(OwnerId::from("bob"), "222333")
        .await
        .unwrap();

    assert_eq!(ledger.deposit(alice, 100, "123456").await.unwrap(), 100);
    assert_eq!(ledger.withdraw(alice, 30, "123456").await.unwrap(), 70);
    assert_eq!(
        ledger.transfer(alice, bob, 50, "123456").await.unwrap(),
        20
    );

    // Conservation across both accounts.
    let alice_info = ledger.account_info(alice).await.unwrap();
    let bob_info = ledger.account_info(bob).await.unwrap();
    assert_eq!(alice_info.balance, 20);
    assert_eq!(bob_info.balance, 50);

    let oldest_first = SortSpec {
        field: SortField::Timestamp,
        order: SortOrder::Asc,
    };
    let alice_page = ledger
        .query_history(alice, None, Some(oldest_first), PageRequest::default())
        .await
        .unwrap();
    let kinds: Vec<TransactionKind> = alice_page.data.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Deposit,
            TransactionKind::Withdraw,
            TransactionKind::TransferOut
        ]
    );
    assert_eq!(alice_page.data[2].counterpart_name.as_deref(), Some("Bob Roe"));

    let bob_page = ledger
        .query_history(bob, None, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(bob_page.count, 1);
    assert_eq!(bob_page.data[0].kind, TransactionKind::TransferIn);
    assert_eq!(bob_page.data[0].amount, 50);
    assert_eq!(bob_page.data[0].counterpart_name.as_deref(), Some("Alice Doe"));
}

#[tokio::test]
async fn test_failed_operations_leave_no_trace() {
    let (ledger, _, _) = ledger_fixture();
    let alice = ledger
        .create_account(OwnerId::from("alice"), "123456")
        .await
        .unwrap();
    let bob = ledger
        .create_account(OwnerId::from("bob"), "222333")
        .await
        .unwrap();
    ledger.deposit(alice, 40, "123456").await.unwrap();

    // Overdrawing withdraw.
    assert!(matches!(
        ledger.withdraw(alice, 100, "123456").await,
        Err(LedgerError::InsufficientBalance { .. })
    ));
    // Overdrawing transfer.
    assert!(matches!(
        ledger.transfer(alice, bob, 100, "123456").await,
        Err(LedgerError::InsufficientBalance { .. })
    ));
    // Wrong PIN on a transfer.
    assert!(matches!(
        ledger.transfer(alice, bob, 10, "999999").await,
        Err(LedgerError::InvalidPin)
    ));

    let alice_page = ledger
        .query_history(alice, None, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(alice_page.count, 1);
    assert_eq!(ledger.account_info(alice).await.unwrap().balance, 40);

    let bob_history = ledger
        .query_history(bob, None, None, PageRequest::default())
        .await;
    assert!(matches!(bob_history, Err(LedgerError::EmptyPage { .. })));
}

/// Decorator that forwards everything to a real store but refuses to apply
/// `Transfer In` entries, simulating a write fault on the credit leg.
struct CreditFaultStore {
    inner: InMemoryLedgerStore,
}

#[async_trait]
impl LedgerStore for CreditFaultStore {
    async fn find_by_account_number(&self, number: AccountNumber) -> Result<Option<Account>> {
        self.inner.find_by_account_number(number).await
    }

    async fn find_by_owner(&self, owner: &OwnerId) -> Result<Option<Account>> {
        self.inner.find_by_owner(owner).await
    }

    async fn insert(&self, account: Account) -> Result<()> {
        self.inner.insert(account).await
    }

    async fn apply_entry(
        &self,
        number: AccountNumber,
        delta: i64,
        draft: EntryDraft,
    ) -> Result<PostedEntry> {
        if draft.kind == TransactionKind::TransferIn {
            return Err(LedgerError::StorageFailure("simulated write fault".into()));
        }
        self.inner.apply_entry(number, delta, draft).await
    }

    async fn revert_entry(&self, number: AccountNumber, delta: i64, entry_id: u64) -> Result<()> {
        self.inner.revert_entry(number, delta, entry_id).await
    }

    async fn set_pin_hash(&self, number: AccountNumber, pin_hash: SecretHash) -> Result<()> {
        self.inner.set_pin_hash(number, pin_hash).await
    }

    async fn remove(&self, number: AccountNumber) -> Result<()> {
        self.inner.remove(number).await
    }
}

#[tokio::test]
async fn test_transfer_compensates_when_the_credit_leg_fails() {
    let backing = InMemoryLedgerStore::new();
    let ledger = Ledger::new(
        Arc::new(CreditFaultStore {
            inner: backing.clone(),
        }),
        Arc::new(InMemoryUserDirectory::new()),
    );

    let alice = ledger
        .create_account(OwnerId::from("alice"), "123456")
        .await
        .unwrap();
    let bob = ledger
        .create_account(OwnerId::from("bob"), "222333")
        .await
        .unwrap();
    ledger.deposit(alice, 100, "123456").await.unwrap();

    let result = ledger.transfer(alice, bob, 60, "123456").await;
    assert!(matches!(result, Err(LedgerError::StorageFailure(_))));

    // The debit was compensated: both accounts look exactly as before.
    let alice_account = backing
        .find_by_account_number(alice)
        .await
        .unwrap()
        .unwrap();
    let bob_account = backing.find_by_account_number(bob).await.unwrap().unwrap();
    assert_eq!(alice_account.balance, 100);
    assert_eq!(alice_account.history.len(), 1);
    assert_eq!(alice_account.history[0].kind, TransactionKind::Deposit);
    assert_eq!(bob_account.balance, 0);
    assert!(bob_account.history.is_empty());

    // The dropped entry's id is not handed out again.
    ledger.deposit(alice, 10, "123456").await.unwrap();
    let alice_account = backing
        .find_by_account_number(alice)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alice_account.history.len(), 2);
    assert_eq!(alice_account.history[1].id, 3);
}
