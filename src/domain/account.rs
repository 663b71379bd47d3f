use crate::domain::transaction::{EntryDraft, TransactionRecord};
use crate::error::{LedgerError, Result};
use crate::vault::SecretHash;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A ten-digit account number carrying the fixed branch prefix 901.
///
/// Assigned once at account creation and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountNumber(u64);

impl AccountNumber {
    /// Smallest and largest valid values, "9010000000" through "9019999999".
    const FLOOR: u64 = 9_010_000_000;
    const CEIL: u64 = 9_019_999_999;

    pub fn new(value: u64) -> Result<Self> {
        if (Self::FLOOR..=Self::CEIL).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LedgerError::ValidationError(format!(
                "{value} is not a valid account number"
            )))
        }
    }

    /// Draws a random candidate number: the 901 prefix followed by seven
    /// uniform decimal digits. Uniqueness is the caller's concern.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self(Self::FLOOR + rng.gen_range(0..=Self::CEIL - Self::FLOOR))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountNumber {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.parse::<u64>().map_err(|_| {
            LedgerError::ValidationError(format!("{s:?} is not a valid account number"))
        })?;
        Self::new(value)
    }
}

/// Opaque reference to the owning user in the upstream identity system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A positive transaction amount in minor currency units.
///
/// Capped at `i64::MAX` so the signed balance delta of any entry is always
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Result<Self> {
        if value == 0 {
            return Err(LedgerError::ValidationError(
                "amount must be positive".to_string(),
            ));
        }
        if value > i64::MAX as u64 {
            return Err(LedgerError::ValidationError(
                "amount exceeds the representable range".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// The amount as a signed balance delta. Safe by construction.
    pub fn as_delta(&self) -> i64 {
        self.0 as i64
    }
}

impl TryFrom<u64> for Amount {
    type Error = LedgerError;

    fn try_from(value: u64) -> Result<Self> {
        Self::new(value)
    }
}

/// A customer account: PIN-protected balance plus its append-only history.
///
/// The balance is unsigned, so non-negativity holds by construction; all
/// mutation goes through [`Account::post`] and [`Account::unpost`], which
/// keep balance and history in step.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub account_number: AccountNumber,
    pub owner_id: OwnerId,
    pub pin_hash: SecretHash,
    /// Balance in minor currency units.
    pub balance: u64,
    /// Committed entries in append order.
    pub history: Vec<TransactionRecord>,
    /// Next record id to assign. Monotonic, never reused, so an id stays
    /// meaningful even after a reverted entry is dropped.
    pub next_entry_id: u64,
}

impl Account {
    pub fn new(account_number: AccountNumber, owner_id: OwnerId, pin_hash: SecretHash) -> Self {
        Self {
            account_number,
            owner_id,
            pin_hash,
            balance: 0,
            history: Vec::new(),
            next_entry_id: 1,
        }
    }

    /// Applies a balance delta and appends the matching entry, as one unit.
    ///
    /// Fails without side effects when the delta would drive the balance
    /// negative or overflow it.
    pub fn post(&mut self, delta: i64, draft: EntryDraft) -> Result<TransactionRecord> {
        self.balance = self.balance_after(delta)?;
        let record = draft.into_record(self.next_entry_id, Utc::now());
        self.next_entry_id += 1;
        self.history.push(record.clone());
        Ok(record)
    }

    /// Reverses a previously posted entry: applies the inverse delta and
    /// removes the record. Only the transfer compensation path uses this.
    pub fn unpost(&mut self, delta: i64, entry_id: u64) -> Result<()> {
        let position = self
            .history
            .iter()
            .position(|record| record.id == entry_id)
            .ok_or_else(|| {
                LedgerError::ValidationError(format!("history entry {entry_id} not found"))
            })?;
        self.balance = self.balance_after(delta)?;
        self.history.remove(position);
        Ok(())
    }

    fn balance_after(&self, delta: i64) -> Result<u64> {
        if delta >= 0 {
            let credit = delta as u64;
            self.balance
                .checked_add(credit)
                .ok_or(LedgerError::BalanceOverflow {
                    current: self.balance,
                    credit,
                })
        } else {
            let debit = delta.unsigned_abs();
            self.balance
                .checked_sub(debit)
                .ok_or(LedgerError::InsufficientBalance {
                    available: self.balance,
                    requested: debit,
                })
        }
    }
}

/// The account projection handed to callers: no PIN hash, no history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountInfo {
    pub account_number: AccountNumber,
    pub balance: u64,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            account_number: account.account_number,
            balance: account.balance,
        }
    }
}
