use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four kinds of history entry.
///
/// Serialized with the statement wording (`"Transfer Out"`, `"Transfer In"`)
/// rather than identifier casing, since stored histories double as the
/// customer-facing statement.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    #[serde(rename = "Transfer Out")]
    TransferOut,
    #[serde(rename = "Transfer In")]
    TransferIn,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Deposit => "Deposit",
            Self::Withdraw => "Withdraw",
            Self::TransferOut => "Transfer Out",
            Self::TransferIn => "Transfer In",
        };
        f.write_str(label)
    }
}

/// One committed entry in an account's history.
///
/// `id` is unique within the account and never reused; `timestamp` is the
/// commit instant and is always surfaced as-is, formatting is a presentation
/// concern.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TransactionRecord {
    pub id: u64,
    pub kind: TransactionKind,
    pub amount: u64,
    pub timestamp: DateTime<Utc>,
    /// Recipient's display name on `Transfer Out`, sender's on `Transfer In`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpart_name: Option<String>,
}

/// An entry as the caller describes it. The store assigns `id` and
/// `timestamp` at the moment it commits the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub kind: TransactionKind,
    pub amount: u64,
    pub counterpart_name: Option<String>,
}

impl EntryDraft {
    pub fn deposit(amount: u64) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            amount,
            counterpart_name: None,
        }
    }

    pub fn withdraw(amount: u64) -> Self {
        Self {
            kind: TransactionKind::Withdraw,
            amount,
            counterpart_name: None,
        }
    }

    pub fn transfer_out(amount: u64, recipient_name: String) -> Self {
        Self {
            kind: TransactionKind::TransferOut,
            amount,
            counterpart_name: Some(recipient_name),
        }
    }

    pub fn transfer_in(amount: u64, sender_name: String) -> Self {
        Self {
            kind: TransactionKind::TransferIn,
            amount,
            counterpart_name: Some(sender_name),
        }
    }

    pub fn into_record(self, id: u64, timestamp: DateTime<Utc>) -> TransactionRecord {
        TransactionRecord {
            id,
            kind: self.kind,
            amount: self.amount,
            timestamp,
            counterpart_name: self.counterpart_name,
        }
    }
}
