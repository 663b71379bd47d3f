use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum OpKind {
    Open,
    Deposit,
    Withdraw,
    Transfer,
    ChangePin,
    Close,
}

/// One row of an operations file.
///
/// `op` and `owner` are always present; which of the remaining columns
/// matter depends on the operation, and the runner validates that.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OperationRow {
    pub op: OpKind,
    pub owner: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub new_pin: Option<String>,
}

/// Reads ledger operations from a CSV source.
///
/// Wraps `csv::Reader` and yields `Result<OperationRow>` lazily, trimming
/// whitespace and tolerating rows that omit trailing columns.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// Creates a new `OperationReader` from any `Read` source.
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes operations,
    /// so large files stream without being held in memory.
    pub fn operations(self) -> impl Iterator<Item = Result<OperationRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
