#![allow(dead_code)]

use pocketbank::application::ledger::Ledger;
use pocketbank::infrastructure::in_memory::{InMemoryLedgerStore, InMemoryUserDirectory};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

pub const OPS_HEADER: &str = "op, owner, to, amount, pin, new_pin";

/// Writes an operations CSV into a temp file, header included.
pub fn ops_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{OPS_HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

/// A ledger over fresh in-memory adapters, with handles to both so tests
/// can seed the directory or inspect stored state directly.
pub fn ledger_fixture() -> (Ledger, Arc<InMemoryLedgerStore>, Arc<InMemoryUserDirectory>) {
    let store = Arc::new(InMemoryLedgerStore::new());
    let directory = Arc::new(InMemoryUserDirectory::new());
    let ledger = Ledger::new(store.clone(), directory.clone());
    (ledger, store, directory)
}
