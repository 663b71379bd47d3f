use clap::Parser;
use miette::{IntoDiagnostic, Result};
use pocketbank::application::history::PageRequest;
use pocketbank::application::ledger::Ledger;
use pocketbank::domain::account::{AccountNumber, OwnerId};
use pocketbank::error::{LedgerError, Result as LedgerResult};
use pocketbank::infrastructure::in_memory::{InMemoryLedgerStore, InMemoryUserDirectory};
use pocketbank::interfaces::csv::op_reader::{OpKind, OperationReader, OperationRow};
use pocketbank::interfaces::csv::report_writer::{ReportWriter, SummaryRow};
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let store = Arc::new(InMemoryLedgerStore::new());
    let directory = Arc::new(InMemoryUserDirectory::new());
    let ledger = Ledger::new(store, directory.clone());
    let mut runner = Runner::new(ledger, directory);

    // Execute operations row by row; a failing row is reported and skipped.
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OperationReader::new(file);
    for row in reader.operations() {
        match row {
            Ok(row) => {
                if let Err(e) = runner.execute(row).await {
                    eprintln!("Error executing operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Output the final state of every account still open.
    let rows = runner.summary().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_summary(rows).into_diagnostic()?;

    Ok(())
}

// Logs go to stderr so stdout stays machine-readable CSV.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Executes operation rows against the ledger.
///
/// Owners appear in the file as handles (`alice`); the runner remembers
/// which handle opened which account and registers the handle as the
/// owner's display name, so transfer histories read naturally.
struct Runner {
    ledger: Ledger,
    directory: Arc<InMemoryUserDirectory>,
    opened: BTreeMap<String, AccountNumber>,
}

impl Runner {
    fn new(ledger: Ledger, directory: Arc<InMemoryUserDirectory>) -> Self {
        Self {
            ledger,
            directory,
            opened: BTreeMap::new(),
        }
    }

    async fn execute(&mut self, row: OperationRow) -> LedgerResult<()> {
        match row.op {
            OpKind::Open => {
                let pin = required(row.pin, "pin")?;
                let owner = OwnerId::from(row.owner.as_str());
                self.directory.register(owner.clone(), row.owner.clone()).await;
                let number = self.ledger.create_account(owner, &pin).await?;
                self.opened.insert(row.owner, number);
            }
            OpKind::Deposit => {
                let number = self.resolve(&row.owner)?;
                let amount = required(row.amount, "amount")?;
                let pin = required(row.pin, "pin")?;
                self.ledger.deposit(number, amount, &pin).await?;
            }
            OpKind::Withdraw => {
                let number = self.resolve(&row.owner)?;
                let amount = required(row.amount, "amount")?;
                let pin = required(row.pin, "pin")?;
                self.ledger.withdraw(number, amount, &pin).await?;
            }
            OpKind::Transfer => {
                let sender = self.resolve(&row.owner)?;
                let to = required(row.to, "to")?;
                let recipient = self.resolve(&to)?;
                let amount = required(row.amount, "amount")?;
                let pin = required(row.pin, "pin")?;
                self.ledger.transfer(sender, recipient, amount, &pin).await?;
            }
            OpKind::ChangePin => {
                let number = self.resolve(&row.owner)?;
                let pin = required(row.pin, "pin")?;
                let new_pin = required(row.new_pin, "new_pin")?;
                self.ledger.change_pin(number, &pin, &new_pin).await?;
            }
            OpKind::Close => {
                let number = self.resolve(&row.owner)?;
                self.ledger.delete_account(number).await?;
                self.opened.remove(&row.owner);
            }
        }
        Ok(())
    }

    /// Final state of every account still open, sorted by account number.
    async fn summary(&self) -> LedgerResult<Vec<SummaryRow>> {
        let mut rows = Vec::new();
        for (owner, number) in &self.opened {
            let info = match self.ledger.account_info(*number).await {
                Ok(info) => info,
                Err(LedgerError::AccountNotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            let transactions = match self
                .ledger
                .query_history(*number, None, None, PageRequest::default())
                .await
            {
                Ok(page) => page.count,
                Err(LedgerError::EmptyPage { .. }) => 0,
                Err(e) => return Err(e),
            };
            rows.push(SummaryRow {
                account: info.account_number,
                owner: owner.clone(),
                balance: info.balance,
                transactions,
            });
        }
        rows.sort_by_key(|row| row.account);
        Ok(rows)
    }

    fn resolve(&self, handle: &str) -> LedgerResult<AccountNumber> {
        self.opened.get(handle).copied().ok_or_else(|| {
            LedgerError::ValidationError(format!("no account opened for {handle:?}"))
        })
    }
}

fn required<T>(value: Option<T>, column: &str) -> LedgerResult<T> {
    value.ok_or_else(|| LedgerError::ValidationError(format!("missing required column {column:?}")))
}
