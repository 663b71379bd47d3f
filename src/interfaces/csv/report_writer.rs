use crate::domain::account::AccountNumber;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One line of the final account summary.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct SummaryRow {
    pub account: AccountNumber,
    pub owner: String,
    pub balance: u64,
    pub transactions: usize,
}

/// Writes the account summary as CSV, header included.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(target),
        }
    }

    /// Serializes all rows and flushes the target.
    pub fn write_summary(&mut self, rows: Vec<SummaryRow>) -> Result<()> {
        for row in rows {
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_layout() {
        let mut target = Vec::new();
        let mut writer = ReportWriter::new(&mut target);
        writer
            .write_summary(vec![
                SummaryRow {
                    account: AccountNumber::new(9_011_234_567).unwrap(),
                    owner: "alice".to_string(),
                    balance: 150,
                    transactions: 3,
                },
                SummaryRow {
                    account: AccountNumber::new(9_017_654_321).unwrap(),
                    owner: "bob".to_string(),
                    balance: 50,
                    transactions: 1,
                },
            ])
            .unwrap();
        drop(writer);

        let output = String::from_utf8(target).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("account,owner,balance,transactions"));
        assert_eq!(lines.next(), Some("9011234567,alice,150,3"));
        assert_eq!(lines.next(), Some("9017654321,bob,50,1"));
    }

    // With no rows there is nothing to serialize, so not even the header
    // appears.
    #[test]
    fn test_empty_summary_writes_nothing() {
        let mut target = Vec::new();
        let mut writer = ReportWriter::new(&mut target);
        writer.write_summary(Vec::new()).unwrap();
        drop(writer);

        let output = String::from_utf8(target).unwrap();
        assert!(output.is_empty());
    }
}
