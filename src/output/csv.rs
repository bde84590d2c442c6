//! CSV serialization of a parsed statement.
//!
//! Two column layouts are in circulation: the line-oriented templates (CBA,
//! Zeller) put the amount before the details and use `%d-%b-%y` dates, the
//! grid templates put the details first and use `%d/%m/%Y`. Downstream
//! tooling keys off the headers, so both layouts carry them.

use std::path::Path;

use crate::errors::ConvertResult;
use crate::types::{Bank, Statement};

struct Layout {
    header: [&'static str; 3],
    date_format: &'static str,
    amount_first: bool,
}

fn layout_for(bank: Bank) -> Layout {
    match bank {
        Bank::Cba | Bank::Zel => Layout {
            header: ["Date", "Amount", "Transaction Details"],
            date_format: "%d-%b-%y",
            amount_first: true,
        },
        _ => Layout {
            header: ["Date", "Transaction Details", "Amount"],
            date_format: "%d/%m/%Y",
            amount_first: false,
        },
    }
}

/// Write the statement's transactions to `path` in the bank's CSV layout.
pub fn write_statement(statement: &Statement, path: &Path) -> ConvertResult<()> {
    let layout = layout_for(statement.bank);
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(layout.header)?;
    for transaction in &statement.transactions {
        let date = transaction.date.format(layout.date_format).to_string();
        let amount = transaction.amount.to_string();
        if layout.amount_first {
            writer.write_record([&date, &amount, &transaction.description])?;
        } else {
            writer.write_record([&date, &transaction.description, &amount])?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transaction;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample_statement(bank: Bank) -> Statement {
        let mut statement = Statement::new(bank);
        statement.transactions = vec![
            Transaction {
                date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                description: "DIRECT CREDIT, SALARY".to_string(),
                amount: Decimal::from_str("1500.00").unwrap(),
            },
            Transaction {
                date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
                description: "ATM WITHDRAWAL".to_string(),
                amount: Decimal::from_str("-100.00").unwrap(),
            },
        ];
        statement
    }

    #[test]
    fn test_amount_first_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.csv");
        write_statement(&sample_statement(Bank::Cba), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Date,Amount,Transaction Details");
        // Comma in the description forces quoting.
        assert_eq!(lines[1], "05-Jan-24,1500.00,\"DIRECT CREDIT, SALARY\"");
        assert_eq!(lines[2], "09-Jan-24,-100.00,ATM WITHDRAWAL");
    }

    #[test]
    fn test_details_first_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.csv");
        write_statement(&sample_statement(Bank::Nab), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Date,Transaction Details,Amount");
        assert_eq!(lines[2], "09/01/2024,ATM WITHDRAWAL,-100.00");
    }
}
