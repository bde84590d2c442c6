//! QIF generation from a previously written CSV file.
//!
//! QIF output is always derived from the CSV rather than the in-memory
//! statement, so a standalone CSV (ours or a hand-edited one) converts the
//! same way. Headered files are read by column name, accepting either
//! `Transaction Details` or `Description` for the payee; headerless files
//! fall back to the date, amount, details column order.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::errors::{ConvertError, ConvertResult};
use crate::fields::parse_flexible;

const QIF_DATE_FORMAT: &str = "%d/%m/%Y";

/// Convert `csv_path` to a QIF file alongside it, returning the QIF path.
pub fn csv_to_qif(csv_path: &Path) -> ConvertResult<PathBuf> {
    let qif_path = csv_path.with_extension("qif");
    let mut reader = csv::Reader::from_path(csv_path)?;

    let headers = reader.headers()?.clone();
    let columns = if let Some(date) = headers.iter().position(|h| h == "Date") {
        let amount = headers
            .iter()
            .position(|h| h == "Amount")
            .ok_or(ConvertError::MissingColumn("Amount"))?;
        let details = headers
            .iter()
            .position(|h| h == "Transaction Details" || h == "Description")
            .ok_or(ConvertError::MissingColumn("Transaction Details"))?;
        Some((date, amount, details))
    } else {
        None
    };

    let mut output = String::from("!Type:Bank\n");
    match columns {
        Some((date, amount, details)) => {
            for record in reader.records() {
                let record = record?;
                append_entry(
                    &mut output,
                    record.get(date).unwrap_or_default(),
                    record.get(amount).unwrap_or_default(),
                    record.get(details).unwrap_or_default(),
                )?;
            }
        }
        None => {
            // No recognised header: re-read positionally, first row included.
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .from_path(csv_path)?;
            for record in reader.records() {
                let record = record?;
                append_entry(
                    &mut output,
                    record.get(0).unwrap_or_default(),
                    record.get(1).unwrap_or_default(),
                    record.get(2).unwrap_or_default(),
                )?;
            }
        }
    }

    std::fs::write(&qif_path, output)?;
    Ok(qif_path)
}

fn append_entry(output: &mut String, date: &str, amount: &str, details: &str) -> ConvertResult<()> {
    let date = parse_flexible(date).ok_or_else(|| ConvertError::InvalidDate {
        value: date.to_string(),
        context: "CSV date column",
    })?;
    let amount = amount.strip_prefix('+').unwrap_or(amount);
    let _ = writeln!(output, "D{}", date.format(QIF_DATE_FORMAT));
    let _ = writeln!(output, "T{amount}");
    let _ = writeln!(output, "P{details}");
    output.push_str("^\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("statement.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_headered_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(
            dir.path(),
            "Date,Transaction Details,Amount\n\
             05/01/2024,DIRECT CREDIT,1500.00\n\
             09/01/2024,ATM WITHDRAWAL,-100.00\n",
        );

        let qif_path = csv_to_qif(&csv_path).unwrap();
        assert_eq!(qif_path, dir.path().join("statement.qif"));
        let content = std::fs::read_to_string(&qif_path).unwrap();
        assert_eq!(
            content,
            "!Type:Bank\n\
             D05/01/2024\nT1500.00\nPDIRECT CREDIT\n^\n\
             D09/01/2024\nT-100.00\nPATM WITHDRAWAL\n^\n"
        );
    }

    #[test]
    fn test_amount_first_layout_with_description_header() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(
            dir.path(),
            "Date,Amount,Description\n05-Jan-24,+250.00,REFUND\n",
        );

        let qif_path = csv_to_qif(&csv_path).unwrap();
        let content = std::fs::read_to_string(&qif_path).unwrap();
        // Date normalised, leading "+" stripped.
        assert_eq!(content, "!Type:Bank\nD05/01/2024\nT250.00\nPREFUND\n^\n");
    }

    #[test]
    fn test_headerless_csv_is_read_positionally() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(
            dir.path(),
            "05/01/2024,120.00,SETTLEMENT\n06/01/2024,-20.00,FEE\n",
        );

        let qif_path = csv_to_qif(&csv_path).unwrap();
        let content = std::fs::read_to_string(&qif_path).unwrap();
        assert_eq!(
            content,
            "!Type:Bank\n\
             D05/01/2024\nT120.00\nPSETTLEMENT\n^\n\
             D06/01/2024\nT-20.00\nPFEE\n^\n"
        );
    }

    #[test]
    fn test_unparseable_date_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(
            dir.path(),
            "Date,Transaction Details,Amount\nnot-a-date,X,1.00\n",
        );
        let result = csv_to_qif(&csv_path);
        assert!(matches!(result, Err(ConvertError::InvalidDate { .. })));
    }

    #[test]
    fn test_missing_amount_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = write_csv(dir.path(), "Date,Other\n05/01/2024,x\n");
        let result = csv_to_qif(&csv_path);
        assert!(result.is_err());
    }
}
