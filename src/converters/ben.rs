//! Bendigo Bank statement converter.
//!
//! The first page's summary block prints opening balance, total credits,
//! total debits and closing balance, each as a sentinel line followed by its
//! figure. The transaction table shades its rows and prints a running
//! balance in the last column, which is checked against the computed one on
//! every row that carries it.

use rust_decimal::Decimal;

use super::Converter;
use crate::errors::{ConvertError, ConvertResult};
use crate::fields::{parse_date, require_amount};
use crate::pdf::{Document, Page, Rect};
use crate::table;
use crate::types::{Bank, Statement, Transaction};

const DATE_FORMAT: &str = "%d %b %y";

/// Known column x-offsets for the transaction table.
const COLUMN_X: [f32; 6] = [40.0, 96.0, 320.0, 440.0, 510.0, 580.0];

const EDGE_MERGE_GAP: f32 = 8.0;

const SUMMARY_CLIP: Rect = Rect {
    x0: 0.0,
    y0: 10.0,
    x1: 600.0,
    y1: 350.0,
};

/// Footer line anchoring the bottom of the table on every page.
const FOOTER_PHRASE: &str =
    "Bendigo and Adelaide Bank Limited ABN 11 068 049 178 AFSL/Australian Credit Licence 237879";

pub struct BenConverter;

impl Converter for BenConverter {
    fn convert(document: &Document) -> ConvertResult<Statement> {
        let first_page = document
            .pages
            .first()
            .ok_or(ConvertError::MissingSummaryFigure("opening balance"))?;
        let summary = read_summary(first_page)?;

        let mut rows = Vec::new();
        for page in &document.pages {
            rows.extend(page_rows(page));
        }
        parse_rows(&rows, summary)
    }
}

struct Summary {
    opening: Decimal,
    closing: Decimal,
    credits: Decimal,
    debits: Decimal,
}

fn read_summary(page: &Page) -> ConvertResult<Summary> {
    let text = page.text_in(SUMMARY_CLIP);
    let mut opening = None;
    let mut closing = None;
    let mut credits = None;
    let mut debits = None;

    let mut expect: Option<&str> = None;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(label) = expect.take() {
            // The figure line is "$1,234.56"; skip the currency sign.
            let raw = line.get(1..).unwrap_or_default();
            let figure = require_amount(raw, "Bendigo summary figure")?;
            match label {
                "opening" => {
                    log::info!("obtained opening balance: ${figure}");
                    opening = Some(figure);
                }
                "credits" => {
                    log::info!("obtained total credits: ${figure}");
                    credits = Some(figure);
                }
                "debits" => {
                    log::info!("obtained total debits: ${}", -figure);
                    debits = Some(-figure);
                }
                _ => {
                    log::info!("obtained closing balance: ${figure}");
                    closing = Some(figure);
                }
            }
            if closing.is_some() {
                break;
            }
            continue;
        }
        if line.starts_with("Opening balance on") {
            expect = Some("opening");
        } else if line == "Deposits & credits" {
            expect = Some("credits");
        } else if line == "Withdrawals & debits" {
            expect = Some("debits");
        } else if line.starts_with("Closing Balance on") {
            expect = Some("closing");
        }
    }

    Ok(Summary {
        opening: opening.ok_or(ConvertError::MissingSummaryFigure("opening balance"))?,
        closing: closing.ok_or(ConvertError::MissingSummaryFigure("closing balance"))?,
        credits: credits.ok_or(ConvertError::MissingSummaryFigure("total credits"))?,
        debits: debits.ok_or(ConvertError::MissingSummaryFigure("total debits"))?,
    })
}

fn page_rows(page: &Page) -> Vec<Vec<String>> {
    let mut xs: Vec<f32> = COLUMN_X.to_vec();
    let mut ys: Vec<f32> = Vec::new();

    for drawing in &page.drawings {
        let rect = drawing.rect;
        if drawing.filled && rect.width() > 80.0 && rect.height() > 20.0 {
            xs.push(rect.x0.round());
            xs.push(rect.x1.round());
            ys.push(rect.y0.round());
            ys.push(rect.y1.round());
        }
    }

    if let Some(footer) = page.find_text(FOOTER_PHRASE) {
        ys.push((footer.y0 - 5.0).round());
    }

    let mut xs = table::sorted_edges(xs);
    table::merge_close(&mut xs, EDGE_MERGE_GAP);
    let mut ys = table::sorted_edges(ys);
    table::merge_close(&mut ys, EDGE_MERGE_GAP);

    table::extract_rows(page, &xs, &ys)
}

fn parse_rows(rows: &[Vec<String>], summary: Summary) -> ConvertResult<Statement> {
    let mut statement = Statement::new(Bank::Ben);
    let mut running = summary.opening;

    for (index, row) in rows.iter().enumerate() {
        let Some(first) = row.first() else { continue };
        let Some(date) = parse_date(first, DATE_FORMAT) else {
            continue;
        };

        let details = row.get(1).map(String::as_str).unwrap_or_default().trim();

        let debit = row.get(2).filter(|cell| !cell.is_empty());
        let credit = row.get(3).filter(|cell| !cell.is_empty());
        let amount = if let Some(cell) = debit {
            -require_amount(cell, "Bendigo debit column")?
        } else if let Some(cell) = credit {
            require_amount(cell, "Bendigo credit column")?
        } else {
            continue;
        };
        running += amount;

        // The last column prints the balance after this transaction.
        if let Some(cell) = row.get(4).filter(|cell| !cell.is_empty()) {
            let printed = require_amount(cell, "Bendigo balance column")?;
            let computed = running.round_dp(2);
            if computed != printed {
                return Err(ConvertError::BalanceMismatch {
                    computed,
                    printed,
                    context: format!("row {index}"),
                });
            }
        }

        statement.transactions.push(Transaction {
            date,
            description: details.to_string(),
            amount,
        });
    }

    log::info!("number of transactions: {}", statement.transactions.len());
    statement.opening_balance = Some(summary.opening);
    statement.closing_balance = Some(summary.closing);
    statement.total_credits = Some(summary.credits);
    statement.total_debits = Some(summary.debits);
    statement.reconcile()?;
    log::info!("running balance and closing balance match");
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn sample_summary() -> Summary {
        Summary {
            opening: Decimal::from_str("200.00").unwrap(),
            closing: Decimal::from_str("1150.00").unwrap(),
            credits: Decimal::from_str("1000.00").unwrap(),
            debits: Decimal::from_str("-50.00").unwrap(),
        }
    }

    fn sample_rows() -> Vec<Vec<String>> {
        vec![
            row(&["Date", "Transaction", "Withdrawals", "Deposits", "Balance"]),
            row(&["02 Jan 24", "DEPOSIT INVOICE 81", "", "1,000.00", "1,200.00"]),
            row(&["05 Jan 24", "ACCOUNT FEE", "50.00", "", "1,150.00"]),
        ]
    }

    #[test]
    fn test_parse_sample_rows() {
        let statement = parse_rows(&sample_rows(), sample_summary()).unwrap();

        assert_eq!(statement.bank, Bank::Ben);
        assert_eq!(statement.transactions.len(), 2);
        assert_eq!(
            statement.transactions[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(
            statement.transactions[1].amount,
            Decimal::from_str("-50.00").unwrap()
        );
        assert_eq!(
            statement.closing_balance,
            Some(Decimal::from_str("1150.00").unwrap())
        );
    }

    #[test]
    fn test_printed_row_balance_mismatch_is_fatal() {
        let mut rows = sample_rows();
        rows[1][4] = "1,200.01".to_string();
        let result = parse_rows(&rows, sample_summary());
        assert!(matches!(result, Err(ConvertError::BalanceMismatch { .. })));
    }

    #[test]
    fn test_closing_balance_mismatch_is_fatal() {
        let mut summary = sample_summary();
        summary.closing = Decimal::from_str("9999.99").unwrap();
        let result = parse_rows(&sample_rows(), summary);
        assert!(matches!(result, Err(ConvertError::BalanceMismatch { .. })));
    }

    #[test]
    fn test_read_summary() {
        use crate::pdf::{Page, TextRun};

        let lines = [
            "Opening balance on 1 Jan 2024",
            "$200.00",
            "Withdrawals & debits",
            "$50.00",
            "Deposits & credits",
            "$1,000.00",
            "Closing Balance on 31 Jan 2024",
            "$1,150.00",
        ];
        let runs = lines
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let y = 20.0 + index as f32 * 14.0;
                let width = text.len() as f32 * 5.0;
                TextRun::new(*text, Rect::new(10.0, y, 10.0 + width, y + 10.0))
            })
            .collect();
        let page = Page {
            width: 600.0,
            height: 800.0,
            runs,
            drawings: vec![],
        };

        let summary = read_summary(&page).unwrap();
        assert_eq!(summary.opening, Decimal::from_str("200.00").unwrap());
        assert_eq!(summary.debits, Decimal::from_str("-50.00").unwrap());
        assert_eq!(summary.credits, Decimal::from_str("1000.00").unwrap());
        assert_eq!(summary.closing, Decimal::from_str("1150.00").unwrap());
    }

    #[test]
    fn test_read_summary_missing_figure() {
        use crate::pdf::{Page, TextRun};

        let page = Page {
            width: 600.0,
            height: 800.0,
            runs: vec![TextRun::new(
                "Opening balance on 1 Jan 2024",
                Rect::new(10.0, 20.0, 150.0, 30.0),
            )],
            drawings: vec![],
        };
        let result = read_summary(&page);
        assert!(matches!(
            result,
            Err(ConvertError::MissingSummaryFigure(_))
        ));
    }
}
