//! Westpac statement converter.
//!
//! Westpac's transaction-search export shades each transaction row, with a
//! spacer gap between the shadings, so the grid built from the rectangles'
//! inner edges alternates transaction and spacer rows. The export prints no
//! summary balances, so there is nothing to reconcile against; the net
//! movement is logged instead.

use super::Converter;
use crate::errors::{ConvertError, ConvertResult};
use crate::fields::{parse_date, require_amount};
use crate::pdf::{Document, Page};
use crate::table;
use crate::types::{Bank, Statement, Transaction};

const DATE_FORMAT: &str = "%d %b %Y";

/// Known column x-offsets for the transaction table.
const COLUMN_X: [f32; 6] = [40.0, 105.0, 215.0, 365.0, 410.0, 500.0];

const EDGE_MERGE_GAP: f32 = 8.0;

pub struct WbcConverter;

impl Converter for WbcConverter {
    fn convert(document: &Document) -> ConvertResult<Statement> {
        let mut rows = Vec::new();
        for page in &document.pages {
            rows.extend(page_rows(page));
        }
        parse_rows(&rows)
    }
}

fn page_rows(page: &Page) -> Vec<Vec<String>> {
    let mut xs: Vec<f32> = COLUMN_X.to_vec();
    let mut ys: Vec<f32> = Vec::new();

    for drawing in &page.drawings {
        let rect = drawing.rect;
        if drawing.filled && rect.width() > 80.0 && rect.height() > 20.0 {
            xs.push(rect.x0.round());
            xs.push(rect.x1.round());
            // Inset the shading edges so cell boundaries sit inside the
            // rectangle rather than on its border.
            ys.push(rect.y0 + 8.0);
            ys.push(rect.y1 - 2.0);
        }
    }

    // The last (unshaded) row is bounded by the page footer.
    if let Some(footer) = page.find_text("Copyright") {
        ys.push((footer.y0 - 5.0).round());
    }

    let mut xs = table::sorted_edges(xs);
    table::merge_close(&mut xs, EDGE_MERGE_GAP);
    let mut ys = table::sorted_edges(ys);
    table::merge_close(&mut ys, EDGE_MERGE_GAP);

    // Alternate rows are spacers between the shading rectangles.
    table::extract_rows(page, &xs, &ys)
        .into_iter()
        .step_by(2)
        .collect()
}

fn parse_rows(rows: &[Vec<String>]) -> ConvertResult<Statement> {
    let mut statement = Statement::new(Bank::Wbc);

    for row in rows {
        let Some(first) = row.first() else { continue };
        let Some(date) = parse_date(first, DATE_FORMAT) else {
            continue;
        };

        let details = row.get(2).map(String::as_str).unwrap_or_default().trim();

        let debit = row.get(3).filter(|cell| cell.contains('-'));
        let credit = row.get(4).filter(|cell| !cell.is_empty());
        let amount = if let Some(cell) = debit {
            let raw = cell.trim_matches(['-', ' ']);
            -require_amount(raw, "Westpac debit column")?
        } else if let Some(cell) = credit {
            require_amount(cell, "Westpac credit column")?
        } else {
            continue;
        };

        statement.transactions.push(Transaction {
            date,
            description: details.to_string(),
            amount,
        });
    }

    if statement.transactions.is_empty() {
        return Err(ConvertError::NoTransactions);
    }
    log::info!("number of transactions: {}", statement.transactions.len());
    // No printed balances on this template; reconcile() has nothing to
    // check, so surface the computed net movement for the operator.
    log::info!("net movement: ${}", statement.net_movement());
    statement.reconcile()?;
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn sample_rows() -> Vec<Vec<String>> {
        vec![
            row(&["Date", "", "Description", "Debit", "Credit"]),
            row(&["03 Jan 2024", "", "EFTPOS PURCHASE GROCER", "-$45.20", ""]),
            row(&["05 Jan 2024", "", "SALARY DEPOSIT", "", "$1,800.00"]),
            row(&["", "", "orphan line", "", ""]),
        ]
    }

    #[test]
    fn test_parse_sample_rows() {
        let statement = parse_rows(&sample_rows()).unwrap();

        assert_eq!(statement.bank, Bank::Wbc);
        assert_eq!(statement.transactions.len(), 2);
        assert_eq!(
            statement.transactions[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
        assert_eq!(
            statement.transactions[0].amount,
            Decimal::from_str("-45.20").unwrap()
        );
        assert_eq!(
            statement.transactions[1].amount,
            Decimal::from_str("1800.00").unwrap()
        );
        assert_eq!(
            statement.net_movement(),
            Decimal::from_str("1754.80").unwrap()
        );
    }

    #[test]
    fn test_no_rows_is_fatal() {
        let rows = vec![row(&["Date", "", "Description", "Debit", "Credit"])];
        let result = parse_rows(&rows);
        assert!(matches!(result, Err(ConvertError::NoTransactions)));
    }

    #[test]
    fn test_debit_needs_minus_sign() {
        // Column 3 without a minus sign is not a debit figure.
        let rows = vec![
            row(&["03 Jan 2024", "", "REAL DEBIT", "-$10.00", ""]),
            row(&["04 Jan 2024", "", "NOISE", "Balance", ""]),
        ];
        let statement = parse_rows(&rows).unwrap();
        assert_eq!(statement.transactions.len(), 1);
    }

    #[test]
    fn test_page_rows_skips_spacer_rows() {
        use crate::pdf::{DrawnRect, Page, Rect, TextRun};

        let mut runs = vec![TextRun::new(
            "Copyright",
            Rect::new(40.0, 700.0, 90.0, 710.0),
        )];
        // Two shaded transactions with a spacer gap between the shadings.
        runs.push(TextRun::new("03 Jan 2024", Rect::new(42.0, 112.0, 100.0, 122.0)));
        runs.push(TextRun::new("EFTPOS GROCER", Rect::new(220.0, 112.0, 320.0, 122.0)));
        runs.push(TextRun::new("-$45.20", Rect::new(370.0, 112.0, 405.0, 122.0)));
        runs.push(TextRun::new("05 Jan 2024", Rect::new(42.0, 152.0, 100.0, 162.0)));
        runs.push(TextRun::new("SALARY DEPOSIT", Rect::new(220.0, 152.0, 330.0, 162.0)));
        runs.push(TextRun::new("$1,800.00", Rect::new(415.0, 152.0, 460.0, 162.0)));

        let page = Page {
            width: 600.0,
            height: 760.0,
            runs,
            drawings: vec![
                DrawnRect {
                    rect: Rect::new(40.0, 100.0, 500.0, 130.0),
                    filled: true,
                },
                DrawnRect {
                    rect: Rect::new(40.0, 140.0, 500.0, 170.0),
                    filled: true,
                },
            ],
        };

        let statement = parse_rows(&page_rows(&page)).unwrap();
        assert_eq!(statement.transactions.len(), 2);
    }
}
