//! NAB statement converter.
//!
//! Rows are recovered from the table's shading rectangles plus fixed column
//! offsets. The first page's summary block prints total credits and debits;
//! NAB statements print no opening/closing balance on the table itself, so
//! reconciliation is against those totals.

use rust_decimal::Decimal;

use super::Converter;
use crate::errors::{ConvertError, ConvertResult};
use crate::fields::{parse_date, require_amount};
use crate::pdf::{Document, Page, Rect};
use crate::table;
use crate::types::{Bank, Statement, Transaction};

const DATE_FORMAT: &str = "%d %b %y";

/// Known column x-offsets for the transaction table.
const COLUMN_X: [f32; 5] = [20.0, 80.0, 355.0, 405.0, 505.0];

/// Boundary coordinates closer than this are drawing artifacts.
const EDGE_MERGE_GAP: f32 = 8.0;

const SUMMARY_CLIP: Rect = Rect {
    x0: 0.0,
    y0: 10.0,
    x1: 600.0,
    y1: 740.0,
};

pub struct NabConverter;

impl Converter for NabConverter {
    fn convert(document: &Document) -> ConvertResult<Statement> {
        let first_page = document
            .pages
            .first()
            .ok_or(ConvertError::MissingSummaryFigure("total credits"))?;
        let (total_credits, total_debits) = summary_totals(first_page)?;

        let mut rows = Vec::new();
        for page in &document.pages {
            rows.extend(page_rows(page));
        }
        parse_rows(&rows, total_credits, total_debits)
    }
}

/// Read `Total Credits` / `Total Debits` from the first page: each sentinel
/// line is followed by its figure.
fn summary_totals(page: &Page) -> ConvertResult<(Decimal, Decimal)> {
    let text = page.text_in(SUMMARY_CLIP);
    let mut credits = None;
    let mut debits = None;
    let mut expect_credits = false;
    let mut expect_debits = false;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if expect_credits {
            let figure = require_amount(line, "NAB total credits")?;
            log::info!("obtained total credits: ${figure}");
            credits = Some(figure);
            expect_credits = false;
            continue;
        }
        if expect_debits {
            let figure = require_amount(line, "NAB total debits")?;
            log::info!("obtained total debits: ${}", -figure);
            debits = Some(-figure);
            break;
        }
        if line == "Total Credits" {
            expect_credits = true;
        } else if line == "Total Debits" {
            expect_debits = true;
        }
    }

    Ok((
        credits.ok_or(ConvertError::MissingSummaryFigure("total credits"))?,
        debits.ok_or(ConvertError::MissingSummaryFigure("total debits"))?,
    ))
}

/// Build the cell grid for one page and read out its text rows.
fn page_rows(page: &Page) -> Vec<Vec<String>> {
    let mut xs: Vec<f32> = COLUMN_X.to_vec();
    let mut ys: Vec<f32> = Vec::new();

    // Row shading rectangles must be large enough and filled.
    for drawing in &page.drawings {
        let rect = drawing.rect;
        if drawing.filled && rect.width() > 80.0 && rect.height() > 1.0 {
            xs.push(rect.x0.round());
            xs.push(rect.x1.round());
            ys.push(rect.y0.round());
            ys.push(rect.y1.round());
        }
    }

    // Header and footer anchor rows: the first transaction is not always
    // shaded, so the table's top and bottom need their own y-edges.
    if let Some(header) = page.find_text("Transaction Details") {
        ys.push((header.y0 + 30.0).round());
    }
    if let Some(footer) = page.find_text("Important") {
        ys.push((footer.y0 - 5.0).round());
    }

    let mut xs = table::sorted_edges(xs);
    table::merge_close(&mut xs, EDGE_MERGE_GAP);
    let mut ys = table::sorted_edges(ys);
    table::merge_close(&mut ys, EDGE_MERGE_GAP);

    table::extract_rows(page, &xs, &ys)
}

fn parse_rows(
    rows: &[Vec<String>],
    total_credits: Decimal,
    total_debits: Decimal,
) -> ConvertResult<Statement> {
    let mut statement = Statement::new(Bank::Nab);

    for row in rows {
        let Some(first) = row.first() else { continue };

        let date = if let Some(date) = parse_date(first, DATE_FORMAT) {
            date
        } else if first.ends_with("Important")
            && let Some(date) = first.get(..9).and_then(|s| parse_date(s, DATE_FORMAT))
        {
            // Last row of the page can run into the footer line.
            date
        } else {
            continue;
        };

        let details = row.get(1).map(String::as_str).unwrap_or_default();
        let details = details.strip_suffix('$').unwrap_or(details).trim();

        let debit = row.get(2).filter(|cell| !cell.is_empty());
        let credit = row.get(3).filter(|cell| !cell.is_empty());
        let amount = if let Some(cell) = debit {
            -require_amount(cell, "NAB debit column")?
        } else if let Some(cell) = credit {
            require_amount(cell, "NAB credit column")?
        } else {
            continue;
        };

        statement.transactions.push(Transaction {
            date,
            description: details.to_string(),
            amount,
        });
    }

    log::info!("number of transactions: {}", statement.transactions.len());
    statement.total_credits = Some(total_credits);
    statement.total_debits = Some(total_debits);
    statement.reconcile()?;
    log::info!("computed totals match printed summary");
    Ok(statement)
}
