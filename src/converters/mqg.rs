//! Macquarie statement converter.
//!
//! The first page is a summary sheet: the four figures after the
//! `= Closing balance` legend are opening balance, total debits, total
//! credits and closing balance, with `CR`/`DR` markers on the balances.
//! Transactions start on page two. The table prints a bare month-year cell
//! in the date column whenever the month rolls over, and the date cells
//! themselves are month-day only. Descriptions span two columns. A running
//! balance with a `CR`/`DR` suffix is checked wherever printed.

use rust_decimal::Decimal;

use super::Converter;
use crate::errors::{ConvertError, ConvertResult};
use crate::fields::{month_year, parse_date, require_amount, require_balance};
use crate::pdf::{Document, Page, Rect};
use crate::table;
use crate::types::{Bank, Statement, Transaction};

const DATE_FORMAT: &str = "%b %d %Y";

/// Known column x-offsets for the transaction table.
const COLUMN_X: [f32; 7] = [20.0, 80.0, 200.0, 380.0, 440.0, 500.0, 570.0];

const EDGE_MERGE_GAP: f32 = 8.0;

const SUMMARY_CLIP: Rect = Rect {
    x0: 0.0,
    y0: 350.0,
    x1: 570.0,
    y1: 800.0,
};

pub struct MqgConverter;

impl Converter for MqgConverter {
    fn convert(document: &Document) -> ConvertResult<Statement> {
        let first_page = document
            .pages
            .first()
            .ok_or(ConvertError::MissingSummaryFigure("opening balance"))?;
        let summary = read_summary(first_page)?;

        let mut rows = Vec::new();
        for page in &document.pages[1..] {
            // Carrier pages with no content or no table art.
            if page.runs.is_empty() || page.drawings.is_empty() {
                continue;
            }
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

/// The four figure lines following `= Closing balance`, in print order:
/// opening balance, total debits, total credits, closing balance.
fn read_summary(page: &Page) -> ConvertResult<Summary> {
    let text = page.text_in(SUMMARY_CLIP);
    let mut figures = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip_while(|line| *line != "= Closing balance")
        .skip(1);

    let mut next = |label: &'static str| {
        figures
            .next()
            .ok_or(ConvertError::MissingSummaryFigure(label))
    };

    let opening = require_balance(next("opening balance")?, "Macquarie opening balance")?;
    log::info!("obtained opening balance: ${opening}");
    let raw_debits = next("total debits")?;
    let debits = -require_amount(
        raw_debits.get(1..).unwrap_or_default(),
        "Macquarie total debits",
    )?;
    log::info!("obtained total debits: ${debits}");
    let raw_credits = next("total credits")?;
    let credits = require_amount(
        raw_credits.get(1..).unwrap_or_default(),
        "Macquarie total credits",
    )?;
    log::info!("obtained total credits: ${credits}");
    let closing = require_balance(next("closing balance")?, "Macquarie closing balance")?;
    log::info!("obtained closing balance: ${closing}");

    Ok(Summary {
        opening,
        closing,
        credits,
        debits,
    })
}

fn page_rows(page: &Page) -> Vec<Vec<String>> {
    let xs = table::sorted_edges(COLUMN_X);

    let mut ys: Vec<f32> = vec![800.0];
    for drawing in &page.drawings {
        // Table art here is rule lines, not shading; width is the only
        // usable discriminator.
        if drawing.rect.width() > 58.0 {
            ys.push(drawing.rect.y0);
            ys.push(drawing.rect.y1);
        }
    }
    let mut ys = table::sorted_edges(ys);
    table::merge_close(&mut ys, EDGE_MERGE_GAP);

    table::extract_rows(page, &xs, &ys)
}

fn parse_rows(rows: &[Vec<String>], summary: Summary) -> ConvertResult<Statement> {
    let mut statement = Statement::new(Bank::Mqg);
    let mut running = summary.opening;
    let mut year: Option<i32> = None;

    for (index, row) in rows.iter().enumerate() {
        let Some(first) = row.first() else { continue };

        // A bare "Jan 2024" cell announces the month roll-over.
        if let Some(new_year) = month_year(first) {
            year = Some(new_year);
            continue;
        }
        let Some(current_year) = year else { continue };
        let Some(date) = parse_date(&format!("{first} {current_year}"), DATE_FORMAT) else {
            continue;
        };

        let mut description = row.get(1).map(String::as_str).unwrap_or_default().to_string();
        if let Some(rest) = row.get(2).filter(|cell| !cell.is_empty()) {
            description.push(' ');
            description.push_str(rest);
        }

        let debit = row.get(3).filter(|cell| !cell.is_empty());
        let credit = row.get(4).filter(|cell| !cell.is_empty());
        let amount = if let Some(cell) = debit {
            -require_amount(cell, "Macquarie debit column")?
        } else if let Some(cell) = credit {
            require_amount(cell, "Macquarie credit column")?
        } else {
            continue;
        };
        running += amount;

        if let Some(cell) = row
            .get(5)
            .filter(|cell| cell.ends_with("CR") || cell.ends_with("DR"))
        {
            let printed = require_balance(cell, "Macquarie balance column")?;
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
            description: description.trim().to_string(),
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
