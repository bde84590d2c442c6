//! ANZ statement converter.
//!
//! Transactions start on page two, laid out between horizontal rule lines
//! rather than shading, so every drawn edge becomes a candidate row
//! boundary. The date column only prints the year when it changes, dates
//! are day-month, and multi-line descriptions continue on date-less rows.
//! The balance column seeds the opening balance on the `OPENING BALANCE`
//! row, is checked against the computed running balance wherever printed,
//! and the `TOTALS AT END OF PERIOD` row carries the closing balance that
//! ends the walk.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Converter;
use crate::errors::{ConvertError, ConvertResult};
use crate::fields::{parse_date, require_amount, require_balance};
use crate::pdf::{Document, Page};
use crate::table;
use crate::types::{Bank, Statement, Transaction};

const DATE_FORMAT: &str = "%d %b %Y";

/// Known column x-offsets for the transaction table.
const COLUMN_X: [f32; 6] = [41.0, 75.0, 320.0, 408.0, 500.0, 563.0];

pub struct AnzConverter;

impl Converter for AnzConverter {
    fn convert(document: &Document) -> ConvertResult<Statement> {
        let mut rows = Vec::new();
        for page in document.pages.get(1..).unwrap_or_default() {
            rows.extend(page_rows(page));
        }
        parse_rows(&rows)
    }
}

fn page_rows(page: &Page) -> Vec<Vec<String>> {
    let xs = table::sorted_edges(COLUMN_X);

    // Every drawn edge is a candidate row boundary. Duplicate edges just
    // produce empty zero-height rows, which the parser skips.
    let mut ys = Vec::new();
    for drawing in &page.drawings {
        ys.push(drawing.rect.y0);
        ys.push(drawing.rect.y1);
    }
    let ys = table::sorted_edges(ys);

    table::extract_rows(page, &xs, &ys)
}

/// A four-digit year cell, alone or leading a "2024 26 DEC" combination.
fn leading_year(text: &str) -> Option<i32> {
    let year: i32 = text.get(..4)?.parse().ok()?;
    (2000..=2099).contains(&year).then_some(year)
}

fn parse_rows(rows: &[Vec<String>]) -> ConvertResult<Statement> {
    let mut statement = Statement::new(Bank::Anz);
    let mut running = Decimal::ZERO;
    let mut year: Option<i32> = None;
    let mut last_date: Option<NaiveDate> = None;
    // The first printed balance is the opening balance.
    let mut opening_pending = true;
    let mut closing: Option<Decimal> = None;

    'rows: for (index, row) in rows.iter().enumerate() {
        let first = row.first().map(String::as_str).unwrap_or_default();

        let mut row_date: Option<NaiveDate> = None;
        if let Some(new_year) = leading_year(first) {
            year = Some(new_year);
            // The first transaction can share the year's row; its date is
            // the cell's trailing day-month.
            if !opening_pending
                && let Some(day_month) = first.get(first.len().saturating_sub(6)..)
            {
                row_date = parse_date(&format!("{day_month} {new_year}"), DATE_FORMAT);
            }
        } else if let Some(current_year) = year {
            row_date = parse_date(&format!("{first} {current_year}"), DATE_FORMAT);
        }

        let details = row.get(1).map(String::as_str).unwrap_or_default();
        let mut totals_row = false;
        match details {
            "OPENING BALANCE" => {
                opening_pending = true;
            }
            "TOTALS AT END OF PAGE" => continue 'rows,
            "TOTALS AT END OF PERIOD" => {
                totals_row = true;
            }
            _ => {}
        }

        // Amount columns print "blank" or the section header in non-figure
        // cells. The period-totals row repeats the period's aggregates here
        // and must not touch the running balance.
        let mut amount: Option<Decimal> = None;
        if !totals_row {
            let withdrawal = row
                .get(2)
                .filter(|cell| !cell.is_empty() && *cell != "blank" && !cell.contains("Withdrawals ($)"));
            let deposit = row
                .get(3)
                .filter(|cell| !cell.is_empty() && *cell != "blank" && !cell.contains("Deposits ($)"));
            if let Some(cell) = withdrawal {
                let figure = require_amount(cell, "ANZ withdrawals column")?;
                running -= figure;
                amount = Some(-figure);
            } else if let Some(cell) = deposit {
                let figure = require_amount(cell, "ANZ deposits column")?;
                running += figure;
                amount = Some(figure);
            }
        }

        let balance_cell = row
            .get(4)
            .filter(|cell| !cell.is_empty() && *cell != "blank" && !cell.contains("Balance ($)"));
        if let Some(cell) = balance_cell {
            if totals_row {
                // "Balance brought forward $1,234.56"-style legend; the
                // figure starts after the fixed prefix.
                let raw = cell.get(12..).unwrap_or_default();
                let printed = require_amount(raw, "ANZ closing balance")?;
                log::info!("obtained closing balance: ${printed}");
                let computed = running.round_dp(2);
                if computed != printed {
                    return Err(ConvertError::BalanceMismatch {
                        computed,
                        printed,
                        context: format!("row {index}"),
                    });
                }
                closing = Some(printed);
                break 'rows;
            }
            let printed = require_balance(cell, "ANZ balance column")?;
            if opening_pending {
                log::info!("obtained opening balance: ${printed}");
                running = printed;
                statement.opening_balance = Some(printed);
                opening_pending = false;
                continue 'rows;
            }
            let computed = running.round_dp(2);
            if computed != printed {
                return Err(ConvertError::BalanceMismatch {
                    computed,
                    printed,
                    context: format!("row {index}"),
                });
            }
        }

        match (row_date, amount) {
            (date, Some(amount)) => {
                let date = date.or(last_date).ok_or_else(|| ConvertError::InvalidDate {
                    value: details.to_string(),
                    context: "ANZ transaction without a date",
                })?;
                last_date = Some(date);
                statement.transactions.push(Transaction {
                    date,
                    description: details.to_string(),
                    amount,
                });
            }
            (Some(date), None) => {
                last_date = Some(date);
            }
            (None, None) => {
                // Date-less, amount-less rows continue the previous
                // transaction's description.
                if !details.is_empty() && !totals_row && details != "OPENING BALANCE"
                    && let Some(last) = statement.transactions.last_mut()
                {
                    last.description.push(' ');
                    last.description.push_str(details);
                }
            }
        }
    }

    let closing = closing.ok_or(ConvertError::MissingSummaryFigure("closing balance"))?;
    if statement.opening_balance.is_none() {
        return Err(ConvertError::MissingSummaryFigure("opening balance"));
    }
    statement.closing_balance = Some(closing);
    log::info!("number of transactions: {}", statement.transactions.len());
    statement.reconcile()?;
    log::info!("running balance and closing balance match");
    Ok(statement)
}
