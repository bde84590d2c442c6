//! Commonwealth Bank statement converter.
//!
//! CBA statements carry no usable row shading, so this converter works on
//! clipped page text rather than a cell grid. Transactions span multiple
//! lines: a date line opens one, description lines accumulate, and a `$`
//! line closes it. A debit is printed as its figure on one line followed by
//! a lone `$`; a credit is printed as `$figure` directly. Interleaved
//! `$… CR` lines are printed running balances and are checked on sight.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Converter;
use crate::errors::{ConvertError, ConvertResult};
use crate::fields::{parse_date, require_amount, require_balance};
use crate::pdf::{Document, Rect};
use crate::types::{Bank, Statement, Transaction};

const DATE_FORMAT: &str = "%d %b %Y";

/// Clip regions: the first page's table starts below the account summary.
const FIRST_PAGE_CLIP: Rect = Rect {
    x0: 50.0,
    y0: 500.0,
    x1: 600.0,
    y1: 1200.0,
};
const PAGE_CLIP: Rect = Rect {
    x0: 50.0,
    y0: 100.0,
    x1: 600.0,
    y1: 1200.0,
};

pub struct CbaConverter;

impl Converter for CbaConverter {
    fn convert(document: &Document) -> ConvertResult<Statement> {
        parse_lines(&collect_lines(document))
    }
}

fn collect_lines(document: &Document) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, page) in document.pages.iter().enumerate() {
        let clip = if index == 0 { FIRST_PAGE_CLIP } else { PAGE_CLIP };
        lines.extend(page.text_in(clip).lines().map(str::to_string));
    }
    lines
}

fn parse_lines(lines: &[String]) -> ConvertResult<Statement> {
    let mut statement = Statement::new(Bank::Cba);
    let mut running = Decimal::ZERO;
    let mut year = String::new();

    let mut expect_opening = false;
    let mut expect_closing = false;
    let mut in_transaction = false;
    let mut description = String::new();
    let mut previous_line = String::new();

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut details: Vec<String> = Vec::new();
    let mut amounts: Vec<Decimal> = Vec::new();

    for line in lines {
        let line = line.as_str();
        if line.trim().is_empty() {
            continue;
        }

        // The period line "01 Jul 2023 - 31 Jul 2023 ... OPENING BALANCE"
        // also carries the statement year for the day-month dates below.
        if line.ends_with("OPENING BALANCE") {
            expect_opening = true;
            year = line.get(7..11).unwrap_or_default().to_string();
            continue;
        }
        if expect_opening {
            let figure = require_balance(line, "CBA opening balance")?;
            log::info!("obtained opening balance: ${figure}");
            running = figure;
            statement.opening_balance = Some(figure);
            expect_opening = false;
            continue;
        }

        if line.ends_with("CLOSING BALANCE") {
            expect_closing = true;
            continue;
        }
        if expect_closing {
            let figure = require_balance(line, "CBA closing balance")?;
            log::info!("obtained closing balance: ${figure}");
            statement.closing_balance = Some(figure);
            break;
        }

        if in_transaction && line.starts_with('$') {
            if line == "$" {
                // Debit: the figure was the previous description line.
                let amount = require_amount(&previous_line, "CBA debit amount")?;
                running -= amount;
                amounts.push(-amount);
                description.truncate(description.len().saturating_sub(previous_line.len()));
            } else {
                let amount = require_amount(&line[1..], "CBA credit amount")?;
                running += amount;
                amounts.push(amount);
            }
            details.push(description.trim().to_string());
            description.clear();
            in_transaction = false;
            continue;
        }

        if in_transaction {
            description.push(' ');
            description.push_str(line);
            previous_line = line.to_string();
            continue;
        }

        if line.starts_with('$') && line.ends_with(" CR") {
            let printed = require_balance(line, "CBA balance line")?;
            let computed = running.round_dp(2);
            if computed != printed {
                return Err(ConvertError::BalanceMismatch {
                    computed,
                    printed,
                    context: format!("line {line:?}"),
                });
            }
            continue;
        }

        // A transaction opens with "26 Dec <description...>".
        let day_month = line.get(..6).unwrap_or_default().trim();
        if let Some(date) = parse_date(&format!("{day_month} {year}"), DATE_FORMAT) {
            dates.push(date);
            description = line.get(7..).unwrap_or_default().trim().to_string();
            previous_line = line.to_string();
            in_transaction = true;
        }
    }

    if statement.opening_balance.is_none() {
        return Err(ConvertError::MissingSummaryFigure("opening balance"));
    }
    if statement.closing_balance.is_none() {
        return Err(ConvertError::MissingSummaryFigure("closing balance"));
    }
    if dates.len() != details.len() || details.len() != amounts.len() {
        return Err(ConvertError::RowCountMismatch {
            dates: dates.len(),
            details: details.len(),
            amounts: amounts.len(),
        });
    }
    log::info!("number of transactions: {}", dates.len());

    statement.transactions = dates
        .into_iter()
        .zip(details)
        .zip(amounts)
        .map(|((date, description), amount)| Transaction {
            date,
            description,
            amount,
        })
        .collect();

    statement.reconcile()?;
    log::info!("running balance and closing balance match");
    Ok(statement)
}
