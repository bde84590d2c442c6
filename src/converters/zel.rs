//! Zeller statement converter.
//!
//! Line-oriented like CBA, but with a different vocabulary: the summary
//! block prints `Opening Balance`, `Closing Balance`, `Total Credit` and
//! `Total Debit` sentinels each followed by their figure, the statement year
//! rides on the line after the `Date` column header, and amount lines are
//! `$figure` for credits and `-$figure` for debits.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Converter;
use crate::errors::{ConvertError, ConvertResult};
use crate::fields::{parse_date, require_amount, require_balance};
use crate::pdf::{Document, Rect};
use crate::types::{Bank, Statement, Transaction};

const DATE_FORMAT: &str = "%d %b %Y";
const PAGE_CLIP: Rect = Rect {
    x0: 0.0,
    y0: 0.0,
    x1: 600.0,
    y1: 800.0,
};

pub struct ZelConverter;

impl Converter for ZelConverter {
    fn convert(document: &Document) -> ConvertResult<Statement> {
        let mut lines = Vec::new();
        for page in &document.pages {
            lines.extend(page.text_in(PAGE_CLIP).lines().map(str::to_string));
        }
        parse_lines(&lines)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    Nothing,
    Year,
    Opening,
    Closing,
    Credits,
    Debits,
}

fn parse_lines(lines: &[String]) -> ConvertResult<Statement> {
    let mut statement = Statement::new(Bank::Zel);
    let mut running = Decimal::ZERO;
    let mut year = String::new();
    let mut year_known = false;
    let mut expect = Expect::Nothing;
    let mut in_transaction = false;
    let mut description = String::new();

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut details: Vec<String> = Vec::new();
    let mut amounts: Vec<Decimal> = Vec::new();

    for line in lines {
        let line = line.as_str();
        if line.trim().is_empty() {
            continue;
        }

        match expect {
            Expect::Year => {
                // Column-header line ends with the period's year.
                year = line
                    .get(line.len().saturating_sub(4)..)
                    .unwrap_or_default()
                    .to_string();
                year_known = true;
                expect = Expect::Nothing;
                continue;
            }
            Expect::Opening => {
                let figure = require_balance(line, "Zeller opening balance")?;
                log::info!("obtained opening balance: ${figure}");
                running = figure;
                statement.opening_balance = Some(figure);
                expect = Expect::Nothing;
                continue;
            }
            Expect::Closing => {
                let figure = require_balance(line, "Zeller closing balance")?;
                log::info!("obtained closing balance: ${figure}");
                statement.closing_balance = Some(figure);
                expect = Expect::Nothing;
                continue;
            }
            Expect::Credits => {
                let figure = require_amount(line, "Zeller total credits")?;
                log::info!("obtained total credits: ${figure}");
                statement.total_credits = Some(figure);
                expect = Expect::Nothing;
                continue;
            }
            Expect::Debits => {
                let figure = require_amount(line, "Zeller total debits")?;
                log::info!("obtained total debits: ${}", -figure);
                statement.total_debits = Some(-figure);
                expect = Expect::Nothing;
                continue;
            }
            Expect::Nothing => {}
        }

        if line.starts_with("Date") && !year_known {
            expect = Expect::Year;
        } else if line == "Opening Balance" {
            expect = Expect::Opening;
        } else if line == "Closing Balance" {
            expect = Expect::Closing;
        } else if line == "Total Credit" {
            expect = Expect::Credits;
        } else if line == "Total Debit" {
            expect = Expect::Debits;
        } else if in_transaction && (line.starts_with('$') || line.starts_with("-$")) {
            let amount = if let Some(rest) = line.strip_prefix("-$") {
                let amount = require_amount(rest, "Zeller debit amount")?;
                running -= amount;
                -amount
            } else {
                let amount = require_amount(&line[1..], "Zeller credit amount")?;
                running += amount;
                amount
            };
            amounts.push(amount);
            details.push(description.trim().to_string());
            description.clear();
            in_transaction = false;
        } else if in_transaction {
            description.push(' ');
            description.push_str(line);
        } else {
            let day_month = line.get(..6).unwrap_or_default().trim();
            if let Some(date) = parse_date(&format!("{day_month} {year}"), DATE_FORMAT) {
                dates.push(date);
                description = line.get(7..).unwrap_or_default().trim().to_string();
                in_transaction = true;
            }
        }
    }

    if statement.opening_balance.is_none() {
        return Err(ConvertError::MissingSummaryFigure("opening balance"));
    }
    if statement.closing_balance.is_none() {
        return Err(ConvertError::MissingSummaryFigure("closing balance"));
    }
    if statement.total_credits.is_none() {
        return Err(ConvertError::MissingSummaryFigure("total credits"));
    }
    if statement.total_debits.is_none() {
        return Err(ConvertError::MissingSummaryFigure("total debits"));
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
