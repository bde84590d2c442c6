//! Parsing helpers for individual statement cells: monetary figures with the
//! formatting quirks banks print ($ signs, thousands commas, CR/DR suffixes)
//! and the various date shapes found in the templates.

use crate::errors::{ConvertError, ConvertResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Date formats accepted when re-reading our own CSV output, tried in order.
/// The two-digit-year shape comes before the four-digit one: `%Y` happily
/// consumes a two-digit year as-is, turning "05 Feb 24" into year 24.
const FLEXIBLE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%b-%y", "%d %b %y", "%d %b %Y", "%Y-%m-%d"];

/// Parse a monetary cell, stripping `$`, thousands commas and whitespace.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let clean = raw.replace(['$', ','], "");
    let clean = clean.trim();
    if clean.is_empty() {
        return None;
    }
    Decimal::from_str(clean).ok()
}

/// Like [`parse_amount`] but a hard error when the cell does not parse.
pub fn require_amount(raw: &str, context: &'static str) -> ConvertResult<Decimal> {
    parse_amount(raw).ok_or_else(|| ConvertError::InvalidAmount {
        value: raw.to_string(),
        context,
    })
}

/// Parse a printed balance figure with an optional trailing `CR`/`Cr`
/// (positive) or `DR`/`Dr` (negative) marker.
pub fn parse_balance(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if let Some(rest) = strip_suffix_any(trimmed, &["CR", "Cr"]) {
        return parse_amount(rest);
    }
    if let Some(rest) = strip_suffix_any(trimmed, &["DR", "Dr"]) {
        return parse_amount(rest).map(|v| -v);
    }
    parse_amount(trimmed)
}

/// Like [`parse_balance`] but a hard error when the cell does not parse.
pub fn require_balance(raw: &str, context: &'static str) -> ConvertResult<Decimal> {
    parse_balance(raw).ok_or_else(|| ConvertError::InvalidAmount {
        value: raw.to_string(),
        context,
    })
}

fn strip_suffix_any<'a>(value: &'a str, suffixes: &[&str]) -> Option<&'a str> {
    suffixes
        .iter()
        .find_map(|suffix| value.strip_suffix(suffix))
}

/// Strict single-format date parse used for row classification.
pub fn parse_date(value: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), format).ok()
}

/// Whether a cell holds a date in exactly the given format.
pub fn is_date(value: &str, format: &str) -> bool {
    parse_date(value, format).is_some()
}

/// Multi-format date parse, trying the known statement and CSV shapes in
/// order. Day comes first in all of them: these are Australian statements.
pub fn parse_flexible(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    FLEXIBLE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Recognise a bare month-year cell ("Jan 2024") and return the year.
pub fn month_year(value: &str) -> Option<i32> {
    use chrono::Datelike;
    let padded = format!("1 {}", value.trim());
    NaiveDate::parse_from_str(&padded, "%d %b %Y")
        .ok()
        .map(|date| date.year())
}
