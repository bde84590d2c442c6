//! Per-bank statement converters.
//!
//! Each bank's statement template gets its own bespoke procedure: its own
//! column coordinates, its own row-boundary heuristic, and its own
//! reconciliation checks. There is deliberately no shared extraction
//! algorithm beyond the grid helpers in `table`; the templates are too
//! different for one.

mod anz;
mod ben;
mod cba;
mod mqg;
mod nab;
mod wbc;
mod zel;

pub use anz::AnzConverter;
pub use ben::BenConverter;
pub use cba::CbaConverter;
pub use mqg::MqgConverter;
pub use nab::NabConverter;
pub use wbc::WbcConverter;
pub use zel::ZelConverter;

use crate::errors::ConvertResult;
use crate::pdf::Document;
use crate::types::{Bank, Statement};

/// A converter for one bank's statement template.
pub trait Converter {
    fn convert(document: &Document) -> ConvertResult<Statement>;
}

/// Dispatch to the converter for the detected bank.
pub fn convert(bank: Bank, document: &Document) -> ConvertResult<Statement> {
    match bank {
        Bank::Cba => CbaConverter::convert(document),
        Bank::Anz => AnzConverter::convert(document),
        Bank::Nab => NabConverter::convert(document),
        Bank::Wbc => WbcConverter::convert(document),
        Bank::Ben => BenConverter::convert(document),
        Bank::Mqg => MqgConverter::convert(document),
        Bank::Zel => ZelConverter::convert(document),
    }
}
