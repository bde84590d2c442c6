//! Convert Australian bank PDF statements into normalized CSV and QIF files.
//!
//! ```rust,ignore
//! use bank_statement_converter::pipeline::{self, Options};
//!
//! let written = pipeline::convert_pdf(Path::new("statement.pdf"), Options::default())?;
//! ```

mod fields;
mod table;
mod types;

pub mod converters;
pub mod detect;
pub mod errors;
pub mod output;
pub mod pdf;
pub mod pipeline;

pub use errors::{ConvertError, ConvertResult};
pub use types::{Bank, Statement, Transaction};
