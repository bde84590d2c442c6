//! Output serializers: normalized CSV per statement, and QIF derived from
//! the CSV.

pub mod csv;
pub mod qif;
