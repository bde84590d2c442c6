use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while converting a bank PDF statement
#[derive(Error, Debug)]
pub enum ConvertError {
    /// No known bank template matched the first page's text
    #[error("could not detect a known bank template in the first page")]
    UnknownBank,

    /// The PDF library could not open or read the document
    #[error("failed to read PDF: {0}")]
    Pdf(String),

    /// Error reading or writing an output file on disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing or deserializing CSV rows
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ── Cell-level parse failures ───────────────────────────────────────────

    /// A cell expected to hold a date did not parse
    #[error("invalid date {value:?} in {context}")]
    InvalidDate { value: String, context: &'static str },

    /// A cell expected to hold a monetary figure did not parse
    #[error("invalid amount {value:?} in {context}")]
    InvalidAmount { value: String, context: &'static str },

    /// A summary figure the template always prints was not found
    #[error("missing {0} figure in statement summary")]
    MissingSummaryFigure(&'static str),

    /// A CSV file offered for QIF conversion lacks a required column
    #[error("CSV is missing the {0} column")]
    MissingColumn(&'static str),

    /// No transaction rows were recovered from the document
    #[error("no transaction rows found in the document")]
    NoTransactions,

    // ── Reconciliation failures (always fatal) ──────────────────────────────

    /// Running balance diverged from a balance printed on the statement
    #[error("running balance {computed} does not match printed balance {printed} at {context}")]
    BalanceMismatch {
        computed: Decimal,
        printed: Decimal,
        context: String,
    },

    /// Computed credit/debit totals diverged from the printed summary totals
    #[error("computed {label} {computed} does not match printed total {printed}")]
    TotalsMismatch {
        label: &'static str,
        computed: Decimal,
        printed: Decimal,
    },

    /// Parallel date/description/amount sequences ended up with unequal lengths
    #[error("row counts do not line up: {dates} dates, {details} details, {amounts} amounts")]
    RowCountMismatch {
        dates: usize,
        details: usize,
        amounts: usize,
    },
}

/// Convenient alias for Result with the crate's error type
pub type ConvertResult<T> = Result<T, ConvertError>;
