use crate::errors::{ConvertError, ConvertResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One ledger row. Amounts are signed: debits negative, credits positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

/// Which bank's statement template produced a document.
///
/// Determined once per document by the detector and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bank {
    /// Commonwealth Bank of Australia
    #[serde(rename = "cba")]
    Cba,
    /// Australia and New Zealand Banking Group
    #[serde(rename = "anz")]
    Anz,
    /// National Australia Bank
    #[serde(rename = "nab")]
    Nab,
    /// Westpac Banking Corporation
    #[serde(rename = "wbc")]
    Wbc,
    /// Bendigo and Adelaide Bank
    #[serde(rename = "ben")]
    Ben,
    /// Macquarie Bank
    #[serde(rename = "mqg")]
    Mqg,
    /// Zeller
    #[serde(rename = "zel")]
    Zel,
}

impl Bank {
    pub fn code(&self) -> &'static str {
        match self {
            Bank::Cba => "cba",
            Bank::Anz => "anz",
            Bank::Nab => "nab",
            Bank::Wbc => "wbc",
            Bank::Ben => "ben",
            Bank::Mqg => "mqg",
            Bank::Zel => "zel",
        }
    }
}

/// A fully parsed statement: the transaction rows plus whatever summary figures
/// the bank printed on the document.
///
/// Not every template prints every figure, hence the `Option`s. Whichever are
/// present participate in [`Statement::reconcile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub bank: Bank,
    pub transactions: Vec<Transaction>,
    pub opening_balance: Option<Decimal>,
    pub closing_balance: Option<Decimal>,
    pub total_credits: Option<Decimal>,
    pub total_debits: Option<Decimal>,
}

impl Statement {
    pub fn new(bank: Bank) -> Self {
        Statement {
            bank,
            transactions: Vec::new(),
            opening_balance: None,
            closing_balance: None,
            total_credits: None,
            total_debits: None,
        }
    }

    /// Sum of all positive amounts.
    pub fn sum_credits(&self) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.amount.is_sign_positive())
            .map(|t| t.amount)
            .sum()
    }

    /// Sum of all negative amounts. Negative (or zero) by construction.
    pub fn sum_debits(&self) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.amount.is_sign_negative())
            .map(|t| t.amount)
            .sum()
    }

    /// Net movement over the statement period.
    pub fn net_movement(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Cross-check computed aggregates against every summary figure the
    /// statement printed, rounding to 2 decimal places.
    ///
    /// A mismatch means a parsing bug or template drift and aborts the
    /// conversion; there is no partial-result salvage.
    pub fn reconcile(&self) -> ConvertResult<()> {
        if let Some(printed) = self.total_credits {
            let computed = self.sum_credits().round_dp(2);
            if computed != printed.round_dp(2) {
                return Err(ConvertError::TotalsMismatch {
                    label: "credits",
                    computed,
                    printed,
                });
            }
        }

        if let Some(printed) = self.total_debits {
            let computed = self.sum_debits().round_dp(2);
            if computed != printed.round_dp(2) {
                return Err(ConvertError::TotalsMismatch {
                    label: "debits",
                    computed,
                    printed,
                });
            }
        }

        if let (Some(opening), Some(closing)) = (self.opening_balance, self.closing_balance) {
            let computed = (opening + self.net_movement()).round_dp(2);
            if computed != closing.round_dp(2) {
                return Err(ConvertError::BalanceMismatch {
                    computed,
                    printed: closing,
                    context: "closing balance".to_string(),
                });
            }
        }

        Ok(())
    }
}
