// ⚠️ Ledger Errors - typed failures for record validation
// I/O and config boundaries wrap these in anyhow with context.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Date text is not `DD/MM/YYYY`
    #[error("invalid date {0:?}, expected DD/MM/YYYY")]
    InvalidDate(String),

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    /// Amount is zero, so it carries no sign
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// Sign of the amount disagrees with the transaction type
    #[error("amount {amount} does not match transaction type {transaction_type}")]
    SignMismatch {
        amount: String,
        transaction_type: String,
    },

    #[error("unknown transaction type {0:?}, expected Ingreso or Gasto")]
    UnknownTransactionType(String),

    #[error("unknown company {0:?}")]
    UnknownCompany(String),

    #[error("unknown parent category {0:?}")]
    UnknownParentCategory(String),

    /// Subcategory is not listed under the claimed parent
    #[error("subcategory {subcategory:?} does not belong to {parent:?}")]
    CategoryNotInTaxonomy { parent: String, subcategory: String },

    /// Start date after end date
    #[error("date range start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    /// Income fallback outside Ingresos, or expense fallback inside it
    #[error("fallback parent {parent:?} cannot hold {transaction_type} transactions")]
    FallbackSideMismatch {
        parent: String,
        transaction_type: String,
    },

    #[error("unknown categorizer variant {0:?}")]
    UnknownVariant(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
