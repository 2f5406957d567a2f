// 💸 Transaction - immutable dated, signed monetary record
//
// Invariant: sign(amount) == +1 for Income, -1 for Expense.
// The category pair is absent until the categorizer runs, then never recomputed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::company::Company;
use crate::error::{LedgerError, LedgerResult};
use crate::rules::RuleEngine;
use crate::taxonomy::CategoryAssignment;

/// Source date format (day/month/year)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Largest accepted magnitude; keeps every sum and ratio inside `Decimal` range
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Amounts are cents at most
pub const AMOUNT_SCALE: u32 = 2;

// ============================================================================
// TRANSACTION TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "Ingreso", alias = "Income")]
    Income,
    #[serde(rename = "Gasto", alias = "Expense")]
    Expense,
}

impl TransactionType {
    /// Label as written in the `Tipo` column
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Ingreso",
            TransactionType::Expense => "Gasto",
        }
    }

    /// Expected sign of the amount
    pub fn sign(&self) -> Decimal {
        match self {
            TransactionType::Income => Decimal::ONE,
            TransactionType::Expense => Decimal::NEGATIVE_ONE,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ingreso" | "income" => Ok(TransactionType::Income),
            "gasto" | "expense" => Ok(TransactionType::Expense),
            _ => Err(LedgerError::UnknownTransactionType(s.to_string())),
        }
    }
}

// ============================================================================
// PARSING HELPERS
// ============================================================================

/// Parse a `DD/MM/YYYY` date
pub fn parse_date(text: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDate(text.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a signed amount such as `-1200`, `8500.50` or `$1,200`
pub fn parse_amount(text: &str) -> LedgerResult<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();

    Decimal::from_str(&cleaned).map_err(|_| LedgerError::InvalidAmount(text.to_string()))
}

// ============================================================================
// TRANSACTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    description: String,

    #[serde(rename = "type")]
    transaction_type: TransactionType,

    date: NaiveDate,

    amount: Decimal,

    company: Company,

    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<CategoryAssignment>,
}

impl Transaction {
    /// Create a transaction, enforcing the sign invariant and amount bounds
    pub fn new(
        description: impl Into<String>,
        transaction_type: TransactionType,
        date: NaiveDate,
        amount: Decimal,
        company: Company,
    ) -> LedgerResult<Self> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if amount.abs() > MAX_AMOUNT || amount.normalize().scale() > AMOUNT_SCALE {
            return Err(LedgerError::InvalidAmount(amount.to_string()));
        }

        let is_positive = amount.is_sign_positive();
        if is_positive != (transaction_type == TransactionType::Income) {
            return Err(LedgerError::SignMismatch {
                amount: amount.to_string(),
                transaction_type: transaction_type.label().to_string(),
            });
        }

        Ok(Transaction {
            description: description.into(),
            transaction_type,
            date,
            amount,
            company,
            category: None,
        })
    }

    /// Create from an unsigned magnitude, taking the sign from the type
    pub fn from_magnitude(
        description: impl Into<String>,
        transaction_type: TransactionType,
        date: NaiveDate,
        magnitude: Decimal,
        company: Company,
    ) -> LedgerResult<Self> {
        let amount = magnitude.abs() * transaction_type.sign();
        Transaction::new(description, transaction_type, date, amount, company)
    }

    /// Builder pattern: attach a category pair
    pub fn with_category(mut self, category: CategoryAssignment) -> Self {
        self.category = Some(category);
        self
    }

    /// Categorize only if no category was assigned yet
    pub fn ensure_categorized(self, engine: &RuleEngine) -> Self {
        if self.category.is_some() {
            return self;
        }
        let category = engine.categorize(&self.description, self.transaction_type);
        self.with_category(category)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Absolute value of the amount
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }

    pub fn company(&self) -> Company {
        self.company
    }

    pub fn category(&self) -> Option<&CategoryAssignment> {
        self.category.as_ref()
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::ParentCategory;
    use rust_decimal_macros::dec;

    fn day(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sign_must_match_type() {
        let ok = Transaction::new("Venta", TransactionType::Income, day(1, 1, 2023), dec!(10), Company::WTravelChile);
        assert!(ok.is_ok());

        let err = Transaction::new("Venta", TransactionType::Income, day(1, 1, 2023), dec!(-10), Company::WTravelChile)
            .unwrap_err();
        assert!(matches!(err, LedgerError::SignMismatch { .. }));

        let err = Transaction::new("Pago", TransactionType::Expense, day(1, 1, 2023), dec!(10), Company::WTravelChile)
            .unwrap_err();
        assert!(matches!(err, LedgerError::SignMismatch { .. }));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let err = Transaction::new("Nada", TransactionType::Income, day(1, 1, 2023), Decimal::ZERO, Company::WTravelChile)
            .unwrap_err();
        assert_eq!(err, LedgerError::ZeroAmount);
    }

    #[test]
    fn test_from_magnitude_applies_sign() {
        let tx = Transaction::from_magnitude(
            "Pago arriendo oficina",
            TransactionType::Expense,
            day(5, 1, 2023),
            dec!(1200),
            Company::WTravelChile,
        )
        .unwrap();
        assert_eq!(tx.amount(), dec!(-1200));
        assert_eq!(tx.magnitude(), dec!(1200));
    }

    #[test]
    fn test_out_of_range_amounts_rejected() {
        let huge = parse_amount("79228162514264337593543950335").unwrap();
        let err = Transaction::new("Venta", TransactionType::Income, day(1, 1, 2023), huge, Company::WTravelChile)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let tiny = parse_amount("0.0000000000000000000000000001").unwrap();
        let err = Transaction::new("Venta", TransactionType::Income, day(1, 1, 2023), tiny, Company::WTravelChile)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
        assert!(Transaction::new("Venta", TransactionType::Income, day(1, 1, 2023), MAX_AMOUNT, Company::WTravelChile).is_ok());
        assert!(Transaction::new("Pago", TransactionType::Expense, day(1, 1, 2023), dec!(-0.01), Company::WTravelChile).is_ok());
        assert!(Transaction::new("Pago", TransactionType::Expense, day(1, 1, 2023), dec!(-12.500), Company::WTravelChile).is_ok());
    }

    #[test]
    fn test_parse_date_day_month_year() {
        assert_eq!(parse_date("15/01/2023").unwrap(), day(15, 1, 2023));
        assert!(parse_date("2023-01-15").is_err());
        assert!(parse_date("31/02/2023").is_err());
        assert_eq!(format_date(day(5, 3, 2024)), "05/03/2024");
    }

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(parse_amount("-1200").unwrap(), dec!(-1200));
        assert_eq!(parse_amount(" 8500.50 ").unwrap(), dec!(8500.50));
        assert_eq!(parse_amount("$1,200").unwrap(), dec!(1200));
        assert!(parse_amount("mil").is_err());
    }

    #[test]
    fn test_transaction_type_parsing() {
        assert_eq!("Ingreso".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!("EXPENSE".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert!("Transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_ensure_categorized_keeps_existing_category() {
        let engine = RuleEngine::default();
        let preset = CategoryAssignment::new(ParentCategory::Marketing, "Eventos").unwrap();
        let tx = Transaction::new("Pago arriendo oficina", TransactionType::Expense, day(5, 1, 2023), dec!(-1200), Company::WTravelChile)
            .unwrap()
            .with_category(preset.clone());

        let tx = tx.ensure_categorized(&engine);
        assert_eq!(tx.category(), Some(&preset));
    }

    #[test]
    fn test_ensure_categorized_fills_missing_category() {
        let engine = RuleEngine::default();
        let tx = Transaction::new("Pago arriendo oficina", TransactionType::Expense, day(5, 1, 2023), dec!(-1200), Company::WTravelChile)
            .unwrap()
            .ensure_categorized(&engine);

        let category = tx.category().unwrap();
        assert_eq!(category.parent, ParentCategory::OperatingExpenses);
        assert_eq!(category.subcategory, "Arriendo de Oficina");
    }
}
