// 🔍 Filter & Selection
// The selection is passed into every call; nothing here remembers it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::company::Company;
use crate::error::{LedgerError, LedgerResult};
use crate::taxonomy::ParentCategory;
use crate::transaction::Transaction;

// ============================================================================
// DATE RANGE
// ============================================================================

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = LedgerError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> LedgerResult<Self> {
        if start > end {
            return Err(LedgerError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(DateRange { start, end })
    }

    /// Range from optional bounds; an open side extends to the data's limit
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> LedgerResult<Option<Self>> {
        match (start, end) {
            (None, None) => Ok(None),
            (start, end) => DateRange::new(
                start.unwrap_or(NaiveDate::MIN),
                end.unwrap_or(NaiveDate::MAX),
            )
            .map(Some),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// What the user is looking at: one company, optionally a date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub company: Company,
    pub date_range: Option<DateRange>,
}

impl Selection {
    pub fn company(company: Company) -> Self {
        Selection {
            company,
            date_range: None,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        tx.company() == self.company
            && self.date_range.map_or(true, |range| range.contains(tx.date()))
    }
}

/// Subset for one company and optional date range, original order preserved
pub fn filter(transactions: &[Transaction], company: Company, date_range: Option<DateRange>) -> Vec<Transaction> {
    let selection = Selection { company, date_range };
    apply(transactions, &selection)
}

pub fn apply(transactions: &[Transaction], selection: &Selection) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| selection.matches(tx))
        .cloned()
        .collect()
}

// ============================================================================
// CATEGORY FILTER
// ============================================================================

/// Parent category with an optional subcategory narrowing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub parent: ParentCategory,
    pub subcategory: Option<String>,
}

impl CategoryFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match tx.category() {
            Some(category) => {
                category.parent == self.parent
                    && self
                        .subcategory
                        .as_deref()
                        .map_or(true, |sub| category.subcategory == sub)
            }
            None => false,
        }
    }
}

/// Keep categorized transactions under a parent (and subcategory)
pub fn by_category(transactions: &[Transaction], category: &CategoryFilter) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| category.matches(tx))
        .cloned()
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleEngine;
    use crate::transaction::TransactionType;
    use rust_decimal_macros::dec;

    fn day(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger() -> Vec<Transaction> {
        vec![
            Transaction::new("Venta paquete", TransactionType::Income, day(15, 1, 2023), dec!(8500), Company::WTravelChile).unwrap(),
            Transaction::new("Compra equipos outdoor", TransactionType::Expense, day(18, 1, 2023), dec!(-3200), Company::WolfTravelChile).unwrap(),
            Transaction::new("Pago arriendo oficina", TransactionType::Expense, day(5, 2, 2023), dec!(-1200), Company::WTravelChile).unwrap(),
            Transaction::new("Comisión agencia aérea", TransactionType::Income, day(20, 2, 2023), dec!(1200), Company::WTravelChile).unwrap(),
        ]
    }

    #[test]
    fn test_filter_by_company_preserves_order() {
        let subset = filter(&ledger(), Company::WTravelChile, None);
        let names: Vec<_> = subset.iter().map(|t| t.description()).collect();
        assert_eq!(names, ["Venta paquete", "Pago arriendo oficina", "Comisión agencia aérea"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(day(15, 1, 2023), day(5, 2, 2023)).unwrap();
        let subset = filter(&ledger(), Company::WTravelChile, Some(range));
        assert_eq!(subset.len(), 2);
        assert_eq!(subset[0].date(), day(15, 1, 2023));
        assert_eq!(subset[1].date(), day(5, 2, 2023));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(DateRange::new(day(2, 1, 2023), day(1, 1, 2023)).is_err());
        assert!(DateRange::new(day(1, 1, 2023), day(1, 1, 2023)).is_ok());
    }

    #[test]
    fn test_open_bounds() {
        assert_eq!(DateRange::from_bounds(None, None).unwrap(), None);

        let from_feb = DateRange::from_bounds(Some(day(1, 2, 2023)), None).unwrap().unwrap();
        let subset = filter(&ledger(), Company::WTravelChile, Some(from_feb));
        assert_eq!(subset.len(), 2);
    }

    #[test]
    fn test_deserialized_range_is_validated() {
        let range: DateRange = serde_json::from_str(r#"{"start":"2023-01-01","end":"2023-01-31"}"#).unwrap();
        assert_eq!(range.start(), day(1, 1, 2023));
        assert_eq!(range.end(), day(31, 1, 2023));

        let inverted = serde_json::from_str::<DateRange>(r#"{"start":"2023-02-01","end":"2023-01-01"}"#);
        assert!(inverted.is_err());

        let selection = serde_json::from_str::<Selection>(
            r#"{"company":"W TRAVEL CHILE","date_range":{"start":"2023-02-01","end":"2023-01-01"}}"#,
        );
        assert!(selection.is_err());
    }

    #[test]
    fn test_category_filter() {
        let engine = RuleEngine::default();
        let txs: Vec<_> = ledger().into_iter().map(|t| t.ensure_categorized(&engine)).collect();

        let income = CategoryFilter { parent: ParentCategory::Income, subcategory: None };
        assert_eq!(by_category(&txs, &income).len(), 2);

        let commissions = CategoryFilter {
            parent: ParentCategory::Income,
            subcategory: Some("Comisiones".to_string()),
        };
        let subset = by_category(&txs, &commissions);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].description(), "Comisión agencia aérea");
    }

    #[test]
    fn test_uncategorized_never_matches_category_filter() {
        let filter = CategoryFilter { parent: ParentCategory::Income, subcategory: None };
        assert!(by_category(&ledger(), &filter).is_empty());
    }
}
