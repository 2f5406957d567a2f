// 📊 Aggregator - pure reductions over a slice of transactions
//
// Every function here is deterministic, side-effect free, and returns zeros or
// empty series for empty input. Ratios use 0 when income is 0.

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::taxonomy::{CategoryAssignment, ParentCategory};
use crate::transaction::{Transaction, TransactionType};

/// Trailing window used by the cash-flow chart
pub const DEFAULT_WINDOW_DAYS: usize = 7;

/// Descriptions listed per row in a category summary
const SUMMARY_EXAMPLES: usize = 3;

// ============================================================================
// TOTALS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for tx in transactions {
        let amount = tx.amount();
        if amount > Decimal::ZERO {
            totals.total_income += amount;
            totals.income_count += 1;
        } else if amount < Decimal::ZERO {
            totals.total_expenses += amount.abs();
            totals.expense_count += 1;
        }
    }

    totals.balance = totals.total_income - totals.total_expenses;
    totals
}

// ============================================================================
// RATIOS & AVERAGES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Ratios {
    /// expenses / income × 100
    pub expense_ratio: Decimal,
    /// balance / income × 100
    pub profit_margin: Decimal,
    /// 100 − expense ratio
    pub efficiency: Decimal,
}

fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

pub fn ratios(totals: &Totals) -> Ratios {
    if totals.total_income.is_zero() {
        return Ratios::default();
    }

    let expense_ratio = percent_of(totals.total_expenses, totals.total_income);
    Ratios {
        expense_ratio,
        profit_margin: percent_of(totals.balance, totals.total_income),
        efficiency: Decimal::ONE_HUNDRED.saturating_sub(expense_ratio),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Averages {
    pub average_income: Decimal,
    /// Mean of |amount| over expenses
    pub average_expense: Decimal,
}

pub fn averages(totals: &Totals) -> Averages {
    let mean = |sum: Decimal, count: usize| {
        if count == 0 {
            Decimal::ZERO
        } else {
            sum / Decimal::from(count)
        }
    };

    Averages {
        average_income: mean(totals.total_income, totals.income_count),
        average_expense: mean(totals.total_expenses, totals.expense_count),
    }
}

// ============================================================================
// DAILY SERIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    /// `DD/MM`
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// One point per day for the `days` days ending at `end`, oldest first, zero-filled
pub fn daily_series(transactions: &[Transaction], end: NaiveDate, days: usize) -> Vec<DailyPoint> {
    let mut by_day: HashMap<NaiveDate, (Decimal, Decimal)> = HashMap::new();
    for tx in transactions {
        let entry = by_day.entry(tx.date()).or_default();
        if tx.amount() > Decimal::ZERO {
            entry.0 += tx.amount();
        } else {
            entry.1 += tx.amount().abs();
        }
    }

    (0..days)
        .rev()
        .filter_map(|offset| end.checked_sub_days(Days::new(offset as u64)))
        .map(|date| {
            let (income, expense) = by_day.get(&date).copied().unwrap_or_default();
            DailyPoint {
                date,
                label: date.format("%d/%m").to_string(),
                income,
                expense,
            }
        })
        .collect()
}

// ============================================================================
// MONTHLY SERIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    /// `YYYY-MM`
    pub label: String,
    /// Signed net sum for the month
    pub amount: Decimal,
    pub income: Decimal,
    pub expenses: Decimal,
}

fn month_label(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// One row per month present, chronological
pub fn monthly_series(transactions: &[Transaction]) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();

    for tx in transactions {
        let key = (tx.date().year(), tx.date().month());
        let entry = months.entry(key).or_default();
        if tx.amount() > Decimal::ZERO {
            entry.0 += tx.amount();
        } else {
            entry.1 += tx.amount().abs();
        }
    }

    months
        .into_iter()
        .map(|((year, month), (income, expenses))| MonthlyPoint {
            year,
            month,
            label: month_label(year, month),
            amount: income - expenses,
            income,
            expenses,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCategoryPoint {
    pub label: String,
    pub parent: ParentCategory,
    /// Signed sum for this parent in this month
    pub amount: Decimal,
}

/// Signed sums per (month, parent), chronological then taxonomy order.
/// Uncategorized transactions are left out.
pub fn monthly_by_parent(transactions: &[Transaction]) -> Vec<MonthlyCategoryPoint> {
    let mut groups: BTreeMap<((i32, u32), ParentCategory), Decimal> = BTreeMap::new();

    for tx in transactions {
        if let Some(category) = tx.category() {
            let key = ((tx.date().year(), tx.date().month()), category.parent);
            *groups.entry(key).or_default() += tx.amount();
        }
    }

    groups
        .into_iter()
        .map(|(((year, month), parent), amount)| MonthlyCategoryPoint {
            label: month_label(year, month),
            parent,
            amount,
        })
        .collect()
}

// ============================================================================
// ROLLUPS
// ============================================================================

/// Which transactions a rollup considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RollupScope {
    #[default]
    All,
    ExpensesOnly,
}

impl RollupScope {
    fn includes(&self, tx: &Transaction) -> bool {
        match self {
            RollupScope::All => true,
            RollupScope::ExpensesOnly => tx.is_expense(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollupEntry<K> {
    pub key: K,
    /// Sum of |amount|
    pub total: Decimal,
    pub count: usize,
}

/// Grouped sums in first-appearance order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rollup<K> {
    entries: Vec<RollupEntry<K>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledTotal {
    pub label: String,
    pub total: Decimal,
    pub count: usize,
}

impl<K: Clone> Rollup<K> {
    pub fn entries(&self) -> &[RollupEntry<K>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All groups by total descending; ties keep first-appearance order
    pub fn sorted_desc(&self) -> Vec<RollupEntry<K>> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.total.cmp(&a.total));
        sorted
    }

    /// The `k` largest groups
    pub fn top(&self, k: usize) -> Vec<RollupEntry<K>> {
        let mut sorted = self.sorted_desc();
        sorted.truncate(k);
        sorted
    }

    pub fn grand_total(&self) -> Decimal {
        self.entries.iter().map(|e| e.total).sum()
    }

    pub fn labeled<F>(entries: &[RollupEntry<K>], label: F) -> Vec<LabeledTotal>
    where
        F: Fn(&K) -> String,
    {
        entries
            .iter()
            .map(|e| LabeledTotal {
                label: label(&e.key),
                total: e.total,
                count: e.count,
            })
            .collect()
    }
}

impl<K: PartialEq> Rollup<K> {
    pub fn get(&self, key: &K) -> Option<Decimal> {
        self.entries.iter().find(|e| &e.key == key).map(|e| e.total)
    }
}

/// Group by `key_fn`, summing |amount|; transactions mapping to None are skipped
pub fn rollup<K, F>(transactions: &[Transaction], scope: RollupScope, key_fn: F) -> Rollup<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&Transaction) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut entries: Vec<RollupEntry<K>> = Vec::new();

    for tx in transactions.iter().filter(|tx| scope.includes(tx)) {
        let Some(key) = key_fn(tx) else { continue };

        let position = *index.entry(key.clone()).or_insert_with(|| {
            entries.push(RollupEntry {
                key,
                total: Decimal::ZERO,
                count: 0,
            });
            entries.len() - 1
        });

        let entry = &mut entries[position];
        entry.total += tx.magnitude();
        entry.count += 1;
    }

    Rollup { entries }
}

/// Key: parent category
pub fn by_parent(tx: &Transaction) -> Option<ParentCategory> {
    tx.category().map(|c| c.parent)
}

/// Key: subcategory label
pub fn by_subcategory(tx: &Transaction) -> Option<String> {
    tx.category().map(|c| c.subcategory.clone())
}

/// Key: full (parent, subcategory) pair
pub fn by_category(tx: &Transaction) -> Option<CategoryAssignment> {
    tx.category().cloned()
}

/// Key: transaction type
pub fn by_type(tx: &Transaction) -> Option<TransactionType> {
    Some(tx.transaction_type())
}

// ============================================================================
// CATEGORY SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummaryRow {
    pub label: String,
    pub total: Decimal,
    pub count: usize,
    /// First few descriptions, `...` appended when there are more
    pub examples: String,
}

/// Totals, counts and example descriptions per group, largest first
pub fn category_summary<F>(transactions: &[Transaction], scope: RollupScope, label_fn: F) -> Vec<CategorySummaryRow>
where
    F: Fn(&Transaction) -> Option<String>,
{
    let mut descriptions: HashMap<String, Vec<&str>> = HashMap::new();
    for tx in transactions.iter().filter(|tx| scope.includes(tx)) {
        if let Some(label) = label_fn(tx) {
            descriptions.entry(label).or_default().push(tx.description());
        }
    }

    rollup(transactions, scope, &label_fn)
        .sorted_desc()
        .into_iter()
        .map(|entry| {
            let all = descriptions.get(&entry.key).map(Vec::as_slice).unwrap_or(&[]);
            let mut examples = all
                .iter()
                .take(SUMMARY_EXAMPLES)
                .copied()
                .collect::<Vec<_>>()
                .join(", ");
            if all.len() > SUMMARY_EXAMPLES {
                examples.push_str("...");
            }

            CategorySummaryRow {
                label: entry.key,
                total: entry.total,
                count: entry.count,
                examples,
            }
        })
        .collect()
}

// ============================================================================
// RECENT
// ============================================================================

/// The `n` most recent transactions; equal dates keep their original order
pub fn recent(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date().cmp(&a.date()));
    sorted.into_iter().take(n).cloned().collect()
}

// ============================================================================
// TESTS
// ============================================================================
