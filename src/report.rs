// 📋 Dashboard Report - everything one dashboard view needs
//
// filter → categorize-if-needed → aggregate, recomputed from scratch per call.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    self, Averages, CategorySummaryRow, DailyPoint, LabeledTotal, MonthlyCategoryPoint,
    MonthlyPoint, Ratios, Rollup, RollupScope, Totals,
};
use crate::company::Company;
use crate::filter::{self, Selection};
use crate::rules::RuleEngine;
use crate::transaction::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Days in the cash-flow window
    pub window_days: usize,
    /// Expense subcategories listed in the top chart
    pub top_subcategories: usize,
    pub recent_count: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            window_days: aggregate::DEFAULT_WINDOW_DAYS,
            top_subcategories: 5,
            recent_count: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub company: Company,
    pub logo: &'static str,
    pub color: &'static str,
    pub selection: Selection,
    pub today: NaiveDate,
    pub transaction_count: usize,
    pub totals: Totals,
    pub ratios: Ratios,
    pub averages: Averages,
    pub daily: Vec<DailyPoint>,
    pub monthly: Vec<MonthlyPoint>,
    pub monthly_by_parent: Vec<MonthlyCategoryPoint>,
    pub by_parent: Vec<LabeledTotal>,
    pub top_subcategories: Vec<LabeledTotal>,
    pub by_type: Vec<LabeledTotal>,
    pub expense_summary: Vec<CategorySummaryRow>,
    pub recent: Vec<Transaction>,
}

impl DashboardReport {
    pub fn build(
        transactions: &[Transaction],
        selection: &Selection,
        options: &ReportOptions,
        engine: &RuleEngine,
        today: NaiveDate,
    ) -> Self {
        let selected: Vec<Transaction> = filter::apply(transactions, selection)
            .into_iter()
            .map(|tx| tx.ensure_categorized(engine))
            .collect();

        tracing::debug!(
            "Building report for {}: {} of {} transactions selected",
            selection.company,
            selected.len(),
            transactions.len()
        );

        let totals = aggregate::totals(&selected);

        let parents = aggregate::rollup(&selected, RollupScope::All, aggregate::by_parent);
        let subcategories =
            aggregate::rollup(&selected, RollupScope::ExpensesOnly, aggregate::by_subcategory);
        let types = aggregate::rollup(&selected, RollupScope::All, aggregate::by_type);

        let company = selection.company;
        DashboardReport {
            company,
            logo: company.logo(),
            color: company.primary_color(),
            selection: *selection,
            today,
            transaction_count: selected.len(),
            totals,
            ratios: aggregate::ratios(&totals),
            averages: aggregate::averages(&totals),
            daily: aggregate::daily_series(&selected, today, options.window_days),
            monthly: aggregate::monthly_series(&selected),
            monthly_by_parent: aggregate::monthly_by_parent(&selected),
            by_parent: Rollup::labeled(parents.entries(), |p| p.label().to_string()),
            top_subcategories: Rollup::labeled(&subcategories.top(options.top_subcategories), |s| s.clone()),
            by_type: Rollup::labeled(types.entries(), |t| t.label().to_string()),
            expense_summary: aggregate::category_summary(
                &selected,
                RollupScope::ExpensesOnly,
                aggregate::by_subcategory,
            ),
            recent: aggregate::recent(&selected, options.recent_count),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}

/// `$1,234,567` style, rounded to whole units
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// `12.3%`
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", value.round_dp(1))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DateRange;
    use crate::fixtures;
    use crate::transaction::TransactionType;
    use rust_decimal_macros::dec;

    fn day(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn build(selection: Selection) -> DashboardReport {
        DashboardReport::build(
            &fixtures::sample_transactions(),
            &selection,
            &ReportOptions::default(),
            &RuleEngine::default(),
            day(15, 7, 2024),
        )
    }

    #[test]
    fn test_report_only_contains_selected_company() {
        let report = build(Selection::company(Company::WolfTravelChile));
        assert!(!report.is_empty());
        assert_eq!(report.transaction_count, fixtures::sample_for(Company::WolfTravelChile).len());
        assert!(report.recent.iter().all(|tx| tx.company() == Company::WolfTravelChile));
        assert_eq!(report.logo, Company::WolfTravelChile.logo());
    }

    #[test]
    fn test_report_views_are_consistent() {
        let report = build(Selection::company(Company::WTravelChile));
        let t = report.totals;

        assert_eq!(report.daily.len(), 7);
        assert_eq!(report.recent.len(), 5);
        assert!(report.top_subcategories.len() <= 5);
        assert!(report.recent.iter().all(|tx| tx.category().is_some()));

        let monthly_net: Decimal = report.monthly.iter().map(|m| m.amount).sum();
        assert_eq!(monthly_net, t.balance);

        let typed: Decimal = report.by_type.iter().map(|e| e.total).sum();
        assert_eq!(typed, t.total_income + t.total_expenses);

        let parents: Decimal = report.by_parent.iter().map(|e| e.total).sum();
        assert_eq!(parents, typed);

        let summary: Decimal = report.expense_summary.iter().map(|r| r.total).sum();
        assert_eq!(summary, t.total_expenses);
    }

    #[test]
    fn test_top_subcategories_sorted_desc() {
        let report = build(Selection::company(Company::HelpMeTravelSpa));
        let totals: Vec<_> = report.top_subcategories.iter().map(|e| e.total).collect();
        let mut sorted = totals.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(totals, sorted);
    }

    #[test]
    fn test_date_range_narrows_report() {
        let range = DateRange::new(day(1, 1, 2023), day(31, 1, 2023)).unwrap();
        let report = build(Selection::company(Company::WTravelChile).with_range(range));
        assert!(report.monthly.iter().all(|m| m.label == "2023-01"));
        assert!(report.recent.iter().all(|tx| range.contains(tx.date())));
    }

    #[test]
    fn test_empty_selection_yields_zero_report() {
        let range = DateRange::new(day(1, 1, 1990), day(31, 12, 1990)).unwrap();
        let report = build(Selection::company(Company::WTravelChile).with_range(range));
        assert!(report.is_empty());
        assert_eq!(report.totals, Totals::default());
        assert_eq!(report.ratios, Ratios::default());
        assert_eq!(report.daily.len(), 7);
        assert!(report.monthly.is_empty());
        assert!(report.by_parent.is_empty());
    }

    #[test]
    fn test_totals_example_through_report() {
        let txs = vec![
            Transaction::new("Venta paquete turístico Europa", TransactionType::Income, day(15, 1, 2023), dec!(8500), Company::WTravelChile).unwrap(),
            Transaction::new("Pago arriendo oficina", TransactionType::Expense, day(5, 1, 2023), dec!(-1200), Company::WTravelChile).unwrap(),
        ];
        let report = DashboardReport::build(
            &txs,
            &Selection::default(),
            &ReportOptions::default(),
            &RuleEngine::default(),
            day(15, 1, 2023),
        );

        assert_eq!(report.totals.balance, dec!(7300));
        assert_eq!(report.daily[6].income, dec!(8500));
        assert_eq!(report.expense_summary[0].label, "Arriendo de Oficina");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["company"], "W TRAVEL CHILE");
        assert_eq!(json["monthly"][0]["label"], "2023-01");
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(format_money(dec!(7300)), "$7,300");
        assert_eq!(format_money(dec!(-1200)), "-$1,200");
        assert_eq!(format_money(dec!(1234567.6)), "$1,234,568");
        assert_eq!(format_money(dec!(999)), "$999");
        assert_eq!(format_money(Decimal::ZERO), "$0");
        assert_eq!(format_percent(dec!(14.1176)), "14.1%");
    }
}
