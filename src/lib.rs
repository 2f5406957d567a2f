// Tri-Ledger - Core Library
// Transaction aggregation and categorization for the travel company dashboards

pub mod error;
pub mod company;
pub mod taxonomy;
pub mod transaction;
pub mod rules;       // Categorizer: keyword rules, first match wins
pub mod fixtures;    // Built-in sample ledger
pub mod source;      // CSV + fixture sources, transaction store
pub mod filter;      // Company / date range / category selection
pub mod aggregate;   // Totals, series, rollups, ratios
pub mod report;      // One call that builds a full dashboard view
pub mod config;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use error::{LedgerError, LedgerResult};
pub use company::Company;
pub use taxonomy::{parent_of, CategoryAssignment, ParentCategory};
pub use transaction::{Transaction, TransactionType};
pub use rules::{CategorizerVariant, CategoryRule, Classification, RuleEngine};
pub use source::{
    get_source, load_csv, read_csv, write_csv,
    CsvDirectorySource, FixtureSource, LoadReport, TransactionSource, TransactionStore,
};
pub use filter::{CategoryFilter, DateRange, Selection};
pub use aggregate::{
    Averages, CategorySummaryRow, DailyPoint, LabeledTotal, MonthlyCategoryPoint, MonthlyPoint,
    Ratios, Rollup, RollupEntry, RollupScope, Totals,
};
pub use report::{DashboardReport, ReportOptions};
pub use config::DashboardConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
