// 📂 Transaction Sources - fixtures or per-company CSV files
//
// CSV header: Descripción,Tipo,Fecha,Monto,Empresa[,Categoria_Padre,Categoria_Hijo]
// Rows that fail validation are skipped and counted, never fatal.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::company::Company;
use crate::error::LedgerResult;
use crate::fixtures;
use crate::rules::RuleEngine;
use crate::taxonomy::CategoryAssignment;
use crate::transaction::{format_date, parse_amount, parse_date, Transaction, TransactionType};

/// Column order used when writing CSV
pub const CSV_HEADERS: [&str; 7] = [
    "Descripción",
    "Tipo",
    "Fecha",
    "Monto",
    "Empresa",
    "Categoria_Padre",
    "Categoria_Hijo",
];

// ============================================================================
// CSV ROW
// ============================================================================

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Descripción", alias = "Descripcion")]
    description: String,

    #[serde(rename = "Tipo")]
    transaction_type: String,

    #[serde(rename = "Fecha")]
    date: String,

    #[serde(rename = "Monto")]
    amount: String,

    #[serde(rename = "Empresa")]
    company: String,

    #[serde(rename = "Categoria_Padre", default)]
    parent: Option<String>,

    #[serde(rename = "Categoria_Hijo", default)]
    subcategory: Option<String>,
}

impl CsvRow {
    fn into_transaction(self, line: usize) -> LedgerResult<Transaction> {
        let transaction_type: TransactionType = self.transaction_type.parse()?;
        let date = parse_date(&self.date)?;
        let amount = parse_amount(&self.amount)?;
        let company: Company = self.company.parse()?;

        let tx = Transaction::new(self.description, transaction_type, date, amount, company)?;

        match (self.parent.as_deref(), self.subcategory.as_deref()) {
            (Some(parent), Some(sub)) => match CategoryAssignment::from_labels(parent, sub) {
                Ok(category) => Ok(tx.with_category(category)),
                Err(e) => {
                    tracing::warn!("Line {}: dropping category ({}), will recategorize", line, e);
                    Ok(tx)
                }
            },
            _ => Ok(tx),
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Result of reading one CSV source
#[derive(Debug, Default)]
pub struct LoadReport {
    pub transactions: Vec<Transaction>,
    pub skipped: usize,
}

/// Read transactions from any CSV reader
pub fn read_csv<R: Read>(reader: R, source_name: &str) -> LoadReport {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut report = LoadReport::default();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // +2 because: 1-indexed + header row
        let line = index + 2;
        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(|row| row.into_transaction(line).map_err(|e| e.to_string()));

        match parsed {
            Ok(tx) => report.transactions.push(tx),
            Err(e) => {
                tracing::warn!("{}:{}: skipping row: {}", source_name, line, e);
                report.skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Read {} transactions from {} ({} skipped)",
        report.transactions.len(),
        source_name,
        report.skipped
    );
    report
}

/// Load a CSV file from disk
pub fn load_csv(path: &Path) -> Result<LoadReport> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    Ok(read_csv(file, &path.display().to_string()))
}

/// Write transactions as CSV, filling the category columns when known
pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_HEADERS)?;

    for tx in transactions {
        let (parent, sub) = match tx.category() {
            Some(c) => (c.parent.label().to_string(), c.subcategory.clone()),
            None => (String::new(), String::new()),
        };
        writer.write_record([
            tx.description().to_string(),
            tx.transaction_type().label().to_string(),
            format_date(tx.date()),
            tx.amount().to_string(),
            tx.company().name().to_string(),
            parent,
            sub,
        ])?;
    }

    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

// ============================================================================
// SOURCES
// ============================================================================

/// Where a company's transactions come from
pub trait TransactionSource: Send + Sync {
    /// Load one company's transactions; a missing source yields an empty list
    fn load(&self, company: Company) -> Result<Vec<Transaction>>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Built-in sample data
pub struct FixtureSource;

impl TransactionSource for FixtureSource {
    fn load(&self, company: Company) -> Result<Vec<Transaction>> {
        Ok(fixtures::sample_for(company))
    }

    fn describe(&self) -> String {
        "built-in sample data".to_string()
    }
}

/// One CSV per company inside a directory
pub struct CsvDirectorySource {
    dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CsvDirectorySource { dir: dir.into() }
    }

    pub fn path_for(&self, company: Company) -> PathBuf {
        self.dir.join(company.data_file())
    }
}

impl TransactionSource for CsvDirectorySource {
    fn load(&self, company: Company) -> Result<Vec<Transaction>> {
        let path = self.path_for(company);
        if !path.exists() {
            tracing::warn!("CSV file not found for {}: {}", company, path.display());
            return Ok(Vec::new());
        }
        Ok(load_csv(&path)?.transactions)
    }

    fn describe(&self) -> String {
        format!("CSV files in {}", self.dir.display())
    }
}

/// Pick a source: a data directory when configured, fixtures otherwise
pub fn get_source(data_dir: Option<&Path>) -> Box<dyn TransactionSource> {
    match data_dir {
        Some(dir) => Box::new(CsvDirectorySource::new(dir)),
        None => Box::new(FixtureSource),
    }
}

// ============================================================================
// STORE
// ============================================================================

/// Read-only collection of every company's transactions, in load order
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        TransactionStore { transactions }
    }

    /// Load every company from a source
    pub fn load(source: &dyn TransactionSource) -> Result<Self> {
        let mut transactions = Vec::new();
        for company in Company::ALL {
            let loaded = source
                .load(company)
                .with_context(|| format!("Failed to load {} from {}", company, source.describe()))?;
            tracing::debug!("Loaded {} transactions for {}", loaded.len(), company);
            transactions.extend(loaded);
        }
        Ok(TransactionStore { transactions })
    }

    /// Categorize every record that has no category yet
    pub fn categorized(self, engine: &RuleEngine) -> Self {
        let transactions = self
            .transactions
            .into_iter()
            .map(|tx| tx.ensure_categorized(engine))
            .collect();
        TransactionStore { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
