// ⚙️ Dashboard Configuration - JSON file, every field optional
//
// CLI flags override whatever the file sets.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::company::Company;
use crate::report::ReportOptions;
use crate::rules::{CategorizerVariant, RuleEngine};
use crate::source::{get_source, TransactionSource, TransactionStore};
use crate::taxonomy::CategoryAssignment;

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory with one CSV per company; built-in samples when absent
    pub data_dir: Option<PathBuf>,
    pub default_company: Company,
    pub window_days: usize,
    pub top_subcategories: usize,
    pub recent_count: usize,
    pub categorizer: CategorizerVariant,
    pub income_fallback: Option<CategoryAssignment>,
    pub expense_fallback: Option<CategoryAssignment>,
    /// JSON rule set replacing the built-in variant rules
    pub rules_file: Option<PathBuf>,
    pub server_addr: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let options = ReportOptions::default();
        DashboardConfig {
            data_dir: None,
            default_company: Company::default(),
            window_days: options.window_days,
            top_subcategories: options.top_subcategories,
            recent_count: options.recent_count,
            categorizer: CategorizerVariant::default(),
            income_fallback: None,
            expense_fallback: None,
            rules_file: None,
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: DashboardConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Config file when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => DashboardConfig::from_file(path),
            None => Ok(DashboardConfig::default()),
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            window_days: self.window_days,
            top_subcategories: self.top_subcategories,
            recent_count: self.recent_count,
        }
    }

    /// Rule engine for this deployment, fallbacks applied and checked
    pub fn build_engine(&self) -> Result<RuleEngine> {
        let engine = match &self.rules_file {
            Some(path) => RuleEngine::from_file(path)?,
            None => RuleEngine::for_variant(self.categorizer),
        };

        let engine = engine
            .with_fallbacks(self.income_fallback.clone(), self.expense_fallback.clone())
            .context("Invalid fallback category in config")?;

        tracing::debug!(
            "Rule engine ready: {} rules ({})",
            engine.rule_count(),
            self.rules_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| self.categorizer.to_string())
        );
        Ok(engine)
    }

    pub fn source(&self) -> Box<dyn TransactionSource> {
        get_source(self.data_dir.as_deref())
    }

    /// Load every company and categorize once up front
    pub fn load_store(&self, engine: &RuleEngine) -> Result<TransactionStore> {
        let source = self.source();
        tracing::info!("Loading transactions from {}", source.describe());
        Ok(TransactionStore::load(source.as_ref())?.categorized(engine))
    }
}

// ============================================================================
// TESTS
// ============================================================================
