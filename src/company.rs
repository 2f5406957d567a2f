// 🏢 Company Registry - the closed set of ledgers
// Each company owns one data file; lookups are a static table, no reflection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

// ============================================================================
// COMPANY
// ============================================================================

/// Company - identifies whose ledger a transaction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Company {
    #[serde(rename = "W TRAVEL CHILE", alias = "w-travel")]
    WTravelChile,
    #[serde(rename = "WOLF TRAVEL CHILE", alias = "wolf-travel")]
    WolfTravelChile,
    #[serde(rename = "HELPMETRAVEL SPA", alias = "helpmetravel")]
    HelpMeTravelSpa,
}

impl Company {
    /// All companies in display order
    pub const ALL: [Company; 3] = [
        Company::WTravelChile,
        Company::WolfTravelChile,
        Company::HelpMeTravelSpa,
    ];

    /// Exact name as it appears in the `Empresa` column
    pub fn name(&self) -> &'static str {
        match self {
            Company::WTravelChile => "W TRAVEL CHILE",
            Company::WolfTravelChile => "WOLF TRAVEL CHILE",
            Company::HelpMeTravelSpa => "HELPMETRAVEL SPA",
        }
    }

    /// Short code for URLs and CLI flags
    pub fn code(&self) -> &'static str {
        match self {
            Company::WTravelChile => "w-travel",
            Company::WolfTravelChile => "wolf-travel",
            Company::HelpMeTravelSpa => "helpmetravel",
        }
    }

    /// Per-company CSV file name inside the data directory
    pub fn data_file(&self) -> &'static str {
        match self {
            Company::WTravelChile => "w_travel_chile.csv",
            Company::WolfTravelChile => "wolf_travel_chile.csv",
            Company::HelpMeTravelSpa => "helpmetravel_spa.csv",
        }
    }

    pub fn logo(&self) -> &'static str {
        match self {
            Company::WTravelChile => "🌍",
            Company::WolfTravelChile => "🐺",
            Company::HelpMeTravelSpa => "🏢",
        }
    }

    /// Accent color (hex) used by the dashboards
    pub fn primary_color(&self) -> &'static str {
        match self {
            Company::WTravelChile => "#1e3a8a",
            Company::WolfTravelChile => "#166534",
            Company::HelpMeTravelSpa => "#7c3aed",
        }
    }

    /// Lookup by exact name or short code
    pub fn from_name(name: &str) -> Option<Company> {
        let trimmed = name.trim();
        Company::ALL
            .into_iter()
            .find(|c| c.name() == trimmed || c.code() == trimmed)
    }

    /// Lookup that never fails: unknown identifiers fall back to the default company
    pub fn resolve(name: &str) -> Company {
        match Company::from_name(name) {
            Some(company) => company,
            None => {
                tracing::warn!(
                    "Unknown company {:?}, falling back to {}",
                    name,
                    Company::default().name()
                );
                Company::default()
            }
        }
    }

    /// Next company in display order (wraps around)
    pub fn next(&self) -> Company {
        match self {
            Company::WTravelChile => Company::WolfTravelChile,
            Company::WolfTravelChile => Company::HelpMeTravelSpa,
            Company::HelpMeTravelSpa => Company::WTravelChile,
        }
    }

    pub fn previous(&self) -> Company {
        match self {
            Company::WTravelChile => Company::HelpMeTravelSpa,
            Company::WolfTravelChile => Company::WTravelChile,
            Company::HelpMeTravelSpa => Company::WolfTravelChile,
        }
    }
}

impl Default for Company {
    fn default() -> Self {
        Company::WTravelChile
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Company {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Company::from_name(s).ok_or_else(|| LedgerError::UnknownCompany(s.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_and_code() {
        assert_eq!(Company::from_name("WOLF TRAVEL CHILE"), Some(Company::WolfTravelChile));
        assert_eq!(Company::from_name("helpmetravel"), Some(Company::HelpMeTravelSpa));
        assert_eq!(Company::from_name(" W TRAVEL CHILE "), Some(Company::WTravelChile));
    }

    #[test]
    fn test_name_match_is_case_sensitive() {
        assert_eq!(Company::from_name("w travel chile"), None);
    }

    #[test]
    fn test_unknown_company_falls_back_to_default() {
        assert_eq!(Company::resolve("ACME TOURS"), Company::WTravelChile);
        assert!("ACME TOURS".parse::<Company>().is_err());
    }

    #[test]
    fn test_cycle_visits_every_company() {
        let mut company = Company::default();
        for expected in [Company::WolfTravelChile, Company::HelpMeTravelSpa, Company::WTravelChile] {
            company = company.next();
            assert_eq!(company, expected);
        }
        assert_eq!(Company::WTravelChile.previous(), Company::HelpMeTravelSpa);
    }

    #[test]
    fn test_data_files_are_distinct() {
        let files: std::collections::HashSet<_> =
            Company::ALL.iter().map(|c| c.data_file()).collect();
        assert_eq!(files.len(), Company::ALL.len());
    }
}
