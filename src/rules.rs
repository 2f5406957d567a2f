// 🏷️ Categorization Rules - Rules as Data
// Keyword rules mapping (description, type) to a taxonomy pair, first match wins

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};
use crate::taxonomy::{CategoryAssignment, ParentCategory};
use crate::transaction::TransactionType;

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Rule ID for tracking
    pub id: String,

    /// Any of these substrings (case-insensitive) triggers the rule
    pub keywords: Vec<String>,

    /// Only transactions of this type are considered
    pub transaction_type: TransactionType,

    pub parent: ParentCategory,

    pub subcategory: String,

    /// Priority (higher = applied first, ties keep declaration order)
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    0
}

impl CategoryRule {
    pub fn new(
        id: &str,
        keywords: &[&str],
        transaction_type: TransactionType,
        parent: ParentCategory,
        subcategory: &str,
    ) -> Self {
        CategoryRule {
            id: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            transaction_type,
            parent,
            subcategory: subcategory.to_string(),
            priority: default_priority(),
        }
    }

    /// Check a lowercased description against the keyword set
    pub fn matches(&self, description_lower: &str, transaction_type: TransactionType) -> bool {
        self.transaction_type == transaction_type
            && self
                .keywords
                .iter()
                .any(|k| !k.is_empty() && description_lower.contains(k.as_str()))
    }

    pub fn assignment(&self) -> CategoryAssignment {
        CategoryAssignment {
            parent: self.parent,
            subcategory: self.subcategory.clone(),
        }
    }

    fn normalize(mut self) -> Self {
        self.keywords = self.keywords.iter().map(|k| k.to_lowercase()).collect();
        self
    }
}

// ============================================================================
// VARIANTS
// ============================================================================

/// Built-in rule sets, one per dashboard deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategorizerVariant {
    /// Category-system dashboard: full income and expense hierarchy
    #[default]
    Hierarchical,
    /// V2 dashboard: expense breakdown with maintenance and insurance split out
    ExpenseOverview,
}

impl CategorizerVariant {
    pub fn name(&self) -> &'static str {
        match self {
            CategorizerVariant::Hierarchical => "hierarchical",
            CategorizerVariant::ExpenseOverview => "expense-overview",
        }
    }

    pub fn rules(&self) -> Vec<CategoryRule> {
        let mut rules = income_rules();
        match self {
            CategorizerVariant::Hierarchical => rules.extend(hierarchical_expense_rules()),
            CategorizerVariant::ExpenseOverview => rules.extend(overview_expense_rules()),
        }
        rules
    }

    pub fn income_fallback(&self) -> CategoryAssignment {
        CategoryAssignment {
            parent: ParentCategory::Income,
            subcategory: "Otros Ingresos".to_string(),
        }
    }

    pub fn expense_fallback(&self) -> CategoryAssignment {
        CategoryAssignment {
            parent: ParentCategory::OperatingExpenses,
            subcategory: "Otros Gastos".to_string(),
        }
    }
}

impl fmt::Display for CategorizerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CategorizerVariant {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "hierarchical" => Ok(CategorizerVariant::Hierarchical),
            "expense-overview" => Ok(CategorizerVariant::ExpenseOverview),
            other => Err(LedgerError::UnknownVariant(other.to_string())),
        }
    }
}

fn income_rules() -> Vec<CategoryRule> {
    use ParentCategory::Income;
    use TransactionType::Income as In;

    vec![
        CategoryRule::new("income-packages", &["paquete", "turístico", "viaje", "reserva"], In, Income, "Ventas de Paquetes"),
        CategoryRule::new("income-commissions", &["comisión", "comision"], In, Income, "Comisiones"),
        CategoryRule::new("income-services", &["servicio", "tour", "guía"], In, Income, "Servicios Turísticos"),
    ]
}

fn hierarchical_expense_rules() -> Vec<CategoryRule> {
    use ParentCategory::*;
    use TransactionType::Expense as Ex;

    vec![
        CategoryRule::new("expense-rent", &["arriendo", "oficina", "rent"], Ex, OperatingExpenses, "Arriendo de Oficina"),
        CategoryRule::new("expense-utilities", &["servicios", "básicos", "luz", "agua", "gas"], Ex, OperatingExpenses, "Servicios Básicos"),
        CategoryRule::new("expense-equipment", &["equipos", "computación", "software", "audiovisuales"], Ex, OperatingExpenses, "Equipos y Tecnología"),
        CategoryRule::new("expense-maintenance", &["mantenimiento"], Ex, OperatingExpenses, "Mantenimiento"),
        CategoryRule::new("expense-taxes", &["impuestos", "tasas", "gubernamentales"], Ex, AdministrativeExpenses, "Impuestos"),
        CategoryRule::new("expense-food", &["supermercado", "provisiones", "alimentación"], Ex, Travel, "Alimentación"),
    ]
}

fn overview_expense_rules() -> Vec<CategoryRule> {
    use ParentCategory::*;
    use TransactionType::Expense as Ex;

    vec![
        CategoryRule::new("expense-rent", &["arriendo", "oficina", "rent"], Ex, OperatingExpenses, "Arriendo de Oficina"),
        CategoryRule::new("expense-utilities", &["servicios", "básicos", "luz", "agua", "gas"], Ex, OperatingExpenses, "Servicios Básicos"),
        CategoryRule::new("expense-taxes", &["impuestos", "tasas", "gubernamentales"], Ex, AdministrativeExpenses, "Impuestos"),
        CategoryRule::new("expense-equipment", &["equipos", "computación", "software", "audiovisuales"], Ex, OperatingExpenses, "Equipos y Tecnología"),
        CategoryRule::new("expense-maintenance", &["mantenimiento", "vehículos"], Ex, OperatingExpenses, "Mantenimiento"),
        CategoryRule::new("expense-insurance", &["seguro"], Ex, AdministrativeExpenses, "Seguros"),
        CategoryRule::new("expense-food", &["supermercado", "provisiones", "alimentación"], Ex, Travel, "Alimentación"),
    ]
}

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: CategoryAssignment,
    /// None when the fallback was used
    pub rule_id: Option<String>,
}

// ============================================================================
// RULE ENGINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<CategoryRule>,
    income_fallback: CategoryAssignment,
    expense_fallback: CategoryAssignment,
}

impl RuleEngine {
    /// Engine with a built-in rule set and its fallbacks
    pub fn for_variant(variant: CategorizerVariant) -> Self {
        RuleEngine {
            rules: variant.rules(),
            income_fallback: variant.income_fallback(),
            expense_fallback: variant.expense_fallback(),
        }
    }

    /// Create engine from a list of rules, keeping the default fallbacks
    pub fn from_rules(rules: Vec<CategoryRule>) -> Self {
        let mut rules: Vec<CategoryRule> = rules.into_iter().map(CategoryRule::normalize).collect();
        // Stable sort: equal priorities keep declaration order
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));

        let variant = CategorizerVariant::default();
        RuleEngine {
            rules,
            income_fallback: variant.income_fallback(),
            expense_fallback: variant.expense_fallback(),
        }
    }

    /// Load rules from a JSON file (array of rules)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rules file: {:?}", path.as_ref()))?;

        let rules: Vec<CategoryRule> =
            serde_json::from_str(&content).context("Failed to parse rules JSON")?;

        let engine = RuleEngine::from_rules(rules);
        engine
            .validate()
            .with_context(|| format!("Invalid rules in {:?}", path.as_ref()))?;

        tracing::debug!("Loaded {} categorization rules from {:?}", engine.rule_count(), path.as_ref());
        Ok(engine)
    }

    /// Replace the fallback pairs, checking they are income/expense appropriate
    pub fn with_fallbacks(
        mut self,
        income: Option<CategoryAssignment>,
        expense: Option<CategoryAssignment>,
    ) -> LedgerResult<Self> {
        if let Some(income) = income {
            check_fallback(&income, TransactionType::Income)?;
            self.income_fallback = income;
        }
        if let Some(expense) = expense {
            check_fallback(&expense, TransactionType::Expense)?;
            self.expense_fallback = expense;
        }
        Ok(self)
    }

    /// Check every rule target and fallback against the taxonomy
    pub fn validate(&self) -> LedgerResult<()> {
        for rule in &self.rules {
            CategoryAssignment::new(rule.parent, &rule.subcategory)?;
        }
        check_fallback(&self.income_fallback, TransactionType::Income)?;
        check_fallback(&self.expense_fallback, TransactionType::Expense)?;
        Ok(())
    }

    /// Apply rules to a description, reporting which rule fired
    pub fn classify(&self, description: &str, transaction_type: TransactionType) -> Classification {
        let description_lower = description.to_lowercase();

        // Rules are already sorted by priority
        for rule in &self.rules {
            if rule.matches(&description_lower, transaction_type) {
                return Classification {
                    category: rule.assignment(),
                    rule_id: Some(rule.id.clone()),
                };
            }
        }

        Classification {
            category: self.fallback(transaction_type).clone(),
            rule_id: None,
        }
    }

    /// Total, deterministic categorization
    pub fn categorize(&self, description: &str, transaction_type: TransactionType) -> CategoryAssignment {
        self.classify(description, transaction_type).category
    }

    pub fn fallback(&self, transaction_type: TransactionType) -> &CategoryAssignment {
        match transaction_type {
            TransactionType::Income => &self.income_fallback,
            TransactionType::Expense => &self.expense_fallback,
        }
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// A fallback must exist in the taxonomy and sit on its own side:
/// income under Ingresos, expenses under any other parent
fn check_fallback(fallback: &CategoryAssignment, transaction_type: TransactionType) -> LedgerResult<()> {
    CategoryAssignment::new(fallback.parent, &fallback.subcategory)?;

    let is_income_parent = fallback.parent == ParentCategory::Income;
    if is_income_parent != (transaction_type == TransactionType::Income) {
        return Err(LedgerError::FallbackSideMismatch {
            parent: fallback.parent.label().to_string(),
            transaction_type: transaction_type.label().to_string(),
        });
    }
    Ok(())
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::for_variant(CategorizerVariant::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::parent_of;

    fn pair(engine: &RuleEngine, text: &str, ty: TransactionType) -> (ParentCategory, String) {
        let c = engine.categorize(text, ty);
        (c.parent, c.subcategory)
    }

    #[test]
    fn test_commission_keyword_inside_phrase() {
        let engine = RuleEngine::default();
        assert_eq!(
            pair(&engine, "Comisión agencia aérea", TransactionType::Income),
            (ParentCategory::Income, "Comisiones".to_string())
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let engine = RuleEngine::default();
        assert_eq!(
            pair(&engine, "PAGO ARRIENDO OFICINA", TransactionType::Expense).1,
            "Arriendo de Oficina"
        );
    }

    #[test]
    fn test_earlier_rule_wins_on_multiple_keywords() {
        let engine = RuleEngine::default();
        // "reserva" (packages) comes before "comisión" (commissions)
        assert_eq!(
            pair(&engine, "Comisión por reserva", TransactionType::Income).1,
            "Ventas de Paquetes"
        );
        // "oficina" (rent) comes before "equipos" (equipment)
        assert_eq!(
            pair(&engine, "Equipos de oficina", TransactionType::Expense).1,
            "Arriendo de Oficina"
        );
    }

    #[test]
    fn test_rules_only_apply_to_their_type() {
        let engine = RuleEngine::default();
        // "servicios" is an expense keyword, but income has its own "servicio" rule
        assert_eq!(
            pair(&engine, "Servicios de guía", TransactionType::Income).1,
            "Servicios Turísticos"
        );
        // income keywords never fire for expenses
        assert_eq!(
            pair(&engine, "Reserva de paquete", TransactionType::Expense),
            (ParentCategory::OperatingExpenses, "Otros Gastos".to_string())
        );
    }

    #[test]
    fn test_empty_and_numeric_descriptions_fall_back() {
        let engine = RuleEngine::default();
        assert_eq!(pair(&engine, "", TransactionType::Income).1, "Otros Ingresos");
        assert_eq!(pair(&engine, "12345", TransactionType::Expense).1, "Otros Gastos");

        let result = engine.classify("12345", TransactionType::Expense);
        assert_eq!(result.rule_id, None);
    }

    #[test]
    fn test_categorize_is_deterministic() {
        let engine = RuleEngine::default();
        let first = engine.categorize("Compra software gestión", TransactionType::Expense);
        for _ in 0..3 {
            assert_eq!(engine.categorize("Compra software gestión", TransactionType::Expense), first);
        }
    }

    #[test]
    fn test_builtin_variants_stay_inside_taxonomy() {
        for variant in [CategorizerVariant::Hierarchical, CategorizerVariant::ExpenseOverview] {
            let engine = RuleEngine::for_variant(variant);
            assert!(engine.validate().is_ok(), "{} rules invalid", variant);

            for text in ["Pago seguro equipos", "Mantenimiento vehículos", "Tour guiado", "", "Pago de cliente #1"] {
                for ty in [TransactionType::Income, TransactionType::Expense] {
                    let c = engine.categorize(text, ty);
                    assert_eq!(parent_of(&c.subcategory), Some(c.parent));
                }
            }
        }
    }

    #[test]
    fn test_overview_variant_splits_insurance_and_vehicles() {
        let overview = RuleEngine::for_variant(CategorizerVariant::ExpenseOverview);
        let hierarchical = RuleEngine::default();

        assert_eq!(pair(&overview, "Mantenimiento vehículos", TransactionType::Expense).1, "Mantenimiento");
        assert_eq!(pair(&overview, "Pago seguro", TransactionType::Expense).1, "Seguros");
        assert_eq!(pair(&hierarchical, "Pago seguro", TransactionType::Expense).1, "Otros Gastos");

        // taxes before equipment in the overview ordering
        assert_eq!(pair(&overview, "Tasas por software", TransactionType::Expense).1, "Impuestos");
        assert_eq!(pair(&hierarchical, "Tasas por software", TransactionType::Expense).1, "Equipos y Tecnología");
    }

    #[test]
    fn test_rule_priority() {
        let mut specific = CategoryRule::new(
            "marketing-events",
            &["evento"],
            TransactionType::Expense,
            ParentCategory::Marketing,
            "Eventos",
        );
        specific.priority = 100;
        let general = CategoryRule::new(
            "promo",
            &["EVENTO", "promo"],
            TransactionType::Expense,
            ParentCategory::Marketing,
            "Promociones",
        );

        let engine = RuleEngine::from_rules(vec![general, specific]);
        let result = engine.classify("Evento de lanzamiento", TransactionType::Expense);
        assert_eq!(result.rule_id.as_deref(), Some("marketing-events"));
    }

    #[test]
    fn test_fallback_override_must_exist_in_taxonomy() {
        let bad = CategoryAssignment {
            parent: ParentCategory::Income,
            subcategory: "Otros Gastos Operacionales".to_string(),
        };
        assert!(RuleEngine::default().with_fallbacks(None, Some(bad)).is_err());

        let good = CategoryAssignment::new(ParentCategory::AdministrativeExpenses, "Gastos Legales").unwrap();
        let engine = RuleEngine::default().with_fallbacks(None, Some(good.clone())).unwrap();
        assert_eq!(engine.categorize("???", TransactionType::Expense), good);
    }

    #[test]
    fn test_fallback_override_must_match_side() {
        let legal = CategoryAssignment::new(ParentCategory::AdministrativeExpenses, "Gastos Legales").unwrap();
        let err = RuleEngine::default().with_fallbacks(Some(legal), None).unwrap_err();
        assert!(matches!(err, LedgerError::FallbackSideMismatch { .. }));

        let other_income = CategoryAssignment::new(ParentCategory::Income, "Otros Ingresos").unwrap();
        let err = RuleEngine::default().with_fallbacks(None, Some(other_income.clone())).unwrap_err();
        assert!(matches!(err, LedgerError::FallbackSideMismatch { .. }));

        let engine = RuleEngine::default().with_fallbacks(Some(other_income.clone()), None).unwrap();
        assert_eq!(engine.categorize("???", TransactionType::Income), other_income);
    }

    #[test]
    fn test_variant_from_flag_value() {
        assert_eq!("hierarchical".parse::<CategorizerVariant>().unwrap(), CategorizerVariant::Hierarchical);
        assert_eq!(" expense-overview ".parse::<CategorizerVariant>().unwrap(), CategorizerVariant::ExpenseOverview);
        assert_eq!(
            "flat".parse::<CategorizerVariant>().unwrap_err(),
            LedgerError::UnknownVariant("flat".to_string())
        );
    }

    #[test]
    fn test_validate_flags_rule_outside_taxonomy() {
        let rule = CategoryRule::new("bad", &["x"], TransactionType::Expense, ParentCategory::Travel, "Salarios");
        let engine = RuleEngine::from_rules(vec![rule]);
        assert!(engine.validate().is_err());
    }

    #[test]
    fn test_rules_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(
            &path,
            r#"[{"id":"ads","keywords":["Publicidad"],"transaction_type":"Gasto","parent":"Gastos de Marketing","subcategory":"Publicidad"}]"#,
        )
        .unwrap();

        let engine = RuleEngine::from_file(&path).unwrap();
        assert_eq!(engine.rule_count(), 1);
        assert_eq!(
            pair(&engine, "Campaña publicidad redes", TransactionType::Expense),
            (ParentCategory::Marketing, "Publicidad".to_string())
        );
    }
}
