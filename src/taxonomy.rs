// 🏷️ Category Taxonomy - two-level fixed hierarchy
//
// Parent categories own an ordered list of subcategories. The table is static
// configuration: every subcategory belongs to exactly one parent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};

// ============================================================================
// PARENT CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParentCategory {
    #[serde(rename = "Ingresos", alias = "Income")]
    Income,
    #[serde(rename = "Gastos Operacionales", alias = "Operating Expenses")]
    OperatingExpenses,
    #[serde(rename = "Gastos Administrativos", alias = "Administrative Expenses")]
    AdministrativeExpenses,
    #[serde(rename = "Gastos de Personal", alias = "Personnel")]
    Personnel,
    #[serde(rename = "Gastos de Marketing", alias = "Marketing")]
    Marketing,
    #[serde(rename = "Gastos de Viaje", alias = "Travel")]
    Travel,
}

impl ParentCategory {
    /// Parents in taxonomy order
    pub const ALL: [ParentCategory; 6] = [
        ParentCategory::Income,
        ParentCategory::OperatingExpenses,
        ParentCategory::AdministrativeExpenses,
        ParentCategory::Personnel,
        ParentCategory::Marketing,
        ParentCategory::Travel,
    ];

    /// Label as written in the `Categoria_Padre` column
    pub fn label(&self) -> &'static str {
        match self {
            ParentCategory::Income => "Ingresos",
            ParentCategory::OperatingExpenses => "Gastos Operacionales",
            ParentCategory::AdministrativeExpenses => "Gastos Administrativos",
            ParentCategory::Personnel => "Gastos de Personal",
            ParentCategory::Marketing => "Gastos de Marketing",
            ParentCategory::Travel => "Gastos de Viaje",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ParentCategory::Income => "📈",
            ParentCategory::OperatingExpenses => "🏢",
            ParentCategory::AdministrativeExpenses => "📋",
            ParentCategory::Personnel => "👥",
            ParentCategory::Marketing => "📢",
            ParentCategory::Travel => "✈️",
        }
    }

    /// Display color (hex)
    pub fn color(&self) -> &'static str {
        match self {
            ParentCategory::Income => "#10b981",
            ParentCategory::OperatingExpenses => "#ef4444",
            ParentCategory::AdministrativeExpenses => "#f97316",
            ParentCategory::Personnel => "#8b5cf6",
            ParentCategory::Marketing => "#06b6d4",
            ParentCategory::Travel => "#eab308",
        }
    }

    /// Ordered subcategories owned by this parent
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            ParentCategory::Income => &[
                "Ventas de Paquetes",
                "Comisiones",
                "Servicios Turísticos",
                "Otros Ingresos",
            ],
            ParentCategory::OperatingExpenses => &[
                "Arriendo de Oficina",
                "Servicios Básicos",
                "Equipos y Tecnología",
                "Software y Licencias",
                "Mantenimiento",
                "Otros Gastos",
            ],
            ParentCategory::AdministrativeExpenses => &[
                "Impuestos",
                "Tasas Gubernamentales",
                "Seguros",
                "Gastos Legales",
            ],
            ParentCategory::Personnel => &["Salarios", "Beneficios", "Capacitación", "Viáticos"],
            ParentCategory::Marketing => &[
                "Publicidad",
                "Promociones",
                "Material Promocional",
                "Eventos",
            ],
            ParentCategory::Travel => &["Transporte", "Alojamiento", "Alimentación", "Actividades"],
        }
    }

    pub fn owns(&self, subcategory: &str) -> bool {
        self.subcategories().contains(&subcategory)
    }

    /// Lookup by Spanish label or English name
    pub fn from_label(label: &str) -> Option<ParentCategory> {
        let trimmed = label.trim();
        ParentCategory::ALL.into_iter().find(|p| {
            p.label().eq_ignore_ascii_case(trimmed) || p.english_name().eq_ignore_ascii_case(trimmed)
        })
    }

    fn english_name(&self) -> &'static str {
        match self {
            ParentCategory::Income => "Income",
            ParentCategory::OperatingExpenses => "Operating Expenses",
            ParentCategory::AdministrativeExpenses => "Administrative Expenses",
            ParentCategory::Personnel => "Personnel",
            ParentCategory::Marketing => "Marketing",
            ParentCategory::Travel => "Travel",
        }
    }
}

impl fmt::Display for ParentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ParentCategory {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParentCategory::from_label(s).ok_or_else(|| LedgerError::UnknownParentCategory(s.to_string()))
    }
}

/// Parent that owns a subcategory, if any
pub fn parent_of(subcategory: &str) -> Option<ParentCategory> {
    ParentCategory::ALL
        .into_iter()
        .find(|parent| parent.owns(subcategory))
}

// ============================================================================
// CATEGORY ASSIGNMENT
// ============================================================================

/// A (parent, subcategory) pair that is guaranteed to exist in the taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAssignment")]
pub struct CategoryAssignment {
    pub parent: ParentCategory,
    pub subcategory: String,
}

#[derive(Deserialize)]
struct RawAssignment {
    parent: ParentCategory,
    subcategory: String,
}

impl TryFrom<RawAssignment> for CategoryAssignment {
    type Error = LedgerError;

    fn try_from(raw: RawAssignment) -> Result<Self, Self::Error> {
        CategoryAssignment::new(raw.parent, &raw.subcategory)
    }
}

impl CategoryAssignment {
    pub fn new(parent: ParentCategory, subcategory: &str) -> LedgerResult<Self> {
        let subcategory = subcategory.trim();
        if !parent.owns(subcategory) {
            return Err(LedgerError::CategoryNotInTaxonomy {
                parent: parent.label().to_string(),
                subcategory: subcategory.to_string(),
            });
        }

        Ok(CategoryAssignment {
            parent,
            subcategory: subcategory.to_string(),
        })
    }

    /// Parse the `Categoria_Padre` / `Categoria_Hijo` column pair
    pub fn from_labels(parent: &str, subcategory: &str) -> LedgerResult<Self> {
        let parent: ParentCategory = parent.parse()?;
        CategoryAssignment::new(parent, subcategory)
    }
}

impl fmt::Display for CategoryAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.parent.label(), self.subcategory)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_subcategory_has_exactly_one_parent() {
        let mut seen = HashSet::new();
        for parent in ParentCategory::ALL {
            for sub in parent.subcategories() {
                assert!(seen.insert(*sub), "{} listed twice", sub);
                assert_eq!(parent_of(sub), Some(parent));
            }
        }
    }

    #[test]
    fn test_assignment_rejects_foreign_subcategory() {
        let err = CategoryAssignment::new(ParentCategory::Income, "Impuestos").unwrap_err();
        assert!(matches!(err, LedgerError::CategoryNotInTaxonomy { .. }));

        let ok = CategoryAssignment::new(ParentCategory::AdministrativeExpenses, "Impuestos");
        assert!(ok.is_ok());
    }

    #[test]
    fn test_parent_lookup_accepts_both_languages() {
        assert_eq!(ParentCategory::from_label("Ingresos"), Some(ParentCategory::Income));
        assert_eq!(ParentCategory::from_label("travel"), Some(ParentCategory::Travel));
        assert_eq!(ParentCategory::from_label("Misc"), None);
    }

    #[test]
    fn test_assignment_from_column_labels() {
        let assignment = CategoryAssignment::from_labels("Gastos de Viaje", "Alimentación").unwrap();
        assert_eq!(assignment.parent, ParentCategory::Travel);
        assert_eq!(assignment.to_string(), "Gastos de Viaje / Alimentación");
    }

    #[test]
    fn test_assignment_deserialize_validates() {
        let ok: Result<CategoryAssignment, _> =
            serde_json::from_str(r#"{"parent":"Ingresos","subcategory":"Comisiones"}"#);
        assert!(ok.is_ok());

        let bad: Result<CategoryAssignment, _> =
            serde_json::from_str(r#"{"parent":"Ingresos","subcategory":"Salarios"}"#);
        assert!(bad.is_err());
    }
}
