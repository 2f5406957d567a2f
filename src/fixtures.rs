// 🧪 Sample Ledger - built-in demo transactions for the three companies
// Two half-years (2023, 2024) plus a handful of July 2024 entries.

use rust_decimal::Decimal;

use crate::company::Company;
use crate::company::Company::{HelpMeTravelSpa, WTravelChile, WolfTravelChile};
use crate::transaction::TransactionType::{Expense as Ex, Income as In};
use crate::transaction::{parse_date, Transaction, TransactionType};

type FixtureRow = (&'static str, TransactionType, &'static str, i64, Company);

const SAMPLE_ROWS: &[FixtureRow] = &[
    ("Venta paquete turístico Europa", In, "15/01/2023", 8500, WTravelChile),
    ("Pago arriendo oficina", Ex, "05/01/2023", -1200, WTravelChile),
    ("Comisión agencia aérea", In, "20/01/2023", 1200, WTravelChile),
    ("Compra equipos computación", Ex, "25/01/2023", -2500, WTravelChile),
    ("Reserva hotel Cancún", In, "10/02/2023", 3200, WTravelChile),
    ("Pago servicios básicos", Ex, "15/02/2023", -450, WTravelChile),
    ("Venta paquete Disney", In, "28/02/2023", 6800, WTravelChile),
    ("Comisión crucero Caribe", In, "12/03/2023", 1800, WTravelChile),
    ("Mantenimiento equipos", Ex, "20/03/2023", -800, WTravelChile),
    ("Venta paquete Asia", In, "30/03/2023", 12500, WTravelChile),
    ("Pago impuestos", Ex, "15/04/2023", -3500, WTravelChile),
    ("Comisión hotel premium", In, "22/04/2023", 950, WTravelChile),
    ("Venta paquete Sudamérica", In, "28/04/2023", 4200, WTravelChile),
    ("Pago arriendo oficina", Ex, "05/05/2023", -1200, WTravelChile),
    ("Venta paquete Europa", In, "18/05/2023", 9200, WTravelChile),
    ("Compra software gestión", Ex, "25/05/2023", -1800, WTravelChile),
    ("Comisión agencia aérea", In, "08/06/2023", 2100, WTravelChile),
    ("Pago servicios básicos", Ex, "15/06/2023", -450, WTravelChile),
    ("Venta paquete Australia", In, "30/06/2023", 15800, WTravelChile),
    ("Venta paquete aventura", In, "12/01/2023", 4200, WolfTravelChile),
    ("Compra equipos outdoor", Ex, "18/01/2023", -3200, WolfTravelChile),
    ("Comisión tour guiado", In, "25/01/2023", 800, WolfTravelChile),
    ("Venta paquete montaña", In, "08/02/2023", 2800, WolfTravelChile),
    ("Pago seguro equipos", Ex, "20/02/2023", -650, WolfTravelChile),
    ("Comisión alojamiento", In, "28/02/2023", 1200, WolfTravelChile),
    ("Venta paquete kayak", In, "15/03/2023", 1800, WolfTravelChile),
    ("Mantenimiento vehículos", Ex, "22/03/2023", -1500, WolfTravelChile),
    ("Comisión transporte", In, "30/03/2023", 950, WolfTravelChile),
    ("Venta paquete trekking", In, "10/04/2023", 3500, WolfTravelChile),
    ("Pago impuestos", Ex, "15/04/2023", -2800, WolfTravelChile),
    ("Comisión guía local", In, "25/04/2023", 600, WolfTravelChile),
    ("Venta paquete escalada", In, "05/05/2023", 5200, WolfTravelChile),
    ("Compra equipos seguridad", Ex, "18/05/2023", -4200, WolfTravelChile),
    ("Comisión alojamiento", In, "28/05/2023", 1400, WolfTravelChile),
    ("Venta paquete rafting", In, "12/06/2023", 2200, WolfTravelChile),
    ("Pago servicios básicos", Ex, "20/06/2023", -380, WolfTravelChile),
    ("Comisión transporte", In, "30/06/2023", 1100, WolfTravelChile),
    ("Venta paquete corporativo", In, "20/01/2023", 15000, HelpMeTravelSpa),
    ("Pago arriendo oficina", Ex, "25/01/2023", -1800, HelpMeTravelSpa),
    ("Comisión evento empresarial", In, "30/01/2023", 3200, HelpMeTravelSpa),
    ("Venta paquete incentivo", In, "15/02/2023", 8500, HelpMeTravelSpa),
    ("Compra equipos presentación", Ex, "22/02/2023", -2800, HelpMeTravelSpa),
    ("Comisión conferencia", In, "28/02/2023", 1800, HelpMeTravelSpa),
    ("Venta paquete capacitación", In, "10/03/2023", 12000, HelpMeTravelSpa),
    ("Pago servicios básicos", Ex, "20/03/2023", -650, HelpMeTravelSpa),
    ("Comisión seminario", In, "30/03/2023", 2500, HelpMeTravelSpa),
    ("Venta paquete team building", In, "12/04/2023", 6800, HelpMeTravelSpa),
    ("Pago impuestos", Ex, "15/04/2023", -4200, HelpMeTravelSpa),
    ("Comisión retiro empresarial", In, "25/04/2023", 1900, HelpMeTravelSpa),
    ("Venta paquete convención", In, "08/05/2023", 22000, HelpMeTravelSpa),
    ("Compra equipos audiovisuales", Ex, "18/05/2023", -8500, HelpMeTravelSpa),
    ("Comisión evento internacional", In, "28/05/2023", 4500, HelpMeTravelSpa),
    ("Venta paquete networking", In, "15/06/2023", 9500, HelpMeTravelSpa),
    ("Pago arriendo oficina", Ex, "25/06/2023", -1800, HelpMeTravelSpa),
    ("Comisión workshop", In, "30/06/2023", 2800, HelpMeTravelSpa),
    ("Venta paquete verano", In, "10/01/2024", 7200, WTravelChile),
    ("Pago arriendo oficina", Ex, "05/01/2024", -1200, WTravelChile),
    ("Comisión agencia aérea", In, "18/01/2024", 1500, WTravelChile),
    ("Venta paquete carnaval", In, "25/02/2024", 5800, WTravelChile),
    ("Pago servicios básicos", Ex, "15/02/2024", -450, WTravelChile),
    ("Compra equipos computación", Ex, "28/02/2024", -3200, WTravelChile),
    ("Venta paquete primavera", In, "15/03/2024", 6800, WTravelChile),
    ("Mantenimiento equipos", Ex, "20/03/2024", -800, WTravelChile),
    ("Comisión hotel premium", In, "30/03/2024", 1200, WTravelChile),
    ("Venta paquete otoño", In, "10/04/2024", 5200, WTravelChile),
    ("Pago impuestos", Ex, "15/04/2024", -3800, WTravelChile),
    ("Comisión crucero", In, "25/04/2024", 2100, WTravelChile),
    ("Venta paquete invierno", In, "05/05/2024", 8900, WTravelChile),
    ("Pago arriendo oficina", Ex, "05/05/2024", -1200, WTravelChile),
    ("Compra software gestión", Ex, "18/05/2024", -2200, WTravelChile),
    ("Venta paquete navidad", In, "12/06/2024", 15800, WTravelChile),
    ("Pago servicios básicos", Ex, "15/06/2024", -450, WTravelChile),
    ("Comisión agencia aérea", In, "30/06/2024", 2800, WTravelChile),
    ("Venta paquete aventura", In, "08/01/2024", 3800, WolfTravelChile),
    ("Compra equipos outdoor", Ex, "15/01/2024", -2800, WolfTravelChile),
    ("Comisión tour guiado", In, "22/01/2024", 900, WolfTravelChile),
    ("Venta paquete montaña", In, "12/02/2024", 3200, WolfTravelChile),
    ("Pago seguro equipos", Ex, "20/02/2024", -750, WolfTravelChile),
    ("Comisión alojamiento", In, "28/02/2024", 1400, WolfTravelChile),
    ("Venta paquete kayak", In, "18/03/2024", 2100, WolfTravelChile),
    ("Mantenimiento vehículos", Ex, "25/03/2024", -1800, WolfTravelChile),
    ("Comisión transporte", In, "30/03/2024", 1100, WolfTravelChile),
    ("Venta paquete trekking", In, "15/04/2024", 4200, WolfTravelChile),
    ("Pago impuestos", Ex, "15/04/2024", -3200, WolfTravelChile),
    ("Comisión guía local", In, "25/04/2024", 700, WolfTravelChile),
    ("Venta paquete escalada", In, "08/05/2024", 6800, WolfTravelChile),
    ("Compra equipos seguridad", Ex, "18/05/2024", -5200, WolfTravelChile),
    ("Comisión alojamiento", In, "28/05/2024", 1600, WolfTravelChile),
    ("Venta paquete rafting", In, "15/06/2024", 2800, WolfTravelChile),
    ("Pago servicios básicos", Ex, "20/06/2024", -420, WolfTravelChile),
    ("Comisión transporte", In, "30/06/2024", 1300, WolfTravelChile),
    ("Venta paquete corporativo", In, "25/01/2024", 18000, HelpMeTravelSpa),
    ("Pago arriendo oficina", Ex, "25/01/2024", -1800, HelpMeTravelSpa),
    ("Comisión evento empresarial", In, "30/01/2024", 3800, HelpMeTravelSpa),
    ("Venta paquete incentivo", In, "18/02/2024", 9500, HelpMeTravelSpa),
    ("Compra equipos presentación", Ex, "25/02/2024", -3200, HelpMeTravelSpa),
    ("Comisión conferencia", In, "28/02/2024", 2100, HelpMeTravelSpa),
    ("Venta paquete capacitación", In, "12/03/2024", 14000, HelpMeTravelSpa),
    ("Pago servicios básicos", Ex, "20/03/2024", -750, HelpMeTravelSpa),
    ("Comisión seminario", In, "30/03/2024", 2900, HelpMeTravelSpa),
    ("Venta paquete team building", In, "15/04/2024", 7800, HelpMeTravelSpa),
    ("Pago impuestos", Ex, "15/04/2024", -4800, HelpMeTravelSpa),
    ("Comisión retiro empresarial", In, "25/04/2024", 2200, HelpMeTravelSpa),
    ("Venta paquete convención", In, "10/05/2024", 25000, HelpMeTravelSpa),
    ("Compra equipos audiovisuales", Ex, "18/05/2024", -9500, HelpMeTravelSpa),
    ("Comisión evento internacional", In, "28/05/2024", 5200, HelpMeTravelSpa),
    ("Venta paquete networking", In, "18/06/2024", 11000, HelpMeTravelSpa),
    ("Pago arriendo oficina", Ex, "25/06/2024", -1800, HelpMeTravelSpa),
    ("Comisión workshop", In, "30/06/2024", 3200, HelpMeTravelSpa),
    ("Pago de cliente #1", In, "15/07/2024", 3500, WTravelChile),
    ("Compra de Tasas Gubernamentales", Ex, "15/07/2024", -120, WTravelChile),
    ("Supermercado - Provisiones", Ex, "14/07/2024", -150, WTravelChile),
    ("Venta de paquete turístico", In, "13/07/2024", 2800, WolfTravelChile),
    ("Pago de servicios básicos", Ex, "12/07/2024", -200, HelpMeTravelSpa),
    ("Comisión por reserva", In, "11/07/2024", 450, WTravelChile),
    ("Mantenimiento de equipos", Ex, "10/07/2024", -300, WolfTravelChile),
];

/// Number of built-in sample rows
pub fn sample_len() -> usize {
    SAMPLE_ROWS.len()
}

/// All sample transactions in fixture order
pub fn sample_transactions() -> Vec<Transaction> {
    SAMPLE_ROWS
        .iter()
        .filter_map(|&(description, ty, date, amount, company)| {
            let built = parse_date(date).and_then(|date| {
                Transaction::new(description, ty, date, Decimal::from(amount), company)
            });
            match built {
                Ok(tx) => Some(tx),
                Err(e) => {
                    tracing::warn!("Skipping sample row {:?}: {}", description, e);
                    None
                }
            }
        })
        .collect()
}

/// Sample transactions for one company, fixture order preserved
pub fn sample_for(company: Company) -> Vec<Transaction> {
    sample_transactions()
        .into_iter()
        .filter(|tx| tx.company() == company)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sample_row_is_valid() {
        assert_eq!(sample_transactions().len(), sample_len());
    }

    #[test]
    fn test_samples_respect_sign_invariant() {
        for tx in sample_transactions() {
            assert_eq!(tx.amount().is_sign_positive(), tx.is_income(), "{}", tx.description());
        }
    }

    #[test]
    fn test_each_company_has_samples() {
        let total: usize = Company::ALL.iter().map(|c| sample_for(*c).len()).sum();
        assert_eq!(total, sample_len());
        for company in Company::ALL {
            assert!(!sample_for(company).is_empty());
        }
    }
}
