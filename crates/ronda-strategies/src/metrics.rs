//! Derived tables and conditions shared by several strategies.
//!
//! Every function reads through [`Inputs`], so a strategy using one must
//! declare the tables it touches.

use ronda_align::{ArithOp, CompareOp, arith, compare};
use ronda_eval::Inputs;
use ronda_predicates::{RollingStat, consecutive_growth, pct_change, rolling};
use ronda_store::TableKey;
use ronda_traits::{Condition, Result, Table};

/// Monthly revenue growth over the same month a year earlier.
///
/// # Errors
///
/// Fails if `monthly_revenue:revenue` is not readable.
pub fn revenue_yoy(inputs: &Inputs<'_>) -> Result<Table> {
    pct_change(inputs.table(TableKey::Revenue)?, 12)
}

/// Monthly revenue growth over the previous month.
///
/// # Errors
///
/// Fails if `monthly_revenue:revenue` is not readable.
pub fn revenue_mom(inputs: &Inputs<'_>) -> Result<Table> {
    pct_change(inputs.table(TableKey::Revenue)?, 1)
}

/// Volume relative to its trailing `window`-row mean.
///
/// # Errors
///
/// Fails if `price:volume` is not readable or `window` is zero.
pub fn volume_ratio(inputs: &Inputs<'_>, window: usize) -> Result<Table> {
    let volume = inputs.table(TableKey::Volume)?;
    let mean = rolling(volume, RollingStat::Mean, window)?;
    arith(volume, ArithOp::Div, &mean)
}

/// True where EPS rose in each of the last `quarters` quarters.
///
/// # Errors
///
/// Fails if `financial_statement:eps` is not readable or `quarters` is zero.
pub fn eps_rising(inputs: &Inputs<'_>, quarters: usize) -> Result<Condition> {
    consecutive_growth(inputs.table(TableKey::Eps)?, quarters + 1)
}

/// True where `table` is within `tolerance` of its trailing `window`-row high.
///
/// `tolerance` is a ratio, e.g. 0.99 accepts values at least 99% of the high.
///
/// # Errors
///
/// Fails if `window` is zero.
pub fn near_high(table: &Table, window: usize, tolerance: f64) -> Result<Condition> {
    let high = rolling(table, RollingStat::Max, window)?.scale(tolerance);
    compare(table, CompareOp::Ge, &high)
}

/// `(value - base) / base`, undefined where `base` is zero.
///
/// # Errors
///
/// Propagates alignment errors.
pub fn relative_to(value: &Table, base: &Table) -> Result<Table> {
    arith(&arith(value, ArithOp::Sub, base)?, ArithOp::Div, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ronda_store::TableStore;
    use ronda_traits::{Date, Frequency, Panel};

    fn month(i: u32) -> Date {
        Date::from_ymd_opt(2023 + (i / 12) as i32, i % 12 + 1, 10).unwrap()
    }

    fn store() -> TableStore {
        let revenue: Vec<f64> = (0..14).map(|i| 100.0 + f64::from(i)).collect();
        let table = Table::from_columns(
            Frequency::Monthly,
            "thousand TWD",
            (0..14).map(month).collect(),
            vec![("A".to_string(), revenue)],
        )
        .unwrap();
        let mut store = TableStore::new();
        store.register(TableKey::Revenue.name(), table).unwrap();
        store
    }

    #[test]
    fn test_revenue_growth() {
        let store = store();
        let declared = [TableKey::Revenue];
        let inputs = Inputs::new(&store, &declared);

        let yoy = revenue_yoy(&inputs).unwrap();
        assert_relative_eq!(yoy.get("A", month(12)).unwrap(), 12.0 / 100.0);
        assert!(yoy.get("A", month(11)).is_none());

        let mom = revenue_mom(&inputs).unwrap();
        assert_relative_eq!(mom.get("A", month(13)).unwrap(), 1.0 / 112.0);
    }

    #[test]
    fn test_near_high() {
        let store = store();
        let revenue = store.table(TableKey::Revenue).unwrap();
        let cond = near_high(revenue, 12, 0.99).unwrap();
        assert!(!cond.holds_as_of("A", month(10)));
        assert!(cond.holds_as_of("A", month(11)));
    }

    #[test]
    fn test_relative_to() {
        let store = store();
        let revenue = store.table(TableKey::Revenue).unwrap();
        let doubled = revenue.scale(2.0);
        let rel = relative_to(&doubled, revenue).unwrap();
        assert_eq!(rel.n_rows(), 14);
        assert_relative_eq!(rel.get("A", month(0)).unwrap(), 1.0);
    }

    #[test]
    fn test_undeclared_read_fails() {
        let store = store();
        let inputs = Inputs::new(&store, &[]);
        assert!(revenue_yoy(&inputs).is_err());
    }
}
