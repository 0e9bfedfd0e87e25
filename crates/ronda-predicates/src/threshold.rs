//! Threshold comparison against a constant.

use ronda_align::CompareOp;
use ronda_traits::{Condition, Panel, Result, RondaError, Table};

use crate::columns::map_columns;

/// `value OP constant` for every cell; an undefined value compares `false`.
///
/// # Errors
///
/// Returns [`RondaError::InvalidData`] if `constant` is not finite.
///
/// # Example
///
/// ```
/// use ronda_align::CompareOp;
/// use ronda_predicates::threshold;
/// use ronda_traits::{Date, Frequency, Table};
///
/// let d = |day| Date::from_ymd_opt(2024, 1, day).unwrap();
/// let close = Table::from_columns(
///     Frequency::Daily,
///     "TWD",
///     vec![d(1), d(2), d(3)],
///     vec![("X".to_string(), vec![100.0, 110.0, 120.0])],
/// )
/// .unwrap();
///
/// let above = threshold(&close, CompareOp::Gt, 105.0).unwrap();
/// assert!(!above.holds_as_of("X", d(1)));
/// assert!(above.holds_as_of("X", d(2)));
/// assert!(above.holds_as_of("X", d(3)));
/// ```
pub fn threshold(table: &Table, op: CompareOp, constant: f64) -> Result<Condition> {
    if !constant.is_finite() {
        return Err(RondaError::InvalidData(format!(
            "threshold constant must be finite, got {constant}"
        )));
    }
    let cells = map_columns(table.values(), None, |column, mut out| {
        for (cell, &v) in out.iter_mut().zip(column.iter()) {
            *cell = Some(v.is_finite() && op.apply(v, constant));
        }
    });
    Condition::new(
        format!("value {op} {constant}"),
        table.time_index().to_vec(),
        table.symbols().to_vec(),
        cells,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_traits::{Date, Frequency};

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_threshold_end_to_end() {
        let close = Table::from_columns(
            Frequency::Daily,
            "TWD",
            vec![d(1), d(2), d(3)],
            vec![("X".into(), vec![100.0, 110.0, 120.0])],
        )
        .unwrap();
        let cond = threshold(&close, CompareOp::Gt, 105.0).unwrap();
        let flags: Vec<bool> = (0..3).map(|r| cond.is_true(r, 0)).collect();
        assert_eq!(flags, vec![false, true, true]);
        assert_eq!(cond.label(), "value > 105");
    }

    #[test]
    fn test_threshold_undefined_is_false() {
        let table = Table::from_columns(
            Frequency::Monthly,
            "",
            vec![d(1), d(2)],
            vec![("X".into(), vec![f64::NAN, 1.0])],
        )
        .unwrap();
        let cond = threshold(&table, CompareOp::Lt, 5.0).unwrap();
        assert_eq!(cond.cell(0, 0), Some(false));
        assert!(cond.is_true(1, 0));
    }

    #[test]
    fn test_threshold_rejects_nan_constant() {
        let table = Table::from_columns(Frequency::Daily, "", vec![d(1)], vec![("X".into(), vec![1.0])])
            .unwrap();
        assert!(threshold(&table, CompareOp::Gt, f64::NAN).is_err());
    }
}
