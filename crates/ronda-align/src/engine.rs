//! Aligned comparison, arithmetic and logic.
//!
//! Every binary operation here runs on the [`Alignment`] of its operands:
//! union time index, common symbols, step-filled values. A comparison on an
//! undefined value is `false`; its cell is undefined only where an operand
//! has no row yet at that timestamp. AND/OR count an undefined side as
//! `false`. Undefined reads as `false` through every public [`Condition`]
//! accessor.

use ronda_traits::{Condition, Panel, Result, RondaError, Table};

use crate::{Alignment, ArithOp, CompareOp};

/// Compare two tables cell by cell: `left OP right`.
///
/// An undefined value on either side compares `false`. The cell stays
/// undefined only before one of the tables has its first row.
///
/// # Errors
///
/// Propagates construction errors of the result; none are expected for
/// valid inputs.
pub fn compare(left: &Table, op: CompareOp, right: &Table) -> Result<Condition> {
    let alignment = Alignment::new(left, right);
    let cells = alignment.zip_rows_with(left, right, |a, b| match (a?, b?) {
        (Some(a), Some(b)) => Some(op.apply(a, b)),
        _ => Some(false),
    });
    let (time_index, symbols) = alignment.into_parts();
    Condition::new(
        format!("{} {op} {}", describe(left), describe(right)),
        time_index,
        symbols,
        cells,
    )
}

/// Combine two tables cell by cell: `left OP right`.
///
/// The result is tagged with the finer of the two frequencies. Division by
/// zero yields an undefined cell.
///
/// # Errors
///
/// Propagates construction errors of the result; none are expected for
/// valid inputs.
pub fn arith(left: &Table, op: ArithOp, right: &Table) -> Result<Table> {
    let alignment = Alignment::new(left, right);
    let values = alignment.zip_with(left, right, |a, b| match (a, b) {
        (Some(a), Some(b)) => op.apply(a, b).unwrap_or(f64::NAN),
        _ => f64::NAN,
    });
    let unit = match op {
        ArithOp::Add | ArithOp::Sub => left.unit().to_string(),
        ArithOp::Div if left.unit() == right.unit() => String::new(),
        ArithOp::Mul | ArithOp::Div => format!("{}{op}{}", left.unit(), right.unit()),
    };
    let (time_index, symbols) = alignment.into_parts();
    Table::new(
        left.frequency().finer(right.frequency()),
        unit,
        time_index,
        symbols,
        values,
    )
}

/// Logical AND of two conditions.
///
/// An undefined side counts as `false`; the result is undefined only where
/// both sides are.
///
/// # Errors
///
/// Propagates construction errors of the result; none are expected for
/// valid inputs.
pub fn and(left: &Condition, right: &Condition) -> Result<Condition> {
    logical(left, right, "AND", |a, b| a && b)
}

/// Logical OR of two conditions.
///
/// An undefined side counts as `false`, so `undefined OR true` holds.
///
/// # Errors
///
/// Propagates construction errors of the result; none are expected for
/// valid inputs.
pub fn or(left: &Condition, right: &Condition) -> Result<Condition> {
    logical(left, right, "OR", |a, b| a || b)
}

fn logical(
    left: &Condition,
    right: &Condition,
    word: &str,
    f: impl Fn(bool, bool) -> bool,
) -> Result<Condition> {
    let alignment = Alignment::new(left, right);
    let cells = alignment.zip_with(left, right, |a, b| match (a, b) {
        (None, None) => None,
        (a, b) => Some(f(a.unwrap_or(false), b.unwrap_or(false))),
    });
    let (time_index, symbols) = alignment.into_parts();
    Condition::new(
        format!("({}) {word} ({})", left.label(), right.label()),
        time_index,
        symbols,
        cells,
    )
}

/// N-way AND, applied pairwise left to right.
///
/// # Errors
///
/// Returns [`RondaError::InvalidData`] if `conditions` is empty.
pub fn all(conditions: &[&Condition]) -> Result<Condition> {
    fold(conditions, and)
}

/// N-way OR, applied pairwise left to right.
///
/// # Errors
///
/// Returns [`RondaError::InvalidData`] if `conditions` is empty.
pub fn any(conditions: &[&Condition]) -> Result<Condition> {
    fold(conditions, or)
}

fn fold(
    conditions: &[&Condition],
    step: fn(&Condition, &Condition) -> Result<Condition>,
) -> Result<Condition> {
    let (first, rest) = conditions
        .split_first()
        .ok_or_else(|| RondaError::InvalidData("cannot combine zero conditions".to_string()))?;
    rest.iter()
        .try_fold((*first).clone(), |acc, next| step(&acc, next))
}

/// Logical NOT; undefined cells stay undefined.
///
/// # Errors
///
/// Propagates construction errors of the result; none are expected for
/// valid inputs.
pub fn not(condition: &Condition) -> Result<Condition> {
    let cells = ndarray::Array2::from_shape_fn((condition.n_rows(), condition.n_cols()), |(r, c)| {
        condition.cell(r, c).map(|v| !v)
    });
    Condition::new(
        format!("NOT ({})", condition.label()),
        condition.time_index().to_vec(),
        condition.symbols().to_vec(),
        cells,
    )
}

fn describe(table: &Table) -> String {
    if table.unit().is_empty() {
        format!("[{}]", table.frequency())
    } else {
        format!("[{} {}]", table.frequency(), table.unit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ronda_traits::{Date, Frequency};

    fn d(month: u32, day: u32) -> Date {
        Date::from_ymd_opt(2024, month, day).unwrap()
    }

    fn daily(symbols: &[&str], rows: Vec<Vec<f64>>, days: &[u32]) -> Table {
        Table::from_rows(
            Frequency::Daily,
            "TWD",
            days.iter().map(|&day| d(1, day)).collect(),
            symbols.iter().map(|s| s.to_string()).collect(),
            rows,
        )
        .unwrap()
    }

    fn cond(label: &str, days: &[u32], cells: Vec<Option<bool>>) -> Condition {
        Condition::new(
            label,
            days.iter().map(|&day| d(1, day)).collect(),
            vec!["X".into()],
            ndarray::Array2::from_shape_vec((days.len(), 1), cells).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_compare_step_fills_coarser_operand() {
        let close = daily(&["X"], vec![vec![100.0], vec![110.0], vec![120.0]], &[2, 3, 4]);
        // A reference level first known on the 3rd.
        let level = Table::from_rows(
            Frequency::Quarterly,
            "TWD",
            vec![d(1, 3)],
            vec!["X".into()],
            vec![vec![105.0]],
        )
        .unwrap();

        let result = compare(&close, CompareOp::Gt, &level).unwrap();
        assert_eq!(result.time_index(), &[d(1, 2), d(1, 3), d(1, 4)]);
        // Undefined before the level exists, then compared against the held value.
        assert!(!result.is_defined(0, 0));
        assert!(!result.is_true(0, 0));
        assert!(result.is_true(1, 0));
        assert!(result.is_true(2, 0));
    }

    #[test]
    fn test_compare_disjoint_symbols() {
        let a = daily(&["A"], vec![vec![1.0]], &[2]);
        let b = daily(&["B"], vec![vec![1.0]], &[2]);
        let result = compare(&a, CompareOp::Gt, &b).unwrap();
        assert_eq!(result.n_cols(), 0);
        assert!(result.candidates_as_of(d(1, 2)).is_empty());
    }

    #[test]
    fn test_arith_division_by_zero() {
        let a = daily(&["A", "B"], vec![vec![1.0, 2.0]], &[2]);
        let b = daily(&["A", "B"], vec![vec![0.0, 4.0]], &[2]);
        let ratio = arith(&a, ArithOp::Div, &b).unwrap();
        assert_eq!(ratio.get("A", d(1, 2)), None);
        assert_relative_eq!(ratio.get("B", d(1, 2)).unwrap(), 0.5);
        assert_eq!(ratio.unit(), "");
    }

    #[test]
    fn test_arith_tags_finer_frequency() {
        let price = daily(&["A"], vec![vec![10.0], vec![12.0]], &[2, 3]);
        let shares = Table::from_rows(
            Frequency::Quarterly,
            "shares",
            vec![d(1, 1)],
            vec!["A".into()],
            vec![vec![100.0]],
        )
        .unwrap();
        let cap = arith(&price, ArithOp::Mul, &shares).unwrap();
        assert_eq!(cap.frequency(), Frequency::Daily);
        assert_eq!(cap.unit(), "TWD*shares");
        assert_eq!(cap.get("A", d(1, 1)), None);
        assert_relative_eq!(cap.get("A", d(1, 3)).unwrap(), 1200.0);
    }

    #[test]
    fn test_compare_undefined_value_is_false() {
        let a = daily(&["X"], vec![vec![f64::NAN], vec![3.0]], &[2, 3]);
        let b = daily(&["X"], vec![vec![1.0], vec![f64::NAN]], &[2, 3]);
        let result = compare(&a, CompareOp::Gt, &b).unwrap();
        assert_eq!(result.cell(0, 0), Some(false));
        assert_eq!(result.cell(1, 0), Some(false));
    }

    #[test]
    fn test_and_or_undefined_counts_false() {
        let a = cond("a", &[1, 2, 3], vec![Some(true), None, None]);
        let b = cond("b", &[1, 2, 3], vec![Some(false), Some(true), None]);

        let both = and(&a, &b).unwrap();
        assert!(!both.is_true(0, 0));
        assert_eq!(both.cell(1, 0), Some(false));
        assert!(!both.is_defined(2, 0));

        let either = or(&a, &b).unwrap();
        assert!(either.is_true(0, 0));
        assert!(either.is_true(1, 0));
        assert!(!either.is_defined(2, 0));
        assert_eq!(either.label(), "(a) OR (b)");
    }

    #[test]
    fn test_or_of_undefined_comparison_and_true() {
        let roe = daily(&["X"], vec![vec![f64::NAN]], &[2]);
        let floor = daily(&["X"], vec![vec![25.0]], &[2]);
        let dividend = daily(&["X"], vec![vec![3.0]], &[2]);
        let min_dividend = daily(&["X"], vec![vec![2.0]], &[2]);

        let high_roe = compare(&roe, CompareOp::Gt, &floor).unwrap();
        let paying = compare(&dividend, CompareOp::Gt, &min_dividend).unwrap();
        assert_eq!(high_roe.cell(0, 0), Some(false));

        let either = or(&high_roe, &paying).unwrap();
        assert!(either.holds_as_of("X", d(1, 2)));
    }

    #[test]
    fn test_logic_is_associative_and_commutative() {
        let a = cond("a", &[1, 2, 3], vec![Some(true), None, Some(false)]);
        let b = cond("b", &[2, 3], vec![Some(true), Some(true)]);
        let c = cond("c", &[1, 3], vec![Some(false), Some(true)]);

        for op in [and, or] {
            let left = op(&op(&a, &b).unwrap(), &c).unwrap();
            let right = op(&a, &op(&b, &c).unwrap()).unwrap();
            assert_eq!(left.to_bool_array(), right.to_bool_array());

            let ab = op(&a, &b).unwrap();
            let ba = op(&b, &a).unwrap();
            assert_eq!(ab.to_bool_array(), ba.to_bool_array());
        }
    }

    #[test]
    fn test_all_any() {
        let a = cond("a", &[1], vec![Some(true)]);
        let b = cond("b", &[1], vec![Some(false)]);
        assert!(!all(&[&a, &b]).unwrap().is_true(0, 0));
        assert!(any(&[&a, &b]).unwrap().is_true(0, 0));
        assert!(all(&[&a]).unwrap().is_true(0, 0));
        assert!(matches!(all(&[]), Err(RondaError::InvalidData(_))));
    }

    #[test]
    fn test_not_keeps_undefined() {
        let a = cond("a", &[1, 2], vec![Some(true), None]);
        let negated = not(&a).unwrap();
        assert!(!negated.is_true(0, 0));
        assert!(!negated.is_defined(1, 0));
    }
}
