//! Consecutive growth and streak predicates.

use ronda_traits::{Condition, Panel, Result, RondaError, Table};

use crate::columns::{map_columns, window};

/// True where the last `k` observations are strictly increasing.
///
/// That is `k - 1` chained comparisons `x[t-k+1] < ... < x[t]` on the native
/// index. A cell whose window reaches before the first row or contains an
/// undefined observation is undefined, so fewer than `k` valid observations
/// never pass.
///
/// # Errors
///
/// Returns [`RondaError::InvalidData`] if `k` is less than 2.
pub fn consecutive_growth(table: &Table, k: usize) -> Result<Condition> {
    if k < 2 {
        return Err(RondaError::InvalidData(format!(
            "consecutive growth needs at least 2 observations, got {k}"
        )));
    }
    let cells = map_columns(table.values(), None, |column, mut out| {
        for (row, cell) in out.iter_mut().enumerate() {
            let Some(w) = window(&column, row, k) else {
                continue;
            };
            if w.iter().all(|v| v.is_finite()) {
                *cell = Some(w.windows(2).into_iter().all(|pair| pair[0] < pair[1]));
            }
        }
    });
    Condition::new(
        format!("growing for {k} observations"),
        table.time_index().to_vec(),
        table.symbols().to_vec(),
        cells,
    )
}

/// True where `condition` held on each of its last `n` rows.
///
/// A window containing a false cell is false; otherwise a window reaching
/// before the first row or containing an undefined cell is undefined.
///
/// # Errors
///
/// Returns [`RondaError::InvalidData`] if `n` is zero.
pub fn streak(condition: &Condition, n: usize) -> Result<Condition> {
    if n == 0 {
        return Err(RondaError::InvalidData("streak length must be at least 1".to_string()));
    }
    let cells = map_columns(condition.cells(), None, |column, mut out| {
        for (row, cell) in out.iter_mut().enumerate() {
            let start = (row + 1).saturating_sub(n);
            let w = column.slice(ndarray::s![start..=row]);
            *cell = if w.iter().any(|c| *c == Some(false)) {
                Some(false)
            } else if w.len() < n || w.iter().any(Option::is_none) {
                None
            } else {
                Some(true)
            };
        }
    });
    Condition::new(
        format!("({}) for {n} rows", condition.label()),
        condition.time_index().to_vec(),
        condition.symbols().to_vec(),
        cells,
    )
}
