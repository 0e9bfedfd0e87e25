//! Cross-sectional filters evaluated row by row.

use ndarray::Zip;
use ronda_traits::{Condition, Panel, Result, RondaError, Table, stats};

/// True where a value is at or above its row's `q`-quantile.
///
/// The quantile is taken over the defined values of each row with linear
/// interpolation. Undefined values are `false`. Used as a liquidity floor:
/// `quantile_floor(avg_volume, 0.3)` keeps the top 70% by volume.
///
/// # Errors
///
/// Returns [`RondaError::InvalidData`] if `q` is outside `[0, 1]`.
pub fn quantile_floor(table: &Table, q: f64) -> Result<Condition> {
    if !(0.0..=1.0).contains(&q) {
        return Err(RondaError::InvalidData(format!(
            "quantile must be within [0, 1], got {q}"
        )));
    }
    let mut cells = ndarray::Array2::from_elem(table.values().dim(), Some(false));
    Zip::from(cells.rows_mut())
        .and(table.values().rows())
        .par_for_each(|mut out, row| {
            let Some(floor) = stats::quantile(&row.to_vec(), q) else {
                return;
            };
            for (cell, &v) in out.iter_mut().zip(row.iter()) {
                *cell = Some(v.is_finite() && v >= floor);
            }
        });
    Condition::new(
        format!("value >= {q} quantile"),
        table.time_index().to_vec(),
        table.symbols().to_vec(),
        cells,
    )
}
