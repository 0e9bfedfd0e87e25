//! Rolling window statistics on a table's own index.

use std::fmt;

use ronda_traits::{Panel, Result, RondaError, Table};
use serde::{Deserialize, Serialize};

use crate::columns::{map_columns, window};

/// Statistic computed over a rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollingStat {
    /// Smallest value in the window
    Min,
    /// Largest value in the window
    Max,
    /// Arithmetic mean of the window
    Mean,
}

impl RollingStat {
    /// Short name used in labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Mean => "mean",
        }
    }
}

impl fmt::Display for RollingStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rolling statistic over the most recent `window_len` rows, current row included.
///
/// The window is counted on the table's native index, so a 20-row window on
/// a daily table is 20 trading days and on a monthly table 20 months. A cell
/// is undefined unless all `window_len` cells are defined, which also leaves the
/// first `window_len - 1` rows undefined.
///
/// # Errors
///
/// Returns [`RondaError::InvalidData`] if `window_len` is zero.
pub fn rolling(table: &Table, stat: RollingStat, window_len: usize) -> Result<Table> {
    if window_len == 0 {
        return Err(RondaError::InvalidData(
            "rolling window must be at least 1".to_string(),
        ));
    }
    let values = map_columns(table.values(), f64::NAN, |column, mut out| {
        for (row, cell) in out.iter_mut().enumerate() {
            let Some(w) = window(&column, row, window_len) else {
                continue;
            };
            if w.iter().any(|v| !v.is_finite()) {
                continue;
            }
            *cell = match stat {
                RollingStat::Min => w.fold(f64::INFINITY, |acc, &v| acc.min(v)),
                RollingStat::Max => w.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v)),
                RollingStat::Mean => w.sum() / window_len as f64,
            };
        }
    });
    Table::new(
        table.frequency(),
        table.unit(),
        table.time_index().to_vec(),
        table.symbols().to_vec(),
        values,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ronda_traits::{Date, Frequency};

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(values: Vec<f64>) -> Table {
        let index = (1..=values.len() as u32).map(d).collect();
        Table::from_columns(Frequency::Daily, "TWD", index, vec![("X".into(), values)]).unwrap()
    }

    #[test]
    fn test_rolling_max_min_mean() {
        let table = series(vec![3.0, 1.0, 4.0, 1.0, 5.0]);

        let max = rolling(&table, RollingStat::Max, 3).unwrap();
        assert_eq!(max.get("X", d(1)), None);
        assert_eq!(max.get("X", d(2)), None);
        assert_eq!(max.get("X", d(3)), Some(4.0));
        assert_eq!(max.get("X", d(5)), Some(5.0));

        let min = rolling(&table, RollingStat::Min, 3).unwrap();
        assert_eq!(min.get("X", d(4)), Some(1.0));

        let mean = rolling(&table, RollingStat::Mean, 2).unwrap();
        assert_relative_eq!(mean.get("X", d(5)).unwrap(), 3.0);
        assert_eq!(mean.unit(), "TWD");
    }

    #[test]
    fn test_rolling_needs_full_window() {
        let table = series(vec![1.0, f64::NAN, 3.0, 4.0, 5.0]);
        let mean = rolling(&table, RollingStat::Mean, 2).unwrap();
        assert_eq!(mean.get("X", d(2)), None);
        assert_eq!(mean.get("X", d(3)), None);
        assert_relative_eq!(mean.get("X", d(4)).unwrap(), 3.5);
    }

    #[test]
    fn test_rolling_window_longer_than_history() {
        let table = series(vec![1.0, 2.0]);
        let max = rolling(&table, RollingStat::Max, 5).unwrap();
        assert_eq!(max.defined_count(), 0);
    }

    #[test]
    fn test_rolling_zero_window() {
        let table = series(vec![1.0]);
        assert!(rolling(&table, RollingStat::Max, 0).is_err());
    }
}
