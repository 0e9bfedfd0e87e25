//! Peer-group relative comparison.

use std::collections::HashMap;

use ndarray::{Array2, Zip};
use ronda_align::CompareOp;
use ronda_traits::{CategoryMap, Condition, Panel, Result, Symbol, Table};

/// Columns of `table` that have a category, and each one's group index.
struct Groups {
    columns: Vec<usize>,
    symbols: Vec<Symbol>,
    group_of: Vec<usize>,
    n_groups: usize,
}

impl Groups {
    fn new(table: &Table, categories: &CategoryMap) -> Self {
        let mut ids: HashMap<&str, usize> = HashMap::new();
        let mut groups = Self {
            columns: Vec::new(),
            symbols: Vec::new(),
            group_of: Vec::new(),
            n_groups: 0,
        };
        for (col, symbol) in table.symbols().iter().enumerate() {
            let Some(category) = categories.get(symbol) else {
                continue;
            };
            let next = ids.len();
            let id = *ids.entry(category.as_str()).or_insert(next);
            groups.columns.push(col);
            groups.symbols.push(symbol.clone());
            groups.group_of.push(id);
        }
        groups.n_groups = ids.len();

        let dropped = table.n_cols() - groups.columns.len();
        if dropped > 0 {
            tracing::debug!(dropped, "symbols without a category left out of peer comparison");
        }
        groups
    }

    /// Per-row category means, one output column per kept symbol.
    fn means(&self, table: &Table) -> Array2<f64> {
        let mut out = Array2::from_elem((table.n_rows(), self.columns.len()), f64::NAN);
        Zip::from(out.rows_mut())
            .and(table.values().rows())
            .par_for_each(|mut out, row| {
                let mut sums = vec![0.0; self.n_groups];
                let mut counts = vec![0usize; self.n_groups];
                for (&col, &g) in self.columns.iter().zip(&self.group_of) {
                    let v = row[col];
                    if v.is_finite() {
                        sums[g] += v;
                        counts[g] += 1;
                    }
                }
                for (cell, &g) in out.iter_mut().zip(&self.group_of) {
                    if counts[g] > 0 {
                        *cell = sums[g] / counts[g] as f64;
                    }
                }
            });
        out
    }
}

/// For every symbol with a category, the mean of its category on each row.
///
/// The mean is taken over symbols that are both mapped and defined on that
/// row. Symbols missing from `categories` are absent from the result.
///
/// # Errors
///
/// Propagates construction errors of the result; none are expected for
/// valid inputs.
pub fn peer_mean(table: &Table, categories: &CategoryMap) -> Result<Table> {
    let groups = Groups::new(table, categories);
    let values = groups.means(table);
    Table::new(
        table.frequency(),
        table.unit(),
        table.time_index().to_vec(),
        groups.symbols,
        values,
    )
}

/// Compare each symbol against its category mean: `value OP peer_mean`.
///
/// Symbols missing from `categories` are absent from the result columns.
/// Cells where the symbol's own value is undefined are `false`.
///
/// # Errors
///
/// Propagates construction errors of the result; none are expected for
/// valid inputs.
///
/// # Example
///
/// ```
/// use ronda_align::CompareOp;
/// use ronda_predicates::peer_relative;
/// use ronda_traits::{CategoryMap, Date, Frequency, Table};
///
/// let d = Date::from_ymd_opt(2024, 1, 31).unwrap();
/// let growth = Table::from_columns(
///     Frequency::Monthly,
///     "",
///     vec![d],
///     vec![
///         ("A".to_string(), vec![0.3]),
///         ("B".to_string(), vec![0.1]),
///         ("C".to_string(), vec![0.9]),
///     ],
/// )
/// .unwrap();
/// let industry = CategoryMap::from([
///     ("A".to_string(), "semis".to_string()),
///     ("B".to_string(), "semis".to_string()),
/// ]);
///
/// let above = peer_relative(&growth, &industry, CompareOp::Gt).unwrap();
/// assert_eq!(above.candidates_as_of(d), vec!["A"]);
/// ```
pub fn peer_relative(table: &Table, categories: &CategoryMap, op: CompareOp) -> Result<Condition> {
    let groups = Groups::new(table, categories);
    let means = groups.means(table);
    let values = table.values();
    let cells = Array2::from_shape_fn(means.dim(), |(r, j)| {
        let v = values[[r, groups.columns[j]]];
        let mean = means[[r, j]];
        Some(v.is_finite() && mean.is_finite() && op.apply(v, mean))
    });
    Condition::new(
        format!("value {op} peer mean"),
        table.time_index().to_vec(),
        groups.symbols,
        cells,
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

    fn sample() -> (Table, CategoryMap) {
        let table = Table::from_rows(
            Frequency::Monthly,
            "",
            vec![d(1), d(2)],
            vec!["A".into(), "B".into(), "C".into(), "U".into()],
            vec![vec![1.0, 3.0, 10.0, 100.0], vec![f64::NAN, 3.0, 12.0, 100.0]],
        )
        .unwrap();
        let categories = CategoryMap::from([
            ("A".to_string(), "x".to_string()),
            ("B".to_string(), "x".to_string()),
            ("C".to_string(), "y".to_string()),
            ("Z".to_string(), "y".to_string()),
        ]);
        (table, categories)
    }

    #[test]
    fn test_peer_mean() {
        let (table, categories) = sample();
        let means = peer_mean(&table, &categories).unwrap();
        assert_eq!(means.symbols(), &["A".to_string(), "B".to_string(), "C".to_string()]);
        assert_relative_eq!(means.get("A", d(1)).unwrap(), 2.0);
        assert_relative_eq!(means.get("C", d(1)).unwrap(), 10.0);
        // A is undefined on the second row and drops out of its group mean.
        assert_relative_eq!(means.get("A", d(2)).unwrap(), 3.0);
    }

    #[test]
    fn test_peer_relative_excludes_unmapped() {
        let (table, categories) = sample();
        let cond = peer_relative(&table, &categories, CompareOp::Gt).unwrap();
        assert_eq!(cond.n_cols(), 3);
        assert!(cond.column_of("U").is_none());

        assert_eq!(cond.candidates_as_of(d(1)), vec!["B"]);
        // A undefined, B equals its mean, C alone in its group.
        assert!(cond.candidates_as_of(d(2)).is_empty());
        assert_eq!(cond.cell(1, 0), Some(false));
    }

    #[test]
    fn test_peer_relative_no_mapping() {
        let (table, _) = sample();
        let cond = peer_relative(&table, &CategoryMap::new(), CompareOp::Gt).unwrap();
        assert_eq!(cond.n_cols(), 0);
    }
}
