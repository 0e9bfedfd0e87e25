//! Boolean symbol by time matrices derived from tables.

use ndarray::Array2;

use crate::{
    Date, Panel, Result, RondaError, Symbol,
    table::{validate_index, validate_symbols},
};

/// A derived boolean symbol by time matrix.
///
/// Cells are tri-state: true, false, or undefined (not enough history, or
/// no row yet at that time). A comparison on an undefined value is `false`,
/// not undefined. Every boolean read ([`is_true`](Self::is_true), [`holds_as_of`](Self::holds_as_of),
/// [`candidates_as_of`](Self::candidates_as_of)) treats them as `false`.
///
/// Conditions are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    label: String,
    time_index: Vec<Date>,
    symbols: Vec<Symbol>,
    cells: Array2<Option<bool>>,
}

impl Condition {
    /// Creates a condition from a `time x symbol` array of tri-state cells.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Shape`] if the index is not strictly increasing,
    /// symbols repeat, or the array does not match the index and symbols.
    pub fn new(
        label: impl Into<String>,
        time_index: Vec<Date>,
        symbols: Vec<Symbol>,
        cells: Array2<Option<bool>>,
    ) -> Result<Self> {
        validate_index(&time_index)?;
        validate_symbols(&symbols)?;
        if cells.dim() != (time_index.len(), symbols.len()) {
            return Err(RondaError::Shape(format!(
                "condition cells are {:?}, expected ({}, {})",
                cells.dim(),
                time_index.len(),
                symbols.len()
            )));
        }
        Ok(Self {
            label: label.into(),
            time_index,
            symbols,
            cells,
        })
    }

    /// Human-readable description, e.g. `"price:close > 105"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the same condition under a new label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// The raw tri-state cells.
    pub const fn cells(&self) -> &Array2<Option<bool>> {
        &self.cells
    }

    /// Whether the cell at (`row`, `col`) is true. Undefined reads as false.
    pub fn is_true(&self, row: usize, col: usize) -> bool {
        self.cells[[row, col]] == Some(true)
    }

    /// Whether the cell at (`row`, `col`) carries a value.
    pub fn is_defined(&self, row: usize, col: usize) -> bool {
        self.cells[[row, col]].is_some()
    }

    /// Whether the condition holds for `symbol` at `t` under step-fill.
    ///
    /// False when the symbol is absent, when `t` precedes the first row, or
    /// when the effective cell is undefined.
    pub fn holds_as_of(&self, symbol: &str, t: Date) -> bool {
        self.value_as_of(symbol, t) == Some(true)
    }

    /// Symbols for which the condition holds at `t`, in column order.
    pub fn candidates_as_of(&self, t: Date) -> Vec<Symbol> {
        let Some(row) = self.row_as_of(t) else {
            return Vec::new();
        };
        self.symbols
            .iter()
            .enumerate()
            .filter(|(col, _)| self.is_true(row, *col))
            .map(|(_, s)| s.clone())
            .collect()
    }

    /// Number of symbols for which the condition holds at `t`.
    pub fn count_as_of(&self, t: Date) -> usize {
        self.row_as_of(t).map_or(0, |row| {
            (0..self.symbols.len())
                .filter(|&col| self.is_true(row, col))
                .count()
        })
    }

    /// Two-valued view of the whole matrix, undefined mapped to `false`.
    pub fn to_bool_array(&self) -> Array2<bool> {
        self.cells.mapv(|c| c == Some(true))
    }

    /// The condition over `symbols`, in that order.
    ///
    /// Columns for symbols this condition does not have are filled with
    /// `fill`; columns not listed are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Shape`] if `symbols` repeats a symbol.
    pub fn reindex_symbols(&self, symbols: &[Symbol], fill: Option<bool>) -> Result<Self> {
        let sources: Vec<Option<usize>> = symbols.iter().map(|s| self.column_of(s)).collect();
        let cells = Array2::from_shape_fn((self.time_index.len(), symbols.len()), |(row, col)| {
            sources[col].map_or(fill, |src| self.cells[[row, src]])
        });
        Self::new(self.label.clone(), self.time_index.clone(), symbols.to_vec(), cells)
    }
}

impl Panel for Condition {
    type Value = bool;

    fn time_index(&self) -> &[Date] {
        &self.time_index
    }

    fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    fn cell(&self, row: usize, col: usize) -> Option<bool> {
        self.cells[[row, col]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn sample() -> Condition {
        Condition::new(
            "close > 105",
            vec![d(3), d(4), d(5)],
            vec!["X".into(), "Y".into()],
            array![
                [Some(false), None],
                [Some(true), Some(true)],
                [Some(true), None]
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_undefined_reads_false() {
        let cond = sample();
        assert!(!cond.is_true(0, 1));
        assert!(!cond.is_defined(0, 1));
        assert!(cond.is_true(1, 1));
        assert!(!cond.holds_as_of("Y", d(5)));
        assert!(cond.holds_as_of("Y", d(4)));
    }

    #[test]
    fn test_holds_as_of_before_first_row() {
        let cond = sample();
        assert!(!cond.holds_as_of("X", d(1)));
        assert!(cond.candidates_as_of(d(2)).is_empty());
        assert_eq!(cond.count_as_of(d(2)), 0);
    }

    #[test]
    fn test_candidates_as_of() {
        let cond = sample();
        assert_eq!(cond.candidates_as_of(d(4)), vec!["X", "Y"]);
        assert_eq!(cond.candidates_as_of(d(30)), vec!["X"]);
        assert_eq!(cond.count_as_of(d(4)), 2);
    }

    #[test]
    fn test_reindex_symbols() {
        let cond = sample()
            .reindex_symbols(&["Z".into(), "X".into()], Some(false))
            .unwrap();
        assert_eq!(cond.symbols(), &["Z".to_string(), "X".to_string()]);
        assert_eq!(cond.cell(1, 0), Some(false));
        assert_eq!(cond.cell(1, 1), Some(true));
        assert!(sample().reindex_symbols(&["X".into(), "X".into()], None).is_err());
    }

    #[test]
    fn test_to_bool_array() {
        let cond = sample();
        assert_eq!(
            cond.to_bool_array(),
            array![[false, false], [true, true], [true, false]]
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let err = Condition::new(
            "bad",
            vec![d(1)],
            vec!["X".into()],
            array![[Some(true), Some(false)]],
        )
        .unwrap_err();
        assert!(matches!(err, RondaError::Shape(_)));
    }
}
