//! Frequency-tagged numeric tables.

use std::collections::HashSet;

use ndarray::{Array2, ArrayView1, Axis};

use crate::{Date, Frequency, Panel, Result, RondaError, Symbol};

/// A symbol by time numeric matrix.
///
/// Rows are timestamps, columns are symbols. Undefined cells hold `NaN`
/// (any non-finite value reads as undefined through [`Panel::cell`]).
///
/// A `Table` is immutable once built. Construction validates the shape
/// invariants:
/// - `time_index` is strictly increasing (hence duplicate free),
/// - `symbols` are unique,
/// - the payload is `time_index.len() x symbols.len()`.
///
/// # Example
///
/// ```
/// use ronda_traits::{Date, Frequency, Table};
///
/// let d = |day| Date::from_ymd_opt(2024, 1, day).unwrap();
/// let close = Table::from_columns(
///     Frequency::Daily,
///     "TWD",
///     vec![d(2), d(3), d(4)],
///     vec![("X".to_string(), vec![100.0, 110.0, 120.0])],
/// )
/// .unwrap();
///
/// assert_eq!(close.get("X", d(3)), Some(110.0));
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    frequency: Frequency,
    unit: String,
    time_index: Vec<Date>,
    symbols: Vec<Symbol>,
    values: Array2<f64>,
}

impl Table {
    /// Creates a table from a row-major `time x symbol` array.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Shape`] if any shape invariant is violated.
    pub fn new(
        frequency: Frequency,
        unit: impl Into<String>,
        time_index: Vec<Date>,
        symbols: Vec<Symbol>,
        values: Array2<f64>,
    ) -> Result<Self> {
        validate_index(&time_index)?;
        validate_symbols(&symbols)?;
        if values.dim() != (time_index.len(), symbols.len()) {
            return Err(RondaError::Shape(format!(
                "payload is {:?}, expected ({}, {})",
                values.dim(),
                time_index.len(),
                symbols.len()
            )));
        }

        Ok(Self {
            frequency,
            unit: unit.into(),
            time_index,
            symbols,
            values,
        })
    }

    /// Creates a table from one vector per row.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Shape`] if the rows are ragged or any other
    /// invariant fails.
    pub fn from_rows(
        frequency: Frequency,
        unit: impl Into<String>,
        time_index: Vec<Date>,
        symbols: Vec<Symbol>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let width = symbols.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(RondaError::Shape(format!(
                "row {i} has {} values, expected {width}",
                row.len()
            )));
        }
        let height = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let values = Array2::from_shape_vec((height, width), flat)
            .map_err(|e| RondaError::Shape(e.to_string()))?;
        Self::new(frequency, unit, time_index, symbols, values)
    }

    /// Creates a table from one `(symbol, series)` pair per column.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Shape`] if a series length differs from the
    /// time index or any other invariant fails.
    pub fn from_columns(
        frequency: Frequency,
        unit: impl Into<String>,
        time_index: Vec<Date>,
        columns: Vec<(Symbol, Vec<f64>)>,
    ) -> Result<Self> {
        let height = time_index.len();
        let mut values = Array2::from_elem((height, columns.len()), f64::NAN);
        let mut symbols = Vec::with_capacity(columns.len());
        for (col, (symbol, series)) in columns.into_iter().enumerate() {
            if series.len() != height {
                return Err(RondaError::Shape(format!(
                    "column {symbol} has {} values, expected {height}",
                    series.len()
                )));
            }
            for (row, v) in series.into_iter().enumerate() {
                values[[row, col]] = v;
            }
            symbols.push(symbol);
        }
        Self::new(frequency, unit, time_index, symbols, values)
    }

    /// Native sampling frequency.
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Unit label (currency, "shares", "%", ...).
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The raw `time x symbol` payload, `NaN` where undefined.
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Whether the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value recorded for `symbol` exactly at `date`.
    pub fn get(&self, symbol: &str, date: Date) -> Option<f64> {
        let row = self.time_index.binary_search(&date).ok()?;
        let col = self.column_of(symbol)?;
        self.cell(row, col)
    }

    /// The full series of one symbol along the native index.
    pub fn column(&self, symbol: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_of(symbol)
            .map(|col| self.values.index_axis(Axis(1), col))
    }

    /// Number of defined cells.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Applies `f` to every defined cell, keeping shape, index and frequency.
    ///
    /// Undefined cells stay undefined; a non-finite result becomes undefined.
    #[must_use]
    pub fn map(&self, unit: impl Into<String>, f: impl Fn(f64) -> f64) -> Self {
        let values = self.values.mapv(|v| {
            if v.is_finite() {
                let out = f(v);
                if out.is_finite() { out } else { f64::NAN }
            } else {
                f64::NAN
            }
        });
        Self {
            frequency: self.frequency,
            unit: unit.into(),
            time_index: self.time_index.clone(),
            symbols: self.symbols.clone(),
            values,
        }
    }

    /// Multiplies every defined cell by `factor`.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        self.map(self.unit.clone(), |v| v * factor)
    }

    /// Returns the same table with a different unit label.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Returns the same table re-tagged with another frequency.
    #[must_use]
    pub const fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }
}

impl Panel for Table {
    type Value = f64;

    fn time_index(&self) -> &[Date] {
        &self.time_index
    }

    fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    fn cell(&self, row: usize, col: usize) -> Option<f64> {
        let v = self.values[[row, col]];
        v.is_finite().then_some(v)
    }
}

/// Checks that `index` is strictly increasing.
///
/// # Errors
///
/// Returns [`RondaError::Shape`] naming the first offending pair.
pub fn validate_index(index: &[Date]) -> Result<()> {
    match index.windows(2).position(|w| w[0] >= w[1]) {
        Some(i) if index[i] == index[i + 1] => Err(RondaError::Shape(format!(
            "duplicate timestamp {} at rows {i} and {}",
            index[i],
            i + 1
        ))),
        Some(i) => Err(RondaError::Shape(format!(
            "time index not increasing: {} at row {i} is after {} at row {}",
            index[i],
            index[i + 1],
            i + 1
        ))),
        None => Ok(()),
    }
}

/// Checks that `symbols` has no duplicates.
///
/// # Errors
///
/// Returns [`RondaError::Shape`] naming the first duplicate.
pub fn validate_symbols(symbols: &[Symbol]) -> Result<()> {
    let mut seen = HashSet::with_capacity(symbols.len());
    match symbols.iter().find(|s| !seen.insert(s.as_str())) {
        Some(dup) => Err(RondaError::Shape(format!("duplicate symbol {dup}"))),
        None => Ok(()),
    }
}
