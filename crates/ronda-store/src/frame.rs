//! Bridge between long-format polars frames and [`Table`]s.
//!
//! Upstream data usually arrives as one row per observation:
//!
//! | symbol | date | value |
//! |---|---|---|
//! | 2330 | 2024-01-02 | 600.0 |
//!
//! [`table_from_frame`] pivots such a frame into a time by symbol matrix and
//! [`table_to_frame`] goes the other way.

use std::collections::{BTreeSet, HashMap};

use ndarray::Array2;
use polars::prelude::*;
use ronda_traits::{Date, Frequency, Panel, Result, RondaError, Table};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a long frame with `symbol`, `date` and `value_col` columns.
///
/// Null values become undefined cells. Columns follow the order in which
/// symbols first appear in the frame.
///
/// # Errors
///
/// - [`RondaError::Polars`] if a column is missing or has the wrong type.
/// - [`RondaError::InvalidData`] if a symbol or date is null.
/// - [`RondaError::Shape`] if a (symbol, date) pair appears twice.
pub fn table_from_frame(
    df: &DataFrame,
    value_col: &str,
    frequency: Frequency,
    unit: &str,
) -> Result<Table> {
    let symbols = df.column("symbol")?.as_materialized_series().str()?;
    let dates: Vec<Option<Date>> = df
        .column("date")?
        .as_materialized_series()
        .date()?
        .into_iter()
        .map(|d: Option<i32>| {
            d.and_then(|d| Date::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE))
        })
        .collect();
    let values = df
        .column(value_col)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let values = values.f64()?;

    let mut columns: Vec<String> = Vec::new();
    let mut col_of: HashMap<&str, usize> = HashMap::new();
    let mut observations: Vec<(usize, Date, f64)> = Vec::with_capacity(df.height());

    for (i, ((symbol, date), value)) in symbols
        .into_iter()
        .zip(dates)
        .zip(values.into_iter())
        .enumerate()
    {
        let symbol =
            symbol.ok_or_else(|| RondaError::InvalidData(format!("null symbol at row {i}")))?;
        let date = date.ok_or_else(|| RondaError::InvalidData(format!("null date at row {i}")))?;
        let col = *col_of.entry(symbol).or_insert_with(|| {
            columns.push(symbol.to_string());
            columns.len() - 1
        });
        observations.push((col, date, value.unwrap_or(f64::NAN)));
    }

    let time_index: Vec<Date> = observations
        .iter()
        .map(|(_, date, _)| *date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut cells = Array2::from_elem((time_index.len(), columns.len()), f64::NAN);
    let mut seen = vec![false; cells.len()];
    for (col, date, value) in observations {
        let row = time_index
            .binary_search(&date)
            .map_err(|_| RondaError::Other(format!("date {date} missing from index")))?;
        let slot = row * columns.len() + col;
        if std::mem::replace(&mut seen[slot], true) {
            return Err(RondaError::Shape(format!(
                "duplicate cell for {} at {date}",
                columns[col]
            )));
        }
        cells[[row, col]] = value;
    }

    Table::new(frequency, unit, time_index, columns, cells)
}

/// Convert a table into a long frame with `symbol`, `date` and `value`
/// columns, one row per defined cell, ordered by date then column.
///
/// # Errors
///
/// Returns [`RondaError::Polars`] if the frame cannot be assembled.
pub fn table_to_frame(table: &Table) -> Result<DataFrame> {
    let mut symbols = Vec::new();
    let mut dates = Vec::new();
    let mut values = Vec::new();
    for (row, date) in table.time_index().iter().enumerate() {
        for (col, symbol) in table.symbols().iter().enumerate() {
            if let Some(v) = table.cell(row, col) {
                symbols.push(symbol.as_str());
                dates.push(*date);
                values.push(v);
            }
        }
    }

    let df = df! {
        "symbol" => symbols,
        "date" => dates,
        "value" => values,
    }?;
    Ok(df)
}
