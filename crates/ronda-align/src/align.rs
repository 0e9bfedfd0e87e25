//! Time and symbol alignment of two panels.

use std::{cmp::Ordering, collections::HashMap};

use ndarray::Array2;
use ronda_traits::{Date, Panel, Symbol};

/// Sorted, duplicate-free union of two strictly increasing indices.
pub fn union_index(a: &[Date], b: &[Date]) -> Vec<Date> {
    let mut out = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// For every timestamp of `target`, the latest row of `source` at or before it.
///
/// Both indices must be strictly increasing. A target timestamp earlier than
/// every source row maps to `None`.
pub fn as_of_rows(source: &[Date], target: &[Date]) -> Vec<Option<usize>> {
    let mut seen = 0;
    target
        .iter()
        .map(|t| {
            while seen < source.len() && source[seen] <= *t {
                seen += 1;
            }
            seen.checked_sub(1)
        })
        .collect()
}

/// The shared grid of two panels.
///
/// Rows are the union of both time indices; columns are the symbols present
/// in both, in the left panel's column order. Each side is read through its
/// as-of row map, so an input is only ever seen at or after its own
/// timestamps.
#[derive(Debug, Clone)]
pub struct Alignment {
    time_index: Vec<Date>,
    symbols: Vec<Symbol>,
    left_rows: Vec<Option<usize>>,
    right_rows: Vec<Option<usize>>,
    left_cols: Vec<usize>,
    right_cols: Vec<usize>,
}

impl Alignment {
    /// Build the alignment grid of `left` and `right`.
    pub fn new<L, R>(left: &L, right: &R) -> Self
    where
        L: Panel + ?Sized,
        R: Panel + ?Sized,
    {
        let time_index = union_index(left.time_index(), right.time_index());
        let left_rows = as_of_rows(left.time_index(), &time_index);
        let right_rows = as_of_rows(right.time_index(), &time_index);

        let right_pos: HashMap<&str, usize> = right
            .symbols()
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();
        let mut symbols = Vec::new();
        let mut left_cols = Vec::new();
        let mut right_cols = Vec::new();
        for (li, symbol) in left.symbols().iter().enumerate() {
            if let Some(&ri) = right_pos.get(symbol.as_str()) {
                symbols.push(symbol.clone());
                left_cols.push(li);
                right_cols.push(ri);
            }
        }
        if symbols.is_empty() && left.n_cols() > 0 && right.n_cols() > 0 {
            tracing::debug!(
                left = left.n_cols(),
                right = right.n_cols(),
                "aligned panels share no symbols"
            );
        }

        Self {
            time_index,
            symbols,
            left_rows,
            right_rows,
            left_cols,
            right_cols,
        }
    }

    /// Union time index.
    pub fn time_index(&self) -> &[Date] {
        &self.time_index
    }

    /// Common symbols, left column order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Whether the panels share no symbols.
    pub fn is_degenerate(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Combine the effective cells of both panels with `f`.
    ///
    /// `left` and `right` must be the panels this alignment was built from.
    pub fn zip_with<L, R, T, F>(&self, left: &L, right: &R, f: F) -> Array2<T>
    where
        L: Panel + ?Sized,
        R: Panel + ?Sized,
        F: Fn(Option<L::Value>, Option<R::Value>) -> T,
    {
        Array2::from_shape_fn((self.time_index.len(), self.symbols.len()), |(r, c)| {
            let lv = self.left_rows[r].and_then(|row| left.cell(row, self.left_cols[c]));
            let rv = self.right_rows[r].and_then(|row| right.cell(row, self.right_cols[c]));
            f(lv, rv)
        })
    }

    /// Like [`zip_with`](Self::zip_with), but `f` also sees alignment gaps.
    ///
    /// The outer `None` means the panel has no row at or before the
    /// timestamp; `Some(None)` means the row exists and the value is undefined.
    pub fn zip_rows_with<L, R, T, F>(&self, left: &L, right: &R, f: F) -> Array2<T>
    where
        L: Panel + ?Sized,
        R: Panel + ?Sized,
        F: Fn(Option<Option<L::Value>>, Option<Option<R::Value>>) -> T,
    {
        Array2::from_shape_fn((self.time_index.len(), self.symbols.len()), |(r, c)| {
            let lv = self.left_rows[r].map(|row| left.cell(row, self.left_cols[c]));
            let rv = self.right_rows[r].map(|row| right.cell(row, self.right_cols[c]));
            f(lv, rv)
        })
    }

    /// Consume the alignment, keeping the index and symbols.
    pub fn into_parts(self) -> (Vec<Date>, Vec<Symbol>) {
        (self.time_index, self.symbols)
    }
}
