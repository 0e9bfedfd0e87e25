//! Column-parallel helpers shared by the predicate builders.

use ndarray::{Array2, ArrayView1, ArrayViewMut1, Zip};

/// Fill a new matrix column by column from the matching column of `input`.
///
/// Columns are independent, so they are processed on the rayon pool.
pub(crate) fn map_columns<A, T, F>(input: &Array2<A>, fill: T, f: F) -> Array2<T>
where
    A: Sync,
    T: Clone + Send + Sync,
    F: Fn(ArrayView1<'_, A>, ArrayViewMut1<'_, T>) + Send + Sync,
{
    let mut out = Array2::from_elem(input.dim(), fill);
    Zip::from(out.columns_mut())
        .and(input.columns())
        .par_for_each(|out, column| f(column, out));
    out
}

/// The `len` cells ending at `row`, or `None` if the window starts before
/// the first row.
pub(crate) fn window<'a, A>(column: &'a ArrayView1<'_, A>, row: usize, len: usize) -> Option<ArrayView1<'a, A>> {
    let start = (row + 1).checked_sub(len)?;
    Some(column.slice(ndarray::s![start..=row]))
}
