//! Cross-sectional statistics shared by predicates and scorers.
//!
//! All helpers ignore non-finite inputs when computing statistics.

/// Minimum standard deviation treated as a real spread.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

/// Statistics computed while standardizing a cross-section.
#[derive(Debug, Clone, Copy)]
pub struct StandardizeResult {
    /// Mean of the finite inputs.
    pub mean: f64,
    /// Sample standard deviation (N-1 denominator) of the finite inputs.
    pub std: f64,
    /// Whether z-scores were produced (false when the spread is degenerate).
    pub applied: bool,
}

/// Standardize values to z-scores (mean 0, sample std 1).
///
/// Non-finite inputs are excluded from the statistics and stay `NaN` in the
/// output. When fewer than two finite values exist or the spread is below
/// [`MIN_STD_THRESHOLD`], every output is `0.0`.
///
/// # Examples
///
/// ```
/// use ronda_traits::stats::standardize;
///
/// let (z, result) = standardize(&[1.0, 2.0, 3.0]);
/// assert!(result.applied);
/// assert!((z[1]).abs() < 1e-12);
/// ```
pub fn standardize(values: &[f64]) -> (Vec<f64>, StandardizeResult) {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    let Some(mean) = mean(&finite) else {
        return (
            vec![f64::NAN; values.len()],
            StandardizeResult {
                mean: f64::NAN,
                std: f64::NAN,
                applied: false,
            },
        );
    };

    let n = finite.len();
    let variance = if n > 1 {
        finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };
    let std = variance.sqrt();
    let applied = std > MIN_STD_THRESHOLD;

    let standardized = if applied {
        values
            .iter()
            .map(|x| if x.is_finite() { (x - mean) / std } else { f64::NAN })
            .collect()
    } else {
        vec![0.0; values.len()]
    };

    (standardized, StandardizeResult { mean, std, applied })
}

/// Arithmetic mean of the finite values, `None` if there are none.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Linearly interpolated `q`-quantile of the finite values.
///
/// Uses the same interpolation as pandas' default (`linear`): the quantile
/// sits at position `q * (n - 1)` of the sorted values. Returns `None` when
/// there are no finite values or `q` is outside `[0, 1]`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
