// =============================================================================
// Trailing-window helpers
// =============================================================================
//
// For position i the window is values[i + 1 - min(window, i + 1) ..= i]: the
// trailing `window` values, or every value seen so far near the start.

/// Apply `f` to the trailing window ending at every position of `values`.
///
/// Returns an empty vec when `window == 0`.
pub fn rolling_apply<F>(values: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if window == 0 {
        return Vec::new();
    }

    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            f(&values[start..=i])
        })
        .collect()
}

/// Arithmetic mean. Callers never pass an empty slice.
pub fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Sample standard deviation (divisor `n - 1`). A single observation has no
/// spread and yields 0.0 rather than NaN.
pub fn sample_std(window: &[f64]) -> f64 {
    if window.len() < 2 {
        return 0.0;
    }
    let m = mean(window);
    let variance =
        window.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (window.len() - 1) as f64;
    variance.sqrt()
}
