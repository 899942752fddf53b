//! Centered rolling-mean smoothing
//!
//! A window of odd size `w` centered on row `i` covers rows
//! `i - (w-1)/2 ..= i + (w-1)/2`. Rows without a full window are missing,
//! and a single missing value makes its whole window missing.

/// Centered rolling mean over `window` rows
pub fn centered_rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    if window == 0 {
        return vec![None; n];
    }
    let half = (window - 1) / 2;

    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            values[i - half..=i + half]
                .iter()
                .copied()
                .sum::<Option<f64>>()
                .map(|sum| sum / window as f64)
        })
        .collect()
}

/// Restore the raw values of rows 0 and 1 in a smoothed column
pub fn keep_first_two_raw(mut smoothed: Vec<Option<f64>>, raw: &[Option<f64>]) -> Vec<Option<f64>> {
    for (slot, value) in smoothed.iter_mut().zip(raw).take(2) {
        *slot = *value;
    }
    smoothed
}
