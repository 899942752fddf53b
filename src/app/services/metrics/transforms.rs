//! Elementwise numeric transforms over nullable columns
//!
//! Missing values are `None` and propagate: they never become zero and never
//! raise.

/// Coerce one text cell to a finite number
pub fn coerce_cell(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Coerce a text column, turning invalid tokens into missing values
pub fn coerce_column(cells: &[&str]) -> Vec<Option<f64>> {
    cells.iter().map(|cell| coerce_cell(cell)).collect()
}

/// Largest present value
pub fn series_max(values: &[Option<f64>]) -> Option<f64> {
    values
        .iter()
        .flatten()
        .copied()
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
}

/// Smallest present value
pub fn series_min(values: &[Option<f64>]) -> Option<f64> {
    values
        .iter()
        .flatten()
        .copied()
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
}

/// Elementwise quotient; a zero or missing denominator yields a missing value
pub fn ratio(numerator: &[Option<f64>], denominator: &[Option<f64>]) -> Vec<Option<f64>> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(n, d)| divide(*n, *d))
        .collect()
}

/// Divide every value by `base`; a missing or zero base makes every value missing
pub fn normalize(values: &[Option<f64>], base: Option<f64>) -> Vec<Option<f64>> {
    values.iter().map(|v| divide(*v, base)).collect()
}

fn divide(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d).filter(|q| q.is_finite()),
        _ => None,
    }
}
