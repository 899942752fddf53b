//! Cure test key values and the cure law

use serde::Serialize;

use super::{ThresholdTime, column, first_time};
use crate::app::models::DerivedTable;
use crate::app::services::metrics::{series_max, series_min};
use crate::constants::{CURE_THRESHOLDS, columns};

/// Torque extremes and threshold times of a cure test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CureSummary {
    /// Longest recorded time (minutes)
    pub total_time: Option<f64>,
    /// Maximum torque (dNm)
    pub max_sp: Option<f64>,
    /// Minimum torque (dNm)
    pub min_sp: Option<f64>,
    /// Difference between maximum and minimum torque
    pub sp_range: Option<f64>,
    /// First time each fraction of maximum torque is reached
    pub thresholds: Vec<ThresholdTime>,
}

pub fn cure_summary(table: &DerivedTable) -> CureSummary {
    let time = column(table, columns::TIME);
    let sp = column(table, columns::SP);

    let max_sp = series_max(sp);
    let min_sp = series_min(sp);

    let thresholds = CURE_THRESHOLDS
        .iter()
        .map(|&(label, factor)| ThresholdTime {
            label,
            factor,
            time: max_sp.and_then(|max| first_time(time.iter().zip(sp), |v| v >= factor * max)),
        })
        .collect();

    CureSummary {
        total_time: series_max(time),
        max_sp,
        min_sp,
        sp_range: max_sp.zip(min_sp).map(|(max, min)| max - min),
        thresholds,
    }
}

/// Torque at a chosen time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CureLawPoint {
    /// Evaluation time (minutes)
    pub time: f64,
    /// Interpolated torque; `None` without any (Time, Sp) pair
    pub sp: Option<f64>,
    /// Interpolated torque as a percentage of maximum torque
    pub percent_of_max: f64,
}

/// Interpolate torque at `time`, clamped to the first and last samples
pub fn cure_law(table: &DerivedTable, time: f64) -> CureLawPoint {
    let points: Vec<(f64, f64)> = column(table, columns::TIME)
        .iter()
        .zip(column(table, columns::SP))
        .filter_map(|(t, sp)| t.zip(*sp))
        .collect();

    let sp = interpolate(&points, time);
    let percent_of_max = match (sp, series_max(column(table, columns::SP))) {
        (Some(value), Some(max)) if max != 0.0 => value / max * 100.0,
        _ => 0.0,
    };

    CureLawPoint {
        time,
        sp,
        percent_of_max,
    }
}

/// Piecewise-linear interpolation over points sorted by x
fn interpolate(points: &[(f64, f64)], x: f64) -> Option<f64> {
    let (first, last) = (points.first()?, points.last()?);
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }

    points.windows(2).find_map(|pair| {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if x < x0 || x > x1 {
            return None;
        }
        if x1 == x0 {
            return Some(y0);
        }
        Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ParsedRecord;

    fn table(time: &[Option<f64>], sp: &[Option<f64>]) -> DerivedTable {
        let record = ParsedRecord::new(vec!["Time".into()], vec![Vec::new(); time.len()]);
        let mut table = DerivedTable::new(record);
        table.insert(columns::TIME, time.to_vec());
        table.insert(columns::SP, sp.to_vec());
        table
    }

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn threshold(summary: &CureSummary, label: &str) -> Option<f64> {
        summary
            .thresholds
            .iter()
            .find(|t| t.label == label)
            .and_then(|t| t.time)
    }

    #[test]
    fn test_cure_summary() {
        let t = table(
            &some(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]),
            &some(&[1.0, 1.0, 4.0, 9.0, 9.9, 10.0]),
        );
        let summary = cure_summary(&t);

        assert_eq!(summary.total_time, Some(5.0));
        assert_eq!(summary.max_sp, Some(10.0));
        assert_eq!(summary.min_sp, Some(1.0));
        assert_eq!(summary.sp_range, Some(9.0));
        assert_eq!(summary.thresholds.len(), 8);

        assert_eq!(threshold(&summary, "TS2"), Some(0.0));
        assert_eq!(threshold(&summary, "TC30"), Some(2.0));
        assert_eq!(threshold(&summary, "TC90"), Some(3.0));
        assert_eq!(threshold(&summary, "TC99"), Some(4.0));
        assert_eq!(threshold(&summary, "TC100"), Some(5.0));
    }

    #[test]
    fn test_cure_summary_without_torque() {
        let t = table(&some(&[0.0, 1.0]), &[None, None]);
        let summary = cure_summary(&t);

        assert_eq!(summary.max_sp, None);
        assert_eq!(summary.sp_range, None);
        assert!(summary.thresholds.iter().all(|t| t.time.is_none()));
    }

    #[test]
    fn test_cure_law_interpolates() {
        let t = table(&some(&[0.0, 1.0, 2.0]), &some(&[0.0, 10.0, 20.0]));

        let point = cure_law(&t, 1.5);
        assert_eq!(point.sp, Some(15.0));
        assert_eq!(point.percent_of_max, 75.0);

        assert_eq!(cure_law(&t, -1.0).sp, Some(0.0));
        assert_eq!(cure_law(&t, 9.0).sp, Some(20.0));
        assert_eq!(cure_law(&t, 9.0).percent_of_max, 100.0);
    }

    #[test]
    fn test_cure_law_skips_missing_pairs() {
        let t = table(
            &[Some(0.0), None, Some(2.0)],
            &[Some(0.0), Some(99.0), Some(4.0)],
        );
        assert_eq!(cure_law(&t, 1.0).sp, Some(2.0));
    }

    #[test]
    fn test_cure_law_degenerate() {
        let empty = table(&[], &[]);
        let point = cure_law(&empty, 1.0);
        assert_eq!(point.sp, None);
        assert_eq!(point.percent_of_max, 0.0);

        let zeros = table(&some(&[0.0, 1.0]), &some(&[0.0, 0.0]));
        assert_eq!(cure_law(&zeros, 0.5).percent_of_max, 0.0);
    }
}
