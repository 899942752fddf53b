//! Scorch test key values
//!
//! Scorch times are measured from T0, the last time the torque sits at its
//! minimum, to the first later time the torque rises by a fixed multiple.

use serde::Serialize;

use super::{ThresholdTime, column, first_time};
use crate::app::models::DerivedTable;
use crate::app::services::metrics::series_min;
use crate::constants::{SCORCH_THRESHOLDS, columns};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorchSummary {
    /// Minimum torque (dNm)
    pub min_sp: Option<f64>,
    /// Last time the minimum torque is recorded
    pub t0: Option<f64>,
    /// Scorch times after T0
    pub thresholds: Vec<ThresholdTime>,
}

pub fn scorch_summary(table: &DerivedTable) -> ScorchSummary {
    let time = column(table, columns::TIME);
    let sp = column(table, columns::SP);

    let min_sp = series_min(sp);
    let t0 = min_sp.and_then(|min| {
        time.iter()
            .zip(sp)
            .rev()
            .find(|(_, value)| **value == Some(min))
            .and_then(|(t, _)| *t)
    });

    let thresholds = SCORCH_THRESHOLDS
        .iter()
        .map(|&(label, factor)| ThresholdTime {
            label,
            factor,
            time: min_sp.zip(t0).and_then(|(min, t0)| {
                let after = time
                    .iter()
                    .zip(sp)
                    .filter(|(t, _)| t.is_some_and(|t| t > t0));
                first_time(after, |v| v >= min * factor)
            }),
        })
        .collect();

    ScorchSummary {
        min_sp,
        t0,
        thresholds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ParsedRecord;

    fn table(time: &[f64], sp: &[f64]) -> DerivedTable {
        let record = ParsedRecord::new(vec!["Time".into()], vec![Vec::new(); time.len()]);
        let mut table = DerivedTable::new(record);
        table.insert(columns::TIME, time.iter().copied().map(Some).collect());
        table.insert(columns::SP, sp.iter().copied().map(Some).collect());
        table
    }

    #[test]
    fn test_scorch_summary() {
        let t = table(
            &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            &[30.0, 20.0, 20.0, 20.5, 21.0, 25.0, 28.0],
        );
        let summary = scorch_summary(&t);

        assert_eq!(summary.min_sp, Some(20.0));
        // last occurrence of the minimum
        assert_eq!(summary.t0, Some(2.0));
        assert_eq!(summary.thresholds[0].label, "T5");
        assert_eq!(summary.thresholds[0].time, Some(4.0));
        assert_eq!(summary.thresholds[1].label, "T35");
        assert_eq!(summary.thresholds[1].time, Some(6.0));
    }

    #[test]
    fn test_scorch_threshold_before_t0_ignored() {
        // the high initial torque precedes T0 and never counts
        let t = table(&[0.0, 1.0, 2.0], &[50.0, 10.0, 10.2]);
        let summary = scorch_summary(&t);

        assert_eq!(summary.t0, Some(1.0));
        assert!(summary.thresholds.iter().all(|t| t.time.is_none()));
    }

    #[test]
    fn test_scorch_without_data() {
        let summary = scorch_summary(&table(&[], &[]));
        assert_eq!(summary.min_sp, None);
        assert_eq!(summary.t0, None);
        assert_eq!(summary.thresholds.len(), 2);
    }
}
