//! Key values summarizing a parsed test
//!
//! Each format reports the figures a compounder reads off the curve:
//! threshold times for cure and scorch tests, tan delta at reference strains
//! for dynamic sweeps. IVE tests have no key values.
//!
//! Summaries read the coerced numeric columns of a [`DerivedTable`], so
//! missing cells never count as hits.

pub mod cure;
pub mod dynamic;
pub mod scorch;

pub use cure::{CureLawPoint, CureSummary, cure_law, cure_summary};
pub use dynamic::{DynamicSummary, Phase, PhaseSummary, StrainPoint, dynamic_summary};
pub use scorch::{ScorchSummary, scorch_summary};

use serde::Serialize;

use crate::app::models::{DerivedTable, ParsedFile, TestFormat};

/// Key values of one file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KeyValues {
    Cure(CureSummary),
    Scorch(ScorchSummary),
    Dynamic(DynamicSummary),
}

/// Time at which a torque threshold is first reached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdTime {
    /// Conventional name (TS2, TC90, T5, ...)
    pub label: &'static str,
    /// Fraction of maximum or multiple of minimum torque
    pub factor: f64,
    /// Time in minutes; `None` if never reached
    pub time: Option<f64>,
}

/// Summarize a parsed file; dynamic summaries keep only the requested phase
pub fn summarize(parsed: &ParsedFile, phase: Phase) -> Option<KeyValues> {
    let table = &parsed.table;
    match parsed.format {
        TestFormat::Cure => Some(KeyValues::Cure(cure_summary(table))),
        TestFormat::Scorch => Some(KeyValues::Scorch(scorch_summary(table))),
        TestFormat::Dynamic => Some(KeyValues::Dynamic(dynamic_summary(table).select(phase))),
        TestFormat::Ive => None,
    }
}

/// Numeric column values, empty when the column was never derived
fn column<'a>(table: &'a DerivedTable, name: &str) -> &'a [Option<f64>] {
    table.numeric(name).unwrap_or(&[])
}

/// Time of the first row in `rows` whose value satisfies `hit`
fn first_time<'a, I, F>(rows: I, hit: F) -> Option<f64>
where
    I: IntoIterator<Item = (&'a Option<f64>, &'a Option<f64>)>,
    F: Fn(f64) -> bool,
{
    rows.into_iter()
        .find(|(_, value)| value.is_some_and(&hit))
        .and_then(|(time, _)| *time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{ParsedRecord, TestTemperature};
    use crate::app::services::rpa_parser::ParseStats;

    fn parsed(format: TestFormat) -> ParsedFile {
        let record = ParsedRecord::new(vec!["Time".into()], vec![vec!["0".into()]]);
        let mut table = DerivedTable::new(record);
        table.insert("Time", vec![Some(0.0)]);
        ParsedFile {
            name: "a.erp".to_string(),
            format,
            table,
            temperature: TestTemperature::Unavailable,
            stats: ParseStats::default(),
        }
    }

    #[test]
    fn test_summarize_dispatch() {
        assert!(matches!(
            summarize(&parsed(TestFormat::Cure), Phase::Both),
            Some(KeyValues::Cure(_))
        ));
        assert!(matches!(
            summarize(&parsed(TestFormat::Scorch), Phase::Both),
            Some(KeyValues::Scorch(_))
        ));
        assert!(matches!(
            summarize(&parsed(TestFormat::Dynamic), Phase::Go),
            Some(KeyValues::Dynamic(_))
        ));
        assert!(summarize(&parsed(TestFormat::Ive), Phase::Both).is_none());
    }

    #[test]
    fn test_first_time_skips_missing() {
        let time = [Some(0.0), None, Some(2.0)];
        let values = [None, Some(5.0), Some(6.0)];
        // the hit at row 1 has no time
        assert_eq!(first_time(time.iter().zip(&values), |v| v >= 5.0), None);
        assert_eq!(first_time(time.iter().zip(&values), |v| v >= 6.0), Some(2.0));
        assert_eq!(first_time(time.iter().zip(&values), |v| v >= 7.0), None);
    }

    #[test]
    fn test_key_values_serialize_with_kind() {
        let json = serde_json::to_value(summarize(&parsed(TestFormat::Cure), Phase::Both)).unwrap();
        assert_eq!(json["kind"], "cure");
        assert!(json["thresholds"].is_array());
    }
}
