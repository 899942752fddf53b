//! Metric derivation for parsed RPA records
//!
//! Each test format coerces its own fields, smooths them with its own window
//! and derives ratios in its own order:
//! - cure/scorch: state of cure from raw torque, then smoothing, then state of
//!   cure from smoothed torque
//! - dynamic: tan delta from raw values, then smoothing of modulus and tan delta
//! - IVE: smoothing of storage and loss modulus
//!
//! Scorch tests keep the raw values of the first two rows in smoothed columns.

pub mod smoothing;
pub mod transforms;

pub use smoothing::{centered_rolling_mean, keep_first_two_raw};
pub use transforms::{coerce_column, normalize, ratio, series_max, series_min};

use tracing::{debug, warn};

use crate::app::models::{DerivedTable, FormatSpec, ParsedRecord, TestFormat};
use crate::constants::columns;

/// Build the derived table for a parsed record
pub fn derive_metrics(record: ParsedRecord, spec: &FormatSpec) -> DerivedTable {
    let mut table = DerivedTable::new(record);

    match spec.format {
        TestFormat::Cure | TestFormat::Scorch => derive_cure(&mut table, spec),
        TestFormat::Dynamic => derive_dynamic(&mut table, spec),
        TestFormat::Ive => derive_ive(&mut table, spec),
    }

    debug!(
        "Derived {} numeric columns over {} rows",
        table.numeric_columns().len(),
        table.row_count()
    );
    table
}

fn derive_cure(table: &mut DerivedTable, spec: &FormatSpec) {
    coerce(table, columns::TIME);
    let sp = coerce(table, columns::SP);
    let gp = coerce(table, columns::GP);

    let sp_max = series_max(&sp);
    put(table, columns::ALPHA, normalize(&sp, sp_max));

    let gp_smooth = smooth(&gp, spec);
    let sp_smooth = smooth(&sp, spec);
    put(table, columns::ALPHA_SMOOTH, normalize(&sp_smooth, sp_max));
    put(table, columns::GP_SMOOTH, gp_smooth);
    put(table, columns::SP_SMOOTH, sp_smooth);
}

fn derive_dynamic(table: &mut DerivedTable, spec: &FormatSpec) {
    coerce(table, columns::STRAIN);
    let gp = coerce(table, columns::GP);
    let tdelt = coerce(table, columns::TDELT);

    let tan_delta = ratio(&tdelt, &gp);

    put(table, columns::GP_SMOOTH, smooth(&gp, spec));
    put(table, columns::TAN_DELTA_SMOOTH, smooth(&tan_delta, spec));
    put(table, columns::TAN_DELTA, tan_delta);
}

fn derive_ive(table: &mut DerivedTable, spec: &FormatSpec) {
    coerce(table, columns::FREQ);
    let gp = coerce(table, columns::GP);
    let gpp = coerce(table, columns::GPP);

    put(table, columns::GP_SMOOTH, smooth(&gp, spec));
    put(table, columns::GPP_SMOOTH, smooth(&gpp, spec));
}

/// Coerce a base column into a numeric column of the same name
fn coerce(table: &mut DerivedTable, name: &str) -> Vec<Option<f64>> {
    let values = match table.record().column(name) {
        Some(cells) => coerce_column(&cells),
        None => vec![None; table.row_count()],
    };
    put(table, name, values.clone());
    values
}

fn smooth(values: &[Option<f64>], spec: &FormatSpec) -> Vec<Option<f64>> {
    let smoothed = centered_rolling_mean(values, spec.smoothing_window);
    if spec.keep_first_two_raw {
        keep_first_two_raw(smoothed, values)
    } else {
        smoothed
    }
}

fn put(table: &mut DerivedTable, name: &str, values: Vec<Option<f64>>) {
    if !table.insert(name, values) {
        warn!("Derived column {} does not match the row count", name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CURE_COLUMNS, SWEEP_COLUMNS};

    fn record(columns: &[&str], values: &[(&str, Vec<&str>)], rows: usize) -> ParsedRecord {
        let mut data = vec![vec![String::new(); columns.len()]; rows];
        for (name, cells) in values {
            let index = columns.iter().position(|c| c == name).unwrap();
            for (row, cell) in cells.iter().enumerate() {
                data[row][index] = cell.to_string();
            }
        }
        ParsedRecord::new(columns.iter().map(|c| c.to_string()).collect(), data)
    }

    #[test]
    fn test_cure_derivation() {
        let rec = record(
            CURE_COLUMNS,
            &[
                ("Time", vec!["0", "1", "2", "3", "4"]),
                ("Sp", vec!["2", "4", "6", "8", "10"]),
                ("Gp", vec!["1", "x", "3", "4", "5"]),
            ],
            5,
        );
        let table = derive_metrics(rec, &TestFormat::Cure.spec());

        assert_eq!(
            table.numeric("Alpha").unwrap(),
            &[Some(0.2), Some(0.4), Some(0.6), Some(0.8), Some(1.0)]
        );
        assert_eq!(
            table.numeric("Sp_smooth").unwrap(),
            &[None, Some(4.0), Some(6.0), Some(8.0), None]
        );
        // the smoothed state of cure is normalized by the raw maximum
        assert_eq!(table.numeric("Alpha_smooth").unwrap()[2], Some(0.6));
        // invalid Gp at row 1 blanks every window that covers it
        assert_eq!(table.numeric("Gp").unwrap()[1], None);
        assert_eq!(
            table.numeric("Gp_smooth").unwrap(),
            &[None, None, None, Some(4.0), None]
        );
        assert_eq!(table.numeric("Time").unwrap()[4], Some(4.0));
    }

    #[test]
    fn test_scorch_keeps_first_two_rows_raw() {
        let rec = record(
            CURE_COLUMNS,
            &[("Sp", vec!["1", "2", "3", "4", "5", "6"])],
            6,
        );
        let table = derive_metrics(rec, &TestFormat::Scorch.spec());

        assert_eq!(
            table.numeric("Sp_smooth").unwrap(),
            &[Some(1.0), Some(2.0), Some(3.0), Some(4.0), None, None]
        );
    }

    #[test]
    fn test_dynamic_tan_delta_before_smoothing() {
        let rec = record(
            SWEEP_COLUMNS,
            &[
                ("Strain", vec!["1", "5", "10", "5"]),
                ("Gp", vec!["2", "0", "4", "5"]),
                ("TDelt", vec!["1", "1", "2", "1"]),
            ],
            4,
        );
        let table = derive_metrics(rec, &TestFormat::Dynamic.spec());

        assert_eq!(
            table.numeric("TanDelta").unwrap(),
            &[Some(0.5), None, Some(0.5), Some(0.2)]
        );
        // zero modulus at row 1 leaves no complete window
        assert_eq!(
            table.numeric("TanDelta_smooth").unwrap(),
            &[None, None, None, None]
        );
        assert_eq!(table.numeric("Gp_smooth").unwrap()[1], Some(2.0));
    }

    #[test]
    fn test_ive_smoothing() {
        let rec = record(
            SWEEP_COLUMNS,
            &[
                ("Freq", vec!["0.1", "1", "10"]),
                ("Gp", vec!["1", "2", "3"]),
                ("Gpp", vec!["3", "6", "9"]),
            ],
            3,
        );
        let table = derive_metrics(rec, &TestFormat::Ive.spec());

        assert_eq!(table.numeric("Gp_smooth").unwrap(), &[None, Some(2.0), None]);
        assert_eq!(table.numeric("Gpp_smooth").unwrap(), &[None, Some(6.0), None]);
        assert_eq!(table.numeric("Freq").unwrap()[0], Some(0.1));
        assert!(table.numeric("TanDelta").is_none());
    }

    #[test]
    fn test_all_missing_column_propagates() {
        let rec = record(CURE_COLUMNS, &[("Sp", vec!["a", "b", "c"])], 3);
        let table = derive_metrics(rec, &TestFormat::Cure.spec());

        assert_eq!(table.numeric("Alpha").unwrap(), &[None, None, None]);
        assert_eq!(table.numeric("Alpha_smooth").unwrap(), &[None, None, None]);
        assert_eq!(table.row_count(), 3);
    }
}
