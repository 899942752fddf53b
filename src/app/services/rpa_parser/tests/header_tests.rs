//! Tests for header location and temperature extraction

use super::super::header::{extract_temperature, find_signature, locate_header, parse_temperature_line};
use super::super::lines::RawLines;
use super::{ExportBuilder, cure_rows, sweep_rows};
use crate::Error;
use crate::app::models::{TestFormat, TestTemperature};
use crate::constants::{CURE_HEADER, SWEEP_HEADER};

fn raw(builder: &ExportBuilder) -> RawLines {
    RawLines::from(builder.build().as_str())
}

#[test]
fn test_find_signature_trims_surrounding_whitespace() {
    let text = format!("preamble\n   {}  \t\n1,2,3", CURE_HEADER);
    let lines = RawLines::from(text.as_str());
    assert_eq!(find_signature(&lines, CURE_HEADER), Some(1));
}

#[test]
fn test_find_signature_is_case_sensitive() {
    let text = format!("preamble\n{}", CURE_HEADER.to_lowercase());
    let lines = RawLines::from(text.as_str());
    assert_eq!(find_signature(&lines, CURE_HEADER), None);
}

#[test]
fn test_find_signature_returns_first_occurrence() {
    let text = format!("{0}\nx\n{0}", SWEEP_HEADER);
    let lines = RawLines::from(text.as_str());
    assert_eq!(find_signature(&lines, SWEEP_HEADER), Some(0));
}

#[test]
fn test_header_not_found_for_every_format() {
    let lines = RawLines::from("Instrument report\nno data here\n1,2,3");

    for format in TestFormat::ALL {
        let err = locate_header("empty.erp", &lines, &format.spec()).unwrap_err();
        match err {
            Error::HeaderNotFound { file, format: f } => {
                assert_eq!(file, "empty.erp");
                assert_eq!(f, format);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_sweep_export_has_no_cure_header() {
    let lines = raw(&ExportBuilder::sweep(15).rows(sweep_rows(3)));
    let err = locate_header("sweep.erp", &lines, &TestFormat::Cure.spec()).unwrap_err();
    assert!(matches!(err, Error::HeaderNotFound { .. }));
    assert_eq!(
        locate_header("sweep.erp", &lines, &TestFormat::Dynamic.spec()).unwrap(),
        15
    );
}

#[test]
fn test_parse_temperature_line() {
    assert_eq!(parse_temperature_line("A, B, 23.5"), Some(23.5));
    assert_eq!(parse_temperature_line("Test Temperature,C,177.0,,"), Some(177.0));
    assert_eq!(parse_temperature_line("190"), Some(190.0));
    assert_eq!(parse_temperature_line("Temperature,n/a"), None);
    assert_eq!(parse_temperature_line("Temperature,inf"), None);
    assert_eq!(parse_temperature_line(",,"), None);
    assert_eq!(parse_temperature_line(""), None);
}

#[test]
fn test_temperature_ten_lines_above_header() {
    let lines = raw(&ExportBuilder::cure(20).rows(cure_rows(2)));
    let spec = TestFormat::Cure.spec();
    assert_eq!(
        extract_temperature("c.erp", &lines, 20, &spec),
        TestTemperature::Celsius(177.0)
    );
}

#[test]
fn test_temperature_at_first_line() {
    let lines = raw(&ExportBuilder::cure(10));
    let spec = TestFormat::Cure.spec();
    assert_eq!(
        extract_temperature("c.erp", &lines, 10, &spec),
        TestTemperature::Celsius(177.0)
    );
}

#[test]
fn test_temperature_unavailable_near_top_of_file() {
    let spec = TestFormat::Cure.spec();

    // below the minimum preamble length
    let lines = raw(&ExportBuilder::cure(5));
    assert_eq!(
        extract_temperature("c.erp", &lines, 5, &spec),
        TestTemperature::Unavailable
    );

    // enough preamble for the guard, but the offset would run past line 0
    let lines = raw(&ExportBuilder::cure(8));
    assert_eq!(
        extract_temperature("c.erp", &lines, 8, &spec),
        TestTemperature::Unavailable
    );
}

#[test]
fn test_temperature_unavailable_without_number() {
    let lines = raw(&ExportBuilder::cure(12).temperature(Some("Test Temperature,unknown")));
    assert_eq!(
        extract_temperature("c.erp", &lines, 12, &TestFormat::Cure.spec()),
        TestTemperature::Unavailable
    );
}

#[test]
fn test_dynamic_temperature_uses_sweep_header() {
    let lines = raw(&ExportBuilder::sweep(14).rows(sweep_rows(3)));
    assert_eq!(
        extract_temperature("d.erp", &lines, 14, &TestFormat::Dynamic.spec()),
        TestTemperature::Celsius(177.0)
    );
}

#[test]
fn test_ive_temperature_anchored_on_cure_header() {
    let spec = TestFormat::Ive.spec();

    // a plain sweep export carries no cure header
    let lines = raw(&ExportBuilder::sweep(14).rows(sweep_rows(3)));
    assert_eq!(
        extract_temperature("i.erp", &lines, 14, &spec),
        TestTemperature::Unavailable
    );

    // with a cure header present the offset is measured from it
    let mut text: Vec<String> = (0..12).map(|i| format!("note {i}")).collect();
    text[2] = "Die Temperature,C,100".to_string();
    text.push(CURE_HEADER.to_string());
    text.push("note".to_string());
    text.push(SWEEP_HEADER.to_string());
    let lines = RawLines::from(text.join("\n").as_str());

    assert_eq!(
        extract_temperature("i.erp", &lines, 14, &spec),
        TestTemperature::Celsius(100.0)
    );
}
