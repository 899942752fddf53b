//! Header location and test-temperature extraction
//!
//! The instrument writes a fixed column-header line at a variable position
//! after a free-form preamble. The test temperature sits in the preamble a
//! fixed number of lines above a header.

use tracing::{debug, warn};

use super::lines::RawLines;
use crate::app::models::{FormatSpec, TestTemperature};
use crate::constants::TEMPERATURE_MIN_PRECEDING_LINES;
use crate::{Error, Result};

/// Index of the first line whose trimmed content equals `signature` exactly
pub fn find_signature(lines: &RawLines, signature: &str) -> Option<usize> {
    lines
        .as_slice()
        .iter()
        .position(|line| line.trim() == signature)
}

/// Locate the format's column header, failing the file if it is absent
pub fn locate_header(file: &str, lines: &RawLines, spec: &FormatSpec) -> Result<usize> {
    let index = find_signature(lines, spec.header_signature)
        .ok_or_else(|| Error::header_not_found(file, spec.format))?;

    debug!("{}: {} header at line {}", file, spec.format, index + 1);
    Ok(index)
}

/// Read the test temperature for a file whose header sits at `header_index`
///
/// The offset is measured from the format's temperature anchor, which is
/// searched for separately when it differs from the format's own header.
/// Every failure yields [`TestTemperature::Unavailable`].
pub fn extract_temperature(
    file: &str,
    lines: &RawLines,
    header_index: usize,
    spec: &FormatSpec,
) -> TestTemperature {
    let anchor_index = if spec.temperature_anchor == spec.header_signature {
        Some(header_index)
    } else {
        find_signature(lines, spec.temperature_anchor)
    };

    let Some(anchor_index) = anchor_index else {
        warn!("{}: temperature anchor header not present", file);
        return TestTemperature::Unavailable;
    };

    if anchor_index < TEMPERATURE_MIN_PRECEDING_LINES {
        warn!(
            "{}: anchor header at line {} leaves no room for a temperature line",
            file,
            anchor_index + 1
        );
        return TestTemperature::Unavailable;
    }

    let Some(line) = anchor_index
        .checked_sub(spec.temperature_offset)
        .and_then(|i| lines.get(i))
    else {
        warn!(
            "{}: temperature line would precede the start of the file",
            file
        );
        return TestTemperature::Unavailable;
    };

    match parse_temperature_line(line) {
        Some(value) => {
            debug!("{}: test temperature {}", file, value);
            TestTemperature::Celsius(value)
        }
        None => {
            warn!("{}: no temperature in preamble line '{}'", file, line.trim());
            TestTemperature::Unavailable
        }
    }
}

/// Parse the last non-empty comma-separated token of a line as a finite number
pub fn parse_temperature_line(line: &str) -> Option<f64> {
    line.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .last()
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
