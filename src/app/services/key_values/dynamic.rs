//! Strain sweep key values
//!
//! A dynamic test sweeps strain up to a peak and back down. The go phase runs
//! from the first row to the peak, the return phase from the peak to the last
//! row; the peak row belongs to both.

use serde::{Deserialize, Serialize};

use super::column;
use crate::app::models::DerivedTable;
use crate::app::services::metrics::series_max;
use crate::constants::{DYNAMIC_STRAIN_LEVELS, columns};

/// Sweep phase selection
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Both,
    Go,
    Return,
}

/// Tan delta at the first row reaching a strain level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrainPoint {
    /// Strain level (%)
    pub strain: f64,
    pub tan_delta: Option<f64>,
}

/// Key values of one sweep phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSummary {
    pub max_tan_delta: Option<f64>,
    pub tan_delta_at_strain: Vec<StrainPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicSummary {
    /// Row of the first maximum strain
    pub peak_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go: Option<PhaseSummary>,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub return_phase: Option<PhaseSummary>,
}

impl DynamicSummary {
    /// Keep only the phases selected
    pub fn select(mut self, phase: Phase) -> Self {
        match phase {
            Phase::Both => {}
            Phase::Go => self.return_phase = None,
            Phase::Return => self.go = None,
        }
        self
    }
}

pub fn dynamic_summary(table: &DerivedTable) -> DynamicSummary {
    let strain = column(table, columns::STRAIN);
    let tan_delta = column(table, columns::TAN_DELTA);

    let peak_row = series_max(strain).and_then(|max| strain.iter().position(|s| *s == Some(max)));

    let (go, return_phase) = match peak_row {
        Some(peak) => {
            let end = peak + 1;
            (
                phase_summary(&strain[..end], &tan_delta[..end.min(tan_delta.len())]),
                phase_summary(&strain[peak..], tan_delta.get(peak..).unwrap_or(&[])),
            )
        }
        None => (phase_summary(&[], &[]), phase_summary(&[], &[])),
    };

    DynamicSummary {
        peak_row,
        go: Some(go),
        return_phase: Some(return_phase),
    }
}

fn phase_summary(strain: &[Option<f64>], tan_delta: &[Option<f64>]) -> PhaseSummary {
    let tan_delta_at_strain = DYNAMIC_STRAIN_LEVELS
        .iter()
        .map(|&level| StrainPoint {
            strain: level,
            tan_delta: strain
                .iter()
                .zip(tan_delta)
                .find(|(s, _)| s.is_some_and(|s| s >= level))
                .and_then(|(_, td)| *td),
        })
        .collect();

    PhaseSummary {
        max_tan_delta: series_max(tan_delta),
        tan_delta_at_strain,
    }
}
