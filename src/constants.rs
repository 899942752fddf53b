//! Application constants for the RPA processor
//!
//! This module contains the instrument header signatures, positional column
//! layouts, smoothing windows and key-value thresholds used throughout the
//! parser and metric derivation stages.

// =============================================================================
// Header Signatures
// =============================================================================

/// Column-header line written by the instrument for cure and scorch exports
pub const CURE_HEADER: &str = "Time,Strain,Torque,Torque,Torque,Modulus,Modulus,Modulus,\
Compl,Compl,Compl,Visc,Visc,Visc,GenericB,Temp,Temp,Temp,Pressure,Force,Reserve1,Reserve2";

/// Column-header line written by the instrument for strain/frequency sweeps
/// (dynamic and IVE exports share it)
pub const SWEEP_HEADER: &str = "GenericA,GenericA,Time,Temp,Temp,Strain,Freq,Strain,Temp,,\
Torque,Torque,Torque,Modulus,Modulus,Modulus,Compl,Compl,Compl,Visc,Visc,Visc,\
GenericB,Shear,Reserve1,Reserve2,Pressure";

// =============================================================================
// Column Layouts
// =============================================================================

/// Positional column names for cure and scorch data rows
pub const CURE_COLUMNS: &[&str] = &[
    "Time", "Strain", "Sp", "Spp", "Ss", "Gp", "Gpp", "Gs", "Jp", "Jpp", "Js", "Np", "Npp", "Ns",
    "TDelt", "UTemp", "LTemp", "Temp", "Pressure", "Force", "Reserve1", "Reserve2",
];

/// Positional column names for dynamic and IVE data rows
pub const SWEEP_COLUMNS: &[&str] = &[
    "Cond", "Stat", "Time", "UTemp", "LTemp", "Strain", "Freq", "SStrain", "Temp", "dummy", "Sp",
    "Spp", "Ss", "Gp", "Gpp", "Gs", "Jp", "Jpp", "Js", "Np", "Npp", "Ns", "TDelt", "Shear",
    "Reserve1", "Reserve2", "Pressure",
];

/// Names of coerced and derived numeric columns
pub mod columns {
    pub const TIME: &str = "Time";
    pub const STRAIN: &str = "Strain";
    pub const FREQ: &str = "Freq";
    pub const SP: &str = "Sp";
    pub const GP: &str = "Gp";
    pub const GPP: &str = "Gpp";
    pub const TDELT: &str = "TDelt";

    /// Torque normalized by its maximum (state of cure)
    pub const ALPHA: &str = "Alpha";
    pub const ALPHA_SMOOTH: &str = "Alpha_smooth";
    pub const SP_SMOOTH: &str = "Sp_smooth";
    pub const GP_SMOOTH: &str = "Gp_smooth";
    pub const GPP_SMOOTH: &str = "Gpp_smooth";
    pub const TAN_DELTA: &str = "TanDelta";
    pub const TAN_DELTA_SMOOTH: &str = "TanDelta_smooth";
}

// =============================================================================
// Temperature Extraction
// =============================================================================

/// Number of lines above the anchor header where the test temperature is recorded
pub const TEMPERATURE_OFFSET: usize = 10;

/// Anchor headers found earlier than this line index never yield a temperature
pub const TEMPERATURE_MIN_PRECEDING_LINES: usize = 7;

// =============================================================================
// Smoothing Windows
// =============================================================================

/// Centered rolling-mean window used by cure, dynamic and IVE tests
pub const DEFAULT_SMOOTHING_WINDOW: usize = 3;

/// Centered rolling-mean window used by scorch tests
pub const SCORCH_SMOOTHING_WINDOW: usize = 5;

// =============================================================================
// Key Values
// =============================================================================

/// Cure thresholds as (label, fraction of maximum torque)
pub const CURE_THRESHOLDS: &[(&str, f64)] = &[
    ("TS2", 0.02),
    ("TC30", 0.30),
    ("TC50", 0.50),
    ("TC70", 0.70),
    ("TC90", 0.90),
    ("TC95", 0.95),
    ("TC99", 0.99),
    ("TC100", 1.00),
];

/// Scorch thresholds as (label, multiple of minimum torque)
pub const SCORCH_THRESHOLDS: &[(&str, f64)] = &[("T5", 1.05), ("T35", 1.35)];

/// Strain levels at which tan delta is reported for strain sweeps
pub const DYNAMIC_STRAIN_LEVELS: &[f64] = &[10.0, 20.0, 50.0];

// =============================================================================
// Input Discovery
// =============================================================================

/// File extensions accepted when walking an input directory
pub const INPUT_EXTENSIONS: &[&str] = &["erp", "txt", "csv"];

// =============================================================================
// Performance and Limits
// =============================================================================

/// Upper bound on concurrent file workers
pub const MAX_WORKERS: usize = 100;

/// Name of the configuration directory under the user config dir
pub const CONFIG_DIR_NAME: &str = "rpa-processor";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default directory for exported tables
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
