//! Xinanjiang numerical constants and model contract.
//!
//! Centralises the fixed values used by the three stages.

// -- Unit conversion --

/// Converts mm over km² per hour into m³/s: `mm · km² / (3.6 · h)`.
pub const DISCHARGE_FACTOR: f64 = 3.6;

/// Hours in the day on which recession and outflow coefficients are defined.
pub const COEFFICIENT_BASIS_HOURS: f64 = 24.0;

// -- Surface routing --

/// Default surface-runoff unit hydrograph ordinates.
pub const DEFAULT_UH_ORDINATES: [f64; 3] = [0.3, 0.6, 0.1];

// -- Model contract constants --

/// Parameter names in flat-array order. WM is derived and not listed.
pub const PARAM_NAMES: &[&str] = &[
    "wum", "wlm", "wdm", "k", "c", "b", "imp", "sm", "ex", "kss", "kg", "kkss", "kkg", "area",
];

/// Number of independent parameters.
pub const N_PARAMS: usize = 14;

/// Carry-state layout: [wu, wl, wd, s, qrss, qrg].
pub const STATE_SIZE: usize = 6;
