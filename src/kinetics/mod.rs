//! Kinetics module: regression constants and grid helpers for chlorine decay.
//!
//! This module provides:
//! - The EPA regression tables for the first- and second-phase rate constants
//! - The Two-phase regression tables for the blending fraction `A` and both rates
//! - The fixed EPA rate-change breakpoint
//! - Recognised input ranges and the default values of every model input
//! - An evenly spaced time grid helper
//!
//! Units conventions:
//! - Concentrations (DOC, NH3 surrogate, initial chlorine) are mg/L
//! - Temperature is °C and enters the Two-phase regressions through `ln(T)`
//! - Rate constants are 1/h, times are hours
//!
//! Design notes:
//! - Every regression is `exp(intercept + Σ coefficient · ln(term))`; the tables
//!   below hold only the coefficients, evaluation lives in `decay::predictor`
//! - Terms multiplying `ln(1)` in the published Two-phase formulas are zero and
//!   are not carried in the tables
//! - The Two-phase first-phase rate includes a constant `ln(pH)` term evaluated
//!   at the reference pH of 7
//!
//! # Examples
//! ```rust
//! use chlorine_decay::kinetics::{time_grid, EPA_BREAKPOINT_H};
//!
//! let grid = time_grid(10.0, 11);
//! assert_eq!(grid.len(), 11);
//! assert_eq!(grid[5], EPA_BREAKPOINT_H);
//! ```
//!
//! # Panics
//! None of the functions panic.

use std::ops::RangeInclusive;

/// Coefficients of one EPA regression:
/// `exp(intercept + ln_doc·ln(DOC) + ln_nh3·ln(7.6·NH3) + ln_cl0·ln(Cl0) + ln_cl0_per_doc·ln(Cl0/DOC))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpaRegression {
    pub intercept: f64,
    pub ln_doc: f64,
    pub ln_nh3: f64,
    pub ln_cl0: f64,
    pub ln_cl0_per_doc: f64,
}

/// Coefficients of one Two-phase regression:
/// `exp(intercept + ln_cl0_per_doc·ln(Cl0/DOC) + ln_doc·ln(DOC) + ln_cl0·ln(Cl0)
///      + ln_nh3·ln(NH3) + ln_temp·ln(T) + ln_ph·ln(pH_ref))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoPhaseRegression {
    pub intercept: f64,
    pub ln_cl0_per_doc: f64,
    pub ln_doc: f64,
    pub ln_cl0: f64,
    pub ln_nh3: f64,
    pub ln_temp: f64,
    pub ln_ph: f64,
}

/// Multiplier applied to the NH3 surrogate inside the EPA logarithm.
pub const EPA_NH3_SCALE: f64 = 7.6;

/// EPA first-phase rate constant k1 (1/h).
pub const EPA_K1: EpaRegression = EpaRegression {
    intercept: -0.442,
    ln_doc: 0.889,
    ln_nh3: 0.345,
    ln_cl0: -1.082,
    ln_cl0_per_doc: 0.192,
};

/// EPA second-phase rate constant k2 (1/h).
pub const EPA_K2: EpaRegression = EpaRegression {
    intercept: -4.817,
    ln_doc: 1.187,
    ln_nh3: 0.102,
    ln_cl0: -0.821,
    ln_cl0_per_doc: -0.271,
};

/// Time (h) at which the EPA model switches from k1 to k2. Not configurable.
pub const EPA_BREAKPOINT_H: f64 = 5.0;

/// pH at which the Two-phase regressions are evaluated.
pub const TWO_PHASE_REFERENCE_PH: f64 = 7.0;

/// Two-phase fast-fraction `A` (dimensionless).
pub const TWO_PHASE_A: TwoPhaseRegression = TwoPhaseRegression {
    intercept: 0.168,
    ln_cl0_per_doc: -0.148,
    ln_doc: 0.0,
    ln_cl0: -0.41,
    ln_nh3: 0.0554,
    ln_temp: 0.185,
    ln_ph: 0.0,
};

/// Two-phase fast rate constant k1 (1/h).
pub const TWO_PHASE_K1: TwoPhaseRegression = TwoPhaseRegression {
    intercept: 5.41,
    ln_cl0_per_doc: -0.38,
    ln_doc: 0.0,
    ln_cl0: 0.0,
    ln_nh3: 0.274,
    ln_temp: -1.12,
    ln_ph: -0.854,
};

/// Two-phase slow rate constant k2 (1/h).
pub const TWO_PHASE_K2: TwoPhaseRegression = TwoPhaseRegression {
    intercept: -7.13,
    ln_cl0_per_doc: 0.864,
    ln_doc: 2.63,
    ln_cl0: -2.55,
    ln_nh3: 0.48,
    ln_temp: 1.03,
    ln_ph: 0.0,
};

// Recognised input ranges (clamped on the way in)
/// Dissolved organic carbon, mg/L.
pub const DOC_RANGE: RangeInclusive<f64> = 0.0..=10.0;
/// NH3 surrogate, mg/L.
pub const NH3_RANGE: RangeInclusive<f64> = 0.0..=5.0;
/// Initial chlorine, mg/L.
pub const CL0_RANGE: RangeInclusive<f64> = 0.0..=5.0;
/// Water temperature, °C.
pub const TEMP_RANGE: RangeInclusive<f64> = 0.0..=35.0;
/// Prediction horizon, hours.
pub const HORIZON_RANGE: RangeInclusive<f64> = 1.0..=24.0;
/// Sensitivity-bound rate constants, 1/h.
pub const BOUND_K_RANGE: RangeInclusive<f64> = 0.01..=5.0;
/// Samples per curve, endpoints included.
pub const NUM_POINTS_RANGE: RangeInclusive<usize> = 2..=10_000;

// Defaults
pub const DEFAULT_DOC: f64 = 5.0;
pub const DEFAULT_NH3: f64 = 0.5;
pub const DEFAULT_CL0: f64 = 1.5;
pub const DEFAULT_TEMP_C: f64 = 20.0;
pub const DEFAULT_HORIZON_H: f64 = 5.0;
pub const DEFAULT_NUM_POINTS: usize = 100;

pub const DEFAULT_K1_LOW: f64 = 3.5;
pub const DEFAULT_K1_HIGH: f64 = 2.0;
pub const DEFAULT_K2_LOW: f64 = 0.1;
pub const DEFAULT_K2_HIGH: f64 = 0.5;

/// Clamp `v` into `range`. NaN passes through so domain checks can reject it.
pub fn clamp_to(v: f64, range: &RangeInclusive<f64>) -> f64 {
    v.clamp(*range.start(), *range.end())
}

/// Clamp a requested sample count into [`NUM_POINTS_RANGE`].
pub fn clamp_points(n: usize) -> usize {
    n.clamp(*NUM_POINTS_RANGE.start(), *NUM_POINTS_RANGE.end())
}

/// `n` evenly spaced times over `[0, horizon]`, both endpoints included.
///
/// `n == 0` yields an empty grid and `n == 1` yields `[0.0]`. The last point
/// is set to `horizon` exactly rather than accumulated.
pub fn time_grid(horizon: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = horizon / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { horizon } else { i as f64 * step })
                .collect()
        }
    }
}
