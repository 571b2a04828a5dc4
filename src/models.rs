use serde::{Deserialize, Serialize};

use crate::kinetics::*;

/// Water-quality inputs for one prediction run.
///
/// Missing fields in a JSON document fall back to the defaults below.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInputs {
    /// Dissolved organic carbon, mg/L.
    pub doc: f64,
    /// NH3 surrogate concentration, mg/L.
    pub nh3: f64,
    /// Initial chlorine concentration, mg/L.
    pub cl0: f64,
    /// Water temperature, °C.
    pub temp_c: f64,
    /// Prediction horizon, hours.
    pub horizon_h: f64,
}

impl Default for ModelInputs {
    fn default() -> Self {
        Self {
            doc: DEFAULT_DOC,
            nh3: DEFAULT_NH3,
            cl0: DEFAULT_CL0,
            temp_c: DEFAULT_TEMP_C,
            horizon_h: DEFAULT_HORIZON_H,
        }
    }
}

impl ModelInputs {
    /// Copy with every field clamped into its recognised range.
    ///
    /// Clamping does not make an input valid: a DOC of 0 stays 0 and is
    /// rejected later by the model that needs `ln(DOC)`.
    pub fn clamped(self) -> Self {
        let out = Self {
            doc: clamp_to(self.doc, &DOC_RANGE),
            nh3: clamp_to(self.nh3, &NH3_RANGE),
            cl0: clamp_to(self.cl0, &CL0_RANGE),
            temp_c: clamp_to(self.temp_c, &TEMP_RANGE),
            horizon_h: clamp_to(self.horizon_h, &HORIZON_RANGE),
        };
        if out != self {
            tracing::debug!(raw = ?self, clamped = ?out, "model inputs clamped to recognised ranges");
        }
        out
    }
}

/// User-chosen EPA rate pairs bracketing the regression prediction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityBounds {
    pub k1_low: f64,
    pub k2_low: f64,
    pub k1_high: f64,
    pub k2_high: f64,
}

impl Default for SensitivityBounds {
    fn default() -> Self {
        Self {
            k1_low: DEFAULT_K1_LOW,
            k2_low: DEFAULT_K2_LOW,
            k1_high: DEFAULT_K1_HIGH,
            k2_high: DEFAULT_K2_HIGH,
        }
    }
}

impl SensitivityBounds {
    pub fn clamped(self) -> Self {
        Self {
            k1_low: clamp_to(self.k1_low, &BOUND_K_RANGE),
            k2_low: clamp_to(self.k2_low, &BOUND_K_RANGE),
            k1_high: clamp_to(self.k1_high, &BOUND_K_RANGE),
            k2_high: clamp_to(self.k2_high, &BOUND_K_RANGE),
        }
    }
}

/// Run settings that are not water-quality inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Samples per curve, endpoints included.
    pub num_points: usize,
    /// Sensitivity bounds; `None` disables the low/high curves.
    pub sensitivity: Option<SensitivityBounds>,
    /// Branding image shown next to the chart.
    pub logo_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_points: DEFAULT_NUM_POINTS,
            sensitivity: Some(SensitivityBounds::default()),
            logo_path: "AI_Lab_logo.jpg".to_string(),
        }
    }
}
