pub mod adapters;
pub mod decay;
pub mod error;
pub mod kinetics;
pub mod models;

pub use crate::adapters::branding::{Branding, load_branding};
pub use crate::decay::chart::{ChartData, LineStyle, Series, chart_series};
pub use crate::decay::predictor::{
    BoundCurves, CurvePoint, CurveSample, DecayReport, ModelOutcome, RateCoefficients,
    TwoPhaseCoefficients, compute_epa, compute_two_phase, predict, sample_bound_curves,
    sample_epa_curve, sample_two_phase_curve,
};
pub use crate::error::{AssetError, DomainError};
pub use crate::models::{ModelInputs, SensitivityBounds, Settings};
#[cfg(feature = "cli")]
pub use crate::error::AppError;
