use serde::Serialize;

use crate::error::DomainError;
use crate::kinetics::*;
use crate::models::{ModelInputs, SensitivityBounds, Settings};

/// EPA rate constants (1/h) for the phases before and after the breakpoint.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RateCoefficients {
    pub k1: f64,
    pub k2: f64,
}

/// Two-phase mixture parameters.
///
/// - `a`: fraction of chlorine demand attributed to the fast phase. The
///   regression is not bounded, so `a` can exceed 1 for some inputs.
/// - `k1`, `k2`: fast and slow rate constants (1/h)
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TwoPhaseCoefficients {
    pub a: f64,
    pub k1: f64,
    pub k2: f64,
}

/// One sample of a concentration curve.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub t_h: f64,
    pub c_mg_l: f64,
}

/// Samples ordered by time over `[0, horizon]`.
pub type CurveSample = Vec<CurvePoint>;

/// Result of one model in a prediction run.
///
/// A model whose inputs fall outside its domain is `Skipped`; the reason is
/// meant to be shown to the user in place of the curve.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome<C> {
    Available { coefficients: C, curve: CurveSample },
    Skipped { reason: String },
}

impl<C> ModelOutcome<C> {
    pub fn coefficients(&self) -> Option<&C> {
        match self {
            ModelOutcome::Available { coefficients, .. } => Some(coefficients),
            ModelOutcome::Skipped { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ModelOutcome::Available { .. } => None,
            ModelOutcome::Skipped { reason } => Some(reason),
        }
    }

    pub fn curve(&self) -> Option<&CurveSample> {
        match self {
            ModelOutcome::Available { curve, .. } => Some(curve),
            ModelOutcome::Skipped { .. } => None,
        }
    }
}

/// Low/high EPA curves drawn from user-supplied rate pairs.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BoundCurves {
    pub bounds: SensitivityBounds,
    pub low: CurveSample,
    pub high: CurveSample,
}

/// Everything one prediction run produces.
///
/// Fields:
/// - `inputs`: the inputs after range clamping, as actually evaluated
/// - `epa`, `two_phase`: per-model coefficients and curves, or the skip reason
/// - `bounds`: sensitivity curves when enabled and the horizon is valid
/// - `messages`: user-facing notes (skipped models, out-of-range fractions)
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DecayReport {
    pub inputs: ModelInputs,
    pub epa: ModelOutcome<RateCoefficients>,
    pub two_phase: ModelOutcome<TwoPhaseCoefficients>,
    pub bounds: Option<BoundCurves>,
    pub messages: Vec<String>,
}

fn require_finite(quantity: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::NonFinite { quantity, value })
    }
}

fn require_positive(quantity: &'static str, value: f64) -> Result<f64, DomainError> {
    let v = require_finite(quantity, value)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(DomainError::NonPositive { quantity, value })
    }
}

fn require_horizon(horizon_h: f64) -> Result<f64, DomainError> {
    let h = require_finite("Prediction horizon", horizon_h)?;
    if h > 0.0 {
        Ok(h)
    } else {
        Err(DomainError::NonPositiveHorizon(h))
    }
}

/// Logarithms shared by both model families; built only from validated inputs.
struct LogTerms {
    doc: f64,
    nh3: f64,
    cl0: f64,
    cl0_per_doc: f64,
}

impl LogTerms {
    fn new(inputs: &ModelInputs) -> Result<Self, DomainError> {
        let doc = require_positive("DOC", inputs.doc)?;
        let nh3 = require_positive("NH3 surrogate", inputs.nh3)?;
        let cl0 = require_positive("Initial chlorine", inputs.cl0)?;
        Ok(Self {
            doc: doc.ln(),
            nh3: nh3.ln(),
            cl0: cl0.ln(),
            cl0_per_doc: (cl0 / doc).ln(),
        })
    }
}

impl EpaRegression {
    fn evaluate(&self, ln: &LogTerms) -> f64 {
        let ln_nh3_scaled = EPA_NH3_SCALE.ln() + ln.nh3;
        (self.intercept
            + self.ln_doc * ln.doc
            + self.ln_nh3 * ln_nh3_scaled
            + self.ln_cl0 * ln.cl0
            + self.ln_cl0_per_doc * ln.cl0_per_doc)
            .exp()
    }
}

impl TwoPhaseRegression {
    fn evaluate(&self, ln: &LogTerms, ln_temp: f64) -> f64 {
        (self.intercept
            + self.ln_cl0_per_doc * ln.cl0_per_doc
            + self.ln_doc * ln.doc
            + self.ln_cl0 * ln.cl0
            + self.ln_nh3 * ln.nh3
            + self.ln_temp * ln_temp
            + self.ln_ph * TWO_PHASE_REFERENCE_PH.ln())
        .exp()
    }
}

/// Compute the EPA rate constants from the regression tables.
///
/// Requires DOC, NH3 surrogate and initial chlorine to be finite and strictly
/// positive; temperature and horizon are not used.
pub fn compute_epa(inputs: &ModelInputs) -> Result<RateCoefficients, DomainError> {
    let ln = LogTerms::new(inputs)?;
    Ok(RateCoefficients {
        k1: EPA_K1.evaluate(&ln),
        k2: EPA_K2.evaluate(&ln),
    })
}

/// Compute the Two-phase parameters from the regression tables.
///
/// Stricter than [`compute_epa`]: temperature enters through `ln(T)` and must
/// be strictly positive as well.
pub fn compute_two_phase(inputs: &ModelInputs) -> Result<TwoPhaseCoefficients, DomainError> {
    let ln = LogTerms::new(inputs)?;
    let ln_temp = require_positive("Temperature", inputs.temp_c)?.ln();
    Ok(TwoPhaseCoefficients {
        a: TWO_PHASE_A.evaluate(&ln, ln_temp),
        k1: TWO_PHASE_K1.evaluate(&ln, ln_temp),
        k2: TWO_PHASE_K2.evaluate(&ln, ln_temp),
    })
}

/// EPA concentration at time `t_h`.
///
/// Up to the breakpoint `B` the decay runs at `k1`; after it at `k2`, with the
/// prefactor `exp(B·(k2 - k1))` keeping the curve continuous at `B`.
pub fn epa_concentration(cl0: f64, k1: f64, k2: f64, t_h: f64) -> f64 {
    if t_h <= EPA_BREAKPOINT_H {
        cl0 * (-k1 * t_h).exp()
    } else {
        cl0 * (EPA_BREAKPOINT_H * (k2 - k1)).exp() * (-k2 * t_h).exp()
    }
}

/// Two-phase concentration at time `t_h`.
///
/// With `a > 1` the slow term carries a negative weight and the mixture
/// crosses zero; the value is returned as the regression gives it.
pub fn two_phase_concentration(cl0: f64, a: f64, k1: f64, k2: f64, t_h: f64) -> f64 {
    cl0 * (a * (-k1 * t_h).exp() + (1.0 - a) * (-k2 * t_h).exp())
}

fn sample_with(horizon_h: f64, num_points: usize, f: impl Fn(f64) -> f64) -> CurveSample {
    time_grid(horizon_h, num_points)
        .into_iter()
        .map(|t_h| CurvePoint { t_h, c_mg_l: f(t_h) })
        .collect()
}

/// Sample the EPA curve at `num_points` evenly spaced times over `[0, horizon_h]`.
///
/// The breakpoint is fixed; with `horizon_h < 5` only the first phase is sampled.
pub fn sample_epa_curve(
    cl0: f64,
    k1: f64,
    k2: f64,
    horizon_h: f64,
    num_points: usize,
) -> CurveSample {
    sample_with(horizon_h, num_points, |t| epa_concentration(cl0, k1, k2, t))
}

/// Sample the Two-phase curve at `num_points` evenly spaced times over `[0, horizon_h]`.
pub fn sample_two_phase_curve(
    cl0: f64,
    a: f64,
    k1: f64,
    k2: f64,
    horizon_h: f64,
    num_points: usize,
) -> CurveSample {
    sample_with(horizon_h, num_points, |t| {
        two_phase_concentration(cl0, a, k1, k2, t)
    })
}

/// Sample the low and high sensitivity curves, in that order.
///
/// `bounds` carries the four rates `(k1_low, k2_low, k1_high, k2_high)`; the
/// low curve uses `(k1_low, k2_low)` and the high curve `(k1_high, k2_high)`
/// with the same piecewise rule as [`sample_epa_curve`].
pub fn sample_bound_curves(
    cl0: f64,
    bounds: &SensitivityBounds,
    horizon_h: f64,
    num_points: usize,
) -> (CurveSample, CurveSample) {
    (
        sample_epa_curve(cl0, bounds.k1_low, bounds.k2_low, horizon_h, num_points),
        sample_epa_curve(cl0, bounds.k1_high, bounds.k2_high, horizon_h, num_points),
    )
}

/// Run both models and the optional sensitivity curves for one set of inputs.
///
/// Inputs and bounds are clamped to their recognised ranges first. A domain
/// error in one model skips only that model; the report always comes back.
pub fn predict(inputs: &ModelInputs, settings: &Settings) -> DecayReport {
    let inputs = inputs.clamped();
    let n = clamp_points(settings.num_points);
    if n != settings.num_points {
        tracing::debug!(requested = settings.num_points, used = n, "sample count clamped");
    }
    let mut messages = Vec::new();

    let horizon = require_horizon(inputs.horizon_h);

    let epa = match horizon
        .clone()
        .and_then(|h| compute_epa(&inputs).map(|c| (h, c)))
    {
        Ok((h, c)) => {
            tracing::debug!(k1 = c.k1, k2 = c.k2, "EPA coefficients");
            ModelOutcome::Available {
                coefficients: c,
                curve: sample_epa_curve(inputs.cl0, c.k1, c.k2, h, n),
            }
        }
        Err(e) => ModelOutcome::Skipped {
            reason: skip_reason("EPA model", &e, &mut messages),
        },
    };

    let two_phase = match horizon
        .clone()
        .and_then(|h| compute_two_phase(&inputs).map(|c| (h, c)))
    {
        Ok((h, c)) => {
            tracing::debug!(a = c.a, k1 = c.k1, k2 = c.k2, "Two-phase coefficients");
            if !(0.0..=1.0).contains(&c.a) {
                messages.push(format!(
                    "Two-phase fraction A = {:.3} lies outside [0, 1]; the curve can fall below 0 mg/L",
                    c.a
                ));
            }
            ModelOutcome::Available {
                coefficients: c,
                curve: sample_two_phase_curve(inputs.cl0, c.a, c.k1, c.k2, h, n),
            }
        }
        Err(e) => ModelOutcome::Skipped {
            reason: skip_reason("Two-phase model", &e, &mut messages),
        },
    };

    let bounds = match (settings.sensitivity, &horizon) {
        (Some(b), Ok(h)) => match require_finite("Initial chlorine", inputs.cl0) {
            Ok(cl0) => {
                let bounds = b.clamped();
                let (low, high) = sample_bound_curves(cl0, &bounds, *h, n);
                Some(BoundCurves { bounds, low, high })
            }
            Err(e) => {
                skip_reason("Sensitivity bounds", &e, &mut messages);
                None
            }
        },
        _ => None,
    };

    DecayReport {
        inputs,
        epa,
        two_phase,
        bounds,
        messages,
    }
}

fn skip_reason(model: &str, err: &DomainError, messages: &mut Vec<String>) -> String {
    tracing::warn!(model, error = %err, "skipping curve");
    let reason = err.to_string();
    messages.push(format!("{model} skipped: {reason}"));
    reason
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ModelInputs {
        ModelInputs {
            doc: 5.0,
            nh3: 0.5,
            cl0: 1.5,
            temp_c: 20.0,
            horizon_h: 5.0,
        }
    }

    fn close(a: f64, b: f64, rel: f64) -> bool {
        (a - b).abs() <= rel * a.abs().max(b.abs()).max(f64::MIN_POSITIVE)
    }

    #[test]
    fn epa_matches_literal_formula() {
        let (doc, nh3, cl0): (f64, f64, f64) = (5.0, 0.5, 1.5);
        let k1 = (-0.442 + 0.889 * doc.ln() + 0.345 * (7.6 * nh3).ln() - 1.082 * cl0.ln()
            + 0.192 * (cl0 / doc).ln())
        .exp();
        let k2 = (-4.817 + 1.187 * doc.ln() + 0.102 * (7.6 * nh3).ln() - 0.821 * cl0.ln()
            - 0.271 * (cl0 / doc).ln())
        .exp();
        let c = compute_epa(&scenario()).unwrap();
        assert!(close(c.k1, k1, 1e-12), "k1 {} vs {}", c.k1, k1);
        assert!(close(c.k2, k2, 1e-12), "k2 {} vs {}", c.k2, k2);
        assert!(close(c.k1, 2.180_359_228, 1e-8));
        assert!(close(c.k2, 0.062_222_580_6, 1e-8));
    }

    #[test]
    fn two_phase_matches_literal_formula() {
        let (doc, nh3, cl0, t): (f64, f64, f64, f64) = (5.0, 0.5, 1.5, 20.0);
        let a = (0.168 - 0.148 * (cl0 / doc).ln() - 0.41 * cl0.ln() + 0.0554 * nh3.ln()
            + 0.185 * t.ln())
        .exp();
        let k1 = (5.41 - 0.38 * (cl0 / doc).ln() + 0.274 * nh3.ln() - 1.12 * t.ln()
            - 0.854 * 7f64.ln())
        .exp();
        let k2 = (-7.13 + 0.864 * (cl0 / doc).ln() + 2.63 * doc.ln() - 2.55 * cl0.ln()
            + 0.48 * nh3.ln()
            + 1.03 * t.ln())
        .exp();
        let c = compute_two_phase(&scenario()).unwrap();
        assert!(close(c.a, a, 1e-12));
        assert!(close(c.k1, k1, 1e-12));
        assert!(close(c.k2, k2, 1e-12));
    }

    #[test]
    fn epa_is_continuous_at_breakpoint() {
        let c = compute_epa(&scenario()).unwrap();
        let cl0 = 1.5;
        let first = cl0 * (-c.k1 * EPA_BREAKPOINT_H).exp();
        let second =
            cl0 * (EPA_BREAKPOINT_H * (c.k2 - c.k1)).exp() * (-c.k2 * EPA_BREAKPOINT_H).exp();
        assert!(close(first, second, 1e-9), "{first} vs {second}");
        // just past the breakpoint the second branch continues from the same value
        let after = epa_concentration(cl0, c.k1, c.k2, EPA_BREAKPOINT_H + 1e-9);
        assert!(close(after, first, 1e-6));
    }

    #[test]
    fn curves_start_at_initial_chlorine() {
        let epa = sample_epa_curve(1.5, 2.0, 0.1, 5.0, 100);
        let tp = sample_two_phase_curve(1.5, 0.4, 1.9, 0.1, 5.0, 100);
        assert_eq!(epa[0].c_mg_l, 1.5);
        assert!(close(tp[0].c_mg_l, 1.5, 1e-12));
    }

    #[test]
    fn short_horizon_never_reaches_second_phase() {
        let curve = sample_epa_curve(2.0, 0.3, 0.05, 3.0, 31);
        for p in &curve {
            assert!(close(p.c_mg_l, 2.0 * (-0.3 * p.t_h).exp(), 1e-12));
        }
    }

    #[test]
    fn domain_errors_name_the_offending_input() {
        let zero_doc = ModelInputs {
            doc: 0.0,
            ..scenario()
        };
        assert_eq!(
            compute_epa(&zero_doc),
            Err(DomainError::NonPositive {
                quantity: "DOC",
                value: 0.0
            })
        );
        let zero_temp = ModelInputs {
            temp_c: 0.0,
            ..scenario()
        };
        assert!(compute_epa(&zero_temp).is_ok());
        assert!(matches!(
            compute_two_phase(&zero_temp),
            Err(DomainError::NonPositive {
                quantity: "Temperature",
                ..
            })
        ));
        let nan_cl0 = ModelInputs {
            cl0: f64::NAN,
            ..scenario()
        };
        assert!(matches!(
            compute_epa(&nan_cl0),
            Err(DomainError::NonFinite { .. })
        ));
    }

    #[test]
    fn two_phase_curve_keeps_raw_mixture() {
        let c = compute_two_phase(&scenario()).unwrap();
        assert!(c.a > 1.0);
        let curve = sample_two_phase_curve(1.5, c.a, c.k1, c.k2, 5.0, 100);
        let raw = 1.5 * (c.a * (-c.k1 * 5.0).exp() + (1.0 - c.a) * (-c.k2 * 5.0).exp());
        assert_eq!(curve[99].c_mg_l, raw);
        assert!((curve[99].c_mg_l - -0.8751).abs() < 1e-4, "{}", curve[99].c_mg_l);

        let report = predict(&scenario(), &Settings::default());
        assert_eq!(report.two_phase.curve().unwrap()[99].c_mg_l, raw);
    }

    #[test]
    fn sample_count_is_clamped_in_predict() {
        for (requested, expected) in [(0, 2), (1, 2), (usize::MAX, 10_000), (37, 37)] {
            let settings = Settings {
                num_points: requested,
                ..Settings::default()
            };
            let report = predict(&scenario(), &settings);
            assert_eq!(report.epa.curve().map(Vec::len), Some(expected));
            assert_eq!(report.two_phase.curve().map(Vec::len), Some(expected));
            let bounds = report.bounds.unwrap();
            assert_eq!(bounds.low.len(), expected);
            assert_eq!(bounds.high.len(), expected);
        }
    }

    #[test]
    fn zero_temperature_skips_only_two_phase() {
        let inputs = ModelInputs {
            temp_c: 0.0,
            ..scenario()
        };
        let report = predict(&inputs, &Settings::default());
        assert!(report.epa.curve().is_some());
        assert!(matches!(report.two_phase, ModelOutcome::Skipped { .. }));
        assert!(report.two_phase.coefficients().is_none());
        assert!(report.two_phase.reason().unwrap().contains("Temperature"));
        assert!(report.epa.reason().is_none());
        assert!(report.bounds.is_some());
        assert!(
            report
                .messages
                .iter()
                .any(|m| m.starts_with("Two-phase model skipped"))
        );
    }

    #[test]
    fn predict_reports_out_of_range_fraction() {
        let report = predict(&scenario(), &Settings::default());
        assert!(report.messages.iter().any(|m| m.contains("outside [0, 1]")));
        assert_eq!(report.epa.curve().map(Vec::len), Some(100));
    }

    #[test]
    fn predict_without_bounds() {
        let settings = Settings {
            sensitivity: None,
            ..Settings::default()
        };
        let report = predict(&scenario(), &settings);
        assert!(report.bounds.is_none());
    }
}
