use serde::Serialize;

use crate::decay::predictor::{CurvePoint, DecayReport};

pub const CHART_TITLE: &str = "EPA and Two-phase Models of Residual Chlorine";
pub const X_LABEL: &str = "Time (hrs)";
pub const Y_LABEL: &str = "Residual Chlorine (mg/L)";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One labelled line, ready for a plotting front end.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: &'static str,
    pub style: LineStyle,
    pub points: Vec<CurvePoint>,
}

/// Title, axis labels and every series a report can draw.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<Series>,
}

/// Turn a report into chart series. Skipped models contribute nothing.
pub fn chart_series(report: &DecayReport) -> ChartData {
    let mut series = Vec::with_capacity(4);

    if let Some(curve) = report.epa.curve() {
        series.push(Series {
            label: "EPA Model (Original Input)",
            color: "blue",
            style: LineStyle::Solid,
            points: curve.clone(),
        });
    }
    if let Some(curve) = report.two_phase.curve() {
        series.push(Series {
            label: "Two-phase Model (Original Input)",
            color: "green",
            style: LineStyle::Solid,
            points: curve.clone(),
        });
    }
    if let Some(b) = &report.bounds {
        series.push(Series {
            label: "EPA Model Low (User Input)",
            color: "orange",
            style: LineStyle::Dashed,
            points: b.low.clone(),
        });
        series.push(Series {
            label: "EPA Model High (User Input)",
            color: "red",
            style: LineStyle::Dashed,
            points: b.high.clone(),
        });
    }

    ChartData {
        title: CHART_TITLE,
        x_label: X_LABEL,
        y_label: Y_LABEL,
        series,
    }
}
