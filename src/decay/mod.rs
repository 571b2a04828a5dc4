pub mod chart;
pub mod predictor;
