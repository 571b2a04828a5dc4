use thiserror::Error;

/// A model input lies outside the domain where the regression logarithms are defined.
///
/// These errors never abort a prediction run: the affected model is skipped
/// and the error message is shown in its place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{quantity} must be strictly positive (got {value})")]
    NonPositive { quantity: &'static str, value: f64 },

    #[error("{quantity} must be a finite number (got {value})")]
    NonFinite { quantity: &'static str, value: f64 },

    #[error("Prediction horizon must be positive (got {0} h)")]
    NonPositiveHorizon(f64),
}

/// Failures of the command-line plumbing around the predictor.
#[cfg(feature = "cli")]
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Error reading from stdin: {source}")]
    ReadStdin {
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading file '{path}': {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON for --inputs-json: {source}")]
    ParseInputsJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid JSON for --settings-json: {source}")]
    ParseSettingsJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid JSON in input document: {source}")]
    ParseCmdInputJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not serialize output to JSON: {source}")]
    SerializeOutput {
        #[source]
        source: serde_json::Error,
    },
}

/// The optional branding image could not be used. Never fatal.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Asset '{path}' is missing or unreadable: {source}")]
    Missing {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Asset '{path}' could not be decoded: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}
