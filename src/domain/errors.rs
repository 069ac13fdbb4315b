use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the scoring pipeline.
///
/// None of these are recovered locally: a `PredictionResult` is either
/// complete or not produced at all.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    #[error("Invalid input: field `{field}` {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Model unavailable: {model}")]
    ModelUnavailable { model: String },

    #[error("Scoring failed for {model}: {reason}")]
    ScoringError { model: String, reason: String },
}

impl PricingError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn scoring(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ScoringError {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// True when the caller sent a bad request (4xx-equivalent).
    /// Everything else maps to a server-side (5xx-equivalent) failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

/// Errors raised while loading a model at startup.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Failed to read model file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model file {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid model in {path:?}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("Unsupported model kind `{kind}`: {reason}")]
    Unsupported { kind: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_formatting() {
        let error = PricingError::invalid_input("competitor_price", "is missing");

        let msg = error.to_string();
        assert!(msg.contains("competitor_price"));
        assert!(msg.contains("is missing"));
        assert!(error.is_client_error());
    }

    #[test]
    fn test_server_side_errors() {
        let unavailable = PricingError::ModelUnavailable {
            model: "xgboost".to_string(),
        };
        let scoring = PricingError::scoring("lightgbm", "non-finite feature");

        assert!(!unavailable.is_client_error());
        assert!(!scoring.is_client_error());
        assert!(scoring.to_string().contains("lightgbm"));
    }

    #[test]
    fn test_model_load_error_formatting() {
        let error = ModelLoadError::Invalid {
            path: PathBuf::from("models/lgb.json"),
            reason: "tree 0 has no nodes".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("lgb.json"));
        assert!(msg.contains("tree 0"));
    }
}
