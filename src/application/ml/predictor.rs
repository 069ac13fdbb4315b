use crate::domain::errors::PricingError;
use crate::domain::ml::FeatureVector;

/// Interface for trained price regressors.
///
/// Implementations are loaded once and shared read-only across threads,
/// so `predict` takes `&self` and must not mutate model state.
pub trait PriceModel: Send + Sync {
    /// Predict a price for the feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<f64, PricingError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}

/// Rejects NaN/infinite inputs before they reach a model.
pub(crate) fn ensure_finite_features(
    model: &str,
    features: &FeatureVector,
) -> Result<(), PricingError> {
    match features.first_non_finite() {
        Some(idx) => Err(PricingError::scoring(
            model,
            format!(
                "feature `{}` is not finite",
                crate::domain::ml::FEATURE_NAMES[idx]
            ),
        )),
        None => Ok(()),
    }
}

/// Rejects NaN/infinite model outputs; they are never passed on as prices.
pub(crate) fn ensure_finite_output(model: &str, value: f64) -> Result<f64, PricingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::scoring(
            model,
            format!("model returned non-finite price {}", value),
        ))
    }
}
