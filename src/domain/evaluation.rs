//! Regression metrics for comparing model prices against labelled prices.

use crate::domain::errors::PricingError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    pub samples: usize,
}

/// MAE, RMSE and R² of `predicted` against `actual`.
///
/// When `actual` has zero variance R² is 1.0 for a perfect fit and 0.0
/// otherwise.
pub fn evaluate_regression(
    actual: &[f64],
    predicted: &[f64],
) -> Result<RegressionMetrics, PricingError> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(PricingError::invalid_input(
            "predicted",
            "actual and predicted values must have the same non-zero length",
        ));
    }

    let n = actual.len() as f64;
    let mean_actual = actual.iter().sum::<f64>() / n;

    let mut abs_err = 0.0;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (&a, &p) in actual.iter().zip(predicted) {
        let err = a - p;
        abs_err += err.abs();
        ss_res += err * err;
        ss_tot += (a - mean_actual).powi(2);
    }

    let r2 = if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(RegressionMetrics {
        mae: abs_err / n,
        rmse: (ss_res / n).sqrt(),
        r2,
        samples: actual.len(),
    })
}
