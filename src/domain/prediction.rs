use crate::domain::evaluation::RegressionMetrics;
use crate::domain::observation::Observation;
use serde::{Deserialize, Serialize};

/// Outcome of scoring one observation with both model families.
///
/// Revenue and profit are derived from the LightGBM-family price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "lightgbm_price")]
    pub price_a: f64,
    #[serde(rename = "xgboost_price")]
    pub price_b: f64,
    #[serde(rename = "estimate_revenue")]
    pub estimated_revenue: f64,
    pub estimated_profit: f64,
}

/// Prices predicted for one row of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePair {
    pub product_id: i64,
    #[serde(rename = "lightgbm_price")]
    pub price_a: f64,
    #[serde(rename = "xgboost_price")]
    pub price_b: f64,
}

/// Batch scoring output. Revenue and profit are computed once over the
/// whole batch, so individual rows carry prices only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPrediction {
    pub prices: Vec<PricePair>,
    #[serde(rename = "estimate_revenue")]
    pub estimated_revenue: f64,
    pub estimated_profit: f64,
}

/// An observation paired with the price that was actually charged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledObservation {
    #[serde(flatten)]
    pub observation: Observation,
    #[serde(alias = "historical_price")]
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelEvaluation {
    pub lightgbm: RegressionMetrics,
    pub xgboost: RegressionMetrics,
}
