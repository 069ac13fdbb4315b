//! Dual-model price scoring and business-metric estimation.
//!
//! The engine is built once at startup and then shared by reference. It holds
//! no mutable state, so concurrent `score` calls need no coordination.

use crate::application::ml::{PriceModel, load_model};
use crate::config::Config;
use crate::domain::business_metrics::{
    BusinessMetrics, DEFAULT_UNIT_COST, estimate_business_metrics,
};
use crate::domain::errors::{ModelLoadError, PricingError};
use crate::domain::evaluation::evaluate_regression;
use crate::domain::ml::{FeatureVector, build_features};
use crate::domain::observation::Observation;
use crate::domain::prediction::{
    BatchPrediction, LabeledObservation, ModelEvaluation, PredictionResult, PricePair,
};
use crate::infrastructure::observability::Metrics;
use rayon::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Label of the model family whose price drives revenue and profit.
pub const LIGHTGBM: &str = "lightgbm";
pub const XGBOOST: &str = "xgboost";

pub struct PricingEngine {
    lightgbm: Option<Arc<dyn PriceModel>>,
    xgboost: Option<Arc<dyn PriceModel>>,
    unit_cost: f64,
    metrics: Option<Metrics>,
}

impl PricingEngine {
    pub fn new(lightgbm: Arc<dyn PriceModel>, xgboost: Arc<dyn PriceModel>) -> Self {
        Self::with_slots(Some(lightgbm), Some(xgboost))
    }

    /// Engine with possibly empty model slots. Scoring fails with
    /// `ModelUnavailable` while either slot is empty.
    pub fn with_slots(
        lightgbm: Option<Arc<dyn PriceModel>>,
        xgboost: Option<Arc<dyn PriceModel>>,
    ) -> Self {
        Self {
            lightgbm,
            xgboost,
            unit_cost: DEFAULT_UNIT_COST,
            metrics: None,
        }
    }

    /// Loads both configured models. A configured model that fails to load
    /// aborts startup; an unconfigured one leaves its slot empty.
    pub fn load(config: &Config) -> Result<Self, ModelLoadError> {
        let lightgbm = match &config.models.lightgbm_path {
            Some(path) => Some(load_model(config.models.lightgbm_kind, path)?),
            None => {
                warn!("LIGHTGBM_MODEL_PATH not set, lightgbm slot is empty");
                None
            }
        };
        let xgboost = match &config.models.xgboost_path {
            Some(path) => Some(load_model(config.models.xgboost_kind, path)?),
            None => {
                warn!("XGBOOST_MODEL_PATH not set, xgboost slot is empty");
                None
            }
        };

        let engine = Self::with_slots(lightgbm, xgboost).with_unit_cost(config.unit_cost);
        info!(
            "Pricing engine ready: lightgbm={}, xgboost={}, unit_cost={}",
            Self::describe_slot(&engine.lightgbm),
            Self::describe_slot(&engine.xgboost),
            engine.unit_cost
        );
        Ok(engine)
    }

    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn unit_cost(&self) -> f64 {
        self.unit_cost
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    /// Score one observation with both models and derive revenue and profit
    /// from the LightGBM-family price.
    pub fn score(&self, obs: &Observation) -> Result<PredictionResult, PricingError> {
        let started = Instant::now();
        let features = build_features(obs);

        let (price_a, price_b) = self.predict_pair(&features)?;
        let business = self.business_metrics(&[obs.units_sold as f64], &[price_a])?;

        let result = PredictionResult {
            price_a,
            price_b,
            estimated_revenue: business.revenue,
            estimated_profit: business.profit,
        };

        if let Some(metrics) = &self.metrics {
            metrics
                .scoring_latency_seconds
                .with_label_values(&["score"])
                .observe(started.elapsed().as_secs_f64());
            metrics.estimated_revenue.set(result.estimated_revenue);
        }
        debug!(
            "Scored product {}: lightgbm={:.4}, xgboost={:.4}, revenue={:.2}, profit={:.2}",
            obs.product_id,
            result.price_a,
            result.price_b,
            result.estimated_revenue,
            result.estimated_profit
        );

        Ok(result)
    }

    /// Validate a loosely typed payload and score it.
    pub fn score_json(&self, payload: &Value) -> Result<PredictionResult, PricingError> {
        let obs = Observation::from_json(payload)?;
        self.score(&obs)
    }

    /// Score many observations and estimate revenue and profit over the
    /// whole batch with the multi-element demand formula.
    pub fn score_batch(&self, observations: &[Observation]) -> Result<BatchPrediction, PricingError> {
        let started = Instant::now();

        let prices: Vec<PricePair> = observations
            .par_iter()
            .map(|obs| -> Result<PricePair, PricingError> {
                let (price_a, price_b) = self.predict_pair(&build_features(obs))?;
                Ok(PricePair {
                    product_id: obs.product_id,
                    price_a,
                    price_b,
                })
            })
            .collect::<Result<_, _>>()?;

        let y_true: Vec<f64> = observations.iter().map(|o| o.units_sold as f64).collect();
        let y_pred: Vec<f64> = prices.iter().map(|p| p.price_a).collect();
        let business = self.business_metrics(&y_true, &y_pred)?;

        if let Some(metrics) = &self.metrics {
            metrics
                .scoring_latency_seconds
                .with_label_values(&["batch"])
                .observe(started.elapsed().as_secs_f64());
            metrics.estimated_revenue.set(business.revenue);
        }
        info!(
            "Scored batch of {} rows: revenue={:.2}, profit={:.2}",
            prices.len(),
            business.revenue,
            business.profit
        );

        Ok(BatchPrediction {
            prices,
            estimated_revenue: business.revenue,
            estimated_profit: business.profit,
        })
    }

    /// MAE, RMSE and R² of both model families against labelled prices.
    pub fn evaluate(&self, labeled: &[LabeledObservation]) -> Result<ModelEvaluation, PricingError> {
        let predicted: Vec<(f64, f64)> = labeled
            .par_iter()
            .map(|row| self.predict_pair(&build_features(&row.observation)))
            .collect::<Result<_, PricingError>>()?;

        let actual: Vec<f64> = labeled.iter().map(|row| row.price).collect();
        let (pred_a, pred_b): (Vec<f64>, Vec<f64>) = predicted.into_iter().unzip();

        let evaluation = ModelEvaluation {
            lightgbm: evaluate_regression(&actual, &pred_a)?,
            xgboost: evaluate_regression(&actual, &pred_b)?,
        };
        info!(
            "Evaluated {} rows: lightgbm MAE={:.4} R2={:.4}, xgboost MAE={:.4} R2={:.4}",
            actual.len(),
            evaluation.lightgbm.mae,
            evaluation.lightgbm.r2,
            evaluation.xgboost.mae,
            evaluation.xgboost.r2
        );
        Ok(evaluation)
    }

    /// Revenue and profit at the configured unit cost. A non-finite cost is a
    /// scoring error.
    fn business_metrics(
        &self,
        y_true: &[f64],
        y_pred: &[f64],
    ) -> Result<BusinessMetrics, PricingError> {
        if !self.unit_cost.is_finite() {
            return Err(PricingError::scoring(
                "business_metrics",
                format!("unit cost {} is not finite", self.unit_cost),
            ));
        }
        estimate_business_metrics(y_true, y_pred, self.unit_cost)
    }

    /// Run both models on the same vector. The two calls are independent and
    /// may execute in parallel.
    fn predict_pair(&self, features: &FeatureVector) -> Result<(f64, f64), PricingError> {
        let lightgbm = Self::slot(&self.lightgbm, LIGHTGBM)?;
        let xgboost = Self::slot(&self.xgboost, XGBOOST)?;

        let (price_a, price_b) = rayon::join(
            || self.invoke(LIGHTGBM, &**lightgbm, features),
            || self.invoke(XGBOOST, &**xgboost, features),
        );

        Ok((price_a?, price_b?))
    }

    fn invoke(
        &self,
        family: &str,
        model: &dyn PriceModel,
        features: &FeatureVector,
    ) -> Result<f64, PricingError> {
        let result = model.predict(features);

        if let Some(metrics) = &self.metrics {
            metrics.record_prediction(family, result.is_ok());
        }
        if let Err(e) = &result {
            warn!("{} model ({}) failed: {}", family, model.name(), e);
        }
        result
    }

    fn slot<'a>(
        slot: &'a Option<Arc<dyn PriceModel>>,
        family: &str,
    ) -> Result<&'a Arc<dyn PriceModel>, PricingError> {
        slot.as_ref().ok_or_else(|| PricingError::ModelUnavailable {
            model: family.to_string(),
        })
    }

    fn describe_slot(slot: &Option<Arc<dyn PriceModel>>) -> String {
        match slot {
            Some(model) => format!("{} {}", model.name(), model.version()),
            None => "<empty>".to_string(),
        }
    }
}
