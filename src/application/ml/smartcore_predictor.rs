use super::predictor::{PriceModel, ensure_finite_features, ensure_finite_output};
use crate::domain::errors::{ModelLoadError, PricingError};
use crate::domain::ml::FeatureVector;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor trained with smartcore and stored as JSON.
pub struct SmartCorePredictor {
    model: ForestModel,
}

impl SmartCorePredictor {
    pub fn load(model_path: &Path) -> Result<Self, ModelLoadError> {
        let file = File::open(model_path).map_err(|source| ModelLoadError::Io {
            path: model_path.to_path_buf(),
            source,
        })?;

        // Smartcore deserialization (using serde_json)
        let model: ForestModel = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ModelLoadError::Parse {
                path: model_path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        info!("Successfully loaded SmartCore model from {:?}", model_path);
        Ok(Self::from_model(model))
    }

    pub fn from_model(model: ForestModel) -> Self {
        Self { model }
    }
}

impl PriceModel for SmartCorePredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PricingError> {
        ensure_finite_features(self.name(), features)?;

        let input_matrix = DenseMatrix::from_2d_vec(&vec![features.as_slice().to_vec()])
            .map_err(|e| PricingError::scoring(self.name(), format!("Matrix creation failed: {}", e)))?;

        let predictions = self
            .model
            .predict(&input_matrix)
            .map_err(|e| PricingError::scoring(self.name(), format!("Prediction failed: {}", e)))?;

        let pred = predictions
            .first()
            .copied()
            .ok_or_else(|| PricingError::scoring(self.name(), "No prediction returned"))?;

        ensure_finite_output(self.name(), pred)
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }

    fn version(&self) -> &str {
        "v1.0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::build_features;
    use crate::domain::observation::Observation;
    use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;

    fn observation(units_sold: i64) -> Observation {
        Observation {
            product_id: 7,
            units_sold,
            competitor_price: 100.0 + units_sold as f64,
            stock_level: 40,
            day_of_week: units_sold % 7,
            holiday_flag: 0,
            views: units_sold * 5,
        }
    }

    fn trained_forest() -> ForestModel {
        let rows: Vec<Vec<f64>> = (0..40)
            .map(|u| build_features(&observation(u)).as_slice().to_vec())
            .collect();
        let prices: Vec<f64> = (0..40).map(|u| 90.0 + u as f64).collect();

        let x = DenseMatrix::from_2d_vec(&rows).unwrap();
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(10)
            .with_max_depth(6);
        RandomForestRegressor::fit(&x, &prices, params).unwrap()
    }

    #[test]
    fn test_predicts_within_training_range() {
        let predictor = SmartCorePredictor::from_model(trained_forest());
        let price = predictor.predict(&build_features(&observation(20))).unwrap();
        assert!(price >= 90.0 && price <= 129.0, "price {} out of range", price);
    }

    #[test]
    fn test_json_roundtrip_preserves_predictions() {
        let forest = trained_forest();
        let json = serde_json::to_string(&forest).unwrap();
        let restored: ForestModel = serde_json::from_str(&json).unwrap();

        let fv = build_features(&observation(12));
        let a = SmartCorePredictor::from_model(forest).predict(&fv).unwrap();
        let b = SmartCorePredictor::from_model(restored).predict(&fv).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SmartCorePredictor::load(Path::new("missing/forest.json"))
            .err()
            .unwrap();
        assert!(matches!(err, ModelLoadError::Io { .. }));
    }
}
