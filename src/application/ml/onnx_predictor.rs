use super::predictor::{PriceModel, ensure_finite_features, ensure_finite_output};
use crate::domain::errors::{ModelLoadError, PricingError};
use crate::domain::ml::FeatureVector;
use ort::session::Session;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Tree ensembles exported to ONNX (e.g. via onnxmltools) and served with
/// ONNX Runtime. Input is a single `[1, n_features]` f32 tensor.
pub struct OnnxPredictor {
    // Session::run needs &mut, the model itself is never modified
    session: Mutex<Session>,
}

impl OnnxPredictor {
    pub fn load(model_path: &Path) -> Result<Self, ModelLoadError> {
        if !model_path.exists() {
            return Err(ModelLoadError::Io {
                path: model_path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "model file not found"),
            });
        }

        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(model_path))
            .map_err(|e| ModelLoadError::Parse {
                path: model_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!("Successfully loaded ONNX model from {:?}", model_path);
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl PriceModel for OnnxPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PricingError> {
        ensure_finite_features(self.name(), features)?;

        let input = features.to_f32_vec();
        let shape = vec![1, input.len()];

        let input_value = ort::value::Value::from_array((shape.as_slice(), input))
            .map_err(|e| PricingError::scoring(self.name(), format!("Input value creation failed: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| PricingError::scoring(self.name(), format!("Session lock failed: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| PricingError::scoring(self.name(), e.to_string()))?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| PricingError::scoring(self.name(), "No output found"))?;
        let data = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| PricingError::scoring(self.name(), e.to_string()))?;
        let price = *data
            .1
            .iter()
            .next()
            .ok_or_else(|| PricingError::scoring(self.name(), "Empty output"))?;

        ensure_finite_output(self.name(), price as f64)
    }

    fn name(&self) -> &str {
        "ONNX Runtime"
    }

    fn version(&self) -> &str {
        "v1.0"
    }
}
