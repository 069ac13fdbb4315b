pub mod gbdt_predictor;
#[cfg(feature = "onnx")]
pub mod onnx_predictor;
pub mod predictor;
pub mod smartcore_predictor;

pub use gbdt_predictor::{GbdtPredictor, RegressionTree, TreeEnsemble, TreeNode};
pub use predictor::PriceModel;
pub use smartcore_predictor::SmartCorePredictor;

use crate::domain::errors::ModelLoadError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Serialized model formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Gbdt,
    SmartCore,
    Onnx,
}

impl FromStr for ModelKind {
    type Err = ModelLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbdt" | "lightgbm" | "xgboost" => Ok(ModelKind::Gbdt),
            "smartcore" => Ok(ModelKind::SmartCore),
            "onnx" => Ok(ModelKind::Onnx),
            _ => Err(ModelLoadError::Unsupported {
                kind: s.to_string(),
                reason: "must be 'gbdt', 'smartcore' or 'onnx'".to_string(),
            }),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Gbdt => "gbdt",
            ModelKind::SmartCore => "smartcore",
            ModelKind::Onnx => "onnx",
        };
        f.write_str(name)
    }
}

/// Load a model once at startup. Any failure here is fatal to the caller.
pub fn load_model(kind: ModelKind, path: &Path) -> Result<Arc<dyn PriceModel>, ModelLoadError> {
    match kind {
        ModelKind::Gbdt => Ok(Arc::new(GbdtPredictor::load(path)?)),
        ModelKind::SmartCore => Ok(Arc::new(SmartCorePredictor::load(path)?)),
        #[cfg(feature = "onnx")]
        ModelKind::Onnx => Ok(Arc::new(onnx_predictor::OnnxPredictor::load(path)?)),
        #[cfg(not(feature = "onnx"))]
        ModelKind::Onnx => Err(ModelLoadError::Unsupported {
            kind: kind.to_string(),
            reason: "built without the `onnx` feature".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_parsing() {
        assert_eq!("gbdt".parse::<ModelKind>().unwrap(), ModelKind::Gbdt);
        assert_eq!("XGBoost".parse::<ModelKind>().unwrap(), ModelKind::Gbdt);
        assert_eq!("smartcore".parse::<ModelKind>().unwrap(), ModelKind::SmartCore);
        assert_eq!("ONNX".parse::<ModelKind>().unwrap(), ModelKind::Onnx);
        assert!("pickle".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_model_kind_display_roundtrip() {
        for kind in [ModelKind::Gbdt, ModelKind::SmartCore, ModelKind::Onnx] {
            assert_eq!(kind.to_string().parse::<ModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_load_model_missing_file_is_fatal() {
        let result = load_model(ModelKind::Gbdt, Path::new("models/absent.json"));
        assert!(matches!(result, Err(ModelLoadError::Io { .. })));
    }
}
