//! Gradient-boosted regression tree inference.
//!
//! Models are exported from the training pipeline as a JSON tree dump:
//!
//! ```json
//! {
//!   "name": "lightgbm",
//!   "version": "2024-12",
//!   "base_score": 120.0,
//!   "num_features": 9,
//!   "trees": [
//!     {
//!       "weight": 1.0,
//!       "nodes": [
//!         {"id": 0, "feature": 1, "threshold": 150.0, "left": 1, "right": 2},
//!         {"id": 1, "leaf": -12.5},
//!         {"id": 2, "leaf": 8.0}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A sample goes to `left` when `x[feature] < threshold`. Node ids must equal
//! their position and children must come after their parent, which rules out
//! cycles at load time.

use super::predictor::{PriceModel, ensure_finite_features, ensure_finite_output};
use crate::domain::errors::{ModelLoadError, PricingError};
use crate::domain::ml::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf: Option<f64>,
}

impl TreeNode {
    pub fn split(id: usize, feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self {
            id,
            feature: Some(feature),
            threshold: Some(threshold),
            left: Some(left),
            right: Some(right),
            leaf: None,
        }
    }

    pub fn leaf(id: usize, value: f64) -> Self {
        Self {
            id,
            feature: None,
            threshold: None,
            left: None,
            right: None,
            leaf: Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    #[serde(default = "unit_weight")]
    pub weight: f64,
    pub nodes: Vec<TreeNode>,
}

fn unit_weight() -> f64 {
    1.0
}

impl RegressionTree {
    /// Leaf value reached by `x`. The tree must have passed `validate`.
    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            if let Some(value) = node.leaf {
                return value;
            }
            // validate() guarantees split nodes carry all four fields
            let (Some(feature), Some(threshold), Some(left), Some(right)) =
                (node.feature, node.threshold, node.left, node.right)
            else {
                return 0.0;
            };
            idx = if x[feature] < threshold { left } else { right };
        }
    }

    fn validate(&self, num_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("has no nodes".to_string());
        }
        if !self.weight.is_finite() {
            return Err(format!("has non-finite weight {}", self.weight));
        }

        for (pos, node) in self.nodes.iter().enumerate() {
            if node.id != pos {
                return Err(format!("node at position {} has id {}", pos, node.id));
            }

            if let Some(value) = node.leaf {
                if !value.is_finite() {
                    return Err(format!("leaf {} has non-finite value", pos));
                }
                continue;
            }

            let (Some(feature), Some(threshold), Some(left), Some(right)) =
                (node.feature, node.threshold, node.left, node.right)
            else {
                return Err(format!(
                    "node {} is neither a leaf nor a complete split",
                    pos
                ));
            };

            if feature >= num_features {
                return Err(format!(
                    "node {} splits on feature {} but the model has {} features",
                    pos, feature, num_features
                ));
            }
            if threshold.is_nan() {
                return Err(format!("node {} has NaN threshold", pos));
            }
            for child in [left, right] {
                if child <= pos || child >= self.nodes.len() {
                    return Err(format!("node {} has invalid child {}", pos, child));
                }
            }
        }

        Ok(())
    }
}

/// Serialized tree ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub base_score: f64,
    pub num_features: usize,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), String> {
        if self.num_features == 0 {
            return Err("num_features must be positive".to_string());
        }
        if !self.base_score.is_finite() {
            return Err("base_score is not finite".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.num_features)
                .map_err(|e| format!("tree {} {}", i, e))?;
        }
        Ok(())
    }

    pub fn score(&self, x: &[f64]) -> f64 {
        self.base_score
            + self
                .trees
                .iter()
                .map(|tree| tree.weight * tree.evaluate(x))
                .sum::<f64>()
    }
}

pub struct GbdtPredictor {
    ensemble: TreeEnsemble,
    name: String,
    version: String,
}

impl GbdtPredictor {
    pub fn load(model_path: &Path) -> Result<Self, ModelLoadError> {
        let json = fs::read_to_string(model_path).map_err(|source| ModelLoadError::Io {
            path: model_path.to_path_buf(),
            source,
        })?;

        let predictor = Self::from_json_str(&json).map_err(|e| match e {
            ModelLoadError::Parse { reason, .. } => ModelLoadError::Parse {
                path: model_path.to_path_buf(),
                reason,
            },
            ModelLoadError::Invalid { reason, .. } => ModelLoadError::Invalid {
                path: model_path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        info!(
            "Loaded GBDT model {} ({} trees) from {:?}",
            predictor.name,
            predictor.ensemble.trees.len(),
            model_path
        );
        Ok(predictor)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelLoadError> {
        let ensemble: TreeEnsemble =
            serde_json::from_str(json).map_err(|e| ModelLoadError::Parse {
                path: PathBuf::new(),
                reason: e.to_string(),
            })?;
        Self::from_ensemble(ensemble)
    }

    pub fn from_ensemble(ensemble: TreeEnsemble) -> Result<Self, ModelLoadError> {
        ensemble
            .validate()
            .map_err(|reason| ModelLoadError::Invalid {
                path: PathBuf::new(),
                reason,
            })?;

        let name = ensemble.name.clone().unwrap_or_else(|| "GBDT".to_string());
        let version = ensemble
            .version
            .clone()
            .unwrap_or_else(|| "unversioned".to_string());

        Ok(Self {
            ensemble,
            name,
            version,
        })
    }

    pub fn num_trees(&self) -> usize {
        self.ensemble.trees.len()
    }
}

impl PriceModel for GbdtPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PricingError> {
        if features.len() != self.ensemble.num_features {
            return Err(PricingError::scoring(
                &self.name,
                format!(
                    "expected {} features, got {}",
                    self.ensemble.num_features,
                    features.len()
                ),
            ));
        }
        ensure_finite_features(&self.name, features)?;

        ensure_finite_output(&self.name, self.ensemble.score(features.as_slice()))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }
}
