//! Model location configuration parsing from environment variables.

use crate::application::ml::ModelKind;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Where each model family is loaded from
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnvConfig {
    pub lightgbm_path: Option<PathBuf>,
    pub lightgbm_kind: ModelKind,
    pub xgboost_path: Option<PathBuf>,
    pub xgboost_kind: ModelKind,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            lightgbm_path: None,
            lightgbm_kind: ModelKind::Gbdt,
            xgboost_path: None,
            xgboost_kind: ModelKind::Gbdt,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            lightgbm_path: non_empty(var("LIGHTGBM_MODEL_PATH")).map(PathBuf::from),
            lightgbm_kind: parse_kind(var, "LIGHTGBM_MODEL_KIND")?,
            xgboost_path: non_empty(var("XGBOOST_MODEL_PATH")).map(PathBuf::from),
            xgboost_kind: parse_kind(var, "XGBOOST_MODEL_KIND")?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_kind(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<ModelKind> {
    match non_empty(var(key)) {
        Some(raw) => raw
            .parse::<ModelKind>()
            .with_context(|| format!("Invalid {}", key)),
        None => Ok(ModelKind::Gbdt),
    }
}
