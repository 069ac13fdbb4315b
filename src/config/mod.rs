//! Configuration module for the pricing engine.
//!
//! Configuration is loaded from environment variables (optionally seeded from
//! a `.env` file by the binary) and grouped by concern: models and
//! observability.

mod model_config;
mod observability_config;

pub use model_config::ModelEnvConfig;
pub use observability_config::ObservabilityEnvConfig;

use crate::domain::business_metrics::DEFAULT_UNIT_COST;
use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub models: ModelEnvConfig,
    /// Unit cost subtracted from each predicted price when estimating profit
    pub unit_cost: f64,
    pub observability: ObservabilityEnvConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelEnvConfig::default(),
            unit_cost: DEFAULT_UNIT_COST,
            observability: ObservabilityEnvConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let models = ModelEnvConfig::from_vars(&var)?;

        let unit_cost = match var("UNIT_COST") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid UNIT_COST: {}", raw))?,
            None => DEFAULT_UNIT_COST,
        };

        let config = Self {
            models,
            unit_cost,
            observability: ObservabilityEnvConfig::from_vars(&var),
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-check values that may have been overridden after loading.
    pub fn validate(&self) -> Result<()> {
        if !self.unit_cost.is_finite() {
            anyhow::bail!("Invalid UNIT_COST: {} is not finite", self.unit_cost);
        }
        Ok(())
    }
}
