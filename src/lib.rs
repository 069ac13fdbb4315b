//! Dynamic pricing engine.
//!
//! Turns a product's selling context into a model-ready feature vector,
//! scores it with two independently trained price regressors and estimates
//! revenue and profit from the first model's price.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::PricingEngine;
pub use domain::errors::{ModelLoadError, PricingError};
pub use domain::observation::Observation;
pub use domain::prediction::PredictionResult;
