// Price models and their loaders
pub mod ml;

// Scoring service
pub mod pricing_engine;

pub use pricing_engine::PricingEngine;
