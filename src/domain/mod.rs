// Revenue / profit estimation
pub mod business_metrics;

// Domain-specific error types
pub mod errors;

// Model quality metrics
pub mod evaluation;

// Feature contract shared with training
pub mod ml;

// Request records
pub mod observation;

// Scoring outputs
pub mod prediction;
