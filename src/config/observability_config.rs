//! Observability configuration parsing from environment variables.

/// Observability environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityEnvConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_vars(var: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            metrics_enabled: var("METRICS_ENABLED")
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(true),
        }
    }
}
