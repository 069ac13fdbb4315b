use crate::domain::observation::Observation;

/// Number of features consumed by every price model.
pub const FEATURE_COUNT: usize = 9;

/// Ordered list of feature names.
/// This order MUST match exactly with the order used when the models were trained.
/// Any change here is a breaking change for ML models.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "units_sold",
    "competitor_price",
    "stock_level",
    "day_of_week",
    "holiday_flag",
    "views",
    "moving_avg_demand",
    "price_elasticity",
    "trend_factor",
];

/// Model-ready numeric representation of one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Derives the nine features from a single observation.
    ///
    /// Requests are scored one at a time, so there is no history to aggregate.
    /// `moving_avg_demand` and `trend_factor` are single-point stand-ins equal
    /// to `units_sold`, and `price_elasticity` is fixed at 0. The trained models
    /// expect exactly these values.
    pub fn from_observation(obs: &Observation) -> Self {
        let units_sold = obs.units_sold as f64;

        Self {
            values: [
                units_sold,
                obs.competitor_price,
                obs.stock_level as f64,
                obs.day_of_week as f64,
                obs.holiday_flag as f64,
                obs.views as f64,
                units_sold, // moving_avg_demand
                0.0,        // price_elasticity
                units_sold, // trend_factor
            ],
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Narrowed copy for f32 tensor backends.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of the first NaN or infinite feature, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.values.iter().position(|v| !v.is_finite())
    }
}

/// Feature Builder entry point.
pub fn build_features(obs: &Observation) -> FeatureVector {
    FeatureVector::from_observation(obs)
}
