//! Revenue and profit estimation from predicted prices.
//!
//! Demand at the predicted price is approximated by shifting the observed
//! demand proxy against the deviation of each price from the batch mean:
//!
//! ```text
//! demand_i = max(y_true_i - 0.5 * (y_pred_i - mean(y_pred)), 0)
//! revenue  = sum(demand_i * y_pred_i)
//! profit   = sum(demand_i * (y_pred_i - cost))
//! ```
//!
//! For a single-request batch the mean term vanishes and demand is
//! `max(units_sold, 0)`.

use crate::domain::errors::PricingError;
use serde::{Deserialize, Serialize};

/// Unit cost used when none is configured.
pub const DEFAULT_UNIT_COST: f64 = 20.0;

/// Weight of the price deviation in the demand adjustment.
const PRICE_SENSITIVITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BusinessMetrics {
    pub revenue: f64,
    pub profit: f64,
}

/// Per-element adjusted demand, clamped at zero.
pub fn demand(y_true: &[f64], y_pred: &[f64]) -> Result<Vec<f64>, PricingError> {
    if y_true.len() != y_pred.len() {
        return Err(PricingError::invalid_input(
            "y_pred",
            format!(
                "length {} does not match demand proxy length {}",
                y_pred.len(),
                y_true.len()
            ),
        ));
    }
    if y_pred.is_empty() {
        return Ok(Vec::new());
    }

    let mean_pred = y_pred.iter().sum::<f64>() / y_pred.len() as f64;

    Ok(y_true
        .iter()
        .zip(y_pred)
        .map(|(&t, &p)| (t - PRICE_SENSITIVITY * (p - mean_pred)).max(0.0))
        .collect())
}

/// Estimated revenue and profit for a batch of predicted prices.
///
/// An empty batch produces zero revenue and zero profit.
pub fn estimate_business_metrics(
    y_true: &[f64],
    y_pred: &[f64],
    cost: f64,
) -> Result<BusinessMetrics, PricingError> {
    let demand = demand(y_true, y_pred)?;

    let (revenue, profit) = demand
        .iter()
        .zip(y_pred)
        .fold((0.0, 0.0), |(revenue, profit), (&d, &p)| {
            (revenue + d * p, profit + d * (p - cost))
        });

    Ok(BusinessMetrics { revenue, profit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_reference_scenario() {
        let metrics = estimate_business_metrics(&[50.0], &[25.0], DEFAULT_UNIT_COST).unwrap();
        assert_eq!(metrics.revenue, 1250.0);
        assert_eq!(metrics.profit, 250.0);
    }

    #[test]
    fn test_zero_units_yield_zero_metrics() {
        for price in [0.0, 25.0, 1_000.0, -40.0] {
            let metrics = estimate_business_metrics(&[0.0], &[price], DEFAULT_UNIT_COST).unwrap();
            assert_eq!(metrics.revenue, 0.0);
            assert_eq!(metrics.profit, 0.0);
        }
    }

    #[test]
    fn test_negative_units_clamp_to_zero_demand() {
        let metrics = estimate_business_metrics(&[-12.0], &[30.0], DEFAULT_UNIT_COST).unwrap();
        assert_eq!(metrics.revenue, 0.0);
        assert_eq!(metrics.profit, 0.0);
    }

    #[test]
    fn test_singleton_demand_equals_clamped_units() {
        for units in [-5.0, 0.0, 3.0, 120.0] {
            let d = demand(&[units], &[42.0]).unwrap();
            assert_eq!(d, vec![f64::max(units, 0.0)]);
        }
    }

    #[test]
    fn test_batch_demand_shifts_against_mean_price() {
        // mean(y_pred) = 20; deviations -10 and +10
        let d = demand(&[10.0, 10.0], &[10.0, 30.0]).unwrap();
        assert_eq!(d, vec![15.0, 5.0]);

        let metrics = estimate_business_metrics(&[10.0, 10.0], &[10.0, 30.0], 20.0).unwrap();
        assert_eq!(metrics.revenue, 15.0 * 10.0 + 5.0 * 30.0);
        assert_eq!(metrics.profit, 15.0 * -10.0 + 5.0 * 10.0);
    }

    #[test]
    fn test_batch_demand_clamps_expensive_rows() {
        // mean = 60; second row: 4 - 0.5 * 60 < 0
        let d = demand(&[4.0, 4.0], &[0.0, 120.0]).unwrap();
        assert_eq!(d, vec![34.0, 0.0]);
    }

    #[test]
    fn test_custom_cost() {
        let metrics = estimate_business_metrics(&[10.0], &[25.0], 5.0).unwrap();
        assert_eq!(metrics.profit, 200.0);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = estimate_business_metrics(&[1.0, 2.0], &[10.0], DEFAULT_UNIT_COST).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_empty_batch() {
        let metrics = estimate_business_metrics(&[], &[], DEFAULT_UNIT_COST).unwrap();
        assert_eq!(metrics, BusinessMetrics::default());
    }
}
