use pricing_engine::application::ml::{GbdtPredictor, PriceModel};
use pricing_engine::domain::ml::{FEATURE_NAMES, build_features};
use pricing_engine::{Observation, PricingEngine, PricingError};
use serde_json::json;
use std::sync::Arc;

/// Single-leaf ensemble: always predicts `price`.
fn constant_model(name: &str, price: f64) -> Arc<dyn PriceModel> {
    let json = json!({
        "name": name,
        "num_features": 9,
        "base_score": price,
        "trees": []
    });
    Arc::new(GbdtPredictor::from_json_str(&json.to_string()).unwrap())
}

/// Prices up with views, down on holidays.
fn demand_sensitive_model() -> Arc<dyn PriceModel> {
    let json = r#"{
        "name": "xgboost",
        "base_score": 18.0,
        "num_features": 9,
        "trees": [
            {"nodes": [
                {"id": 0, "feature": 5, "threshold": 300.0, "left": 1, "right": 2},
                {"id": 1, "leaf": 0.0},
                {"id": 2, "leaf": 6.0}
            ]},
            {"nodes": [
                {"id": 0, "feature": 4, "threshold": 0.5, "left": 1, "right": 2},
                {"id": 1, "leaf": 1.0},
                {"id": 2, "leaf": -3.0}
            ]}
        ]
    }"#;
    Arc::new(GbdtPredictor::from_json_str(json).unwrap())
}

fn reference_observation() -> Observation {
    Observation {
        product_id: 101,
        units_sold: 50,
        competitor_price: 20.5,
        stock_level: 200,
        day_of_week: 2,
        holiday_flag: 0,
        views: 500,
    }
}

#[test]
fn test_reference_request_end_to_end() {
    let engine = PricingEngine::new(constant_model("lightgbm", 25.0), demand_sensitive_model());

    let result = engine.score(&reference_observation()).unwrap();

    assert_eq!(result.price_a, 25.0);
    // 18 + 6 (views > 300) + 1 (no holiday)
    assert_eq!(result.price_b, 25.0);
    assert_eq!(result.estimated_revenue, 1250.0);
    assert_eq!(result.estimated_profit, 250.0);
}

#[test]
fn test_zero_units_sold_regardless_of_price() {
    for price in [0.5, 25.0, 480.0] {
        let engine =
            PricingEngine::new(constant_model("lightgbm", price), demand_sensitive_model());
        let obs = Observation {
            units_sold: 0,
            ..reference_observation()
        };

        let result = engine.score(&obs).unwrap();
        assert_eq!(result.estimated_revenue, 0.0);
        assert_eq!(result.estimated_profit, 0.0);
    }
}

#[test]
fn test_json_payload_field_order_is_irrelevant() {
    let engine = PricingEngine::new(constant_model("lightgbm", 25.0), demand_sensitive_model());

    let ordered = json!({
        "product_id": 101, "units_sold": 50, "competitor_price": 20.5,
        "stock_level": 200, "day_of_week": 2, "holiday_flag": 0, "views": 500
    });
    let shuffled = json!({
        "views": 500, "holiday_flag": 0, "day_of_week": 2, "stock_level": 200,
        "competitor_price": 20.5, "units_sold": 50, "product_id": 101
    });

    assert_eq!(
        engine.score_json(&ordered).unwrap(),
        engine.score_json(&shuffled).unwrap()
    );
}

#[test]
fn test_missing_competitor_price_produces_no_result() {
    let engine = PricingEngine::new(constant_model("lightgbm", 25.0), demand_sensitive_model());
    let payload = json!({
        "product_id": 101, "units_sold": 50, "stock_level": 200,
        "day_of_week": 2, "holiday_flag": 0, "views": 500
    });

    match engine.score_json(&payload) {
        Err(PricingError::InvalidInput { field, .. }) => assert_eq!(field, "competitor_price"),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_nan_competitor_price_is_scoring_error() {
    let engine = PricingEngine::new(constant_model("lightgbm", 25.0), demand_sensitive_model());
    let obs = Observation {
        competitor_price: f64::NAN,
        ..reference_observation()
    };

    let err = engine.score(&obs).unwrap_err();
    assert!(matches!(err, PricingError::ScoringError { .. }));
}

#[test]
fn test_results_are_finite_over_valid_domain() {
    let engine = PricingEngine::new(constant_model("lightgbm", 25.0), demand_sensitive_model());

    for units_sold in [0, 1, 50, 10_000] {
        for day_of_week in 0..=6 {
            for holiday_flag in [0, 1] {
                for views in [0, 300, 301, 1_000_000] {
                    let obs = Observation {
                        product_id: 1,
                        units_sold,
                        competitor_price: 99.9,
                        stock_level: 10,
                        day_of_week,
                        holiday_flag,
                        views,
                    };
                    let result = engine.score(&obs).unwrap();
                    assert!(result.price_a.is_finite());
                    assert!(result.price_b.is_finite());
                    assert!(result.estimated_revenue.is_finite());
                    assert!(result.estimated_profit.is_finite());
                }
            }
        }
    }
}

#[test]
fn test_holiday_lowers_model_b_price() {
    let engine = PricingEngine::new(constant_model("lightgbm", 25.0), demand_sensitive_model());
    let holiday = Observation {
        holiday_flag: 1,
        ..reference_observation()
    };

    let result = engine.score(&holiday).unwrap();
    assert_eq!(result.price_b, 18.0 + 6.0 - 3.0);
}

#[test]
fn test_feature_contract_order() {
    assert_eq!(
        FEATURE_NAMES,
        [
            "units_sold",
            "competitor_price",
            "stock_level",
            "day_of_week",
            "holiday_flag",
            "views",
            "moving_avg_demand",
            "price_elasticity",
            "trend_factor",
        ]
    );

    let fv = build_features(&reference_observation());
    assert_eq!(
        fv.as_slice(),
        &[50.0, 20.5, 200.0, 2.0, 0.0, 500.0, 50.0, 0.0, 50.0]
    );
}

#[test]
fn test_result_serializes_with_public_keys() {
    let engine = PricingEngine::new(constant_model("lightgbm", 25.0), demand_sensitive_model());
    let result = engine.score(&reference_observation()).unwrap();

    let value = serde_json::to_value(result).unwrap();
    for key in [
        "lightgbm_price",
        "xgboost_price",
        "estimate_revenue",
        "estimated_profit",
    ] {
        assert!(value.get(key).is_some(), "missing key {}", key);
    }
}
