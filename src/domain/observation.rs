//! Raw pricing-context records submitted for prediction.
//!
//! Values are carried through exactly as received. Range checks (non-negative
//! counts, day of week in 0..=6) belong to whoever accepts the request, so a
//! negative `units_sold` reaches the business-metric formula untouched.

use crate::domain::errors::PricingError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One observation of a product's selling context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Identifier only, never used for scoring
    pub product_id: i64,
    pub units_sold: i64,
    pub competitor_price: f64,
    pub stock_level: i64,
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: i64,
    /// 1 on holidays, 0 otherwise
    pub holiday_flag: i64,
    pub views: i64,
}

impl Observation {
    /// Build an observation from a loosely typed JSON payload.
    ///
    /// Every field must be present and numeric. Integer fields accept JSON
    /// floats only when they carry no fractional part; strings, booleans and
    /// nulls are rejected rather than coerced.
    pub fn from_json(payload: &Value) -> Result<Self, PricingError> {
        let object = payload
            .as_object()
            .ok_or_else(|| PricingError::invalid_input("payload", "must be a JSON object"))?;

        let field = |name: &str| require(object, name);

        Ok(Self {
            product_id: integer_field("product_id", field("product_id")?)?,
            units_sold: integer_field("units_sold", field("units_sold")?)?,
            competitor_price: real_field("competitor_price", field("competitor_price")?)?,
            stock_level: integer_field("stock_level", field("stock_level")?)?,
            day_of_week: integer_field("day_of_week", field("day_of_week")?)?,
            holiday_flag: integer_field("holiday_flag", field("holiday_flag")?)?,
            views: integer_field("views", field("views")?)?,
        })
    }
}

fn require<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value, PricingError> {
    match object.get(name) {
        None | Some(Value::Null) => Err(PricingError::invalid_input(name, "is missing")),
        Some(value) => Ok(value),
    }
}

fn real_field(name: &str, value: &Value) -> Result<f64, PricingError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| PricingError::invalid_input(name, "is not representable as f64")),
        other => Err(PricingError::invalid_input(
            name,
            format!("must be numeric, got {}", json_type(other)),
        )),
    }
}

fn integer_field(name: &str, value: &Value) -> Result<i64, PricingError> {
    let Value::Number(n) = value else {
        return Err(PricingError::invalid_input(
            name,
            format!("must be an integer, got {}", json_type(value)),
        ));
    };

    if let Some(i) = n.as_i64() {
        return Ok(i);
    }

    // Lossless only: 50.0 is fine, 50.5 is not. i64::MAX as f64 is 2^63,
    // which is already out of range.
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f as i64)
        }
        _ => Err(PricingError::invalid_input(
            name,
            format!("must be an integer, got {}", n),
        )),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
