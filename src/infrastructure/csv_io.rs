//! CSV readers and writers for batch scoring and evaluation.
//!
//! Column names match the sales dataset the models were trained on. Extra
//! columns (e.g. `date`) are ignored.

use crate::domain::observation::Observation;
use crate::domain::prediction::{BatchPrediction, LabeledObservation};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Flat CSV row of a labelled observation. `csv` cannot deserialize
/// flattened structs with typed fields, so the columns are spelled out.
#[derive(Debug, Deserialize)]
struct LabeledRecord {
    product_id: i64,
    units_sold: i64,
    competitor_price: f64,
    stock_level: i64,
    day_of_week: i64,
    holiday_flag: i64,
    views: i64,
    #[serde(alias = "historical_price")]
    price: f64,
}

impl From<LabeledRecord> for LabeledObservation {
    fn from(r: LabeledRecord) -> Self {
        LabeledObservation {
            observation: Observation {
                product_id: r.product_id,
                units_sold: r.units_sold,
                competitor_price: r.competitor_price,
                stock_level: r.stock_level,
                day_of_week: r.day_of_week,
                holiday_flag: r.holiday_flag,
                views: r.views,
            },
            price: r.price,
        }
    }
}

#[derive(Debug, Serialize)]
struct PredictionRecord {
    product_id: i64,
    lightgbm_price: f64,
    xgboost_price: f64,
}

pub fn read_observations<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for (line, record) in rdr.deserialize::<Observation>().enumerate() {
        // +2: header line and 1-based numbering
        rows.push(record.with_context(|| format!("Invalid observation on line {}", line + 2))?);
    }
    Ok(rows)
}

pub fn read_labeled_observations<R: Read>(reader: R) -> Result<Vec<LabeledObservation>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for (line, record) in rdr.deserialize::<LabeledRecord>().enumerate() {
        let record =
            record.with_context(|| format!("Invalid labelled row on line {}", line + 2))?;
        rows.push(record.into());
    }
    Ok(rows)
}

/// Write one row per scored observation.
pub fn write_batch_predictions<W: Write>(writer: W, batch: &BatchPrediction) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for pair in &batch.prices {
        wtr.serialize(PredictionRecord {
            product_id: pair.product_id,
            lightgbm_price: pair.price_a,
            xgboost_price: pair.price_b,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
