//! Pricing CLI - score observations with the two price models
//!
//! # Usage
//! ```sh
//! LIGHTGBM_MODEL_PATH=models/lgb.json XGBOOST_MODEL_PATH=models/xgb.json \
//!     cargo run --bin pricing -- score --units-sold 50 --competitor-price 20.5 \
//!     --stock-level 200 --day-of-week 2 --holiday-flag 0 --views 500
//! ```
//!
//! # Environment Variables
//! - `LIGHTGBM_MODEL_PATH` / `XGBOOST_MODEL_PATH` - model files
//! - `LIGHTGBM_MODEL_KIND` / `XGBOOST_MODEL_KIND` - `gbdt` (default), `smartcore`, `onnx`
//! - `UNIT_COST` - unit cost for profit estimation (default: 20)
//! - `METRICS_ENABLED` - collect Prometheus metrics (default: true)
//! - `RUST_LOG` - log filter (default: info)

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pricing_engine::application::PricingEngine;
use pricing_engine::config::Config;
use pricing_engine::domain::observation::Observation;
use pricing_engine::infrastructure::csv_io;
use pricing_engine::infrastructure::observability::Metrics;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dynamic pricing engine", long_about = None)]
struct Cli {
    /// LightGBM-family model file (overrides LIGHTGBM_MODEL_PATH)
    #[arg(long, global = true)]
    lightgbm_model: Option<PathBuf>,

    /// XGBoost-family model file (overrides XGBOOST_MODEL_PATH)
    #[arg(long, global = true)]
    xgboost_model: Option<PathBuf>,

    /// Unit cost used for profit estimation (overrides UNIT_COST)
    #[arg(long, global = true)]
    unit_cost: Option<f64>,

    /// Print Prometheus metrics after the command completes
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a single observation
    Score(ScoreArgs),
    /// Score every row of a CSV file and estimate batch revenue/profit
    Batch {
        /// Input CSV with observation columns
        #[arg(long)]
        input: PathBuf,
        /// Optional CSV output with per-row prices
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Report MAE / RMSE / R2 of both models against labelled prices
    Evaluate {
        /// Input CSV with observation columns plus `price` (or `historical_price`)
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Raw JSON payload; replaces the individual field flags
    #[arg(long, conflicts_with_all = ["units_sold", "competitor_price", "stock_level", "day_of_week", "holiday_flag", "views"])]
    json: Option<String>,

    #[arg(long, default_value_t = 0)]
    product_id: i64,

    #[arg(long, required_unless_present = "json", allow_negative_numbers = true)]
    units_sold: Option<i64>,

    #[arg(long, required_unless_present = "json")]
    competitor_price: Option<f64>,

    #[arg(long, required_unless_present = "json")]
    stock_level: Option<i64>,

    #[arg(long, required_unless_present = "json")]
    day_of_week: Option<i64>,

    #[arg(long, required_unless_present = "json")]
    holiday_flag: Option<i64>,

    #[arg(long, required_unless_present = "json")]
    views: Option<i64>,
}

impl ScoreArgs {
    fn payload(&self) -> Result<serde_json::Value> {
        if let Some(raw) = &self.json {
            return serde_json::from_str(raw).context("--json is not valid JSON");
        }
        // Missing flags become nulls and are rejected by Observation::from_json
        Ok(serde_json::json!({
            "product_id": self.product_id,
            "units_sold": self.units_sold,
            "competitor_price": self.competitor_price,
            "stock_level": self.stock_level,
            "day_of_week": self.day_of_week,
            "holiday_flag": self.holiday_flag,
            "views": self.views,
        }))
    }
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = &cli.lightgbm_model {
        config.models.lightgbm_path = Some(path.clone());
    }
    if let Some(path) = &cli.xgboost_model {
        config.models.xgboost_path = Some(path.clone());
    }
    if let Some(cost) = cli.unit_cost {
        config.unit_cost = cost;
    }
    config.validate()?;

    info!("Pricing engine {} starting...", env!("CARGO_PKG_VERSION"));

    // Model loading happens once; failure here is fatal
    let mut engine = PricingEngine::load(&config).context("Failed to load price models")?;
    if config.observability.metrics_enabled {
        engine = engine.with_metrics(Metrics::new()?);
    }

    match &cli.command {
        Command::Score(args) => {
            let payload = args.payload()?;
            let result = engine.score_json(&payload).inspect_err(|e| {
                error!("Scoring failed: {}", e);
            })?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Batch { input, output } => {
            let file = File::open(input).with_context(|| format!("Cannot open {:?}", input))?;
            let observations: Vec<Observation> = csv_io::read_observations(BufReader::new(file))?;
            info!("Read {} observations from {:?}", observations.len(), input);

            let batch = engine.score_batch(&observations)?;

            if let Some(path) = output {
                let file =
                    File::create(path).with_context(|| format!("Cannot create {:?}", path))?;
                csv_io::write_batch_predictions(BufWriter::new(file), &batch)?;
                info!("Wrote {} predictions to {:?}", batch.prices.len(), path);
            }

            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "rows": batch.prices.len(),
                    "estimate_revenue": batch.estimated_revenue,
                    "estimated_profit": batch.estimated_profit,
                }))?
            );
        }
        Command::Evaluate { input } => {
            let file = File::open(input).with_context(|| format!("Cannot open {:?}", input))?;
            let labeled = csv_io::read_labeled_observations(BufReader::new(file))?;

            let evaluation = engine.evaluate(&labeled)?;

            println!("Model      MAE          RMSE         R2");
            for (name, m) in [("LightGBM", evaluation.lightgbm), ("XGBoost", evaluation.xgboost)] {
                println!("{:<10} {:<12.4} {:<12.4} {:.4}", name, m.mae, m.rmse, m.r2);
            }
        }
    }

    if cli.metrics {
        match engine.metrics() {
            Some(metrics) => print!("{}", metrics.encode()?),
            None => info!("Metrics disabled (METRICS_ENABLED=false)"),
        }
    }

    Ok(())
}
