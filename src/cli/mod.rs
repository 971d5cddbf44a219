//! Command-line interface
//!
//! `serve` runs the HTTP API; `predict` runs the same pipeline on a single
//! JSON record from disk.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use crate::artifacts::{ArtifactPaths, InferenceContext};
use crate::error::ChargesError;
use crate::server::{run_server, ServerConfig};

fn dim(s: &str) -> ColoredString { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }

#[derive(Parser, Debug)]
#[command(name = "insurance-charges")]
#[command(version, about = "Insurance charges prediction API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Bind address (env: API_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port (env: API_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Model artifact (env: MODEL_PATH)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Scaler artifact (env: SCALER_PATH)
        #[arg(short, long)]
        scaler: Option<PathBuf>,
    },

    /// Predict charges for one JSON record
    Predict {
        /// JSON file with age, sex, bmi, children, smoker and region
        #[arg(short, long)]
        input: PathBuf,

        /// Model artifact (env: MODEL_PATH)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Scaler artifact (env: SCALER_PATH)
        #[arg(short, long)]
        scaler: Option<PathBuf>,
    },
}

/// Layer CLI overrides on top of the environment-derived defaults
pub fn resolve_config(
    host: Option<String>,
    port: Option<u16>,
    model: Option<PathBuf>,
    scaler: Option<PathBuf>,
) -> ServerConfig {
    let defaults = ServerConfig::default();
    ServerConfig {
        host: host.unwrap_or(defaults.host),
        port: port.unwrap_or(defaults.port),
        model_path: model.unwrap_or(defaults.model_path),
        scaler_path: scaler.unwrap_or(defaults.scaler_path),
    }
}

pub async fn cmd_serve(config: ServerConfig) -> anyhow::Result<()> {
    println!();
    println!(
        "  {} {}",
        "Insurance Charges Prediction API".white().bold(),
        dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
    );
    println!("  {} {}", dim("model  "), config.model_path.display());
    println!("  {} {}", dim("scaler "), config.scaler_path.display());
    println!(
        "  {} {}",
        dim("predict"),
        accent(&format!("POST http://{}:{}/predict", config.host, config.port))
    );
    println!();

    run_server(config).await
}

/// Run one JSON record through the pipeline and render the response line
fn predict_record(input: &std::path::Path, paths: &ArtifactPaths) -> anyhow::Result<String> {
    let context = InferenceContext::load(paths)?;

    let text = std::fs::read_to_string(input)?;
    let record: serde_json::Value = serde_json::from_str(&text)?;

    match context.predict_json(&record) {
        Ok(result) => Ok(serde_json::to_string(&result)?),
        Err(ChargesError::Validation(e)) => Err(anyhow::anyhow!("invalid input: {}", e)),
        Err(e) => Err(e.into()),
    }
}

pub fn cmd_predict(input: &std::path::Path, paths: &ArtifactPaths) -> anyhow::Result<()> {
    println!("{}", predict_record(input, paths)?);
    Ok(())
}
