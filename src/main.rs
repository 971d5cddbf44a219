//! Insurance Charges Prediction API - Main Entry Point

use clap::Parser;
use insurance_charges::cli::{cmd_predict, cmd_serve, resolve_config, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insurance_charges=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { host, port, model, scaler }) => {
            cmd_serve(resolve_config(host, port, model, scaler)).await?;
        }
        Some(Commands::Predict { input, model, scaler }) => {
            let config = resolve_config(None, None, model, scaler);
            cmd_predict(&input, &config.artifact_paths())?;
        }
        None => {
            cmd_serve(resolve_config(None, None, None, None)).await?;
        }
    }

    Ok(())
}
