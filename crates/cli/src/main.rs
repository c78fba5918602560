//! # Delivery Stats CLI
//!
//! Command-line entry point.
//!
//! Wires the streaming decoder to the dispatch pipeline, waits for the drain,
//! and writes the aggregated report to stdout as JSON.

mod cli;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::Cli;
use observability::ObservabilityConfig;
use pipeline::{Pipeline, PipelineConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_observability(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Delivery Stats CLI starting"
    );

    let result = run(&cli).await;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Run failed");
    }

    result
}

async fn run(cli: &Cli) -> Result<()> {
    let config = PipelineConfig {
        input_file: cli.input_file.clone(),
        search_terms: cli.search_terms(),
        target_postcode: cli.deliveries_by_postcode.clone(),
        from_token: cli.deliveries_by_postcode_from_time.clone(),
        to_token: cli.deliveries_by_postcode_to_time.clone(),
        buffer_size: cli.buffer_size,
    };

    let (report, stats) = Pipeline::new(config).run().await?;

    info!(
        records_decoded = stats.records_decoded,
        records_dispatched = stats.records_dispatched,
        decode_errors = stats.decode_errors,
        task_faults = stats.task_faults,
        duration_secs = stats.duration.as_secs_f64(),
        rps = format!("{:.2}", stats.rps()),
        "Pipeline completed"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Initialize logging and optional metrics export from CLI options
fn init_observability(cli: &Cli) -> Result<()> {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: if cli.metrics_port == 0 {
            None
        } else {
            Some(cli.metrics_port)
        },
        default_log_level: default_log_level.to_string(),
    })
}
