//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Delivery Stats - streaming delivery-record aggregation
#[derive(Parser, Debug)]
#[command(
    name = "delivery-stats",
    author,
    version,
    about = "Streaming delivery-record aggregation pipeline",
    long_about = "Streams a JSON array of delivery records and computes per-recipe\n\
                  counts, the busiest postcode, recipe-name substring matches, and\n\
                  the number of deliveries to one postcode within a clock window.\n\n\
                  The report is written to stdout as JSON; logs go to stderr."
)]
pub struct Cli {
    /// Path to the input file, a JSON array of delivery records
    #[arg(short, long, env = "DELIVERY_STATS_INPUT_FILE")]
    pub input_file: PathBuf,

    /// Recipe names to search, joined by the delimiter
    #[arg(long, default_value = "", env = "DELIVERY_STATS_RECIPE_NAMES")]
    pub recipe_names: String,

    /// Delimiter for the recipe name list
    #[arg(long, default_value = ",", env = "DELIVERY_STATS_RECIPE_NAMES_DELIMITER")]
    pub recipe_names_delimiter: String,

    /// Count deliveries with this postcode against the time window
    #[arg(long, default_value = "10120", env = "DELIVERY_STATS_POSTCODE")]
    pub deliveries_by_postcode: String,

    /// Time window start as a 12-hour token, e.g. 11AM
    #[arg(long, default_value = "11AM", env = "DELIVERY_STATS_FROM_TIME")]
    pub deliveries_by_postcode_from_time: String,

    /// Time window end as a 12-hour token, e.g. 3PM
    #[arg(long, default_value = "3PM", env = "DELIVERY_STATS_TO_TIME")]
    pub deliveries_by_postcode_to_time: String,

    /// Handoff channel capacity between decoder and dispatch
    #[arg(long, default_value = "1", env = "DELIVERY_STATS_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "DELIVERY_STATS_METRICS_PORT")]
    pub metrics_port: u16,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, env = "DELIVERY_STATS_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors and the report itself
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        env = "DELIVERY_STATS_LOG_FORMAT"
    )]
    pub log_format: LogFormat,
}

impl Cli {
    /// Split the recipe-name flag into search terms, dropping empty
    /// segments so an absent flag matches nothing.
    pub fn search_terms(&self) -> Vec<String> {
        self.recipe_names
            .split(self.recipe_names_delimiter.as_str())
            .filter(|term| !term.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
