//! Pipeline orchestrator - coordinates decoder and dispatch.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use aggregate::{PostcodeAggregator, RecipeAggregator, TimeWindowMatcher};
use contracts::{DeliveryReport, TimeWindowCount};
use dispatcher::{Aggregators, DispatchPipeline};
use ingestion::StreamDecoder;

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Path to the JSON input file
    pub input_file: PathBuf,

    /// Case-sensitive recipe-name search substrings
    pub search_terms: Vec<String>,

    /// Target postcode for time-window matching
    pub target_postcode: String,

    /// Time window start, 12-hour token
    pub from_token: String,

    /// Time window end, 12-hour token
    pub to_token: String,

    /// Handoff channel capacity
    pub buffer_size: usize,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion and assemble the report.
    ///
    /// Construction-time errors (bad time-window tokens, unreadable input
    /// file) abort before any record is processed. A mid-stream decode error
    /// is reported and the run still produces a report covering the records
    /// decoded before it.
    pub async fn run(self) -> Result<(DeliveryReport, PipelineStats)> {
        let start_time = Instant::now();

        let matcher = TimeWindowMatcher::new(
            &self.config.target_postcode,
            &self.config.from_token,
            &self.config.to_token,
        )
        .context("invalid time-window search criteria")?;

        let aggregators = Aggregators {
            recipes: Arc::new(RecipeAggregator::new(self.config.search_terms.clone())),
            postcodes: Arc::new(PostcodeAggregator::new()),
            time_window: Arc::new(matcher),
        };

        let input = File::open(&self.config.input_file).with_context(|| {
            format!("error opening file {}", self.config.input_file.display())
        })?;

        info!(
            input = %self.config.input_file.display(),
            postcode = %self.config.target_postcode,
            from = %self.config.from_token,
            to = %self.config.to_token,
            buffer_size = self.config.buffer_size,
            "Pipeline starting"
        );

        let decoder = StreamDecoder::new(self.config.buffer_size);
        let (record_rx, decode_handle) = decoder.spawn(BufReader::new(input));

        let dispatch_handle = DispatchPipeline::new(aggregators.clone(), record_rx).spawn();

        // Two-phase join: the decoder closes the channel, then the dispatch
        // loop drains its in-flight tasks. Aggregator state is read only
        // after both have completed.
        match decode_handle.await {
            Ok(Ok(records)) => info!(records, "Decode complete"),
            Ok(Err(e)) => warn!(
                error = %e,
                "Decode stopped early; report covers the records decoded so far"
            ),
            Err(e) => error!(error = %e, "Decode task fault"),
        }

        let dispatch_stats = dispatch_handle
            .await
            .context("dispatch pipeline task failed")?;

        let report = DeliveryReport {
            unique_recipe_count: aggregators.recipes.unique_count(),
            count_per_recipe: aggregators.recipes.counts_by_recipe(),
            busiest_postcode: aggregators.postcodes.busiest(),
            count_per_postcode_and_time: TimeWindowCount {
                postcode: self.config.target_postcode.clone(),
                from: self.config.from_token.clone(),
                to: self.config.to_token.clone(),
                delivery_count: aggregators.time_window.matched_count(),
            },
            match_by_name: aggregators.recipes.matched_names(),
        };

        observability::record_report_metrics(&report);

        let decoder_metrics = decoder.metrics().snapshot();
        let stats = PipelineStats {
            records_decoded: decoder_metrics.records_decoded,
            decode_errors: decoder_metrics.decode_errors,
            records_dispatched: dispatch_stats.records_dispatched,
            task_faults: dispatch_stats.task_faults,
            duration: start_time.elapsed(),
        };

        Ok((report, stats))
    }
}
