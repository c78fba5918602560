//! Report metrics collection.
//!
//! Counters along the hot path (`delivery_stats_records_decoded_total`,
//! `delivery_stats_records_dispatched_total`,
//! `delivery_stats_decode_errors_total`,
//! `delivery_stats_task_faults_total`) are emitted by the ingestion and
//! dispatcher crates directly; this module records the end-of-run aggregate
//! state.

use contracts::DeliveryReport;
use metrics::gauge;

/// Record final-report gauges.
///
/// Called once per run, after the dispatch pipeline has drained.
pub fn record_report_metrics(report: &DeliveryReport) {
    gauge!("delivery_stats_unique_recipes").set(f64::from(report.unique_recipe_count));

    gauge!("delivery_stats_busiest_postcode_deliveries")
        .set(f64::from(report.busiest_postcode.delivery_count));

    gauge!("delivery_stats_time_window_matches")
        .set(f64::from(report.count_per_postcode_and_time.delivery_count));

    gauge!("delivery_stats_matched_recipe_names").set(report.match_by_name.len() as f64);
}
