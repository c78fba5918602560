//! # Dispatcher
//!
//! Main loop for fanning each decoded record out to the three aggregators.
//!
//! Every record pulled off the handoff channel drives the recipe aggregator,
//! the postcode aggregator, and the time-window matcher as three concurrent
//! tasks. Results may only be read after the channel has drained and every
//! in-flight task has joined; `DispatchPipeline::run` returns exactly then.

mod pipeline;
mod stats;

pub use pipeline::{Aggregators, DispatchPipeline};
pub use stats::DispatchStats;
