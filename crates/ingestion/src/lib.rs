//! # Ingestion
//!
//! Incremental decoding of the input record stream.
//!
//! The decoder walks a JSON array of record objects one element at a time and
//! pushes each record onto a bounded handoff channel; the whole input is
//! never materialized. A full channel blocks the decoder, which is the
//! backpressure against a slower consumer.

mod decoder;
mod error;
mod metrics;

pub use decoder::{StreamDecoder, DEFAULT_QUEUE_CAPACITY};
pub use error::DecodeError;
pub use metrics::{DecoderMetrics, MetricsSnapshot};
