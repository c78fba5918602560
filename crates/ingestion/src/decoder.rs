//! Streaming JSON array decoder.

use std::cell::Cell;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use async_channel::{bounded, Receiver, Sender};
use metrics::counter;
use serde::de::{DeserializeSeed, SeqAccess, Visitor};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use contracts::DeliveryRecord;

use crate::error::DecodeError;
use crate::metrics::DecoderMetrics;

/// Default handoff channel capacity.
///
/// Capacity 1 bounds memory to a single in-flight record and gives
/// near-strict FIFO ordering into dispatch.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1;

/// Stream Decoder
///
/// Owns the channel capacity and shared metrics; each `spawn` runs one decode
/// pass over one reader on the blocking thread pool.
pub struct StreamDecoder {
    capacity: usize,
    metrics: Arc<DecoderMetrics>,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl StreamDecoder {
    /// Create a decoder with the given handoff channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            metrics: Arc::new(DecoderMetrics::new()),
        }
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<DecoderMetrics> {
        self.metrics.clone()
    }

    /// Start decoding `reader` on the blocking pool.
    ///
    /// Returns the record receiver and the decode task handle. The channel is
    /// closed when decoding finishes, including after a mid-stream error, so
    /// the consumer never blocks forever.
    #[instrument(name = "decoder_spawn", skip(self, reader), fields(capacity = self.capacity))]
    pub fn spawn<R>(&self, reader: R) -> (Receiver<DeliveryRecord>, JoinHandle<Result<u64, DecodeError>>)
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = bounded(self.capacity);
        let metrics = self.metrics.clone();

        let handle = tokio::task::spawn_blocking(move || decode_stream(reader, tx, &metrics));

        (rx, handle)
    }
}

/// Decode one JSON array of records from `reader`, sending each record as it
/// is parsed.
///
/// The sender is owned here and dropped on every exit path, which closes the
/// channel. Returns the number of records handed off.
fn decode_stream<R: Read>(
    reader: R,
    tx: Sender<DeliveryRecord>,
    metrics: &DecoderMetrics,
) -> Result<u64, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let consumer_gone = Cell::new(false);

    let sink = RecordSink {
        tx: &tx,
        metrics,
        consumer_gone: &consumer_gone,
    };

    let decoded = sink.deserialize(&mut deserializer).map_err(|e| {
        // A vanished consumer aborts decoding but is not a decode error.
        if consumer_gone.get() {
            return DecodeError::ChannelClosed;
        }
        metrics.record_decode_error();
        counter!("delivery_stats_decode_errors_total").increment(1);
        DecodeError::Malformed(e)
    })?;

    deserializer.end().map_err(|e| {
        metrics.record_decode_error();
        counter!("delivery_stats_decode_errors_total").increment(1);
        DecodeError::Malformed(e)
    })?;

    debug!(records = decoded, "input stream exhausted");
    Ok(decoded)
}

/// Seq visitor that forwards each element to the handoff channel instead of
/// collecting it, so only one record is live at a time.
struct RecordSink<'a> {
    tx: &'a Sender<DeliveryRecord>,
    metrics: &'a DecoderMetrics,
    consumer_gone: &'a Cell<bool>,
}

impl<'de> DeserializeSeed<'de> for RecordSink<'_> {
    type Value = u64;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for RecordSink<'_> {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of delivery records")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut decoded = 0u64;

        while let Some(record) = seq.next_element::<DeliveryRecord>()? {
            if self.tx.send_blocking(record).is_err() {
                self.consumer_gone.set(true);
                return Err(serde::de::Error::custom("handoff channel closed"));
            }

            decoded += 1;
            self.metrics.record_decoded();
            counter!("delivery_stats_records_decoded_total").increment(1);
        }

        Ok(decoded)
    }
}
