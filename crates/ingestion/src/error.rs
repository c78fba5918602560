//! Ingestion error types

use thiserror::Error;

/// Decode errors
///
/// Any of these stops further decoding; records already handed off stay
/// valid, and the channel is closed either way.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Malformed outer container or record
    #[error("malformed input stream: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Consumer went away before the input was exhausted
    #[error("handoff channel closed before input was exhausted")]
    ChannelClosed,
}
