//! Input record shape shared by decoder and aggregators.

use serde::Deserialize;

/// One delivery entry from the input stream.
///
/// Immutable once decoded; ownership moves from the decoder onto the handoff
/// channel and each record is consumed exactly once by the dispatch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliveryRecord {
    /// Destination postcode
    pub postcode: String,

    /// Recipe name
    pub recipe: String,

    /// Day label plus 12-hour time range, e.g. `"Monday 10AM - 3PM"`
    pub delivery: String,
}
