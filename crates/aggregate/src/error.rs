//! Aggregation error types

use thiserror::Error;

/// Format errors raised while parsing clock tokens and delivery windows.
///
/// Fatal when raised while constructing search criteria, non-fatal (the
/// record is skipped) when raised for an individual record.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Token does not match the `^(1[0-2]|0?[1-9])(AM|PM)$` layout
    #[error("wrong 12-hour clock format: '{token}'")]
    BadClockToken { token: String },

    /// Delivery string does not match `<day> <start> - <end>`
    #[error("wrong delivery window format: '{window}'")]
    BadDeliveryWindow { window: String },
}
