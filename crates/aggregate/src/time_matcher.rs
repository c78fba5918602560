//! Target-postcode time-window matching.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use contracts::DeliveryRecord;

use crate::clock::{parse_hour12, to_hour24};
use crate::error::FormatError;

static DELIVERY_LAYOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+ (1[0-2]|0?[1-9])(AM|PM) - (1[0-2]|0?[1-9])(AM|PM)$")
        .expect("static delivery layout")
});

/// Immutable matching criteria, fixed at construction.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    /// Target postcode; records for any other postcode are ignored
    pub postcode: String,

    /// Window start, 0-23
    pub start_hour: u8,

    /// Window end, 0-23
    pub end_hour: u8,

    /// Window crosses midnight (`start_hour > end_hour`)
    pub wraps: bool,
}

/// Counts deliveries to one postcode whose window lies inside the configured
/// clock range.
///
/// The criteria never change after construction; only the match counter
/// mutates, via atomic increment, so `try_record` can run from any number of
/// concurrent dispatch tasks without a lock.
pub struct TimeWindowMatcher {
    criteria: SearchCriteria,
    matched: AtomicU32,
}

impl TimeWindowMatcher {
    /// Build a matcher from a target postcode and two 12-hour tokens.
    ///
    /// A token that fails to parse is fatal here: the whole run cannot start
    /// without a valid window.
    pub fn new(
        postcode: impl Into<String>,
        from_token: &str,
        to_token: &str,
    ) -> Result<Self, FormatError> {
        let start_hour = parse_hour12(from_token)?;
        let end_hour = parse_hour12(to_token)?;

        Ok(Self {
            criteria: SearchCriteria {
                postcode: postcode.into(),
                start_hour,
                end_hour,
                wraps: start_hour > end_hour,
            },
            matched: AtomicU32::new(0),
        })
    }

    /// The configured criteria.
    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Test one record against the criteria, incrementing the counter on a
    /// match.
    ///
    /// A postcode mismatch is a no-op. A malformed delivery window is logged
    /// and the record is skipped; it contributes nothing to the count.
    pub fn try_record(&self, record: &DeliveryRecord) {
        if record.postcode != self.criteria.postcode {
            return;
        }

        let (start, end) = match parse_delivery_window(&record.delivery) {
            Ok(window) => window,
            Err(e) => {
                warn!(error = %e, postcode = %record.postcode, "skipping record with malformed delivery window");
                return;
            }
        };

        if self.window_matches(start, end) {
            self.matched.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Containment test under the midnight-wrap rules.
    ///
    /// A record matches only if its window is fully inside the criteria
    /// window, not merely overlapping it. A wrapping record never matches a
    /// non-wrapping criteria window; that asymmetry is observable, documented
    /// behavior.
    fn window_matches(&self, start: u8, end: u8) -> bool {
        let c = &self.criteria;

        if !c.wraps {
            if start <= end {
                return start >= c.start_hour && end <= c.end_hour;
            }
            return false;
        }

        if start <= end {
            start >= c.start_hour || end <= c.end_hour
        } else {
            start >= c.start_hour && end <= c.end_hour
        }
    }

    /// Current match count; safe to call concurrently with `try_record`.
    pub fn matched_count(&self) -> u32 {
        self.matched.load(Ordering::Relaxed)
    }
}

/// Parse a record's delivery string into its (start, end) hours.
fn parse_delivery_window(delivery: &str) -> Result<(u8, u8), FormatError> {
    let caps = DELIVERY_LAYOUT
        .captures(delivery)
        .ok_or_else(|| FormatError::BadDeliveryWindow {
            window: delivery.to_string(),
        })?;

    let start = to_hour24(&caps[1], &caps[2])?;
    let end = to_hour24(&caps[3], &caps[4])?;

    Ok((start, end))
}
