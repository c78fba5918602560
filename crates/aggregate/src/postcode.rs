//! Per-postcode frequency counts.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use contracts::{BusiestPostcode, DeliveryRecord};

/// Frequency table keyed by postcode.
#[derive(Default)]
pub struct PostcodeAggregator {
    counts: RwLock<HashMap<String, u32>>,
}

impl PostcodeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one record's postcode.
    pub fn record(&self, item: &DeliveryRecord) {
        let mut counts = self.counts.write().unwrap_or_else(PoisonError::into_inner);
        *counts.entry(item.postcode.clone()).or_insert(0) += 1;
    }

    /// The postcode with the maximum delivery count.
    ///
    /// Ties are broken arbitrarily. Empty name and zero count when nothing
    /// was aggregated.
    pub fn busiest(&self) -> BusiestPostcode {
        let counts = self.counts.read().unwrap_or_else(PoisonError::into_inner);

        let mut busiest = BusiestPostcode::default();
        for (postcode, count) in counts.iter() {
            if *count > busiest.delivery_count {
                busiest = BusiestPostcode {
                    postcode: postcode.clone(),
                    delivery_count: *count,
                };
            }
        }

        busiest
    }
}
