//! # Aggregate
//!
//! Per-record aggregation state driven concurrently by the dispatch pipeline:
//!
//! - `clock`: 12-hour token parsing onto the 0-23 scale
//! - `time_matcher`: target-postcode time-window containment matching
//! - `recipe`: per-recipe frequency counts plus substring name search
//! - `postcode`: per-postcode frequency counts and busiest-postcode query
//!
//! All aggregators are created once at pipeline start, mutated through shared
//! references during stream consumption, and read once after the pipeline
//! drains.

mod clock;
mod error;
mod postcode;
mod recipe;
mod time_matcher;

pub use clock::parse_hour12;
pub use error::FormatError;
pub use postcode::PostcodeAggregator;
pub use recipe::RecipeAggregator;
pub use time_matcher::{SearchCriteria, TimeWindowMatcher};
