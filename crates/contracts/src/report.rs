//! Final report shape handed to serialization.
//!
//! Field names are the wire contract consumed by downstream tooling; do not
//! rename without versioning the output.

use serde::Serialize;

/// Aggregated result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    /// Number of distinct recipe names seen
    pub unique_recipe_count: u32,

    /// Per-recipe delivery counts, sorted by recipe name
    pub count_per_recipe: Vec<RecipeCount>,

    /// Postcode with the most deliveries
    pub busiest_postcode: BusiestPostcode,

    /// Deliveries to the target postcode within the configured time window
    pub count_per_postcode_and_time: TimeWindowCount,

    /// Recipe names matching the search substrings, sorted lexicographically
    pub match_by_name: Vec<String>,
}

/// One recipe and how many deliveries carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeCount {
    pub recipe: String,
    pub count: u32,
}

/// The postcode with the maximum delivery count.
///
/// Empty postcode and zero count when no records were aggregated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BusiestPostcode {
    pub postcode: String,
    pub delivery_count: u32,
}

/// Time-window match descriptor: the criteria as given plus the match count.
#[derive(Debug, Clone, Serialize)]
pub struct TimeWindowCount {
    pub postcode: String,
    pub from: String,
    pub to: String,
    pub delivery_count: u32,
}
