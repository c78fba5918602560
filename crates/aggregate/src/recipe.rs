//! Per-recipe frequency counts and substring name search.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use contracts::{DeliveryRecord, RecipeCount};

/// Frequency table keyed by recipe name, plus the list of names matching the
/// caller's search substrings.
///
/// Writes take the lock exclusively; queries are expected once the dispatch
/// pipeline has fully drained, but remain safe at any point.
pub struct RecipeAggregator {
    search_terms: Vec<String>,
    state: RwLock<RecipeState>,
}

#[derive(Default)]
struct RecipeState {
    counts: HashMap<String, u32>,
    /// First-seen order; sorted only at read time
    matched: Vec<String>,
}

impl RecipeAggregator {
    /// Create an aggregator searching for the given case-sensitive
    /// substrings. An empty list matches nothing.
    pub fn new(search_terms: Vec<String>) -> Self {
        Self {
            search_terms,
            state: RwLock::new(RecipeState::default()),
        }
    }

    /// Count one record's recipe.
    ///
    /// The substring check runs only the first time a name is seen; later
    /// occurrences bump the count without re-triggering the match.
    pub fn record(&self, item: &DeliveryRecord) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let RecipeState { counts, matched } = &mut *state;

        match counts.get_mut(&item.recipe) {
            Some(count) => *count += 1,
            None => {
                counts.insert(item.recipe.clone(), 1);
                if contains_one_of(&item.recipe, &self.search_terms) {
                    matched.push(item.recipe.clone());
                }
            }
        }
    }

    /// Number of distinct recipe names seen.
    pub fn unique_count(&self) -> u32 {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.counts.len() as u32
    }

    /// `(recipe, count)` pairs sorted by name, deterministic regardless of
    /// arrival order.
    pub fn counts_by_recipe(&self) -> Vec<RecipeCount> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);

        let mut result: Vec<RecipeCount> = state
            .counts
            .iter()
            .map(|(recipe, count)| RecipeCount {
                recipe: recipe.clone(),
                count: *count,
            })
            .collect();
        result.sort_by(|a, b| a.recipe.cmp(&b.recipe));

        result
    }

    /// Matched recipe names, sorted lexicographically.
    pub fn matched_names(&self) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);

        let mut names = state.matched.clone();
        names.sort();

        names
    }
}

fn contains_one_of(name: &str, substrings: &[String]) -> bool {
    substrings.iter().any(|s| name.contains(s.as_str()))
}
