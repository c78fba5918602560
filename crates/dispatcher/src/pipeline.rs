//! Dispatch pipeline - per-record fan-out and two-phase join.

use std::sync::Arc;

use async_channel::Receiver;
use metrics::counter;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, instrument};

use aggregate::{PostcodeAggregator, RecipeAggregator, TimeWindowMatcher};
use contracts::DeliveryRecord;

use crate::stats::DispatchStats;

/// Shared handles to the three independent aggregators.
#[derive(Clone)]
pub struct Aggregators {
    pub recipes: Arc<RecipeAggregator>,
    pub postcodes: Arc<PostcodeAggregator>,
    pub time_window: Arc<TimeWindowMatcher>,
}

/// Consumes the handoff channel and drives all aggregators concurrently for
/// every record.
pub struct DispatchPipeline {
    aggregators: Aggregators,
    input_rx: Receiver<DeliveryRecord>,
}

impl DispatchPipeline {
    pub fn new(aggregators: Aggregators, input_rx: Receiver<DeliveryRecord>) -> Self {
        Self {
            aggregators,
            input_rx,
        }
    }

    /// Run the dispatch loop until the channel closes, then join every
    /// in-flight aggregator task.
    ///
    /// Returning from here is the happens-after edge the final aggregator
    /// reads rely on: first the decoder has closed the channel, then every
    /// dispatched unit of work has completed.
    #[instrument(name = "dispatch_run", skip(self))]
    pub async fn run(self) -> DispatchStats {
        info!("Dispatch pipeline started");

        let mut stats = DispatchStats::default();
        let mut tasks: JoinSet<()> = JoinSet::new();

        while let Ok(record) = self.input_rx.recv().await {
            stats.records_dispatched += 1;
            counter!("delivery_stats_records_dispatched_total").increment(1);

            self.fan_out(&mut tasks, record);

            // Reap already-finished tasks without blocking intake.
            while let Some(result) = tasks.try_join_next() {
                stats.note_join(result);
            }

            if stats.records_dispatched.is_multiple_of(100) {
                debug!(records = stats.records_dispatched, "Dispatch progress");
            }
        }

        // Input closed: second phase of the join.
        while let Some(result) = tasks.join_next().await {
            stats.note_join(result);
        }

        info!(
            records = stats.records_dispatched,
            faults = stats.task_faults,
            "Dispatch pipeline drained"
        );

        stats
    }

    /// Spawn the dispatch loop as a background task
    pub fn spawn(self) -> JoinHandle<DispatchStats> {
        tokio::spawn(self.run())
    }

    fn fan_out(&self, tasks: &mut JoinSet<()>, record: DeliveryRecord) {
        let record = Arc::new(record);

        let recipes = self.aggregators.recipes.clone();
        let item = record.clone();
        tasks.spawn(async move {
            recipes.record(&item);
        });

        let postcodes = self.aggregators.postcodes.clone();
        let item = record.clone();
        tasks.spawn(async move {
            postcodes.record(&item);
        });

        let time_window = self.aggregators.time_window.clone();
        tasks.spawn(async move {
            time_window.try_record(&record);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregators() -> Aggregators {
        Aggregators {
            recipes: Arc::new(RecipeAggregator::new(vec!["Chicken".to_string()])),
            postcodes: Arc::new(PostcodeAggregator::new()),
            time_window: Arc::new(TimeWindowMatcher::new("10120", "11AM", "3PM").unwrap()),
        }
    }

    fn record(postcode: &str, recipe: &str, delivery: &str) -> DeliveryRecord {
        DeliveryRecord {
            postcode: postcode.to_string(),
            recipe: recipe.to_string(),
            delivery: delivery.to_string(),
        }
    }

    #[tokio::test]
    async fn test_every_aggregator_sees_every_record() {
        let (tx, rx) = async_channel::bounded(1);
        let aggregators = aggregators();
        let pipeline = DispatchPipeline::new(aggregators.clone(), rx);
        let handle = pipeline.spawn();

        let records = vec![
            record("10120", "Creamy Dill Chicken", "Monday 12PM - 2PM"),
            record("10120", "Speedy Steak Fajitas", "Monday 11AM - 3PM"),
            record("10224", "Creamy Dill Chicken", "Monday 12PM - 2PM"),
        ];
        for item in records {
            tx.send(item).await.unwrap();
        }
        drop(tx);

        let stats = handle.await.unwrap();
        assert_eq!(stats.records_dispatched, 3);
        assert_eq!(stats.task_faults, 0);

        assert_eq!(aggregators.recipes.unique_count(), 2);
        assert_eq!(aggregators.postcodes.busiest().postcode, "10120");
        assert_eq!(aggregators.postcodes.busiest().delivery_count, 2);
        // both 10120 deliveries fit inside [11AM, 3PM]
        assert_eq!(aggregators.time_window.matched_count(), 2);
        assert_eq!(
            aggregators.recipes.matched_names(),
            vec!["Creamy Dill Chicken"]
        );
    }

    #[tokio::test]
    async fn test_run_returns_only_after_all_updates_applied() {
        let (tx, rx) = async_channel::bounded(1);
        let aggregators = aggregators();
        let pipeline = DispatchPipeline::new(aggregators.clone(), rx);
        let handle = pipeline.spawn();

        let total = 500u32;
        for i in 0..total {
            tx.send(record(
                &format!("1{:04}", i % 7),
                "Tex-Mex Tilapia",
                "Monday 12PM - 2PM",
            ))
            .await
            .unwrap();
        }
        drop(tx);

        let stats = handle.await.unwrap();
        assert_eq!(stats.records_dispatched, u64::from(total));

        // Sum of per-recipe counts equals the number of records processed.
        let sum: u32 = aggregators
            .recipes
            .counts_by_recipe()
            .iter()
            .map(|c| c.count)
            .sum();
        assert_eq!(sum, total);
    }

    #[tokio::test]
    async fn test_empty_input_is_a_clean_drain() {
        let (tx, rx) = async_channel::bounded::<DeliveryRecord>(1);
        let pipeline = DispatchPipeline::new(aggregators(), rx);
        drop(tx);

        let stats = pipeline.run().await;
        assert_eq!(stats.records_dispatched, 0);
        assert_eq!(stats.task_faults, 0);
    }
}
