//! Dispatch run statistics.

use metrics::counter;
use tokio::task::JoinError;
use tracing::error;

/// Statistics from one dispatch run
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchStats {
    /// Records pulled off the handoff channel and fanned out
    pub records_dispatched: u64,

    /// Aggregator tasks that failed (panicked or were cancelled)
    pub task_faults: u64,
}

impl DispatchStats {
    /// Account for one joined aggregator task.
    ///
    /// A fault is logged and counted; the task's "done" signal already
    /// happened at the join, so a panicking task can never wedge the drain.
    pub(crate) fn note_join(&mut self, result: Result<(), JoinError>) {
        if let Err(e) = result {
            self.task_faults += 1;
            counter!("delivery_stats_task_faults_total").increment(1);
            error!(error = %e, "aggregator task fault; update dropped");
        }
    }
}
