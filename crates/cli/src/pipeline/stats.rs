//! Pipeline run statistics.

use std::time::Duration;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Records decoded from the input stream
    pub records_decoded: u64,

    /// Decode errors (at most one per run; decoding stops on the first)
    pub decode_errors: u64,

    /// Records fanned out to the aggregators
    pub records_dispatched: u64,

    /// Aggregator tasks that faulted
    pub task_faults: u64,

    /// Total duration of the run
    pub duration: Duration,
}

impl PipelineStats {
    /// Records per second throughput
    pub fn rps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.records_dispatched as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rps_handles_zero_duration() {
        let stats = PipelineStats::default();
        assert_eq!(stats.rps(), 0.0);
    }

    #[test]
    fn test_rps() {
        let stats = PipelineStats {
            records_dispatched: 100,
            duration: Duration::from_secs(4),
            ..Default::default()
        };
        assert!((stats.rps() - 25.0).abs() < f64::EPSILON);
    }
}
