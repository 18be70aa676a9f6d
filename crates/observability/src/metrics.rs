//! Pipeline metrics collection
//!
//! Prometheus counters/histograms for the load pipeline plus an in-memory
//! aggregator for the end-of-run summary.

use metrics::counter;

/// Record ingested records per source
pub fn record_records_ingested(source_id: &str, count: usize) {
    counter!(
        "memloader_records_ingested_total",
        "source" => source_id.to_string()
    )
    .increment(count as u64);
}

/// Record segments produced by one split pass
pub fn record_segments_produced(count: usize) {
    counter!("memloader_segments_produced_total").increment(count as u64);
}

/// Record a segment submission outcome
pub fn record_segment_submitted(success: bool) {
    let status = if success { "saved" } else { "declined" };
    counter!(
        "memloader_segments_submitted_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record memory creation
pub fn record_memory_created() {
    counter!("memloader_memories_created_total").increment(1);
}

/// Session metrics aggregator
///
/// Aggregates in memory, for statistics and summary output.
#[derive(Debug, Clone, Default)]
pub struct SessionMetricsAggregator {
    /// Total source records ingested
    pub total_records: u64,

    /// Total segments after splitting
    pub total_segments: u64,

    /// Records that needed splitting (more than one segment)
    pub records_expanded: u64,

    /// Segments acknowledged by the store
    pub saved: u64,

    /// Segments the store declined
    pub nacked: u64,

    /// Failed submissions
    pub failed: u64,

    /// Token count statistics per segment
    pub segment_token_stats: RunningStats,

    /// Segments-per-record statistics
    pub segments_per_record_stats: RunningStats,
}

impl SessionMetricsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Update with one record's split outcome
    pub fn record_split(&mut self, segment_count: usize, segment_tokens: &[usize]) {
        self.total_records += 1;
        self.total_segments += segment_count as u64;
        if segment_count > 1 {
            self.records_expanded += 1;
        }
        self.segments_per_record_stats.push(segment_count as f64);
        for tokens in segment_tokens {
            self.segment_token_stats.push(*tokens as f64);
        }
    }

    /// Update with one submission outcome
    pub fn record_submission(&mut self, saved: bool) {
        if saved {
            self.saved += 1;
        } else {
            self.nacked += 1;
        }
    }

    /// Update with one failed submission
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Produce a summary report
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_records: self.total_records,
            total_segments: self.total_segments,
            records_expanded: self.records_expanded,
            saved: self.saved,
            nacked: self.nacked,
            failed: self.failed,
            save_rate: if self.total_segments > 0 {
                self.saved as f64 / self.total_segments as f64 * 100.0
            } else {
                0.0
            },
            segment_tokens: StatsSummary::from(&self.segment_token_stats),
            segments_per_record: StatsSummary::from(&self.segments_per_record_stats),
        }
    }

    /// Reset statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_records: u64,
    pub total_segments: u64,
    pub records_expanded: u64,
    pub saved: u64,
    pub nacked: u64,
    pub failed: u64,
    pub save_rate: f64,
    pub segment_tokens: StatsSummary,
    pub segments_per_record: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Session Summary ===")?;
        writeln!(f, "Records ingested: {}", self.total_records)?;
        writeln!(
            f,
            "Segments produced: {} ({} records split)",
            self.total_segments, self.records_expanded
        )?;
        writeln!(f, "Saved: {} ({:.2}%)", self.saved, self.save_rate)?;
        writeln!(f, "Declined: {}", self.nacked)?;
        writeln!(f, "Failed: {}", self.failed)?;
        writeln!(f, "Segment tokens: {}", self.segment_tokens)?;
        writeln!(f, "Segments per record: {}", self.segments_per_record)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = SessionMetricsAggregator::new();

        aggregator.record_split(3, &[1200, 900, 400]);
        aggregator.record_split(1, &[150]);
        aggregator.record_submission(true);
        aggregator.record_submission(true);
        aggregator.record_submission(false);
        aggregator.record_failure();

        assert_eq!(aggregator.total_records, 2);
        assert_eq!(aggregator.total_segments, 4);
        assert_eq!(aggregator.records_expanded, 1);
        assert_eq!(aggregator.saved, 2);
        assert_eq!(aggregator.nacked, 1);
        assert_eq!(aggregator.failed, 1);
        assert_eq!(aggregator.segment_token_stats.count(), 4);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = SessionMetricsAggregator::new();
        aggregator.record_split(2, &[100, 50]);
        aggregator.record_submission(true);
        aggregator.record_submission(true);

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Records ingested: 1"));
        assert!(output.contains("Saved: 2 (100.00%)"));
        assert!(output.contains("Segments per record"));
    }
}
