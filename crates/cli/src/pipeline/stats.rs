//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::SessionMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total records collected from all sources
    pub records_ingested: u64,

    /// Total segments after token-bounded splitting
    pub segments_produced: u64,

    /// Segments acknowledged by the memory store
    pub segments_saved: u64,

    /// Segments the store answered with a negative acknowledgement
    pub segments_declined: u64,

    /// Fully settled dispatch batches
    pub batches_settled: u64,

    /// The memory everything was loaded into
    pub memory_id: String,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Session metrics aggregator
    pub session_metrics: SessionMetricsAggregator,
}

impl PipelineStats {
    /// Calculate segments per second throughput
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.segments_produced as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate save rate as percentage
    pub fn save_rate(&self) -> f64 {
        if self.segments_produced > 0 {
            (self.segments_saved as f64 / self.segments_produced as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Pipeline Statistics                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Memory: {}", self.memory_id);
        println!("   ├─ Records ingested: {}", self.records_ingested);
        println!("   ├─ Segments produced: {}", self.segments_produced);
        println!(
            "   ├─ Saved: {} ({:.2}%)",
            self.segments_saved,
            self.save_rate()
        );
        println!("   ├─ Declined: {}", self.segments_declined);
        println!("   ├─ Batches: {}", self.batches_settled);
        println!("   └─ Throughput: {:.2} segments/s", self.throughput());

        let summary = self.session_metrics.summary();

        println!("\n📈 Segmentation Metrics");
        println!("   ├─ Records split: {}", summary.records_expanded);
        println!("   ├─ Segment tokens: {}", summary.segment_tokens);
        println!("   └─ Segments per record: {}", summary.segments_per_record);

        println!();
    }
}
