//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! Covers:
//! - Contract snapshot checks
//! - Mock e2e pipeline runs (no memory service required)
//! - Cross-crate failure propagation

#[cfg(test)]
mod contract_tests {
    use contracts::{ProgressEvent, TextRecord};

    #[test]
    fn test_contracts_compile() {
        // Verify the contracts crate surface
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_progress_phases() {
        let record = TextRecord::new("a", "b");
        let split = ProgressEvent::Split {
            record: record.clone(),
            total: 3,
        };
        let dispatch = ProgressEvent::Dispatch { record, total: 3 };

        assert_eq!(split.phase(), "split");
        assert_eq!(dispatch.phase(), "vectorize");
        assert_eq!(split.total(), 3);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use contracts::{MemoryHandle, ProgressCallback, ProgressEvent, TextRecord};
    use dispatcher::BatchDispatcher;
    use ingestion::{DirectorySource, MockSource, RecordSource};
    use memstore::{MemorySession, MockMemoryStore};
    use segmenter::{split_records, ByteEstimateCounter};

    fn silent_progress() -> ProgressCallback {
        Arc::new(|_| {})
    }

    /// End-to-end test: DirectorySource -> segmenter -> MemorySession -> dispatcher
    ///
    /// Verifies the full data flow:
    /// 1. DirectorySource collects text records from disk
    /// 2. split_records expands the oversized record into segments
    /// 3. BatchDispatcher submits everything to the (mock) store
    /// 4. The store payloads reconstruct the original content losslessly
    #[tokio::test]
    async fn test_e2e_mock_pipeline() {
        // Setup: a small file and one that must split under the budget
        let dir = tempfile::tempdir().unwrap();
        let small = "short note";
        let big = "first paragraph of the manual\n\nsecond paragraph, somewhat longer\n\nthird paragraph wrapping things up";
        std::fs::write(dir.path().join("big.txt"), big).unwrap();
        std::fs::write(dir.path().join("small.txt"), small).unwrap();

        let source = DirectorySource::new("docs", dir.path());
        let records = source.collect().unwrap();
        assert_eq!(records.len(), 2);

        // ByteEstimateCounter: ~4 bytes per token, budget 10 -> splits big.txt
        let counter = ByteEstimateCounter;
        let progress = silent_progress();
        let segments = split_records(records, 10, &counter, &progress).unwrap();
        assert!(segments.len() > 2, "big.txt should have been split");
        assert!(segments.iter().any(|s| s.path == "small.txt"));
        assert!(segments.iter().any(|s| s.path.starts_with("big.txt_")));

        // Establish the session and dispatch
        let store = Arc::new(MockMemoryStore::new("mem-e2e"));
        let mut session = MemorySession::new(Arc::clone(&store));
        let handle = session.ensure_initialized().await.unwrap().clone();

        let dispatcher = BatchDispatcher::new(Arc::clone(&store));
        let results = dispatcher
            .dispatch(segments.clone(), 10, &handle, &progress)
            .await
            .unwrap();

        assert_eq!(results.len(), segments.len());
        assert!(results.iter().all(|r| r.saved == Some(true)));
        assert_eq!(store.update_calls() as usize, segments.len());

        // Losslessness: the big.txt payloads concatenate back to the original
        let mut big_segments: Vec<TextRecord> = store
            .payloads()
            .iter()
            .map(|p| serde_json::from_str(p).unwrap())
            .filter(|r: &TextRecord| r.path.starts_with("big.txt_"))
            .collect();
        big_segments.sort_by_key(|r| {
            r.path
                .rsplit_once('_')
                .and_then(|(_, idx)| idx.parse::<usize>().ok())
                .unwrap()
        });
        let rebuilt: String = big_segments.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(rebuilt, big);
    }

    /// A failing submission stops the run after its batch settles
    #[tokio::test]
    async fn test_e2e_failure_stops_later_batches() {
        let records: Vec<TextRecord> = (0..25)
            .map(|i| TextRecord::new(format!("note_{i}"), "tiny"))
            .collect();
        let source = MockSource::new("fixture", records);
        let collected = source.collect().unwrap();

        // Fails the submission whose payload mentions note_4 (first batch)
        let store = Arc::new(MockMemoryStore::new("mem-ff").fail_payloads_containing("note_4\""));
        let handle = MemoryHandle::new("mem-ff");
        let dispatcher = BatchDispatcher::new(Arc::clone(&store));

        let events = Arc::new(AtomicUsize::new(0));
        let events_clone = Arc::clone(&events);
        let progress: ProgressCallback = Arc::new(move |event| {
            if matches!(event, ProgressEvent::Dispatch { .. }) {
                events_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        let result = dispatcher.dispatch(collected, 100, &handle, &progress).await;
        assert!(result.is_err());

        // Only the first batch of 10 was ever scheduled
        assert_eq!(store.update_calls(), 10);
        // Siblings in the batch still completed and reported progress
        assert_eq!(events.load(Ordering::SeqCst), 9);
        assert_eq!(dispatcher.metrics().batch_count(), 0);
    }

    /// Supplying a memory id skips creation entirely
    #[tokio::test]
    async fn test_e2e_existing_memory_reused() {
        let store = Arc::new(MockMemoryStore::new("would-be-created"));
        let mut session =
            MemorySession::with_handle(Arc::clone(&store), MemoryHandle::new("mem-given"));

        let handle = session.ensure_initialized().await.unwrap().clone();
        assert_eq!(handle.as_str(), "mem-given");
        assert_eq!(store.create_calls(), 0);

        // The given handle flows through dispatch unchanged
        let dispatcher = BatchDispatcher::new(Arc::clone(&store));
        let records = vec![TextRecord::new("a.txt", "text")];
        let progress = silent_progress();
        let results = dispatcher
            .dispatch(records, 100, &handle, &progress)
            .await
            .unwrap();
        assert_eq!(results[0].saved, Some(true));
    }

    /// Both progress phases fire with stable totals across the run
    #[tokio::test]
    async fn test_e2e_progress_phases() {
        let records = vec![
            TextRecord::new("a.txt", "alpha beta gamma delta"),
            TextRecord::new("b.txt", "tiny"),
        ];

        let split_events = Arc::new(AtomicUsize::new(0));
        let dispatch_events = Arc::new(AtomicUsize::new(0));
        let split_clone = Arc::clone(&split_events);
        let dispatch_clone = Arc::clone(&dispatch_events);
        let progress: ProgressCallback = Arc::new(move |event| match event {
            ProgressEvent::Split { total, .. } => {
                assert_eq!(total, 2);
                split_clone.fetch_add(1, Ordering::SeqCst);
            }
            ProgressEvent::Dispatch { .. } => {
                dispatch_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        let counter = ByteEstimateCounter;
        let segments = split_records(records, 3, &counter, &progress).unwrap();
        let segment_total = segments.len();
        assert_eq!(split_events.load(Ordering::SeqCst), 2);

        let store = Arc::new(MockMemoryStore::new("mem-p"));
        let handle = MemoryHandle::new("mem-p");
        let dispatcher = BatchDispatcher::new(Arc::clone(&store));
        dispatcher
            .dispatch(segments, 3, &handle, &progress)
            .await
            .unwrap();

        assert_eq!(dispatch_events.load(Ordering::SeqCst), segment_total);
    }
}

#[cfg(test)]
mod metrics_tests {
    use std::sync::Arc;

    use contracts::{MemoryHandle, ProgressCallback, TextRecord};
    use dispatcher::BatchDispatcher;
    use memstore::MockMemoryStore;
    use observability::SessionMetricsAggregator;

    /// Dispatch outcomes feed the session aggregator consistently
    #[tokio::test]
    async fn test_aggregator_matches_dispatch_outcome() {
        let store = Arc::new(MockMemoryStore::new("mem-agg").decline_all());
        let handle = MemoryHandle::new("mem-agg");
        let dispatcher = BatchDispatcher::new(Arc::clone(&store));
        let progress: ProgressCallback = Arc::new(|_| {});

        let records: Vec<TextRecord> = (0..3)
            .map(|i| TextRecord::new(format!("r_{i}"), "text"))
            .collect();
        let results = dispatcher
            .dispatch(records, 100, &handle, &progress)
            .await
            .unwrap();

        let mut aggregator = SessionMetricsAggregator::new();
        for record in &results {
            aggregator.record_submission(record.saved == Some(true));
        }

        let summary = aggregator.summary();
        assert_eq!(summary.nacked, 3);
        assert_eq!(summary.saved, 0);
        assert_eq!(dispatcher.metrics().nacked_count(), 3);
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};

    #[test]
    fn test_config_defaults_flow_to_session() {
        let content = r#"
[store]
endpoint = "http://localhost:8080"
api_token = "t"

[[sources]]
id = "docs"
path = "./docs"
"#;
        let blueprint = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap();
        assert_eq!(blueprint.session.max_tokens, 2000);
        assert_eq!(blueprint.session.batch_size, 10);
        assert_eq!(blueprint.session.encoding, "cl100k_base");
    }
}
