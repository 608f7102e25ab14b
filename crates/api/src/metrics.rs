use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Timing (in microseconds)
    total_extract_time_us: AtomicU64,

    // Counts
    total_entities_extracted: AtomicUsize,
    total_relationships_extracted: AtomicUsize,
    truncated_renders: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            total_extract_time_us: AtomicU64::new(0),
            total_entities_extracted: AtomicUsize::new(0),
            total_relationships_extracted: AtomicUsize::new(0),
            truncated_renders: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_extract(
        &self,
        duration: std::time::Duration,
        entities: usize,
        relationships: usize,
    ) {
        self.total_extract_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.total_entities_extracted
            .fetch_add(entities, Ordering::Relaxed);
        self.total_relationships_extracted
            .fetch_add(relationships, Ordering::Relaxed);
    }

    pub fn record_render(&self, truncated: bool) {
        if truncated {
            self.truncated_renders.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.total_requests.load(Ordering::Relaxed);
        let total_us = self.total_extract_time_us.load(Ordering::Relaxed) as f64;
        MetricsSnapshot {
            total_requests: requests,
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            avg_extract_time_ms: if requests > 0 {
                total_us / requests as f64 / 1000.0
            } else {
                0.0
            },
            total_entities_extracted: self.total_entities_extracted.load(Ordering::Relaxed),
            total_relationships_extracted: self
                .total_relationships_extracted
                .load(Ordering::Relaxed),
            truncated_renders: self.truncated_renders.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub avg_extract_time_ms: f64,
    pub total_entities_extracted: usize,
    pub total_relationships_extracted: usize,
    pub truncated_renders: usize,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn snapshot_reflects_recorded_requests() {
        let metrics = Metrics::new();
        metrics.record_request(true);
        metrics.record_request(false);
        metrics.record_extract(Duration::from_millis(10), 4, 2);
        metrics.record_render(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.successful_requests, 1);
        assert_eq!(snapshot.failed_requests, 1);
        assert_eq!(snapshot.total_entities_extracted, 4);
        assert_eq!(snapshot.total_relationships_extracted, 2);
        assert_eq!(snapshot.truncated_renders, 1);
        assert!(snapshot.avg_extract_time_ms > 0.0);
    }
}
