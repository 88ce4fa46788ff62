//! In-memory request telemetry: a bounded ring buffer of samples fed by
//! middleware. Capacity is fixed, oldest samples are evicted first, and a
//! lost sample under contention is acceptable.

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::warn;

pub const METRICS_CAPACITY: usize = 1000;
pub const SLOW_REQUEST_MILLIS: u64 = 1000;
pub const RECENT_SAMPLE_COUNT: usize = 50;

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct RequestSample {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration_ms: u64,
}

#[derive(Debug, Default)]
pub struct RequestMetrics {
    samples: Mutex<VecDeque<RequestSample>>,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct MetricsSummary {
    pub total_requests: usize,
    pub slow_requests: usize,
    pub average_duration_ms: u64,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct MetricsSnapshot {
    #[serde(flatten)]
    pub summary: MetricsSummary,
    pub recent_requests: Vec<RequestSample>,
}

impl RequestMetrics {
    pub fn record(&self, sample: RequestSample) {
        // Telemetry tolerates dropped samples; skip on a poisoned lock.
        let Ok(mut samples) = self.samples.lock() else {
            return;
        };

        if samples.len() == METRICS_CAPACITY {
            samples.pop_front();
        }
        samples.push_back(sample);
    }

    #[must_use]
    pub fn summary(&self) -> MetricsSummary {
        let samples = self.samples.lock().unwrap_or_else(PoisonError::into_inner);
        Self::summarize(&samples)
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let samples = self.samples.lock().unwrap_or_else(PoisonError::into_inner);

        let recent_requests = samples
            .iter()
            .rev()
            .take(RECENT_SAMPLE_COUNT)
            .cloned()
            .collect();

        MetricsSnapshot {
            summary: Self::summarize(&samples),
            recent_requests,
        }
    }

    fn summarize(samples: &VecDeque<RequestSample>) -> MetricsSummary {
        let total_requests = samples.len();
        let slow_requests = samples
            .iter()
            .filter(|sample| sample.duration_ms > SLOW_REQUEST_MILLIS)
            .count();
        let average_duration_ms = match u64::try_from(total_requests) {
            Ok(count) if count > 0 => {
                samples.iter().map(|sample| sample.duration_ms).sum::<u64>() / count
            }
            _ => 0,
        };

        MetricsSummary {
            total_requests,
            slow_requests,
            average_duration_ms,
        }
    }
}

pub async fn track_requests(
    State(metrics): State<Arc<RequestMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let status = response.status().as_u16();

    if duration_ms > SLOW_REQUEST_MILLIS {
        warn!(%method, %path, status, duration_ms, "Slow request");
    }

    metrics.record(RequestSample {
        method,
        path,
        status,
        duration_ms,
    });

    response
}

#[cfg(test)]
mod tests {
    use crate::server::metrics::{METRICS_CAPACITY, RECENT_SAMPLE_COUNT, RequestMetrics, RequestSample};

    fn sample(path: &str, duration_ms: u64) -> RequestSample {
        RequestSample {
            method: "GET".to_owned(),
            path: path.to_owned(),
            status: 200,
            duration_ms,
        }
    }

    #[test]
    fn empty_metrics_summarize_to_zero() {
        let metrics = RequestMetrics::default();
        let summary = metrics.summary();

        assert_eq!(summary.total_requests, 0);
        assert_eq!(summary.slow_requests, 0);
        assert_eq!(summary.average_duration_ms, 0);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let metrics = RequestMetrics::default();
        for i in 0..METRICS_CAPACITY + 5 {
            metrics.record(sample(&format!("/r/{i}"), 10));
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.summary.total_requests, METRICS_CAPACITY);

        // The newest sample is first in recent_requests; the evicted five
        // are the oldest.
        assert_eq!(
            snapshot.recent_requests[0].path,
            format!("/r/{}", METRICS_CAPACITY + 4)
        );
        assert_eq!(snapshot.recent_requests.len(), RECENT_SAMPLE_COUNT);
    }

    #[test]
    fn slow_requests_are_counted() {
        let metrics = RequestMetrics::default();
        metrics.record(sample("/fast", 20));
        metrics.record(sample("/slow", 1500));
        metrics.record(sample("/slower", 2500));

        let summary = metrics.summary();
        assert_eq!(summary.total_requests, 3);
        assert_eq!(summary.slow_requests, 2);
        assert_eq!(summary.average_duration_ms, (20 + 1500 + 2500) / 3);
    }
}
