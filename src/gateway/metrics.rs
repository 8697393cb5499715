//! Gateway counters.
//!
//! Counts what happened to each translate request so operators can see how
//! often the primary provider fails and whether the fallback is pulling its
//! weight.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Request counters for one gateway instance.
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    /// Translate requests received (valid or not)
    requests: AtomicUsize,

    /// Requests rejected before any provider call
    rejected: AtomicUsize,

    /// Requests answered successfully (by either provider)
    successes: AtomicUsize,

    /// Primary provider calls that failed
    primary_failures: AtomicUsize,

    /// Fallback provider calls made
    fallback_attempts: AtomicUsize,

    /// Fallback provider calls that succeeded
    fallback_successes: AtomicUsize,

    /// Requests that ended in a service error
    service_errors: AtomicUsize,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_primary_failure(&self) {
        self.primary_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_attempt(&self) {
        self.fallback_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_success(&self) {
        self.fallback_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_service_error(&self) {
        self.service_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the current counters.
    pub fn report(&self) -> MetricsReport {
        let requests = self.requests.load(Ordering::Relaxed);
        let rejected = self.rejected.load(Ordering::Relaxed);
        let successes = self.successes.load(Ordering::Relaxed);

        let forwarded = requests.saturating_sub(rejected);
        let success_rate = if forwarded > 0 {
            (successes as f64 / forwarded as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            requests,
            rejected,
            successes,
            primary_failures: self.primary_failures.load(Ordering::Relaxed),
            fallback_attempts: self.fallback_attempts.load(Ordering::Relaxed),
            fallback_successes: self.fallback_successes.load(Ordering::Relaxed),
            service_errors: self.service_errors.load(Ordering::Relaxed),
            success_rate,
        }
    }
}

/// Serializable snapshot of [`GatewayMetrics`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub requests: usize,
    pub rejected: usize,
    pub successes: usize,
    pub primary_failures: usize,
    pub fallback_attempts: usize,
    pub fallback_successes: usize,
    pub service_errors: usize,

    /// Successful share of forwarded (non-rejected) requests, 0-100
    pub success_rate: f64,
}
