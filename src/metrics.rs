use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Metrics {
    http_requests: Arc<AtomicU64>,
    http_failures: Arc<AtomicU64>,
    entries_fetched: Arc<AtomicU64>,
    entries_without_cover: Arc<AtomicU64>,
    reports_saved: Arc<AtomicU64>,
    reports_failed: Arc<AtomicU64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_http_request(&self) {
        self.http_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_http_failure(&self) {
        self.http_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_entry_fetched(&self) {
        self.entries_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_entry_without_cover(&self) {
        self.entries_without_cover.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_report(&self, saved: bool) {
        let counter = if saved {
            &self.reports_saved
        } else {
            &self.reports_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub fn entries_fetched(&self) -> u64 {
        self.entries_fetched.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub fn http_failures(&self) -> u64 {
        self.http_failures.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub fn reports_saved(&self) -> u64 {
        self.reports_saved.load(Ordering::Relaxed)
    }

    pub fn log_summary(&self) {
        info!(
            http_requests = self.http_requests.load(Ordering::Relaxed),
            http_failures = self.http_failures.load(Ordering::Relaxed),
            entries_fetched = self.entries_fetched.load(Ordering::Relaxed),
            entries_without_cover = self.entries_without_cover.load(Ordering::Relaxed),
            reports_saved = self.reports_saved.load(Ordering::Relaxed),
            reports_failed = self.reports_failed.load(Ordering::Relaxed),
            "Final metrics"
        );
    }
}
