use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub fetches_ok: u64,
    pub fetches_failed: u64,
    pub records_inspected: u64,
    pub rules_passed: u64,
    pub rules_failed: u64,
    pub violations_found: u64,
}

pub trait Metrics: Send + Sync {
    fn inc_fetch_ok(&self);
    fn inc_fetch_failed(&self);
    fn add_records_inspected(&self, n: u64);
    fn record_rule_pass(&self);
    fn record_rule_fail(&self, violations: u64);
    fn snapshot(&self) -> MetricsSnapshot;
}

pub struct InMemoryMetrics {
    fetches_ok: AtomicU64,
    fetches_failed: AtomicU64,
    records_inspected: AtomicU64,
    rules_passed: AtomicU64,
    rules_failed: AtomicU64,
    violations_found: AtomicU64,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self {
            fetches_ok: AtomicU64::new(0),
            fetches_failed: AtomicU64::new(0),
            records_inspected: AtomicU64::new(0),
            rules_passed: AtomicU64::new(0),
            rules_failed: AtomicU64::new(0),
            violations_found: AtomicU64::new(0),
        }
    }
}

impl Default for InMemoryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics for InMemoryMetrics {
    fn inc_fetch_ok(&self) {
        self.fetches_ok.fetch_add(1, Ordering::Relaxed);
    }
    fn inc_fetch_failed(&self) {
        self.fetches_failed.fetch_add(1, Ordering::Relaxed);
    }
    fn add_records_inspected(&self, n: u64) {
        self.records_inspected.fetch_add(n, Ordering::Relaxed);
    }
    fn record_rule_pass(&self) {
        self.rules_passed.fetch_add(1, Ordering::Relaxed);
    }
    fn record_rule_fail(&self, violations: u64) {
        self.rules_failed.fetch_add(1, Ordering::Relaxed);
        self.violations_found.fetch_add(violations, Ordering::Relaxed);
    }
    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fetches_ok: self.fetches_ok.load(Ordering::Relaxed),
            fetches_failed: self.fetches_failed.load(Ordering::Relaxed),
            records_inspected: self.records_inspected.load(Ordering::Relaxed),
            rules_passed: self.rules_passed.load(Ordering::Relaxed),
            rules_failed: self.rules_failed.load(Ordering::Relaxed),
            violations_found: self.violations_found.load(Ordering::Relaxed),
        }
    }
}
