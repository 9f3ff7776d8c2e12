use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counters for directory walks served since startup
#[derive(Clone)]
pub struct Metrics {
    pub walks_started: Arc<AtomicUsize>,
    pub walks_completed: Arc<AtomicUsize>,
    pub walks_failed: Arc<AtomicUsize>,
    pub empty_roots: Arc<AtomicUsize>,
    pub files_counted: Arc<AtomicU64>,
    pub dirs_counted: Arc<AtomicU64>,
    pub skipped_dirs: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            walks_started: Arc::new(AtomicUsize::new(0)),
            walks_completed: Arc::new(AtomicUsize::new(0)),
            walks_failed: Arc::new(AtomicUsize::new(0)),
            empty_roots: Arc::new(AtomicUsize::new(0)),
            files_counted: Arc::new(AtomicU64::new(0)),
            dirs_counted: Arc::new(AtomicU64::new(0)),
            skipped_dirs: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_walks_started(&self) {
        self.walks_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_walks_completed(&self) {
        self.walks_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_walks_failed(&self) {
        self.walks_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_empty_roots(&self) {
        self.empty_roots.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_files(&self, count: u64) {
        self.files_counted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_dirs(&self, count: u64) {
        self.dirs_counted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_skipped(&self, count: u64) {
        self.skipped_dirs.fetch_add(count, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            walks_started: self.walks_started.load(Ordering::Relaxed),
            walks_completed: self.walks_completed.load(Ordering::Relaxed),
            walks_failed: self.walks_failed.load(Ordering::Relaxed),
            empty_roots: self.empty_roots.load(Ordering::Relaxed),
            files_counted: self.files_counted.load(Ordering::Relaxed),
            dirs_counted: self.dirs_counted.load(Ordering::Relaxed),
            skipped_dirs: self.skipped_dirs.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub walks_started: usize,
    pub walks_completed: usize,
    pub walks_failed: usize,
    pub empty_roots: usize,
    pub files_counted: u64,
    pub dirs_counted: u64,
    pub skipped_dirs: u64,
    pub uptime_seconds: u64,
}
