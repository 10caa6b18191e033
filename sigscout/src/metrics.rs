use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::search::processor::{LARGE_FILE_THRESHOLD, SMALL_FILE_THRESHOLD};

/// Counters shared by every worker of a run.
///
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct ScanMetrics {
    bytes_read: Arc<AtomicU64>,
    mmap_bytes: Arc<AtomicU64>,

    // File processing metrics
    small_files_processed: Arc<AtomicU64>,
    buffered_files_processed: Arc<AtomicU64>,
    mmap_files_processed: Arc<AtomicU64>,
    unreadable_files: Arc<AtomicU64>,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self {
            bytes_read: Arc::new(AtomicU64::new(0)),
            mmap_bytes: Arc::new(AtomicU64::new(0)),
            small_files_processed: Arc::new(AtomicU64::new(0)),
            buffered_files_processed: Arc::new(AtomicU64::new(0)),
            mmap_files_processed: Arc::new(AtomicU64::new(0)),
            unreadable_files: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a loaded file, bucketed by the read strategy its size selects
    pub fn record_file_processing(&self, size: u64) {
        if size < SMALL_FILE_THRESHOLD {
            self.small_files_processed.fetch_add(1, Ordering::Relaxed);
        } else if size >= LARGE_FILE_THRESHOLD {
            self.mmap_files_processed.fetch_add(1, Ordering::Relaxed);
            self.mmap_bytes.fetch_add(size, Ordering::Relaxed);
        } else {
            self.buffered_files_processed
                .fetch_add(1, Ordering::Relaxed);
        }
        let total = self.bytes_read.fetch_add(size, Ordering::Relaxed) + size;
        debug!("Loaded {} bytes, total: {} bytes", size, total);
    }

    /// Records a file that could not be read
    pub fn record_unreadable(&self) {
        self.unreadable_files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            mmap_bytes: self.mmap_bytes.load(Ordering::Relaxed),
            small_files: self.small_files_processed.load(Ordering::Relaxed),
            buffered_files: self.buffered_files_processed.load(Ordering::Relaxed),
            mmap_files: self.mmap_files_processed.load(Ordering::Relaxed),
            unreadable_files: self.unreadable_files.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats:\n\
             Bytes read: {} ({} memory mapped)\n\
             Files loaded (small/buffered/mmap): {}/{}/{}\n\
             Unreadable files: {}",
            stats.bytes_read,
            stats.mmap_bytes,
            stats.small_files,
            stats.buffered_files,
            stats.mmap_files,
            stats.unreadable_files
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`ScanMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub bytes_read: u64,
    pub mmap_bytes: u64,
    pub small_files: u64,
    pub buffered_files: u64,
    pub mmap_files: u64,
    pub unreadable_files: u64,
}

impl ScanStats {
    pub fn files_loaded(&self) -> u64 {
        self.small_files + self.buffered_files + self.mmap_files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_processing_buckets() {
        let metrics = ScanMetrics::new();
        metrics.record_file_processing(10);
        metrics.record_file_processing(SMALL_FILE_THRESHOLD);
        metrics.record_file_processing(LARGE_FILE_THRESHOLD);

        let stats = metrics.get_stats();
        assert_eq!(stats.small_files, 1);
        assert_eq!(stats.buffered_files, 1);
        assert_eq!(stats.mmap_files, 1);
        assert_eq!(stats.files_loaded(), 3);
        assert_eq!(
            stats.bytes_read,
            10 + SMALL_FILE_THRESHOLD + LARGE_FILE_THRESHOLD
        );
        assert_eq!(stats.mmap_bytes, LARGE_FILE_THRESHOLD);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = ScanMetrics::default();
        let worker_copy = metrics.clone();

        worker_copy.record_unreadable();
        worker_copy.record_file_processing(100);

        let stats = metrics.get_stats();
        assert_eq!(stats.unreadable_files, 1);
        assert_eq!(stats.small_files, 1);
    }

    #[test]
    fn test_concurrent_updates() {
        let metrics = ScanMetrics::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let metrics = metrics.clone();
                scope.spawn(move || {
                    for _ in 0..250 {
                        metrics.record_file_processing(1);
                    }
                });
            }
        });

        let stats = metrics.get_stats();
        assert_eq!(stats.small_files, 1000);
        assert_eq!(stats.bytes_read, 1000);
    }
}
