//! Background pollers that keep the log cache fresh.
//!
//! Each watched path gets one tokio task on a small runtime owned by the
//! [`LogWatcher`]. A task stats its file every tick and reparses the tail
//! only when the size or modification time moved.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::cache::{load_entries, FileStamp, LogCache};
use super::parser::{LogEntry, LogLevel};
use crate::error::{MonitorError, Result};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

struct WatchTask {
    shutdown_tx: broadcast::Sender<()>,
    _handle: JoinHandle<()>,
}

pub struct LogWatcher {
    cache: Arc<LogCache>,
    tasks: Mutex<HashMap<PathBuf, WatchTask>>,
    poll_interval: Duration,
    runtime: tokio::runtime::Runtime,
}

impl LogWatcher {
    pub fn new() -> Result<Self> {
        Self::with_interval(DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(poll_interval: Duration) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .thread_name("log-watcher")
            .build()
            .map_err(|e| MonitorError::watcher(format!("failed to start runtime: {}", e)))?;

        Ok(Self {
            cache: Arc::new(LogCache::new()),
            tasks: Mutex::new(HashMap::new()),
            poll_interval,
            runtime,
        })
    }

    pub fn cache(&self) -> &Arc<LogCache> {
        &self.cache
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Up to `limit` newest entries for `path`.
    ///
    /// The first call for a path reads the file synchronously and starts its
    /// poller. Unreadable files yield an empty list.
    pub fn entries(&self, path: &Path, limit: usize, include_debug: bool) -> Vec<LogEntry> {
        // An empty cached list is still a hit; the poller owns refreshes.
        if let Some(cached) = self.cache.entries(path) {
            return filter_entries(&cached, limit, include_debug);
        }

        match load_entries(path) {
            Ok((stamp, entries)) => {
                let filtered = filter_entries(&entries, limit, include_debug);
                self.cache.store(path, stamp, entries);
                self.start_watching(path);
                filtered
            }
            Err(e) => {
                log::debug!("cannot read log {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Start polling `path`. Returns false when a poller already runs.
    pub fn start_watching(&self, path: &Path) -> bool {
        let mut tasks = self.tasks.lock();
        if tasks.contains_key(path) {
            return false;
        }

        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        let handle = self.runtime.spawn(poll_log_file(
            path.to_path_buf(),
            Arc::clone(&self.cache),
            self.poll_interval,
            shutdown_rx,
        ));

        tasks.insert(
            path.to_path_buf(),
            WatchTask {
                shutdown_tx,
                _handle: handle,
            },
        );
        self.cache.set_watching(path, true);
        log::info!("watching log {}", path.display());
        true
    }

    pub fn stop_watching(&self, path: &Path) -> bool {
        match self.tasks.lock().remove(path) {
            Some(task) => {
                let _ = task.shutdown_tx.send(());
                self.cache.set_watching(path, false);
                true
            }
            None => false,
        }
    }

    /// Stop polling `path` and drop its cached entries
    pub fn forget(&self, path: &Path) {
        self.stop_watching(path);
        if self.cache.remove(path) {
            log::info!("stopped watching log {}", path.display());
        }
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.tasks.lock().contains_key(path)
    }

    pub fn watched_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.tasks.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock();
        for (path, task) in tasks.drain() {
            let _ = task.shutdown_tx.send(());
            self.cache.set_watching(&path, false);
        }
    }
}

impl Drop for LogWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Poll loop for one path; ends on the shutdown signal
pub async fn poll_log_file(
    path: PathBuf,
    cache: Arc<LogCache>,
    poll_interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    // The caller has just loaded the file, so the first check waits a full period.
    let mut ticker = interval_at(Instant::now() + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if refresh_if_changed(&path, &cache) {
                    log::debug!("log {} changed, cache refreshed", path.display());
                }
            }
            _ = shutdown.recv() => {
                log::debug!("log poller for {} shutting down", path.display());
                break;
            }
        }
    }
}

/// Reparse `path` if its stamp differs from the cached one.
///
/// Any I/O failure leaves the cache as it was.
pub fn refresh_if_changed(path: &Path, cache: &LogCache) -> bool {
    let stamp = match FileStamp::of(path) {
        Ok(stamp) => stamp,
        Err(e) => {
            log::debug!("stat {} failed: {}", path.display(), e);
            return false;
        }
    };

    if cache.stamp(path) == Some(stamp) {
        return false;
    }

    match load_entries(path) {
        Ok((stamp, entries)) => {
            cache.store(path, stamp, entries);
            true
        }
        Err(e) => {
            log::warn!("reparse of {} failed: {}", path.display(), e);
            false
        }
    }
}

/// First `limit` entries, skipping debug ones unless requested
pub fn filter_entries(entries: &[LogEntry], limit: usize, include_debug: bool) -> Vec<LogEntry> {
    entries
        .iter()
        .filter(|e| include_debug || e.level != LogLevel::Debug)
        .take(limit)
        .cloned()
        .collect()
}
