//! Shared per-path cache of parsed log entries.

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::parser::{parse_log, LogEntry};
use crate::error::Result;

/// Only the last ~50KB of a log is parsed
pub const TAIL_BYTES: u64 = 50_000;

/// Size and modification time used to detect changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl FileStamp {
    pub fn of(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self {
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    pub fn modified_local(&self) -> DateTime<Local> {
        self.modified.map(DateTime::<Local>::from).unwrap_or_else(Local::now)
    }
}

#[derive(Debug, Clone)]
pub struct LogWatchState {
    pub stamp: FileStamp,
    pub entries: Arc<Vec<LogEntry>>,
    pub watching: bool,
}

/// Read the last [`TAIL_BYTES`] of `path` as text.
///
/// When the read starts mid-file the first (partial) line is dropped.
pub fn read_tail(path: &Path) -> Result<(String, FileStamp)> {
    let mut file = File::open(path)?;
    let metadata = file.metadata()?;
    let stamp = FileStamp {
        size: metadata.len(),
        modified: metadata.modified().ok(),
    };

    let truncated = stamp.size > TAIL_BYTES;
    if truncated {
        file.seek(SeekFrom::End(-(TAIL_BYTES as i64)))?;
    }

    let mut bytes = Vec::with_capacity(stamp.size.min(TAIL_BYTES) as usize);
    file.read_to_end(&mut bytes)?;
    let mut text = String::from_utf8_lossy(&bytes).into_owned();

    if truncated {
        if let Some(newline) = text.find('\n') {
            text.drain(..=newline);
        }
    }

    Ok((text, stamp))
}

/// Read and parse `path` without touching any cache
pub fn load_entries(path: &Path) -> Result<(FileStamp, Vec<LogEntry>)> {
    let (text, stamp) = read_tail(path)?;
    let entries = parse_log(&text, path, stamp.modified_local());
    Ok((stamp, entries))
}

/// Reader/writer guarded map of path to parsed entries.
///
/// File I/O always happens outside the lock; only the swap is guarded.
#[derive(Debug, Default)]
pub struct LogCache {
    states: RwLock<HashMap<PathBuf, LogWatchState>>,
}

impl LogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, path: &Path) -> Option<Arc<Vec<LogEntry>>> {
        self.states.read().get(path).map(|s| Arc::clone(&s.entries))
    }

    pub fn stamp(&self, path: &Path) -> Option<FileStamp> {
        self.states.read().get(path).map(|s| s.stamp)
    }

    /// Replace the cached entries for `path`, keeping its watch flag
    pub fn store(&self, path: &Path, stamp: FileStamp, entries: Vec<LogEntry>) {
        let mut states = self.states.write();
        let state = states.entry(path.to_path_buf()).or_insert_with(|| LogWatchState {
            stamp,
            entries: Arc::new(Vec::new()),
            watching: false,
        });
        state.stamp = stamp;
        state.entries = Arc::new(entries);
    }

    pub fn set_watching(&self, path: &Path, watching: bool) {
        if let Some(state) = self.states.write().get_mut(path) {
            state.watching = watching;
        }
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.states
            .read()
            .get(path)
            .map(|s| s.watching)
            .unwrap_or(false)
    }

    pub fn remove(&self, path: &Path) -> bool {
        self.states.write().remove(path).is_some()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.states.read().contains_key(path)
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.states.read().keys().cloned().collect();
        paths.sort();
        paths
    }
}
