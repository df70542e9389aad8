//! Log tailing with a shared, poll-refreshed cache.

pub mod cache;
pub mod parser;
pub mod watcher;

pub use cache::{read_tail, FileStamp, LogCache, LogWatchState, TAIL_BYTES};
pub use parser::{detect_level, parse_log, LogEntry, LogFormat, LogLevel};
pub use watcher::{filter_entries, LogWatcher, DEFAULT_POLL_INTERVAL};
