use std::fs::OpenOptions;
use std::io::Write;
use std::thread;
use std::time::Duration;

use sysglance::core::log_watcher::{LogLevel, LogWatcher};
use tempfile::TempDir;

fn append(path: &std::path::Path, lines: &[&str]) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
}

#[test]
fn test_newest_first_with_limit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    append(
        &path,
        &[
            "2024-03-01 10:00:00 service started",
            "2024-03-01 10:00:05 WARN cache cold",
            "2024-03-01 10:00:09 connection failed",
        ],
    );

    let watcher = LogWatcher::with_interval(Duration::from_millis(50)).unwrap();
    let entries = watcher.entries(&path, 2, false);
    assert_eq!(entries.len(), 2);
    assert!(entries[0].content.contains("connection failed"));
    assert_eq!(entries[0].level, LogLevel::Error);
    assert_eq!(entries[1].level, LogLevel::Warning);
    assert!(entries[0].timestamp > entries[1].timestamp);
}

#[test]
fn test_debug_lines_only_when_verbose() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    append(&path, &["debug: tick", "ready"]);

    let watcher = LogWatcher::with_interval(Duration::from_millis(50)).unwrap();
    assert_eq!(watcher.entries(&path, 10, false).len(), 1);
    assert_eq!(watcher.entries(&path, 10, true).len(), 2);
}

#[test]
fn test_appended_lines_are_picked_up() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    append(&path, &["first line"]);

    let watcher = LogWatcher::with_interval(Duration::from_millis(50)).unwrap();
    assert_eq!(watcher.entries(&path, 10, false).len(), 1);
    assert!(watcher.is_watching(&path));

    append(&path, &["second line error"]);

    let mut latest = Vec::new();
    for _ in 0..40 {
        thread::sleep(Duration::from_millis(50));
        latest = watcher.entries(&path, 10, false);
        if latest.len() == 2 {
            break;
        }
    }
    assert_eq!(latest.len(), 2);
    assert!(latest[0].content.contains("second line"));
}

#[test]
fn test_watching_twice_is_noop() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    append(&path, &["line"]);

    let watcher = LogWatcher::with_interval(Duration::from_millis(50)).unwrap();
    assert!(watcher.start_watching(&path));
    assert!(!watcher.start_watching(&path));
    assert_eq!(watcher.watched_paths(), vec![path.clone()]);

    assert!(watcher.stop_watching(&path));
    assert!(!watcher.is_watching(&path));
    assert!(!watcher.stop_watching(&path));
}

#[test]
fn test_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let watcher = LogWatcher::with_interval(Duration::from_millis(50)).unwrap();
    let path = dir.path().join("absent.log");

    assert!(watcher.entries(&path, 10, true).is_empty());
    assert!(!watcher.is_watching(&path));
}
