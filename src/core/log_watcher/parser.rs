//! Line parsers for syslog-style and ISO-timestamped log files.

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static SYSLOG_TIMESTAMP: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(\w{3}\s+\d+\s+\d{2}:\d{2}:\d{2})").ok());
static ISO_TIMESTAMP: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2})").ok());

/// Keyword patterns, checked in this order
static LEVEL_PATTERNS: Lazy<Vec<(Regex, LogLevel)>> = Lazy::new(|| {
    [
        (r"(?i)(error|fail|exception)", LogLevel::Error),
        (r"(?i)(warning|warn)", LogLevel::Warning),
        (r"(?i)(info|notice)", LogLevel::Info),
        (r"(?i)debug", LogLevel::Debug),
    ]
    .into_iter()
    .filter_map(|(pattern, level)| Regex::new(pattern).ok().map(|re| (re, level)))
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub content: String,
    pub level: LogLevel,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `Mon dd hh:mm:ss host ...`
    Syslog,
    /// ISO-8601 timestamp anywhere in the line
    Generic,
}

impl LogFormat {
    pub fn for_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if ["syslog", "auth.log", "kern.log", "messages"]
            .iter()
            .any(|marker| name.contains(marker))
        {
            LogFormat::Syslog
        } else {
            LogFormat::Generic
        }
    }

    pub fn parse_timestamp(&self, line: &str) -> Option<DateTime<Local>> {
        match self {
            LogFormat::Syslog => parse_syslog_timestamp(line, Local::now().year()),
            LogFormat::Generic => parse_iso_timestamp(line),
        }
    }
}

pub fn detect_level(content: &str) -> LogLevel {
    LEVEL_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(content))
        .map(|(_, level)| *level)
        .unwrap_or(LogLevel::Info)
}

/// Syslog lines carry no year; `year` is assumed
pub fn parse_syslog_timestamp(line: &str, year: i32) -> Option<DateTime<Local>> {
    let re = SYSLOG_TIMESTAMP.as_ref()?;
    let raw = re.captures(line)?.get(1)?.as_str();
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let naive =
        NaiveDateTime::parse_from_str(&format!("{} {}", year, normalized), "%Y %b %d %H:%M:%S")
            .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

pub fn parse_iso_timestamp(line: &str) -> Option<DateTime<Local>> {
    let re = ISO_TIMESTAMP.as_ref()?;
    let raw = re.captures(line)?.get(1)?.as_str();
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Parse `text` into entries, newest first.
///
/// Blank lines are skipped. Lines without a recognisable timestamp get
/// `fallback` (normally the file's modification time).
pub fn parse_log(text: &str, source: &Path, fallback: DateTime<Local>) -> Vec<LogEntry> {
    let format = LogFormat::for_path(source);
    let source = source.to_string_lossy().to_string();

    let mut entries: Vec<LogEntry> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| LogEntry {
            timestamp: format.parse_timestamp(line).unwrap_or(fallback),
            content: line.to_string(),
            level: detect_level(line),
            source: source.clone(),
        })
        .collect();

    entries.reverse();
    entries
}
