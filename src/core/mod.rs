// Core engine: sampling, derived metrics, alerts and log tailing

pub mod config;
pub mod log_watcher;
pub mod system_monitor;

// Re-export commonly used items
pub use config::Config;
pub use log_watcher::LogWatcher;
pub use system_monitor::{AlertManager, MetricSource, ThresholdConfig, TrafficMonitor};
