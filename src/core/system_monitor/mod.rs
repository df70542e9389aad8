//! System monitoring core functionality.
//!
//! Snapshot sources, rate derivation, bounded histories and the alert
//! evaluator. Everything here is synchronous and free of terminal I/O.

pub mod alerts;
pub mod battery;
pub mod collector;
pub mod docker;
pub mod history;
pub mod metrics;
pub mod temperature;
pub mod traffic;

pub use alerts::{Alert, AlertLevel, AlertManager, AlertSummary, ThresholdConfig, MAX_ALERTS};
pub use battery::{collect_battery, format_time_remaining, health_label};
pub use collector::{detect_runtime, MetricSource, SysinfoSource};
pub use docker::{ContainerLogs, ContainerSource, DockerCli};
pub use history::{
    HistoryBuffer, HistoryStore, RESOURCE_HISTORY_CAPACITY, TEMPERATURE_HISTORY_CAPACITY,
    TRAFFIC_HISTORY_CAPACITY,
};
pub use metrics::{
    BatteryInfo, ContainerInfo, CpuInfo, DiskInfo, MemoryInfo, NetworkInterface, NetworkUsage, ProcessInfo,
    RuntimeInfo, SystemInfo, TemperatureInfo, TemperatureRecord,
};
pub use temperature::{classify_readings, evaluate_temperature, TemperatureHistory};
pub use traffic::{rate_mbps, CounterSnapshot, RateSample, TrafficMonitor};
