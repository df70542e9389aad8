//! Temperature classification, alerting and long-range history.

use chrono::{DateTime, Duration, Local};
use std::collections::BTreeMap;

use super::alerts::AlertManager;
use super::history::{HistoryBuffer, TEMPERATURE_HISTORY_CAPACITY};
use super::metrics::{TemperatureInfo, TemperatureRecord};

pub const DEFAULT_SAMPLE_SECS: u64 = 60;

const CPU_MARKERS: [&str; 4] = ["cpu", "core", "package", "tctl"];
const GPU_MARKERS: [&str; 2] = ["gpu", "graphics"];

/// Sort raw sensor readings into CPU, GPU and other components.
///
/// The hottest CPU-like and GPU-like sensors win; everything else is kept
/// under its own label.
pub fn classify_readings(readings: &[(String, f64)]) -> TemperatureInfo {
    let mut info = TemperatureInfo {
        units: "C".to_string(),
        ..Default::default()
    };

    for (label, celsius) in readings {
        let lower = label.to_lowercase();
        if CPU_MARKERS.iter().any(|m| lower.contains(m)) {
            info.cpu_celsius = Some(info.cpu_celsius.map_or(*celsius, |c| c.max(*celsius)));
        } else if GPU_MARKERS.iter().any(|m| lower.contains(m)) {
            info.gpu_celsius = Some(info.gpu_celsius.map_or(*celsius, |c| c.max(*celsius)));
        } else {
            info.components.insert(label.clone(), *celsius);
        }
    }

    info
}

/// Raise CPU/GPU temperature alerts for the current reading
pub fn evaluate_temperature(alerts: &mut AlertManager, info: &TemperatureInfo) {
    if let Some(cpu) = info.cpu_celsius.filter(|c| *c > 0.0) {
        alerts.check_temperature("CPU", cpu, &info.units);
    }
    if let Some(gpu) = info.gpu_celsius.filter(|g| *g > 0.0) {
        alerts.check_temperature("GPU", gpu, &info.units);
    }
}

/// Rate-limited temperature history (one record per `min_interval`)
pub struct TemperatureHistory {
    records: HistoryBuffer<TemperatureRecord>,
    min_interval: Duration,
    last_recorded: Option<DateTime<Local>>,
}

impl Default for TemperatureHistory {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SECS)
    }
}

impl TemperatureHistory {
    pub fn new(sample_secs: u64) -> Self {
        Self {
            records: HistoryBuffer::with_capacity(TEMPERATURE_HISTORY_CAPACITY),
            min_interval: Duration::seconds(sample_secs as i64),
            last_recorded: None,
        }
    }

    /// Store `info` unless the previous record is younger than the interval.
    /// Returns whether a record was added.
    pub fn record(&mut self, info: &TemperatureInfo, now: DateTime<Local>) -> bool {
        if info.is_empty() {
            return false;
        }
        if let Some(last) = self.last_recorded {
            if now - last < self.min_interval {
                return false;
            }
        }

        self.records.push(TemperatureRecord {
            timestamp: now,
            cpu_celsius: info.cpu_celsius,
            gpu_celsius: info.gpu_celsius,
            components: info.components.clone(),
        });
        self.last_recorded = Some(now);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> Vec<TemperatureRecord> {
        self.records.snapshot()
    }

    /// CPU series for graphing; missing readings count as 0
    pub fn cpu_series(&self) -> Vec<f64> {
        self.records
            .iter()
            .map(|r| r.cpu_celsius.unwrap_or(0.0))
            .collect()
    }

    pub fn component_series(&self) -> BTreeMap<String, Vec<f64>> {
        let mut series: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for record in self.records.iter() {
            for (name, value) in &record.components {
                series.entry(name.clone()).or_default().push(*value);
            }
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_monitor::alerts::AlertLevel;

    fn readings(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(l, v)| (l.to_string(), *v)).collect()
    }

    #[test]
    fn test_classify_picks_hottest() {
        let info = classify_readings(&readings(&[
            ("Core 0", 50.0),
            ("Core 1", 62.5),
            ("amdgpu edge", 48.0),
            ("acpitz", 30.0),
        ]));

        assert_eq!(info.cpu_celsius, Some(62.5));
        assert_eq!(info.gpu_celsius, Some(48.0));
        assert_eq!(info.components.get("acpitz"), Some(&30.0));
        assert_eq!(info.units, "C");
    }

    #[test]
    fn test_temperature_alert_levels() {
        let mut alerts = AlertManager::default();
        let info = classify_readings(&readings(&[("Package id 0", 86.0), ("GPU", 81.0)]));
        evaluate_temperature(&mut alerts, &info);

        assert_eq!(alerts.alerts_by_level(AlertLevel::Critical).len(), 1);
        assert_eq!(alerts.alerts_by_level(AlertLevel::Warning).len(), 1);
    }

    #[test]
    fn test_history_is_rate_limited() {
        let mut history = TemperatureHistory::new(60);
        let info = classify_readings(&readings(&[("cpu", 40.0)]));
        let start = Local::now();

        assert!(history.record(&info, start));
        assert!(!history.record(&info, start + Duration::seconds(30)));
        assert!(history.record(&info, start + Duration::seconds(60)));
        assert_eq!(history.cpu_series(), vec![40.0, 40.0]);
    }

    #[test]
    fn test_empty_reading_not_recorded() {
        let mut history = TemperatureHistory::default();
        assert!(!history.record(&TemperatureInfo::default(), Local::now()));
        assert!(history.is_empty());
    }
}
