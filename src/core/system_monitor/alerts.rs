//! Alert system for monitoring critical conditions.
//!
//! Metrics are compared against warning/critical thresholds on every call.
//! Alerts are kept newest first in a bounded store and can be acknowledged;
//! acknowledged alerts stay stored but drop out of the active views.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of stored alerts; older ones are dropped
pub const MAX_ALERTS: usize = 100;

/// Gap forced between warning and critical when they are misordered
const THRESHOLD_CORRECTION: f64 = 10.0;

pub const CPU_TEMP_WARNING: f64 = 70.0;
pub const CPU_TEMP_CRITICAL: f64 = 85.0;
pub const GPU_TEMP_WARNING: f64 = 80.0;
pub const GPU_TEMP_CRITICAL: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::Info => "INFO",
            AlertLevel::Warning => "WARNING",
            AlertLevel::Critical => "CRITICAL",
        }
    }
}

/// An individual alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
    pub resource: String,
    pub value: f64,
    pub threshold: f64,
    pub timestamp: DateTime<Local>,
    pub acknowledged: bool,
}

/// Alert thresholds (%) per resource
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub cpu_warning: f64,
    pub cpu_critical: f64,
    pub memory_warning: f64,
    pub memory_critical: f64,
    pub disk_warning: f64,
    pub disk_critical: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            cpu_warning: 75.0,
            cpu_critical: 90.0,
            memory_warning: 80.0,
            memory_critical: 95.0,
            disk_warning: 85.0,
            disk_critical: 95.0,
        }
    }
}

fn corrected_warning(warning: f64, critical: f64) -> f64 {
    if warning >= critical {
        critical - THRESHOLD_CORRECTION
    } else {
        warning
    }
}

impl ThresholdConfig {
    /// Copy with every `warning >= critical` pair fixed to `critical - 10`
    pub fn validated(self) -> Self {
        Self {
            cpu_warning: corrected_warning(self.cpu_warning, self.cpu_critical),
            memory_warning: corrected_warning(self.memory_warning, self.memory_critical),
            disk_warning: corrected_warning(self.disk_warning, self.disk_critical),
            ..self
        }
    }
}

/// Counts of unacknowledged alerts per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub info: usize,
    pub warning: usize,
    pub critical: usize,
}

impl AlertSummary {
    pub fn total(&self) -> usize {
        self.info + self.warning + self.critical
    }
}

/// One resource check: the value, both cutoffs and how to phrase the alert
struct Check<'a> {
    resource: &'a str,
    value: f64,
    warning: f64,
    critical: f64,
    warning_title: &'a str,
    critical_title: &'a str,
    subject: &'a str,
    unit: &'a str,
}

pub struct AlertManager {
    alerts: VecDeque<Alert>,
    thresholds: ThresholdConfig,
    max_alerts: usize,
    enabled: bool,
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

impl AlertManager {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self {
            alerts: VecDeque::with_capacity(MAX_ALERTS),
            thresholds: thresholds.validated(),
            max_alerts: MAX_ALERTS,
            enabled: true,
        }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled managers silently drop new alerts
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// All stored alerts, newest first
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn add_alert(
        &mut self,
        level: AlertLevel,
        title: &str,
        message: String,
        resource: &str,
        value: f64,
        threshold: f64,
    ) {
        self.push(Alert {
            level,
            title: title.to_string(),
            message,
            resource: resource.to_string(),
            value,
            threshold,
            timestamp: Local::now(),
            acknowledged: false,
        });
    }

    fn push(&mut self, alert: Alert) {
        if !self.enabled {
            return;
        }

        match alert.level {
            AlertLevel::Critical => log::error!("[{}] {}: {}", alert.level.label(), alert.title, alert.message),
            AlertLevel::Warning => log::warn!("[{}] {}: {}", alert.level.label(), alert.title, alert.message),
            AlertLevel::Info => log::info!("[{}] {}: {}", alert.level.label(), alert.title, alert.message),
        }

        self.alerts.push_front(alert);
        self.alerts.truncate(self.max_alerts);
    }

    fn evaluate(&mut self, check: Check<'_>) {
        let (level, title, threshold, kind) = if check.value >= check.critical {
            (AlertLevel::Critical, check.critical_title, check.critical, "critical")
        } else if check.value >= check.warning {
            (AlertLevel::Warning, check.warning_title, check.warning, "warning")
        } else {
            return;
        };

        let message = format!(
            "{} is at {:.1}{}, exceeding the {} threshold of {:.1}{}",
            check.subject, check.value, check.unit, kind, threshold, check.unit
        );
        self.add_alert(level, title, message, check.resource, check.value, threshold);
    }

    pub fn check_cpu(&mut self, usage: f64) {
        let t = self.thresholds;
        self.evaluate(Check {
            resource: "CPU",
            value: usage,
            warning: t.cpu_warning,
            critical: t.cpu_critical,
            warning_title: "High CPU Usage",
            critical_title: "Critical CPU Usage",
            subject: "CPU usage",
            unit: "%",
        });
    }

    pub fn check_memory(&mut self, usage: f64) {
        let t = self.thresholds;
        self.evaluate(Check {
            resource: "Memory",
            value: usage,
            warning: t.memory_warning,
            critical: t.memory_critical,
            warning_title: "High Memory Usage",
            critical_title: "Critical Memory Usage",
            subject: "Memory usage",
            unit: "%",
        });
    }

    pub fn check_disk(&mut self, usage: f64, path: &str) {
        let t = self.thresholds;
        let subject = format!("Disk usage for {}", path);
        self.evaluate(Check {
            resource: "Disk",
            value: usage,
            warning: t.disk_warning,
            critical: t.disk_critical,
            warning_title: "High Disk Usage",
            critical_title: "Critical Disk Usage",
            subject: &subject,
            unit: "%",
        });
    }

    /// Temperature checks use fixed cutoffs (CPU 70/85, GPU 80/95)
    pub fn check_temperature(&mut self, resource: &str, celsius: f64, units: &str) {
        let (warning, critical, warning_title, critical_title, subject) = match resource {
            "GPU" => (
                GPU_TEMP_WARNING,
                GPU_TEMP_CRITICAL,
                "High GPU Temperature",
                "Critical GPU Temperature",
                "GPU temperature",
            ),
            _ => (
                CPU_TEMP_WARNING,
                CPU_TEMP_CRITICAL,
                "High CPU Temperature",
                "Critical CPU Temperature",
                "CPU temperature",
            ),
        };
        let unit = format!("°{}", units);
        self.evaluate(Check {
            resource,
            value: celsius,
            warning,
            critical,
            warning_title,
            critical_title,
            subject,
            unit: &unit,
        });
    }

    /// Unacknowledged alerts, newest first
    pub fn active_alerts(&self) -> Vec<Alert> {
        self.alerts
            .iter()
            .filter(|a| !a.acknowledged)
            .cloned()
            .collect()
    }

    pub fn alerts_by_level(&self, level: AlertLevel) -> Vec<Alert> {
        self.alerts
            .iter()
            .filter(|a| a.level == level)
            .cloned()
            .collect()
    }

    /// Returns false when `index` is out of range
    pub fn acknowledge(&mut self, index: usize) -> bool {
        match self.alerts.get_mut(index) {
            Some(alert) => {
                alert.acknowledged = true;
                true
            }
            None => false,
        }
    }

    pub fn acknowledge_all(&mut self) {
        for alert in self.alerts.iter_mut() {
            alert.acknowledged = true;
        }

        self.push(Alert {
            level: AlertLevel::Info,
            title: "Alerts Acknowledged".to_string(),
            message: "All alerts have been acknowledged.".to_string(),
            resource: "System".to_string(),
            value: 0.0,
            threshold: 0.0,
            timestamp: Local::now(),
            acknowledged: true,
        });
    }

    pub fn summary(&self) -> AlertSummary {
        let mut summary = AlertSummary::default();
        for alert in self.alerts.iter().filter(|a| !a.acknowledged) {
            match alert.level {
                AlertLevel::Info => summary.info += 1,
                AlertLevel::Warning => summary.warning += 1,
                AlertLevel::Critical => summary.critical += 1,
            }
        }
        summary
    }

    pub fn update_thresholds(&mut self, thresholds: ThresholdConfig) {
        self.thresholds = thresholds.validated();
        self.add_alert(
            AlertLevel::Info,
            "Alert Thresholds Updated",
            "The alert thresholds have been updated with new values.".to_string(),
            "System",
            0.0,
            0.0,
        );
    }
}
