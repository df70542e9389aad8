//! Engine state shared across render cycles.
//!
//! A [`Dashboard`] owns every piece of cross-cycle state: the rate
//! calculator, the resource histories, the alert store and the log
//! watcher. Each cycle samples the sources once, feeds the derived state,
//! and hands plain values to the section builders or the JSON report.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, warn};
use parking_lot::RwLock;
use serde::Serialize;

use crate::core::config::{existing_files, Config};
use crate::core::log_watcher::{LogEntry, LogWatcher};
use crate::core::system_monitor::{
    classify_readings, detect_runtime, evaluate_temperature, Alert, AlertManager, BatteryInfo,
    ContainerInfo, ContainerLogs, ContainerSource, CpuInfo, DiskInfo, DockerCli, HistoryBuffer,
    MemoryInfo, MetricSource, NetworkInterface, NetworkUsage, ProcessInfo, RateSample,
    RuntimeInfo, SysinfoSource, SystemInfo, TemperatureHistory, TemperatureInfo,
    TemperatureRecord, ThresholdConfig, TrafficMonitor, RESOURCE_HISTORY_CAPACITY,
};
use crate::error::{MonitorError, Result};

use super::layout::Sections;
use super::sections::{self, DisplayOptions};

/// Which dashboard areas to sample and show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionSelection {
    pub system: bool,
    pub cpu: bool,
    pub memory: bool,
    pub disk: bool,
    pub network: bool,
    pub traffic: bool,
    pub processes: bool,
    pub docker: bool,
    pub temperature: bool,
    pub battery: bool,
    pub logs: bool,
    pub history: bool,
    /// Also turns on threshold evaluation
    pub alerts: bool,
}

impl SectionSelection {
    /// Every area except alerts, which stay opt-in
    pub fn all() -> Self {
        Self {
            system: true,
            cpu: true,
            memory: true,
            disk: true,
            network: true,
            traffic: true,
            processes: true,
            docker: true,
            temperature: true,
            battery: true,
            logs: true,
            history: true,
            alerts: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn wants_temperature(&self) -> bool {
        self.temperature || self.history || self.alerts
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryReport {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cpu: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub memory: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub temperature: Vec<TemperatureRecord>,
    /// Rate samples per interface, oldest first
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub traffic: BTreeMap<String, Vec<RateSample>>,
}

/// Machine-readable result of one sampling cycle
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub timestamp: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disks: Vec<DiskInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<NetworkInterface>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub traffic: Vec<NetworkUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_count: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub processes: Vec<ProcessInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<BatteryInfo>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub logs: BTreeMap<String, Vec<LogEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<HistoryReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<Alert>,
    /// Areas that could not be collected, with the reason
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

/// Raw values gathered in one cycle; `None` means not requested
#[derive(Default)]
struct Sample {
    system: Option<Result<SystemInfo>>,
    runtime: Option<RuntimeInfo>,
    cpu: Option<Result<CpuInfo>>,
    memory: Option<Result<MemoryInfo>>,
    disks: Option<Result<Vec<DiskInfo>>>,
    interfaces: Option<Result<Vec<NetworkInterface>>>,
    traffic: Option<Result<Vec<NetworkUsage>>>,
    processes: Option<Result<(usize, Vec<ProcessInfo>)>>,
    containers: Option<Result<Vec<ContainerInfo>>>,
    temperature: Option<Result<TemperatureInfo>>,
    battery: Option<Result<BatteryInfo>>,
    logs: Option<Result<LogSample>>,
}

/// Log files found this cycle and the entries of those that are shown
struct LogSample {
    available: usize,
    shown: Vec<(PathBuf, Vec<LogEntry>)>,
}

pub struct Dashboard {
    source: Box<dyn MetricSource>,
    containers: Box<dyn ContainerSource>,
    traffic: TrafficMonitor,
    alerts: RwLock<AlertManager>,
    logs: Option<LogWatcher>,
    temperature: TemperatureHistory,
    cpu_history: HistoryBuffer<f64>,
    memory_history: HistoryBuffer<f64>,
    log_candidates: Vec<PathBuf>,
    log_lines: usize,
    log_poll: Duration,
    top_processes: usize,
}

impl Dashboard {
    /// Dashboard backed by `sysinfo` and the docker CLI
    pub fn new(config: &Config) -> Self {
        Self::with_sources(
            config,
            Box::new(SysinfoSource::new()),
            Box::new(DockerCli::new()),
        )
    }

    pub fn with_sources(
        config: &Config,
        source: Box<dyn MetricSource>,
        containers: Box<dyn ContainerSource>,
    ) -> Self {
        Self {
            source,
            containers,
            traffic: TrafficMonitor::new(),
            alerts: RwLock::new(AlertManager::new(config.thresholds)),
            logs: None,
            temperature: TemperatureHistory::new(config.temperature_sample_secs),
            cpu_history: HistoryBuffer::with_capacity(RESOURCE_HISTORY_CAPACITY),
            memory_history: HistoryBuffer::with_capacity(RESOURCE_HISTORY_CAPACITY),
            log_candidates: config.log_candidates(),
            log_lines: config.log_lines,
            log_poll: Duration::from_secs(config.log_poll_secs.max(1)),
            top_processes: config.top_processes,
        }
    }

    /// Take the baseline readings rate-based values need
    pub fn prime(&mut self) {
        self.source.refresh();
        match self.source.network_counters() {
            Ok(counters) => {
                self.traffic.record(counters);
            }
            Err(e) => debug!("no network baseline: {}", e),
        }
    }

    pub fn traffic(&self) -> &TrafficMonitor {
        &self.traffic
    }

    pub fn cpu_history(&self) -> Vec<f64> {
        self.cpu_history.snapshot()
    }

    pub fn memory_history(&self) -> Vec<f64> {
        self.memory_history.snapshot()
    }

    pub fn temperature_history(&self) -> &TemperatureHistory {
        &self.temperature
    }

    pub fn thresholds(&self) -> ThresholdConfig {
        *self.alerts.read().thresholds()
    }

    pub fn active_alerts(&self) -> Vec<Alert> {
        self.alerts.read().active_alerts()
    }

    pub fn update_thresholds(&self, thresholds: ThresholdConfig) {
        self.alerts.write().update_thresholds(thresholds);
    }

    pub fn acknowledge_alerts(&self) {
        self.alerts.write().acknowledge_all();
    }

    fn log_watcher(&mut self) -> Result<&LogWatcher> {
        if self.logs.is_none() {
            self.logs = Some(LogWatcher::with_interval(self.log_poll)?);
        }
        self.logs
            .as_ref()
            .ok_or_else(|| MonitorError::watcher("log watcher unavailable"))
    }

    /// Existing log files are rediscovered every cycle; only the shown
    /// ones are read and polled.
    fn read_logs(&mut self, verbose: bool) -> Result<LogSample> {
        let available = existing_files(&self.log_candidates);
        let shown: Vec<PathBuf> = available
            .iter()
            .take(sections::log_display_limit(verbose))
            .cloned()
            .collect();
        let limit = self.log_lines;
        let watcher = self.log_watcher()?;

        for path in watcher.cache().paths() {
            if !shown.contains(&path) {
                watcher.forget(&path);
            }
        }

        Ok(LogSample {
            available: available.len(),
            shown: shown
                .into_iter()
                .map(|path| {
                    let entries = watcher.entries(&path, limit, verbose);
                    (path, entries)
                })
                .collect(),
        })
    }

    /// Last `tail` lines of one container
    pub fn container_logs(&self, id: &str, tail: usize) -> Result<ContainerLogs> {
        self.containers.logs(id, tail)
    }

    /// Log files currently polled in the background
    pub fn watched_logs(&self) -> Vec<PathBuf> {
        self.logs
            .as_ref()
            .map(LogWatcher::watched_paths)
            .unwrap_or_default()
    }

    /// Sample every requested area and feed histories and alerts
    fn sample(&mut self, selection: &SectionSelection, verbose: bool) -> Sample {
        self.source.refresh();
        let mut sample = Sample::default();

        if selection.system {
            sample.system = Some(self.source.system_info());
            sample.runtime = Some(detect_runtime());
        }

        // Usage histories advance every cycle so graphs have data when shown
        let cpu = self.source.cpu();
        if let Ok(cpu) = &cpu {
            self.cpu_history.push(cpu.usage_percent);
        }
        let memory = self.source.memory();
        if let Ok(memory) = &memory {
            self.memory_history.push(memory.usage_percent);
        }

        let disks = if selection.disk || selection.alerts {
            Some(self.source.disks())
        } else {
            None
        };

        if selection.alerts {
            let mut alerts = self.alerts.write();
            if let Ok(cpu) = &cpu {
                alerts.check_cpu(cpu.usage_percent);
            }
            if let Ok(memory) = &memory {
                alerts.check_memory(memory.usage_percent);
            }
            if let Some(Ok(disks)) = &disks {
                for disk in disks {
                    alerts.check_disk(disk.usage_percent, &disk.path);
                }
            }
        }

        if selection.cpu {
            sample.cpu = Some(cpu);
        }
        if selection.memory {
            sample.memory = Some(memory);
        }
        if selection.disk {
            sample.disks = disks;
        }

        if selection.network {
            sample.interfaces = Some(self.source.interfaces());
        }

        if selection.traffic {
            sample.traffic = Some(
                self.source
                    .network_counters()
                    .map(|counters| self.traffic.record(counters)),
            );
        }

        if selection.processes {
            let limit = self.top_processes;
            sample.processes = Some(
                self.source
                    .process_count()
                    .and_then(|count| Ok((count, self.source.top_processes(limit)?))),
            );
        }

        if selection.docker {
            sample.containers = Some(self.containers.containers());
        }

        if selection.wants_temperature() {
            let reading = self.source.temperatures().map(|raw| classify_readings(&raw));
            if let Ok(info) = &reading {
                self.temperature.record(info, Local::now());
                if selection.alerts {
                    evaluate_temperature(&mut self.alerts.write(), info);
                }
            }
            if selection.temperature {
                sample.temperature = Some(reading);
            }
        }

        if selection.battery {
            sample.battery = Some(self.source.battery());
        }

        if selection.logs {
            sample.logs = Some(self.read_logs(verbose));
        }

        sample
    }

    /// Run one cycle and build the sections to render.
    ///
    /// A failing area becomes a placeholder section; the rest still render.
    pub fn build_sections(&mut self, selection: &SectionSelection, opts: DisplayOptions) -> Sections {
        let sample = self.sample(selection, opts.verbose);
        let mut out = Sections::new();

        if let Some(system) = sample.system {
            let runtime = sample.runtime.unwrap_or_default();
            out.extend(contain("System", system.map(|s| sections::system_sections(&s, &runtime))));
        }
        if let Some(cpu) = sample.cpu {
            out.extend(contain("CPU", cpu.map(|c| sections::cpu_section(&c, opts))));
        }
        if let Some(memory) = sample.memory {
            out.extend(contain("Memory", memory.map(|m| sections::memory_section(&m, opts))));
        }
        if let Some(disks) = sample.disks {
            out.extend(contain("Disk", disks.map(|d| sections::disk_section(&d, opts))));
        }
        if let Some(interfaces) = sample.interfaces {
            out.extend(contain(
                "Network",
                interfaces.map(|i| sections::network_sections(&i, opts)),
            ));
        }
        if let Some(traffic) = sample.traffic {
            let monitor = &self.traffic;
            out.extend(contain(
                "Network Traffic",
                traffic.map(|usage| {
                    sections::traffic_sections(&usage, |iface| monitor.history(iface), opts)
                }),
            ));
        }
        if let Some(processes) = sample.processes {
            out.extend(contain(
                "Processes",
                processes.map(|(count, procs)| sections::process_sections(count, &procs)),
            ));
        }
        if let Some(containers) = sample.containers {
            out.extend(contain("Docker", containers.map(|c| sections::docker_sections(&c))));
        }
        if let Some(temperature) = sample.temperature {
            // Hosts without sensors get the "none detected" placeholder
            let info = temperature.unwrap_or_else(|e| {
                debug!("temperature unavailable: {}", e);
                TemperatureInfo::default()
            });
            out.extend(sections::temperature_section(&info));
        }
        if let Some(battery) = sample.battery {
            out.extend(contain("Battery", battery.map(|b| sections::battery_section(&b, opts))));
        }
        if let Some(logs) = sample.logs {
            out.extend(contain(
                "System Logs",
                logs.map(|l| sections::log_sections(l.available, &l.shown, opts)),
            ));
        }
        if selection.history {
            out.extend(sections::history_sections(
                &self.cpu_history.snapshot(),
                &self.memory_history.snapshot(),
                &self.temperature,
            ));
        }
        if selection.alerts {
            out.extend(sections::alert_sections(&self.alerts.read()));
        }

        out
    }

    /// Run one cycle and gather the values for structured output
    pub fn collect_report(&mut self, selection: &SectionSelection, verbose: bool) -> MonitorReport {
        let sample = self.sample(selection, verbose);
        let mut errors = BTreeMap::new();

        let system = keep("system", sample.system, &mut errors);
        let cpu = keep("cpu", sample.cpu, &mut errors);
        let memory = keep("memory", sample.memory, &mut errors);
        let disks = keep("disks", sample.disks, &mut errors).unwrap_or_default();
        let interfaces = keep("network", sample.interfaces, &mut errors).unwrap_or_default();
        let traffic = keep("traffic", sample.traffic, &mut errors).unwrap_or_default();
        let (process_count, processes) = match keep("processes", sample.processes, &mut errors) {
            Some((count, procs)) => (Some(count), procs),
            None => (None, Vec::new()),
        };
        let containers = keep("docker", sample.containers, &mut errors).unwrap_or_default();
        let temperature = keep("temperature", sample.temperature, &mut errors);
        let battery = keep("battery", sample.battery, &mut errors);
        let logs = keep("logs", sample.logs, &mut errors)
            .map(|l| l.shown)
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(path, entries)| (path.display().to_string(), entries))
            .collect();

        let history = selection.history.then(|| HistoryReport {
            cpu: self.cpu_history.snapshot(),
            memory: self.memory_history.snapshot(),
            temperature: self.temperature.records(),
            traffic: self
                .traffic
                .tracked_interfaces()
                .into_iter()
                .map(|iface| {
                    let samples = self.traffic.rate_history(&iface);
                    (iface, samples)
                })
                .filter(|(_, samples)| !samples.is_empty())
                .collect(),
        });
        let alerts = if selection.alerts {
            self.alerts.read().active_alerts()
        } else {
            Vec::new()
        };

        MonitorReport {
            timestamp: Local::now(),
            system,
            runtime: sample.runtime,
            cpu,
            memory,
            disks,
            interfaces,
            traffic,
            process_count,
            processes,
            containers,
            temperature,
            battery,
            logs,
            history,
            alerts,
            errors,
        }
    }
}

/// Turn a failed area into its placeholder section
fn contain(name: &str, built: Result<Sections>) -> Sections {
    built.unwrap_or_else(|e| {
        warn!("{} unavailable: {}", name, e);
        sections::unavailable_section(name, &e)
    })
}

fn keep<T>(name: &str, value: Option<Result<T>>, errors: &mut BTreeMap<String, String>) -> Option<T> {
    match value? {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("{} unavailable: {}", name, e);
            errors.insert(name.to_string(), e.to_string());
            None
        }
    }
}
