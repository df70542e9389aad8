use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use sysinfo::{
    Components, CpuRefreshKind, Disks, MemoryRefreshKind, Networks, ProcessRefreshKind,
    RefreshKind, System,
};

use crate::error::{MonitorError, Result};

use super::battery::collect_battery;
use super::metrics::*;
use super::traffic::CounterSnapshot;

/// Supplies point-in-time facts about the host.
///
/// `refresh` is called once per cycle; the getters then read the refreshed
/// state. Getters that cannot produce data return
/// [`MonitorError::CollectorUnavailable`] so the caller can degrade just
/// that section.
pub trait MetricSource: Send {
    fn refresh(&mut self);
    fn system_info(&self) -> Result<SystemInfo>;
    fn cpu(&self) -> Result<CpuInfo>;
    fn memory(&self) -> Result<MemoryInfo>;
    fn disks(&self) -> Result<Vec<DiskInfo>>;
    fn interfaces(&self) -> Result<Vec<NetworkInterface>>;
    fn network_counters(&self) -> Result<HashMap<String, CounterSnapshot>>;
    fn process_count(&self) -> Result<usize>;
    /// Processes sorted by CPU usage, highest first
    fn top_processes(&self, limit: usize) -> Result<Vec<ProcessInfo>>;
    /// Raw `(label, °C)` sensor readings
    fn temperatures(&self) -> Result<Vec<(String, f64)>>;
    fn battery(&self) -> Result<BatteryInfo>;
}

fn percent(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn is_loopback_name(name: &str) -> bool {
    name == "lo" || name.starts_with("loop") || name.starts_with("Loopback")
}

/// Last path component of `$SHELL`
pub fn shell_name(shell: &str) -> String {
    match shell.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Unknown".to_string(),
    }
}

pub fn terminal_name(term: &str) -> String {
    if term.is_empty() {
        "Unknown".to_string()
    } else if term.contains("xterm") {
        "xterm".to_string()
    } else if term.contains("rxvt") {
        "rxvt".to_string()
    } else if term.contains("konsole") {
        "Konsole".to_string()
    } else if term.contains("gnome") {
        "GNOME Terminal".to_string()
    } else {
        term.to_string()
    }
}

fn detect_virtualization() -> Option<String> {
    if Path::new("/.dockerenv").exists() {
        return Some("Docker".to_string());
    }
    if Path::new("/run/.containerenv").exists() {
        return Some("Podman".to_string());
    }
    let cpuinfo = fs::read_to_string("/proc/cpuinfo").ok()?;
    cpuinfo
        .lines()
        .any(|line| line.starts_with("flags") && line.contains(" hypervisor"))
        .then(|| "Virtual Machine".to_string())
}

fn detect_wsl() -> bool {
    fs::read_to_string("/proc/version")
        .map(|v| v.to_lowercase().contains("microsoft"))
        .unwrap_or(false)
}

/// Shell, terminal and virtualization facts from the environment
pub fn detect_runtime() -> RuntimeInfo {
    RuntimeInfo {
        shell: shell_name(&env::var("SHELL").unwrap_or_default()),
        terminal: terminal_name(&env::var("TERM").unwrap_or_default()),
        virtualization: detect_virtualization(),
        is_wsl: detect_wsl(),
    }
}

/// [`MetricSource`] backed by the `sysinfo` crate
pub struct SysinfoSource {
    system: System,
    components: Components,
    disks: Disks,
    networks: Networks,
}

impl SysinfoSource {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything())
            .with_processes(ProcessRefreshKind::nothing().with_cpu().with_memory());

        Self {
            system: System::new_with_specifics(refresh_kind),
            components: Components::new_with_refreshed_list(),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
        }
    }

    fn ensure_supported(&self, what: &str) -> Result<()> {
        if sysinfo::IS_SUPPORTED_SYSTEM {
            Ok(())
        } else {
            Err(MonitorError::collector_unavailable(format!(
                "{} is not available on this platform",
                what
            )))
        }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for SysinfoSource {
    fn refresh(&mut self) {
        self.system.refresh_all();
        self.disks.refresh(true);
        self.networks.refresh(true);
        self.components.refresh(true);
    }

    fn system_info(&self) -> Result<SystemInfo> {
        Ok(SystemInfo {
            os_name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            os_version: System::os_version().unwrap_or_default(),
            kernel_version: System::kernel_version().unwrap_or_default(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
            uptime_secs: System::uptime(),
            architecture: std::env::consts::ARCH.to_string(),
        })
    }

    fn cpu(&self) -> Result<CpuInfo> {
        self.ensure_supported("CPU information")?;
        let cpus = self.system.cpus();
        if cpus.is_empty() {
            return Err(MonitorError::collector_unavailable("no CPUs reported"));
        }
        let load = System::load_average();

        Ok(CpuInfo {
            core_count: cpus.len(),
            brand: cpus
                .first()
                .map(|c| c.brand().trim().to_string())
                .unwrap_or_default(),
            architecture: std::env::consts::ARCH.to_string(),
            usage_percent: self.system.global_cpu_usage() as f64,
            load_average: (load.one, load.five, load.fifteen),
        })
    }

    fn memory(&self) -> Result<MemoryInfo> {
        self.ensure_supported("Memory information")?;
        let total = self.system.total_memory();
        let used = self.system.used_memory();

        Ok(MemoryInfo {
            total_bytes: total,
            used_bytes: used,
            usage_percent: percent(used, total),
            swap_total_bytes: self.system.total_swap(),
            swap_used_bytes: self.system.used_swap(),
        })
    }

    fn disks(&self) -> Result<Vec<DiskInfo>> {
        self.ensure_supported("Disk information")?;
        Ok(self
            .disks
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let available = disk.available_space();

                DiskInfo {
                    path: disk.mount_point().to_string_lossy().to_string(),
                    fs_type: disk.file_system().to_string_lossy().to_string(),
                    total_bytes: total,
                    free_bytes: available,
                    usage_percent: percent(total.saturating_sub(available), total),
                }
            })
            .collect())
    }

    fn interfaces(&self) -> Result<Vec<NetworkInterface>> {
        self.ensure_supported("Network information")?;
        let mut interfaces: Vec<NetworkInterface> = self
            .networks
            .iter()
            .map(|(name, data)| {
                let mut ipv4 = Vec::new();
                let mut ipv6 = Vec::new();
                for network in data.ip_networks() {
                    let addr = format!("{}/{}", network.addr, network.prefix);
                    if network.addr.is_ipv4() {
                        ipv4.push(addr);
                    } else {
                        ipv6.push(addr);
                    }
                }

                let has_address = !ipv4.is_empty() || !ipv6.is_empty();
                let is_loopback = is_loopback_name(name)
                    || data.ip_networks().iter().any(|n| n.addr.is_loopback());

                NetworkInterface {
                    name: name.to_string(),
                    ipv4,
                    ipv6,
                    mac_address: data.mac_address().to_string(),
                    status: if has_address { "Up" } else { "Down" }.to_string(),
                    is_loopback,
                }
            })
            .collect();

        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(interfaces)
    }

    fn network_counters(&self) -> Result<HashMap<String, CounterSnapshot>> {
        self.ensure_supported("Network counters")?;
        Ok(self
            .networks
            .iter()
            .map(|(name, data)| {
                (
                    name.to_string(),
                    CounterSnapshot {
                        bytes_received: data.total_received(),
                        bytes_sent: data.total_transmitted(),
                        packets_received: data.total_packets_received(),
                        packets_sent: data.total_packets_transmitted(),
                        errors: data.total_errors_on_received()
                            + data.total_errors_on_transmitted(),
                    },
                )
            })
            .collect())
    }

    fn process_count(&self) -> Result<usize> {
        self.ensure_supported("Process information")?;
        Ok(self.system.processes().len())
    }

    fn top_processes(&self, limit: usize) -> Result<Vec<ProcessInfo>> {
        self.ensure_supported("Process information")?;
        let total_memory = self.system.total_memory();
        let mut processes: Vec<_> = self
            .system
            .processes()
            .values()
            .map(|proc| {
                let mem = proc.memory();
                ProcessInfo {
                    pid: proc.pid().as_u32(),
                    parent_pid: proc.parent().map(|p| p.as_u32()),
                    name: proc.name().to_string_lossy().to_string(),
                    cpu_percent: proc.cpu_usage() as f64,
                    memory_percent: percent(mem, total_memory),
                    memory_bytes: mem,
                    status: proc.status().to_string(),
                }
            })
            .collect();

        processes.sort_by(|a, b| {
            b.cpu_percent
                .partial_cmp(&a.cpu_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        processes.truncate(limit);
        Ok(processes)
    }

    fn temperatures(&self) -> Result<Vec<(String, f64)>> {
        let readings: Vec<(String, f64)> = self
            .components
            .iter()
            .filter_map(|comp| {
                comp.temperature()
                    .filter(|t| t.is_finite() && *t > 0.0)
                    .map(|t| (comp.label().to_string(), t as f64))
            })
            .collect();

        if readings.is_empty() {
            return Err(MonitorError::collector_unavailable(
                "no temperature sensors found",
            ));
        }
        Ok(readings)
    }

    fn battery(&self) -> Result<BatteryInfo> {
        collect_battery()
    }
}
