use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sysglance::core::system_monitor::{
    BatteryInfo, ContainerInfo, ContainerLogs, ContainerSource, CounterSnapshot, CpuInfo,
    DiskInfo, MemoryInfo, MetricSource, NetworkInterface, ProcessInfo, SystemInfo,
};
use sysglance::{MonitorError, Result};

/// Deterministic host with a single `eth0` whose counters grow each refresh
pub struct FakeSource {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub temperatures: Vec<(String, f64)>,
    pub fail_processes: bool,
    pub battery: Option<BatteryInfo>,
    refreshes: Arc<AtomicU64>,
}

impl FakeSource {
    pub fn new(cpu_usage: f64) -> Self {
        Self {
            cpu_usage,
            memory_usage: 40.0,
            disk_usage: 50.0,
            temperatures: vec![("CPU Package".to_string(), 55.0)],
            fail_processes: false,
            battery: None,
            refreshes: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl MetricSource for FakeSource {
    fn refresh(&mut self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn system_info(&self) -> Result<SystemInfo> {
        Ok(SystemInfo {
            os_name: "TestOS".to_string(),
            os_version: "1.0".to_string(),
            kernel_version: "6.1".to_string(),
            hostname: "testbox".to_string(),
            uptime_secs: 3_700,
            architecture: "x86_64".to_string(),
        })
    }

    fn cpu(&self) -> Result<CpuInfo> {
        Ok(CpuInfo {
            core_count: 4,
            brand: "Test CPU".to_string(),
            architecture: "x86_64".to_string(),
            usage_percent: self.cpu_usage,
            load_average: (0.5, 0.4, 0.3),
        })
    }

    fn memory(&self) -> Result<MemoryInfo> {
        let total = 8 * 1024 * 1024 * 1024u64;
        Ok(MemoryInfo {
            total_bytes: total,
            used_bytes: (total as f64 * self.memory_usage / 100.0) as u64,
            usage_percent: self.memory_usage,
            ..Default::default()
        })
    }

    fn disks(&self) -> Result<Vec<DiskInfo>> {
        let total = 100 * 1024 * 1024 * 1024u64;
        Ok(vec![DiskInfo {
            path: "/".to_string(),
            fs_type: "ext4".to_string(),
            total_bytes: total,
            free_bytes: (total as f64 * (1.0 - self.disk_usage / 100.0)) as u64,
            usage_percent: self.disk_usage,
        }])
    }

    fn interfaces(&self) -> Result<Vec<NetworkInterface>> {
        Ok(vec![NetworkInterface {
            name: "eth0".to_string(),
            ipv4: vec!["192.168.1.10/24".to_string()],
            mac_address: "aa:bb:cc:dd:ee:ff".to_string(),
            status: "Up".to_string(),
            ..Default::default()
        }])
    }

    fn network_counters(&self) -> Result<HashMap<String, CounterSnapshot>> {
        let step = self.refreshes.load(Ordering::SeqCst);
        let mut counters = HashMap::new();
        counters.insert(
            "eth0".to_string(),
            CounterSnapshot {
                bytes_received: step * 1_000_000,
                bytes_sent: step * 500_000,
                packets_received: step * 100,
                packets_sent: step * 50,
                errors: 0,
            },
        );
        Ok(counters)
    }

    fn process_count(&self) -> Result<usize> {
        if self.fail_processes {
            return Err(MonitorError::collector_unavailable("process table locked"));
        }
        Ok(2)
    }

    fn top_processes(&self, limit: usize) -> Result<Vec<ProcessInfo>> {
        let mut processes = vec![
            ProcessInfo {
                pid: 42,
                name: "busy".to_string(),
                cpu_percent: 75.0,
                memory_percent: 5.0,
                ..Default::default()
            },
            ProcessInfo {
                pid: 1,
                name: "init".to_string(),
                cpu_percent: 0.1,
                memory_percent: 0.2,
                ..Default::default()
            },
        ];
        processes.truncate(limit);
        Ok(processes)
    }

    fn temperatures(&self) -> Result<Vec<(String, f64)>> {
        if self.temperatures.is_empty() {
            return Err(MonitorError::collector_unavailable("no sensors"));
        }
        Ok(self.temperatures.clone())
    }

    fn battery(&self) -> Result<BatteryInfo> {
        Ok(self.battery.clone().unwrap_or_else(BatteryInfo::absent))
    }
}

/// Docker that is either missing or reports fixed containers
pub struct FakeContainers {
    pub containers: Option<Vec<ContainerInfo>>,
}

impl FakeContainers {
    pub fn missing() -> Self {
        Self { containers: None }
    }

    pub fn running(names: &[&str]) -> Self {
        let containers = names
            .iter()
            .map(|name| ContainerInfo {
                id: format!("{}-id", name),
                name: name.to_string(),
                image: "nginx:latest".to_string(),
                status: "Up 5 minutes".to_string(),
                state: "running".to_string(),
                ..Default::default()
            })
            .collect();
        Self {
            containers: Some(containers),
        }
    }
}

impl ContainerSource for FakeContainers {
    fn containers(&self) -> Result<Vec<ContainerInfo>> {
        self.containers
            .clone()
            .ok_or_else(|| MonitorError::collector_unavailable("docker not installed"))
    }

    fn logs(&self, id: &str, tail: usize) -> Result<ContainerLogs> {
        let containers = self
            .containers
            .as_ref()
            .ok_or_else(|| MonitorError::collector_unavailable("docker not installed"))?;
        let container = containers
            .iter()
            .find(|c| c.id == id || c.name == id)
            .ok_or_else(|| {
                MonitorError::collector_unavailable(format!("container '{}' not found", id))
            })?;

        let lines: Vec<String> = (1..=5).map(|i| format!("{} line {}", container.name, i)).collect();
        let skip = if tail == 0 { 0 } else { lines.len().saturating_sub(tail) };
        Ok(ContainerLogs {
            id: container.id.clone(),
            name: container.name.clone(),
            lines: lines[skip..].to_vec(),
        })
    }
}
