use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

fn is_zero_f64(value: &f64) -> bool {
    *value == 0.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub hostname: String,
    pub uptime_secs: u64,
    pub architecture: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub core_count: usize,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub brand: String,
    pub architecture: String,
    pub usage_percent: f64,
    pub load_average: (f64, f64, f64), // 1, 5, 15 min
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub usage_percent: f64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub swap_total_bytes: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub swap_used_bytes: u64,
}

impl MemoryInfo {
    pub fn free_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.used_bytes)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fs_type: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub usage_percent: f64,
}

impl DiskInfo {
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv4: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mac_address: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_loopback: bool,
}

/// Per-interface counters plus the rates derived from the previous sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkUsage {
    pub interface: String,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub rx_rate_mbps: f64,
    pub tx_rate_mbps: f64,
    pub packets_received: u64,
    pub packets_sent: u64,
    pub errors: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_pid: Option<u32>,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub memory_bytes: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,
    pub status: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero_f64")]
    pub cpu_percent: f64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub memory_usage_bytes: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub memory_limit_bytes: u64,
    #[serde(default, skip_serializing_if = "is_zero_f64")]
    pub memory_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, f64>,
    pub units: String,
}

impl TemperatureInfo {
    pub fn is_empty(&self) -> bool {
        self.cpu_celsius.is_none() && self.gpu_celsius.is_none() && self.components.is_empty()
    }
}

/// Where the tool itself is running
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub shell: String,
    pub terminal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtualization: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_wsl: bool,
}

/// Charge and wear of the first battery the OS reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryInfo {
    pub present: bool,
    pub status: String,
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    #[serde(default)]
    pub power_draw_watts: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default)]
    pub full_capacity_wh: f64,
    #[serde(default)]
    pub design_capacity_wh: f64,
}

impl BatteryInfo {
    pub fn absent() -> Self {
        Self {
            status: "Not Present".to_string(),
            ..Default::default()
        }
    }

    /// Full-charge capacity as a percentage of design capacity
    pub fn wear_percent(&self) -> Option<f64> {
        if self.full_capacity_wh > 0.0 && self.design_capacity_wh > 0.0 {
            Some(self.full_capacity_wh / self.design_capacity_wh * 100.0)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    pub timestamp: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, f64>,
}
