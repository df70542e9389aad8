//! Builders that turn collected values into named display sections.
//!
//! Every function here is pure: it formats values that were already
//! sampled and never touches the host.

use std::path::PathBuf;

use crate::core::log_watcher::{detect_level, LogEntry, LogLevel};
use crate::core::system_monitor::{
    AlertManager, BatteryInfo, ContainerInfo, ContainerLogs, CpuInfo, DiskInfo, MemoryInfo, NetworkInterface, NetworkUsage,
    ProcessInfo, RuntimeInfo, SystemInfo, TemperatureHistory, TemperatureInfo,
};
use crate::error::MonitorError;

use super::formatters::{format_bytes, format_mb, format_time, format_uptime, truncate_with_ellipsis};
use super::graph::{bar_graph, line_graph, sparkline, traffic_graph, usage_bar};
use super::layout::{Row, Sections};
use super::table::Table;
use super::theme::{paint, Tone, UsageCategory};

const BAR_WIDTH: usize = 20;
const COMPACT_BAR_WIDTH: usize = 15;
const DISK_PATH_WIDTH: usize = 30;
const IMAGE_WIDTH: usize = 25;
const PROCESS_NAME_WIDTH: usize = 15;
const LOG_LINE_WIDTH: usize = 80;
const MAX_LOGS: usize = 3;
const MAX_ALERT_ROWS: usize = 10;
const ALERT_MESSAGE_WIDTH: usize = 50;
const IDLE_RATE_MBPS: f64 = 0.001;
const TREND_WIDTH: usize = 20;

/// Presentation flags shared by every builder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub verbose: bool,
    /// Narrower bars and no inline graphs
    pub compact: bool,
}

impl DisplayOptions {
    fn bar_width(&self) -> usize {
        if self.compact {
            COMPACT_BAR_WIDTH
        } else {
            BAR_WIDTH
        }
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn gigabytes(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

fn single(name: &str, rows: Vec<Row>) -> Sections {
    let mut sections = Sections::new();
    sections.insert(name, rows);
    sections
}

/// Placeholder shown when a section's data could not be collected
pub fn unavailable_section(name: &str, err: &MonitorError) -> Sections {
    single(name, vec![Row::field("Status", format!("Error: {}", err))])
}

pub fn system_sections(info: &SystemInfo, runtime: &RuntimeInfo) -> Sections {
    let mut sections = Sections::new();
    sections.insert(
        "System",
        vec![
            Row::field("OS", format!("{} {}", info.os_name, info.os_version).trim().to_string()),
            Row::field("Hostname", info.hostname.as_str()),
            Row::field("Kernel", info.kernel_version.as_str()),
            Row::field("Architecture", info.architecture.as_str()),
            Row::field("Uptime", format_uptime(info.uptime_secs)),
        ],
    );

    let mut env = vec![
        Row::field("Shell", runtime.shell.as_str()),
        Row::field("Terminal", runtime.terminal.as_str()),
        Row::field(
            "Virtualization",
            runtime.virtualization.as_deref().unwrap_or("Native Hardware"),
        ),
    ];
    if runtime.is_wsl {
        env.push(Row::field("WSL", "Yes"));
    }
    sections.insert("Runtime Environment", env);
    sections
}

pub fn cpu_section(cpu: &CpuInfo, opts: DisplayOptions) -> Sections {
    let mut rows = vec![Row::field("CPUs", format!("{} cores", cpu.core_count))];
    if !cpu.brand.is_empty() {
        rows.push(Row::field("Model", cpu.brand.as_str()));
    }
    rows.push(Row::field("Architecture", cpu.architecture.as_str()));
    rows.push(Row::field("Usage", percent(cpu.usage_percent)));

    let (one, five, fifteen) = cpu.load_average;
    if opts.verbose && (one, five, fifteen) != (0.0, 0.0, 0.0) {
        rows.push(Row::field(
            "Load Average",
            format!("{:.2}, {:.2}, {:.2}", one, five, fifteen),
        ));
    }

    rows.push(Row::text(usage_bar(cpu.usage_percent, opts.bar_width())));
    single("CPU", rows)
}

pub fn memory_section(memory: &MemoryInfo, opts: DisplayOptions) -> Sections {
    let mut rows = vec![
        Row::field("Total", format_mb(memory.total_bytes)),
        Row::field("Used", format_mb(memory.used_bytes)),
        Row::field("Free", format_mb(memory.free_bytes())),
    ];
    if opts.verbose && memory.swap_total_bytes > 0 {
        rows.push(Row::field(
            "Swap",
            format!(
                "{} / {}",
                format_mb(memory.swap_used_bytes),
                format_mb(memory.swap_total_bytes)
            ),
        ));
    }
    rows.push(Row::field(
        "Usage",
        usage_bar(memory.usage_percent, opts.bar_width()),
    ));
    single("Memory", rows)
}

/// `...` plus the last characters of a long path
fn shorten_path(path: &str, max: usize) -> String {
    let count = path.chars().count();
    if count <= max {
        return path.to_string();
    }
    let keep: String = path.chars().skip(count - (max - 3)).collect();
    format!("...{}", keep)
}

fn primary_disk(disks: &[DiskInfo]) -> Option<&DiskInfo> {
    disks
        .iter()
        .find(|d| d.path == "/" || d.path.eq_ignore_ascii_case("C:\\"))
        .or_else(|| disks.first())
}

pub fn disk_section(disks: &[DiskInfo], opts: DisplayOptions) -> Sections {
    let primary = match primary_disk(disks) {
        Some(disk) => disk,
        None => return single("Disk", vec![Row::field("Status", "No disks detected")]),
    };

    let mut rows = vec![
        Row::field("Path", shorten_path(&primary.path, DISK_PATH_WIDTH)),
        Row::field("Total", gigabytes(primary.total_bytes)),
        Row::field("Used", gigabytes(primary.used_bytes())),
        Row::field("Free", gigabytes(primary.free_bytes)),
        Row::field("Usage", usage_bar(primary.usage_percent, opts.bar_width())),
    ];

    if opts.verbose {
        for disk in disks.iter().filter(|d| d.path != primary.path) {
            rows.push(Row::Spacer);
            rows.push(Row::field("Mount", shorten_path(&disk.path, DISK_PATH_WIDTH)));
            if !disk.fs_type.is_empty() {
                rows.push(Row::field("Filesystem", disk.fs_type.as_str()));
            }
            rows.push(Row::field(
                "Used",
                format!("{} of {}", gigabytes(disk.used_bytes()), gigabytes(disk.total_bytes)),
            ));
            rows.push(Row::field("Usage", usage_bar(disk.usage_percent, opts.bar_width())));
        }
    }

    single("Disk", rows)
}

pub fn network_sections(interfaces: &[NetworkInterface], opts: DisplayOptions) -> Sections {
    let shown: Vec<&NetworkInterface> = interfaces
        .iter()
        .filter(|iface| {
            opts.verbose
                || (!iface.is_loopback && !(iface.ipv4.is_empty() && iface.ipv6.is_empty()))
        })
        .collect();

    let mut sections = Sections::new();
    sections.insert(
        "Network",
        vec![
            Row::field("Interfaces", format!("{} detected", interfaces.len())),
            Row::field("Connected", format!("{} shown", shown.len())),
        ],
    );

    for iface in shown {
        let mut rows = vec![
            Row::field("Status", iface.status.as_str()),
            Row::field("MAC", iface.mac_address.as_str()),
        ];
        if !iface.ipv4.is_empty() {
            rows.push(Row::field("IPv4", iface.ipv4.join(", ")));
        }
        if let Some(first) = iface.ipv6.first() {
            rows.push(Row::field("IPv6", first.as_str()));
        }
        sections.insert(format!("Adapter: {}", iface.name), rows);
    }

    sections
}

fn is_loopback_interface(name: &str) -> bool {
    name == "lo" || name.starts_with("loop")
}

/// Traffic summary plus one section per active interface.
///
/// `history` returns the (download, upload) rate series for an interface.
pub fn traffic_sections<F>(usage: &[NetworkUsage], history: F, opts: DisplayOptions) -> Sections
where
    F: Fn(&str) -> (Vec<f64>, Vec<f64>),
{
    let total_rx: u64 = usage.iter().map(|u| u.bytes_received).sum();
    let total_tx: u64 = usage.iter().map(|u| u.bytes_sent).sum();
    let rate_rx: f64 = usage.iter().map(|u| u.rx_rate_mbps).sum();
    let rate_tx: f64 = usage.iter().map(|u| u.tx_rate_mbps).sum();

    let mut sections = Sections::new();
    sections.insert(
        "Network Traffic",
        vec![
            Row::field("Interfaces", format!("{} active", usage.len())),
            Row::field("Total Download", format_bytes(total_rx)),
            Row::field("Total Upload", format_bytes(total_tx)),
            Row::field(
                "Current Rate",
                format!("↓ {:.1} Mbps / ↑ {:.1} Mbps", rate_rx, rate_tx),
            ),
        ],
    );

    for iface in usage {
        let idle = iface.rx_rate_mbps < IDLE_RATE_MBPS && iface.tx_rate_mbps < IDLE_RATE_MBPS;
        if !opts.verbose && (idle || is_loopback_interface(&iface.interface)) {
            continue;
        }

        let mut rows = vec![
            Row::field(
                "Download",
                format!("{} ({:.1} Mbps)", format_bytes(iface.bytes_received), iface.rx_rate_mbps),
            ),
            Row::field(
                "Upload",
                format!("{} ({:.1} Mbps)", format_bytes(iface.bytes_sent), iface.tx_rate_mbps),
            ),
        ];

        if opts.verbose {
            rows.push(Row::field(
                "Packets",
                format!("↓ {} / ↑ {}", iface.packets_received, iface.packets_sent),
            ));
            if iface.errors > 0 {
                rows.push(Row::field("Errors", iface.errors.to_string()));
            }
        }

        let (rx, tx) = history(&iface.interface);
        if opts.compact {
            if !rx.is_empty() {
                rows.push(Row::field(
                    "Trend",
                    format!("↓ {} ↑ {}", sparkline(&rx, TREND_WIDTH), sparkline(&tx, TREND_WIDTH)),
                ));
            }
        } else {
            if !rx.is_empty() {
                rows.push(Row::field("Download History", traffic_graph(&rx, 40, 5)));
            }
            if !tx.is_empty() {
                rows.push(Row::field("Upload History", traffic_graph(&tx, 40, 5)));
            }
        }

        sections.insert(format!("Interface: {}", iface.interface), rows);
    }

    sections
}

pub fn process_sections(count: usize, processes: &[ProcessInfo]) -> Sections {
    let mut table = Table::new(["PID", "Name", "CPU%", "Memory%"])
        .with_severity_column(2, UsageCategory::Process)
        .with_severity_column(3, UsageCategory::Process);
    for proc in processes {
        table.push_row([
            proc.pid.to_string(),
            truncate_with_ellipsis(&proc.name, PROCESS_NAME_WIDTH),
            format!("{:.1}", proc.cpu_percent),
            format!("{:.1}", proc.memory_percent),
        ]);
    }

    let mut sections = single("Processes", vec![Row::field("Count", count.to_string())]);
    if !table.is_empty() {
        sections.insert("Top Processes", vec![Row::Table(table)]);
    }
    sections
}

/// Keep repository and tag readable when an image name is long
fn shorten_image(image: &str) -> String {
    if image.chars().count() <= IMAGE_WIDTH {
        return image.to_string();
    }
    match image.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => {
            format!("{}:{}", truncate_with_ellipsis(repo, 20), tag)
        }
        _ => truncate_with_ellipsis(image, IMAGE_WIDTH),
    }
}

fn ports_summary(ports: &[String]) -> String {
    if ports.len() > 3 {
        format!("{} (+{} more)", ports[..2].join(", "), ports.len() - 2)
    } else {
        ports.join(", ")
    }
}

pub fn battery_section(info: &BatteryInfo, opts: DisplayOptions) -> Sections {
    if !info.present {
        return single("Battery", vec![Row::field("Status", "No battery detected")]);
    }

    let mut rows = vec![
        Row::field("Status", info.status.as_str()),
        Row::field("Charge", percent(info.percentage)),
    ];
    if let Some(remaining) = &info.time_remaining {
        rows.push(Row::field("Time Remaining", remaining.as_str()));
    }
    if let Some(health) = &info.health {
        rows.push(Row::field("Health", health.as_str()));
    }
    if info.power_draw_watts > 0.0 {
        rows.push(Row::field("Power Draw", format!("{:.1} W", info.power_draw_watts)));
    }
    if let Some(cycles) = info.cycle_count.filter(|c| *c > 0) {
        rows.push(Row::field("Cycle Count", cycles.to_string()));
    }
    if let Some(technology) = &info.technology {
        rows.push(Row::field("Technology", technology.as_str()));
    }
    if let Some(wear) = info.wear_percent() {
        rows.push(Row::field(
            "Capacity",
            format!(
                "{:.1} Wh / {:.1} Wh ({:.1}%)",
                info.full_capacity_wh, info.design_capacity_wh, wear
            ),
        ));
    }

    rows.push(Row::text(usage_bar(info.percentage, opts.bar_width())));
    single("Battery", rows)
}

/// Log line colored by the level keywords it contains
fn paint_log_line(line: &str) -> String {
    let line = line.trim();
    match detect_level(line) {
        LogLevel::Error => paint(line, Tone::Danger),
        LogLevel::Warning => paint(line, Tone::Warning),
        LogLevel::Debug => paint(line, Tone::Dim),
        LogLevel::Info => line.to_string(),
    }
}

pub fn container_log_sections(logs: &ContainerLogs) -> Sections {
    let mut rows = vec![
        Row::field("Container", logs.name.as_str()),
        Row::field("ID", logs.id.as_str()),
        Row::field("Lines", logs.lines.len().to_string()),
        Row::Spacer,
    ];
    if logs.lines.is_empty() {
        rows.push(Row::text("No logs found for this container"));
    }
    rows.extend(logs.lines.iter().map(|line| Row::text(paint_log_line(line))));
    single("Container Logs", rows)
}

pub fn docker_sections(containers: &[ContainerInfo]) -> Sections {
    let running: Vec<&ContainerInfo> = containers.iter().filter(|c| c.state == "running").collect();

    let mut summary = vec![Row::field("Containers", format!("{} running", running.len()))];
    if running.is_empty() {
        summary.push(Row::field("Status", "No containers running"));
    }
    let mut sections = single("Docker", summary);

    let mut rows = Vec::new();
    for container in &running {
        let name = container.name.trim_start_matches('/');
        rows.push(Row::field(
            name,
            format!("{:<25} {}", shorten_image(&container.image), container.status),
        ));
        rows.push(Row::field("CPU", percent(container.cpu_percent)));

        let memory = if container.memory_limit_bytes > 0 {
            format!(
                "{} / {} ({:.1}%)",
                format_mb(container.memory_usage_bytes),
                format_mb(container.memory_limit_bytes),
                container.memory_percent
            )
        } else {
            format_mb(container.memory_usage_bytes)
        };
        rows.push(Row::field("Memory", memory));

        if !container.ports.is_empty() {
            rows.push(Row::field("Ports", ports_summary(&container.ports)));
        }
        rows.push(Row::Spacer);
    }

    if !rows.is_empty() {
        sections.insert("Containers", rows);
    }

    if running.len() > 1 {
        let cpu: Vec<f64> = running.iter().map(|c| c.cpu_percent).collect();
        let names: Vec<String> = running
            .iter()
            .map(|c| truncate_with_ellipsis(c.name.trim_start_matches('/'), PROCESS_NAME_WIDTH))
            .collect();
        sections.insert("Container CPU", vec![Row::text(bar_graph(&cpu, &names, 60, ""))]);
    }
    sections
}

pub fn temperature_section(info: &TemperatureInfo) -> Sections {
    let celsius = |value: f64| format!("{:.1}°{}", value, info.units);
    let mut rows = Vec::new();

    if let Some(cpu) = info.cpu_celsius.filter(|c| *c > 0.0) {
        rows.push(Row::field("CPU", celsius(cpu)));
    }
    if let Some(gpu) = info.gpu_celsius.filter(|g| *g > 0.0) {
        rows.push(Row::field("GPU", celsius(gpu)));
    }
    for (name, value) in info.components.iter().filter(|(_, v)| **v > 0.0) {
        rows.push(Row::field(name.as_str(), celsius(*value)));
    }

    if rows.is_empty() {
        rows.push(Row::field("Status", "No temperature sensors detected"));
    }
    single("Temperature", rows)
}

/// How many logs get their own section
pub fn log_display_limit(verbose: bool) -> usize {
    if verbose {
        usize::MAX
    } else {
        MAX_LOGS
    }
}

/// `available` counts the log files found; `logs` holds the ones read,
/// each with its newest-first entries
pub fn log_sections(available: usize, logs: &[(PathBuf, Vec<LogEntry>)], opts: DisplayOptions) -> Sections {
    let mut sections = single(
        "System Logs",
        vec![Row::field("Available Logs", available.to_string())],
    );

    for (path, entries) in logs.iter().take(log_display_limit(opts.verbose)) {
        if entries.is_empty() {
            continue;
        }

        let mut rows = vec![
            Row::field("Path", path.display().to_string()),
            Row::field("Entries", format!("{} shown (newest first)", entries.len())),
            Row::Spacer,
        ];
        for entry in entries {
            let content = if opts.verbose {
                entry.content.clone()
            } else {
                truncate_with_ellipsis(&entry.content, LOG_LINE_WIDTH)
            };
            rows.push(Row::field(format_time(&entry.timestamp), content));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        sections.insert(format!("Log: {}", name), rows);
    }

    sections
}

pub fn alert_sections(alerts: &AlertManager) -> Sections {
    let summary = alerts.summary();
    let mut sections = single(
        "Alert Summary",
        vec![
            Row::field("Critical", summary.critical.to_string()),
            Row::field("Warning", summary.warning.to_string()),
            Row::field("Info", summary.info.to_string()),
            Row::field("Total", summary.total().to_string()),
        ],
    );

    let t = alerts.thresholds();
    sections.insert(
        "Alert Thresholds",
        vec![
            Row::field("CPU Warning", percent(t.cpu_warning)),
            Row::field("CPU Critical", percent(t.cpu_critical)),
            Row::field("Memory Warning", percent(t.memory_warning)),
            Row::field("Memory Critical", percent(t.memory_critical)),
            Row::field("Disk Warning", percent(t.disk_warning)),
            Row::field("Disk Critical", percent(t.disk_critical)),
        ],
    );

    let mut table = Table::new(["Time", "Level", "Resource", "Message"]);
    for alert in alerts.active_alerts().iter().take(MAX_ALERT_ROWS) {
        table.push_row([
            format_time(&alert.timestamp),
            alert.level.label().to_string(),
            alert.resource.clone(),
            truncate_with_ellipsis(&alert.message, ALERT_MESSAGE_WIDTH),
        ]);
    }
    if !table.is_empty() {
        sections.insert("Recent Alerts", vec![Row::Table(table)]);
    }

    sections
}

pub fn history_sections(cpu: &[f64], memory: &[f64], temperature: &TemperatureHistory) -> Sections {
    let mut sections = single(
        "Resource History",
        vec![Row::field("Status", "Resource history tracking is enabled")],
    );
    sections.insert("CPU History", vec![Row::text(line_graph(cpu, 60, 10, ""))]);
    sections.insert("Memory History", vec![Row::text(line_graph(memory, 60, 10, ""))]);

    if !temperature.is_empty() {
        let graph = if temperature.len() < 2 {
            "Not enough temperature data available for graphing".to_string()
        } else {
            line_graph(&temperature.cpu_series(), 60, 10, "CPU Temperature (°C)")
        };
        sections.insert("Temperature History", vec![Row::text(graph)]);
    }

    let sensors: Vec<Row> = temperature
        .component_series()
        .into_iter()
        .filter(|(_, series)| series.len() >= 2)
        .map(|(name, series)| {
            let latest = series.last().copied().unwrap_or_default();
            Row::field(
                name,
                format!("{} {:.1}°C", sparkline(&series, TREND_WIDTH), latest),
            )
        })
        .collect();
    if !sensors.is_empty() {
        sections.insert("Sensor History", sensors);
    }

    sections
}
