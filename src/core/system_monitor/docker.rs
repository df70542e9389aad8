//! Container facts from the `docker` command line.

use std::collections::HashMap;
use std::process::Command;

use crate::error::{MonitorError, Result};

use super::metrics::ContainerInfo;

const PS_FORMAT: &str = "{{.ID}}|{{.Names}}|{{.Image}}|{{.Status}}|{{.Command}}|{{.Ports}}";
const STATS_FORMAT: &str = "{{.ID}}|{{.CPUPerc}}|{{.MemUsage}}|{{.MemPerc}}";

/// Supplies running containers with their resource usage
pub trait ContainerSource: Send {
    fn containers(&self) -> Result<Vec<ContainerInfo>>;
    /// Last `tail` output lines of one container; `0` means all of them
    fn logs(&self, id: &str, tail: usize) -> Result<ContainerLogs>;
}

/// Output lines of one container, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerLogs {
    pub id: String,
    pub name: String,
    pub lines: Vec<String>,
}

/// Resource usage reported by `docker stats` for one container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerStats {
    pub id: String,
    pub cpu_percent: f64,
    pub memory_usage_bytes: u64,
    pub memory_limit_bytes: u64,
    pub memory_percent: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            binary: "docker".to_string(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.binary).args(args).output().map_err(|e| {
            MonitorError::collector_unavailable(format!(
                "Docker doesn't appear to be installed or isn't running ({})",
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MonitorError::collector_unavailable(format!(
                "{} {} failed: {}",
                self.binary,
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ContainerSource for DockerCli {
    fn containers(&self) -> Result<Vec<ContainerInfo>> {
        let listing = self.run(&["ps", "--format", PS_FORMAT])?;
        let mut containers = parse_ps_output(&listing);

        if containers.iter().any(|c| c.state == "running") {
            match self.run(&["stats", "--no-stream", "--format", STATS_FORMAT]) {
                Ok(output) => {
                    let stats: HashMap<String, ContainerStats> = output
                        .lines()
                        .filter(|line| !line.trim().is_empty())
                        .filter_map(|line| match parse_stats_line(line) {
                            Ok(stats) => Some((stats.id.clone(), stats)),
                            Err(e) => {
                                log::debug!("{}", e);
                                None
                            }
                        })
                        .collect();
                    apply_stats(&mut containers, &stats);
                }
                Err(e) => log::debug!("docker stats unavailable: {}", e),
            }
        }

        Ok(containers)
    }

    fn logs(&self, id: &str, tail: usize) -> Result<ContainerLogs> {
        let name = self
            .run(&["inspect", "--format", "{{.Name}}", id])
            .map_err(|e| {
                log::debug!("docker inspect {}: {}", id, e);
                MonitorError::collector_unavailable(format!("container '{}' not found", id))
            })?;
        let name = name.trim().trim_start_matches('/');

        let tail_arg = tail_argument(tail);
        let output = self.run(&["logs", "--tail", &tail_arg, id])?;

        Ok(ContainerLogs {
            id: id.to_string(),
            name: if name.is_empty() { id } else { name }.to_string(),
            lines: split_log_output(&output),
        })
    }
}

/// `docker logs --tail` value; zero asks for everything
pub fn tail_argument(tail: usize) -> String {
    if tail == 0 {
        "all".to_string()
    } else {
        tail.to_string()
    }
}

/// Split raw log output into lines, dropping the empty one after the final newline
pub fn split_log_output(output: &str) -> Vec<String> {
    let mut lines: Vec<String> = output
        .split('\n')
        .map(|l| l.trim_end_matches('\r').to_string())
        .collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Container state derived from the human `Status` column
pub fn state_from_status(status: &str) -> &'static str {
    if status.starts_with("Up") {
        "running"
    } else if status.starts_with("Exited") {
        "exited"
    } else if status.starts_with("Created") {
        "created"
    } else {
        "unknown"
    }
}

/// Parse `docker ps` output; lines with too few fields are skipped
pub fn parse_ps_output(output: &str) -> Vec<ContainerInfo> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line.split('|').collect();
            if parts.len() < 5 {
                log::debug!("skipping malformed docker ps line: {}", line);
                return None;
            }

            let ports = parts
                .get(5)
                .map(|p| {
                    p.split(", ")
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();

            let status = parts[3].trim().to_string();
            Some(ContainerInfo {
                id: parts[0].trim().to_string(),
                name: parts[1].trim().trim_start_matches('/').to_string(),
                image: parts[2].trim().to_string(),
                state: state_from_status(&status).to_string(),
                status,
                command: parts[4].trim().trim_matches('"').to_string(),
                ports,
                ..Default::default()
            })
        })
        .collect()
}

/// Convert a docker size like `12.5MiB` or `1.2 GB` to bytes
pub fn parse_size(text: &str) -> Option<u64> {
    let text = text.trim();
    let split = text
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let value: f64 = number.trim().parse().ok()?;

    let multiplier = match unit.trim() {
        "B" | "" => 1.0,
        "KiB" | "KB" | "kB" => 1024.0,
        "MiB" | "MB" => 1024.0 * 1024.0,
        "GiB" | "GB" => 1024.0 * 1024.0 * 1024.0,
        "TiB" | "TB" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };

    Some((value * multiplier) as u64)
}

fn parse_percent(text: &str) -> Option<f64> {
    text.trim().trim_end_matches('%').trim().parse().ok()
}

/// Parse one `docker stats` line in `ID|CPU%|usage / limit|MEM%` form
pub fn parse_stats_line(line: &str) -> Result<ContainerStats> {
    let parts: Vec<&str> = line.trim().split('|').collect();
    if parts.len() < 4 {
        return Err(MonitorError::parse(format!(
            "expected 4 fields in docker stats line, got {}: {}",
            parts.len(),
            line
        )));
    }

    let mut usage = parts[2].split('/');
    let memory_usage_bytes = usage.next().and_then(parse_size).unwrap_or(0);
    let memory_limit_bytes = usage.next().and_then(parse_size).unwrap_or(0);

    Ok(ContainerStats {
        id: parts[0].trim().to_string(),
        cpu_percent: parse_percent(parts[1]).unwrap_or(0.0),
        memory_usage_bytes,
        memory_limit_bytes,
        memory_percent: parse_percent(parts[3]).unwrap_or(0.0),
    })
}

/// Attach stats to containers; `docker stats` may print short or long ids
pub fn apply_stats(containers: &mut [ContainerInfo], stats: &HashMap<String, ContainerStats>) {
    for container in containers.iter_mut() {
        let found = stats.get(&container.id).or_else(|| {
            stats
                .values()
                .find(|s| s.id.starts_with(&container.id) || container.id.starts_with(&s.id))
        });

        if let Some(s) = found {
            container.cpu_percent = s.cpu_percent;
            container.memory_usage_bytes = s.memory_usage_bytes;
            container.memory_limit_bytes = s.memory_limit_bytes;
            container.memory_percent = s.memory_percent;
        }
    }
}
