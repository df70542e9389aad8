//! One-off view of a container's recent output.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::system_monitor::ContainerLogs;
use crate::ui::layout::{print_frame, render_frame, terminal_width};
use crate::ui::sections::container_log_sections;
use crate::ui::Dashboard;

pub const DEFAULT_TAIL: usize = 50;

#[derive(Debug, Serialize)]
struct LogLine<'a> {
    container: &'a str,
    message: &'a str,
}

/// JSON array of `{container, message}` objects, oldest line first
pub fn to_json(logs: &ContainerLogs) -> serde_json::Result<String> {
    let lines: Vec<LogLine> = logs
        .lines
        .iter()
        .map(|message| LogLine {
            container: &logs.id,
            message,
        })
        .collect();
    serde_json::to_string_pretty(&lines)
}

pub fn execute(dashboard: &Dashboard, id: &str, tail: usize, json: bool) -> Result<()> {
    let logs = dashboard
        .container_logs(id, tail)
        .with_context(|| format!("Error fetching container logs for '{}'", id))?;
    log::debug!("fetched {} lines from container {}", logs.lines.len(), id);

    if json {
        println!("{}", to_json(&logs).context("Failed to encode container logs")?);
        return Ok(());
    }

    let mut lines = render_frame(&container_log_sections(&logs), terminal_width());
    lines.push(String::new());
    print_frame(&lines).context("Failed to write container logs")?;
    Ok(())
}
