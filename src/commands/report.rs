//! Single-shot output, either the rendered frame or a JSON report.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::ui::layout::{print_frame, render_frame, terminal_width};
use crate::ui::theme::{paint, Tone};
use crate::ui::{Dashboard, MonitorReport};

use super::RunOptions;

pub fn to_json(report: &MonitorReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn footer_line() -> String {
    format!(
        " sysglance v{} | Use '--watch' for live monitoring ",
        env!("CARGO_PKG_VERSION")
    )
}

pub fn execute(dashboard: &mut Dashboard, options: &RunOptions) -> Result<()> {
    dashboard.prime();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

    if options.json {
        let report = dashboard.collect_report(&options.selection, options.display.verbose);
        match to_json(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::warn!("report encoding failed: {}", e);
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
        }
        return Ok(());
    }

    let width = terminal_width();
    let sections = dashboard.build_sections(&options.selection, options.display);
    let mut lines = render_frame(&sections, width);
    lines.push(paint(&footer_line(), Tone::Info));
    lines.push(String::new());
    print_frame(&lines).context("Failed to write report")?;

    if options.ack_alerts {
        dashboard.acknowledge_alerts();
    }
    Ok(())
}
