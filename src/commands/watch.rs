//! Watch mode: sample, render, sleep, repeat until Ctrl+C.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use crate::ui::layout::{clear_screen, print_frame, render_frame, terminal_width};
use crate::ui::theme::{paint, Tone};
use crate::ui::Dashboard;

use super::RunOptions;

pub const MIN_REFRESH_SECS: u64 = 1;

pub fn validate_modes(json: bool, watch: bool) -> Result<()> {
    if json && watch {
        bail!("Watch mode is not compatible with JSON output");
    }
    Ok(())
}

pub fn clamp_refresh(secs: u64) -> u64 {
    secs.max(MIN_REFRESH_SECS)
}

/// Rule, banner, rule
pub fn header_lines(refresh_secs: u64, now: &DateTime<Local>, width: usize) -> [String; 3] {
    let rule = paint(&"─".repeat(width), Tone::Info);
    let banner = format!(
        " WATCH MODE | Refresh: {}s | {} | Press Ctrl+C to exit ",
        refresh_secs,
        now.format("%Y-%m-%d %H:%M:%S")
    );
    [rule.clone(), paint(&banner, Tone::Title), rule]
}

/// Fixed-interval pacing that a stop signal can cut short
pub struct WatchLoop {
    interval: Duration,
    stop: Receiver<()>,
}

impl WatchLoop {
    /// Pacing driven by Ctrl+C
    pub fn new(refresh_secs: u64) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        ctrlc::set_handler(move || {
            let _ = tx.send(());
        })
        .context("Failed to set Ctrl+C handler")?;

        Ok(Self::with_stop(Duration::from_secs(clamp_refresh(refresh_secs)), rx))
    }

    pub fn with_stop(interval: Duration, stop: Receiver<()>) -> Self {
        Self { interval, stop }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep one interval. Returns false once a stop was requested.
    pub fn wait(&self) -> bool {
        match self.stop.recv_timeout(self.interval) {
            Err(RecvTimeoutError::Timeout) => true,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}

pub fn execute(dashboard: &mut Dashboard, options: &RunOptions) -> Result<()> {
    let pacing = WatchLoop::new(options.refresh_secs)?;
    dashboard.prime();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

    loop {
        let width = terminal_width();
        let sections = dashboard.build_sections(&options.selection, options.display);

        clear_screen().context("Failed to clear screen")?;
        let mut lines: Vec<String> = header_lines(options.refresh_secs, &Local::now(), width).into();
        lines.extend(render_frame(&sections, width));
        print_frame(&lines).context("Failed to write frame")?;

        if options.ack_alerts {
            dashboard.acknowledge_alerts();
        }

        if !pacing.wait() {
            break;
        }
    }

    println!();
    println!("{}", paint("Watch mode stopped.", Tone::Subtitle));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::formatters::strip_ansi;
    use chrono::TimeZone;

    #[test]
    fn test_modes_are_exclusive() {
        assert!(validate_modes(true, true).is_err());
        assert!(validate_modes(true, false).is_ok());
        assert!(validate_modes(false, true).is_ok());
    }

    #[test]
    fn test_refresh_floor() {
        assert_eq!(clamp_refresh(0), 1);
        assert_eq!(clamp_refresh(5), 5);
    }

    #[test]
    fn test_header_text() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        let lines = header_lines(2, &now, 10);
        assert_eq!(strip_ansi(&lines[0]), "─".repeat(10));
        assert_eq!(
            strip_ansi(&lines[1]),
            " WATCH MODE | Refresh: 2s | 2024-03-01 09:05:07 | Press Ctrl+C to exit "
        );
    }

    #[test]
    fn test_wait_stops_on_signal() {
        let (tx, rx) = mpsc::channel();
        let pacing = WatchLoop::with_stop(Duration::from_millis(10), rx);
        assert!(pacing.wait());

        tx.send(()).unwrap();
        assert!(!pacing.wait());

        drop(tx);
        assert!(!pacing.wait());
    }
}
