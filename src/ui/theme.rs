//! Colors, glyphs and severity-to-style mapping.
//!
//! Threshold logic lives in [`usage_severity`] / [`status_severity`]; the
//! mapping from a [`Severity`] to a color lives in [`Severity::tone`]. The
//! two never mix.

use colored::{ColoredString, Colorize};
use once_cell::sync::Lazy;
use regex::Regex;

pub const BOX_HORIZONTAL: &str = "━";
pub const BOX_TOP_LEFT: &str = "┏";
pub const BOX_LEFT_T: &str = "┣";
pub const BOX_RIGHT_T: &str = "┫";
pub const THIN_HORIZONTAL: &str = "─";
pub const BULLET: &str = "•";

static PERCENT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Title,
    Section,
    Label,
    Value,
    Success,
    Warning,
    Danger,
    Subtitle,
    Accent,
    Dim,
    Info,
}

pub fn paint(text: &str, tone: Tone) -> String {
    let styled: ColoredString = match tone {
        Tone::Title => text.bright_cyan().bold(),
        Tone::Section => text.bright_blue().bold(),
        Tone::Label => text.bright_yellow(),
        Tone::Value => text.bright_white(),
        Tone::Success => text.bright_green(),
        Tone::Warning => text.bright_yellow(),
        Tone::Danger => text.bright_red(),
        Tone::Subtitle => text.cyan(),
        Tone::Accent => text.bright_magenta(),
        Tone::Dim => text.white(),
        Tone::Info => text.bright_cyan(),
    };
    styled.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    pub fn tone(self) -> Tone {
        match self {
            Severity::Normal => Tone::Success,
            Severity::Warning => Tone::Warning,
            Severity::Critical => Tone::Danger,
        }
    }

    pub fn paint(self, text: &str) -> String {
        paint(text, self.tone())
    }
}

/// Resource families with their own color cutoffs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageCategory {
    General,
    Cpu,
    Memory,
    Disk,
    /// Per-process CPU% / Mem% columns
    Process,
    /// Average traffic in Mbps
    Traffic,
    /// Percentage of the largest value in a graph
    Relative,
}

impl UsageCategory {
    /// (warning, critical) lower bounds
    pub fn cutoffs(self) -> (f64, f64) {
        match self {
            UsageCategory::General
            | UsageCategory::Cpu
            | UsageCategory::Memory
            | UsageCategory::Disk => (60.0, 85.0),
            UsageCategory::Process => (10.0, 50.0),
            UsageCategory::Traffic => (1.0, 10.0),
            UsageCategory::Relative => (30.0, 70.0),
        }
    }
}

pub fn usage_severity(value: f64, category: UsageCategory) -> Severity {
    let (warning, critical) = category.cutoffs();
    if value < warning {
        Severity::Normal
    } else if value < critical {
        Severity::Warning
    } else {
        Severity::Critical
    }
}

/// Severity implied by a status word, if any
pub fn status_severity(value: &str) -> Option<Severity> {
    match value {
        "Up" | "Running" | "Active" => Some(Severity::Normal),
        "Down" | "Stopped" => Some(Severity::Critical),
        v if v.contains("OK") => Some(Severity::Normal),
        v if v.contains("Error") => Some(Severity::Critical),
        _ => None,
    }
}

/// Disable colors for the rest of the process
pub fn disable_colors() {
    colored::control::set_override(false);
}

pub fn section_icon(name: &str) -> &'static str {
    match name {
        "System" | "Runtime Environment" | "Runtime" => "ℹ ",
        "CPU" => "⚙ ",
        "Memory" => "□ ",
        "Disk" => "○ ",
        "Network" | "Network Traffic" => "⤭ ",
        "Top Processes" | "Processes" => "⏺ ",
        "Docker" | "Containers" | "Container CPU" | "Container Logs" => "🐳 ",
        "Battery" => "🔋 ",
        "Temperature" => "🌡 ",
        "Alert Summary" | "Recent Alerts" | "Alert Thresholds" => "⚠ ",
        _ => "• ",
    }
}

/// Color a value by what its label says it is.
///
/// Values that already carry escape codes are returned untouched.
pub fn format_value_with_context(label: &str, value: &str) -> String {
    if value.contains('\u{1b}') {
        return value.to_string();
    }

    if label.contains("Usage") {
        let percent = PERCENT
            .as_ref()
            .and_then(|re| re.captures(value))
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        if let Some(percent) = percent {
            return usage_severity(percent, UsageCategory::General).paint(value);
        }
    }

    if label == "Status" {
        if let Some(severity) = status_severity(value) {
            return severity.paint(value);
        }
    }

    paint(value, Tone::Value)
}
