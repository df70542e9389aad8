//! Turns named sections into an aligned, colored terminal frame.
//!
//! [`render_frame`] is pure: the same sections and width always give the
//! same lines. Printing is a separate step.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::error::{MonitorError, Result};

use super::formatters::display_width;
use super::table::{render_table, Table};
use super::theme::{
    format_value_with_context, paint, section_icon, Tone, BOX_HORIZONTAL, BOX_LEFT_T,
    BOX_RIGHT_T, BOX_TOP_LEFT, BULLET, THIN_HORIZONTAL,
};

pub const MAX_WIDTH: usize = 120;
pub const FALLBACK_WIDTH: usize = 80;

/// Sections rendered first, in this order
pub const SECTION_PRIORITY: &[&str] = &[
    "System",
    "CPU",
    "Memory",
    "Disk",
    "Network",
    "Runtime Environment",
    "Network Traffic",
    "Top Processes",
    "Processes",
    "Docker",
    "Containers",
    "Container CPU",
    "Container Logs",
    "Temperature",
    "Battery",
    "System Logs",
    "Resource History",
    "Alert Summary",
    "Alert Thresholds",
    "Recent Alerts",
];

/// Sections printed without a boxed header
const TOP_LEVEL_SECTIONS: &[&str] = &["System", "Runtime Environment", "Overview"];

#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Spacer,
    Text(String),
    Field { label: String, value: String },
    Table(Table),
}

impl Row {
    pub fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        let label = label.into();
        let value = value.into();
        match (label.is_empty(), value.is_empty()) {
            (true, true) => Row::Spacer,
            (true, false) => Row::Text(value),
            _ => Row::Field { label, value },
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Row::Text(value.into())
    }
}

/// Named groups of rows; one per dashboard area
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    sections: BTreeMap<String, Vec<Row>>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.sections.insert(name.into(), rows);
    }

    pub fn extend(&mut self, other: Sections) {
        self.sections.extend(other.sections);
    }

    pub fn get(&self, name: &str) -> Option<&Vec<Row>> {
        self.sections.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Priority sections first, then the rest alphabetically
    pub fn ordered_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = SECTION_PRIORITY
            .iter()
            .copied()
            .filter(|name| self.sections.contains_key(*name))
            .collect();
        names.extend(
            self.sections
                .keys()
                .map(String::as_str)
                .filter(|name| !SECTION_PRIORITY.contains(name)),
        );
        names
    }
}

impl FromIterator<(String, Vec<Row>)> for Sections {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Row>)>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}

pub fn effective_width(columns: Option<u16>) -> usize {
    match columns {
        Some(cols) if cols > 0 => (cols as usize).min(MAX_WIDTH),
        _ => FALLBACK_WIDTH,
    }
}

pub fn terminal_width() -> usize {
    effective_width(crossterm::terminal::size().ok().map(|(cols, _)| cols))
}

fn section_header(name: &str, width: usize) -> [String; 2] {
    let title = format!("{}{}", section_icon(name), name);
    [
        format!(
            " {}{} {} {}",
            BOX_TOP_LEFT,
            BOX_HORIZONTAL,
            paint(&title, Tone::Section),
            BOX_HORIZONTAL
        ),
        format!(
            " {}{}{}",
            BOX_LEFT_T,
            THIN_HORIZONTAL.repeat(width.saturating_sub(4)),
            BOX_RIGHT_T
        ),
    ]
}

fn render_rows(rows: &[Row], width: usize, out: &mut Vec<String>) {
    // Label column includes the trailing colon
    let label_width = rows
        .iter()
        .filter_map(|row| match row {
            Row::Field { label, .. } => Some(display_width(label) + 1),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    let value_indent = " ".repeat(2 + display_width(BULLET) + 1 + label_width + 1);

    for row in rows {
        match row {
            Row::Spacer => out.push(String::new()),
            Row::Text(text) => {
                for line in text.lines() {
                    out.push(format!("  {}", paint(line, Tone::Value)));
                }
            }
            Row::Field { label, value } => {
                let label = format!("{}:", label);
                let padding = " ".repeat(label_width - display_width(&label) + 1);
                let value = format_value_with_context(label.trim_end_matches(':'), value);
                let mut lines = value.lines();
                let first = lines.next().unwrap_or("");
                out.push(format!(
                    "  {} {}{}{}",
                    paint(BULLET, Tone::Accent),
                    paint(&label, Tone::Label),
                    padding,
                    first
                ));
                for line in lines {
                    out.push(format!("{}{}", value_indent, line));
                }
            }
            Row::Table(table) => out.extend(render_table(table, width)),
        }
    }
}

/// Render every non-empty section into printable lines
pub fn render_frame(sections: &Sections, width: usize) -> Vec<String> {
    let mut out = Vec::new();

    for name in sections.ordered_names() {
        let rows = match sections.get(name) {
            Some(rows) if !rows.is_empty() => rows,
            _ => continue,
        };

        if TOP_LEVEL_SECTIONS.contains(&name) {
            out.push(String::new());
        } else {
            out.extend(section_header(name, width));
        }

        render_rows(rows, width, &mut out);
        out.push(String::new());
    }

    out
}

fn terminal_error(e: io::Error) -> MonitorError {
    MonitorError::terminal(e.to_string())
}

pub fn print_frame(lines: &[String]) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in lines {
        writeln!(handle, "{}", line).map_err(terminal_error)?;
    }
    handle.flush().map_err(terminal_error)
}

/// Wipe the screen and home the cursor
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)).map_err(terminal_error)?;
    stdout.flush().map_err(terminal_error)
}
