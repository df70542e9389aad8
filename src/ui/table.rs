//! Column-aligned tables that shrink to the terminal width.

use super::formatters::{display_width, pad_right, truncate_with_ellipsis};
use super::theme::{paint, usage_severity, Tone, UsageCategory};

/// Separator cells between columns
pub const COLUMN_PADDING: usize = 3;
/// Indent plus borders around a row
pub const TABLE_OVERHEAD: usize = 4;
pub const MIN_COLUMN_WIDTH: usize = 5;

const SEPARATOR: &str = " │ ";
const RULE_JOIN: &str = "─┼─";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Numeric columns colored by usage
    pub severity_columns: Vec<(usize, UsageCategory)>,
}

impl Table {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            severity_columns: Vec::new(),
        }
    }

    pub fn with_severity_column(mut self, column: usize, category: UsageCategory) -> Self {
        self.severity_columns.push((column, category));
        self
    }

    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn category_of(&self, column: usize) -> Option<UsageCategory> {
        self.severity_columns
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, category)| *category)
    }
}

/// Widest cell per column, header included
pub fn natural_widths(table: &Table) -> Vec<usize> {
    let mut widths = vec![0; table.column_count()];
    for row in std::iter::once(&table.header).chain(table.rows.iter()) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }
    widths
}

/// Shrink `natural` widths to fit `available` cells.
///
/// Each column gives up `width * excess / total` (integer division) and is
/// then raised back to [`MIN_COLUMN_WIDTH`] if it fell below it.
pub fn negotiate_widths(natural: &[usize], available: usize) -> Vec<usize> {
    let total: usize = TABLE_OVERHEAD + natural.iter().map(|w| w + COLUMN_PADDING).sum::<usize>();
    if total <= available {
        return natural.to_vec();
    }

    let excess = total - available;
    natural
        .iter()
        .map(|&w| {
            let reduction = w * excess / total;
            (w - reduction).max(MIN_COLUMN_WIDTH)
        })
        .collect()
}

fn fit(cell: &str, width: usize) -> String {
    if display_width(cell) > width {
        truncate_with_ellipsis(cell, width)
    } else {
        cell.to_string()
    }
}

/// Render `table` into printable lines no wider than `width` where possible
pub fn render_table(table: &Table, width: usize) -> Vec<String> {
    let widths = negotiate_widths(&natural_widths(table), width);
    let mut lines = Vec::with_capacity(table.rows.len() + 2);

    let header: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let cell = table.header.get(i).map(String::as_str).unwrap_or("");
            pad_right(&paint(&fit(cell, w), Tone::Label), w)
        })
        .collect();
    lines.push(format!("  {}", header.join(SEPARATOR)));

    let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
    lines.push(format!("  {}", rule.join(RULE_JOIN)));

    for row in &table.rows {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let raw = row.get(i).map(String::as_str).unwrap_or("");
                let cell = fit(raw, w);
                let painted = match (table.category_of(i), raw.trim().parse::<f64>()) {
                    (Some(category), Ok(value)) => usage_severity(value, category).paint(&cell),
                    _ => cell,
                };
                pad_right(&painted, w)
            })
            .collect();
        lines.push(format!("  {}", cells.join(SEPARATOR).trim_end()));
    }

    lines
}
