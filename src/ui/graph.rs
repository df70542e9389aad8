//! Fixed-purpose text graphs built from block glyphs.

use super::formatters::pad_right;
use super::theme::{paint, usage_severity, Tone, UsageCategory};

const SPARK_CHARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn max_of(data: &[f64]) -> f64 {
    data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Last `width` points of `data`
fn tail(data: &[f64], width: usize) -> &[f64] {
    &data[data.len().saturating_sub(width)..]
}

pub fn sparkline(data: &[f64], width: usize) -> String {
    if data.is_empty() {
        return String::new();
    }

    let max = max_of(data).max(0.001);
    tail(data, width)
        .iter()
        .map(|v| {
            let idx = ((v / max) * (SPARK_CHARS.len() - 1) as f64) as isize;
            SPARK_CHARS[idx.clamp(0, SPARK_CHARS.len() as isize - 1) as usize]
        })
        .collect()
}

/// Single-row traffic bars colored by the average rate, with a max legend
pub fn traffic_graph(data: &[f64], width: usize, height: usize) -> String {
    if data.is_empty() {
        return "No data".to_string();
    }

    let max = max_of(data).max(0.1);
    let visible = tail(data, width);
    let average = visible.iter().sum::<f64>() / visible.len() as f64;
    let tone = usage_severity(average, UsageCategory::Traffic).tone();

    let height = height.max(1);
    let scale = height as f64 / max;
    let bars: String = visible
        .iter()
        .map(|v| {
            let bar = ((v * scale) as usize).min(height);
            if bar == 0 {
                '_'
            } else if bar < height / 3 {
                '▁'
            } else if bar < 2 * height / 3 {
                '▄'
            } else {
                '█'
            }
        })
        .collect();

    format!("{} {:.1} Mbps", paint(&bars, tone), max)
}

/// Dot plot with a left axis and max/mid/zero labels
pub fn line_graph(data: &[f64], width: usize, height: usize, title: &str) -> String {
    if data.is_empty() {
        return "No data".to_string();
    }

    let height = height.max(2);
    let max = (max_of(data) * 1.1).max(0.001);
    let visible = tail(data, width.saturating_sub(2).max(1));

    let mut grid = vec![vec![' '; visible.len()]; height];
    for (x, v) in visible.iter().enumerate() {
        let scaled = (((v / max) * height as f64) as usize).min(height);
        if scaled > 0 {
            grid[height - scaled][x] = '•';
        }
    }

    let mut lines = Vec::with_capacity(height + 3);
    if !title.is_empty() {
        lines.push(paint(title, Tone::Section));
    }
    lines.push(format!("┬ {:.2}", max));
    let middle = height / 2;
    for (i, row) in grid.iter().enumerate() {
        let points: String = row.iter().collect();
        if i == middle {
            lines.push(format!("├ {:.2} {}", max / 2.0, points));
        } else {
            lines.push(format!("│{}", points));
        }
    }
    lines.push(format!("└{} {:.2}", "─".repeat(visible.len()), 0.0));
    lines.join("\n")
}

/// Horizontal bars scaled to the largest value
pub fn bar_graph(data: &[f64], labels: &[String], width: usize, title: &str) -> String {
    if data.is_empty() || data.len() != labels.len() {
        return "No data or mismatched data/labels".to_string();
    }

    let max = max_of(data);
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let bar_width = width.saturating_sub(label_width + 15).max(10);

    let mut lines = Vec::with_capacity(data.len() + 1);
    if !title.is_empty() {
        lines.push(paint(title, Tone::Section));
    }

    for (value, label) in data.iter().zip(labels) {
        let ratio = if max > 0.0 { value / max } else { 0.0 };
        let len = ((ratio * bar_width as f64) as usize).max(1);
        let tone = usage_severity(ratio * 100.0, UsageCategory::Relative).tone();
        lines.push(format!(
            "  {} {} {}",
            pad_right(&paint(label, Tone::Label), label_width),
            paint(&"█".repeat(len), tone),
            paint(&format!("{:.2}", value), Tone::Value)
        ));
    }
    lines.join("\n")
}

/// `■■■□□□  42.0%` sized to `width` cells
pub fn usage_bar(percentage: f64, width: usize) -> String {
    let percentage = if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    };
    let tone = usage_severity(percentage, UsageCategory::General).tone();

    let bar_width = width.saturating_sub(9).max(5);
    let filled = ((bar_width as f64 * percentage / 100.0) as usize).min(bar_width);

    format!(
        "{}{} {}",
        paint(&"■".repeat(filled), tone),
        paint(&"□".repeat(bar_width - filled), Tone::Dim),
        paint(&format!("{:5.1}%", percentage), tone)
    )
}
