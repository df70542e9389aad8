use sysglance::ui::layout::{effective_width, render_frame, Row, Sections, FALLBACK_WIDTH, MAX_WIDTH};
use sysglance::ui::strip_ansi;
use sysglance::ui::table::{negotiate_widths, render_table, Table};

fn plain(lines: &[String]) -> Vec<String> {
    lines.iter().map(|l| strip_ansi(l)).collect()
}

fn position(lines: &[String], needle: &str) -> usize {
    lines
        .iter()
        .position(|l| l.contains(needle))
        .unwrap_or_else(|| panic!("{} not rendered", needle))
}

#[test]
fn test_width_negotiation() {
    assert_eq!(negotiate_widths(&[5, 20, 10], 30), vec![5, 13, 7]);
    assert_eq!(negotiate_widths(&[5, 20, 10], 100), vec![5, 20, 10]);
}

#[test]
fn test_terminal_width_is_capped() {
    assert_eq!(effective_width(Some(200)), MAX_WIDTH);
    assert_eq!(effective_width(Some(90)), 90);
    assert_eq!(effective_width(Some(0)), FALLBACK_WIDTH);
    assert_eq!(effective_width(None), FALLBACK_WIDTH);
}

#[test]
fn test_priority_then_alphabetical() {
    let mut sections = Sections::new();
    sections.insert("Zeta Extra", vec![Row::field("Z", "1")]);
    sections.insert("Alpha Extra", vec![Row::field("A", "1")]);
    sections.insert("Memory", vec![Row::field("Used", "1 MB")]);
    sections.insert("CPU", vec![Row::field("CPUs", "4 cores")]);
    sections.insert("Empty", Vec::new());

    let lines = plain(&render_frame(&sections, 80));
    let cpu = position(&lines, "CPUs:");
    let memory = position(&lines, "Used:");
    let alpha = position(&lines, "A:");
    let zeta = position(&lines, "Z:");
    assert!(cpu < memory && memory < alpha && alpha < zeta);
    assert!(!lines.iter().any(|l| l.contains("Empty")));
}

#[test]
fn test_top_level_sections_have_no_header() {
    let mut sections = Sections::new();
    sections.insert("System", vec![Row::field("Hostname", "box")]);
    sections.insert("Disk", vec![Row::field("Path", "/")]);

    let lines = plain(&render_frame(&sections, 80));
    assert!(!lines.iter().any(|l| l.contains("┏") && l.contains("System")));
    assert!(lines.iter().any(|l| l.contains("┏") && l.contains("Disk")));
}

#[test]
fn test_labels_align_within_section() {
    let mut sections = Sections::new();
    sections.insert(
        "Memory",
        vec![Row::field("Total", "16 GB"), Row::field("Swap Used", "1 GB")],
    );

    let lines = plain(&render_frame(&sections, 80));
    let total = &lines[position(&lines, "Total:")];
    let swap = &lines[position(&lines, "Swap Used:")];
    let value_col = |line: &str, value: &str| {
        let idx = line.find(value).unwrap();
        sysglance::ui::formatters::display_width(&line[..idx])
    };
    assert_eq!(value_col(total, "16 GB"), value_col(swap, "1 GB"));
}

#[test]
fn test_table_inside_frame() {
    let mut table = Table::new(["PID", "Name"]);
    table.push_row(["42", "busy"]);
    let mut sections = Sections::new();
    sections.insert("Top Processes", vec![Row::Table(table.clone())]);

    let frame = plain(&render_frame(&sections, 80));
    let rendered = plain(&render_table(&table, 80));
    let start = position(&frame, "PID");
    assert_eq!(&frame[start..start + rendered.len()], rendered.as_slice());
    assert!(rendered[1].chars().all(|c| c == ' ' || c == '─' || c == '┼'));
}
