use sysglance::core::system_monitor::{AlertLevel, BatteryInfo};
use sysglance::ui::layout::{render_frame, Row, Sections};
use sysglance::ui::{strip_ansi, DisplayOptions};
use sysglance::{Config, Dashboard, SectionSelection};

use super::support::{FakeContainers, FakeSource};
use tempfile::TempDir;

fn dashboard(source: FakeSource, containers: FakeContainers) -> Dashboard {
    let config = Config {
        log_paths: vec!["/definitely/not/here.log".to_string()],
        temperature_sample_secs: 0,
        ..Default::default()
    };
    Dashboard::with_sources(&config, Box::new(source), Box::new(containers))
}

fn log_dashboard(paths: &[std::path::PathBuf]) -> Dashboard {
    let config = Config {
        log_paths: paths.iter().map(|p| p.to_string_lossy().to_string()).collect(),
        temperature_sample_secs: 0,
        ..Default::default()
    };
    Dashboard::with_sources(
        &config,
        Box::new(FakeSource::new(20.0)),
        Box::new(FakeContainers::missing()),
    )
}

fn field(sections: &Sections, section: &str, label: &str) -> Option<String> {
    sections.get(section)?.iter().find_map(|row| match row {
        Row::Field { label: l, value } if l == label => Some(strip_ansi(value)),
        _ => None,
    })
}

#[test]
fn test_selected_sections_only() {
    let mut dash = dashboard(FakeSource::new(20.0), FakeContainers::missing());
    let selection = SectionSelection {
        cpu: true,
        memory: true,
        ..Default::default()
    };

    let sections = dash.build_sections(&selection, DisplayOptions::default());
    assert!(sections.contains("CPU"));
    assert!(sections.contains("Memory"));
    assert!(!sections.contains("Disk"));
    assert_eq!(field(&sections, "CPU", "CPUs").as_deref(), Some("4 cores"));
}

#[test]
fn test_failing_area_is_contained() {
    let mut source = FakeSource::new(20.0);
    source.fail_processes = true;
    let mut dash = dashboard(source, FakeContainers::missing());
    let selection = SectionSelection {
        cpu: true,
        processes: true,
        docker: true,
        ..Default::default()
    };

    let sections = dash.build_sections(&selection, DisplayOptions::default());
    assert!(field(&sections, "Processes", "Status").unwrap().starts_with("Error:"));
    assert!(field(&sections, "Docker", "Status")
        .unwrap()
        .contains("docker not installed"));
    assert_eq!(field(&sections, "CPU", "Usage").as_deref(), Some("20.0%"));
}

#[test]
fn test_all_renders_every_area() {
    let mut dash = dashboard(FakeSource::new(20.0), FakeContainers::running(&["web"]));
    dash.prime();

    let sections = dash.build_sections(&SectionSelection::all(), DisplayOptions::default());
    for name in [
        "System",
        "Runtime Environment",
        "CPU",
        "Memory",
        "Disk",
        "Network",
        "Network Traffic",
        "Processes",
        "Top Processes",
        "Docker",
        "Containers",
        "Temperature",
        "Battery",
        "System Logs",
        "Resource History",
    ] {
        assert!(sections.contains(name), "missing section {}", name);
    }
    assert!(!sections.contains("Alert Summary"));

    let lines = render_frame(&sections, 100);
    assert!(lines.iter().any(|l| strip_ansi(l).contains("Hostname:")));
}

#[test]
fn test_traffic_rates_after_prime() {
    let mut dash = dashboard(FakeSource::new(20.0), FakeContainers::missing());
    dash.prime();
    std::thread::sleep(std::time::Duration::from_millis(150));

    let selection = SectionSelection {
        traffic: true,
        ..Default::default()
    };
    let sections = dash.build_sections(&selection, DisplayOptions::default());
    assert!(sections.contains("Interface: eth0"));
    let (rx, tx) = dash.traffic().history("eth0");
    assert_eq!(rx.len(), 1);
    assert!(rx[0] > 0.0 && tx[0] > 0.0);
}

#[test]
fn test_alerts_evaluated_when_selected() {
    let mut dash = dashboard(FakeSource::new(95.0), FakeContainers::missing());
    let selection = SectionSelection {
        alerts: true,
        ..Default::default()
    };

    let sections = dash.build_sections(&selection, DisplayOptions::default());
    assert_eq!(field(&sections, "Alert Summary", "Critical").as_deref(), Some("1"));
    assert!(sections.contains("Recent Alerts"));

    let alerts = dash.active_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Critical);
    assert_eq!(alerts[0].resource, "CPU");

    dash.acknowledge_alerts();
    assert!(dash.active_alerts().is_empty());
    let sections = dash.build_sections(&SectionSelection::default(), DisplayOptions::default());
    assert!(sections.is_empty());
}

#[test]
fn test_no_alerts_without_flag() {
    let mut dash = dashboard(FakeSource::new(95.0), FakeContainers::missing());
    let selection = SectionSelection {
        cpu: true,
        ..Default::default()
    };
    dash.build_sections(&selection, DisplayOptions::default());
    assert!(dash.active_alerts().is_empty());
}

#[test]
fn test_hot_cpu_raises_temperature_alert() {
    let mut source = FakeSource::new(10.0);
    source.temperatures = vec![("Core 0".to_string(), 90.0)];
    let mut dash = dashboard(source, FakeContainers::missing());
    let selection = SectionSelection {
        alerts: true,
        ..Default::default()
    };

    dash.build_sections(&selection, DisplayOptions::default());
    let alerts = dash.active_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Critical);
    assert_eq!(alerts[0].threshold, 85.0);
}

#[test]
fn test_history_accumulates_per_cycle() {
    let mut dash = dashboard(FakeSource::new(30.0), FakeContainers::missing());
    let selection = SectionSelection {
        history: true,
        ..Default::default()
    };

    for _ in 0..3 {
        dash.build_sections(&selection, DisplayOptions::default());
    }
    assert_eq!(dash.cpu_history(), vec![30.0, 30.0, 30.0]);
    assert_eq!(dash.memory_history().len(), 3);
    assert_eq!(dash.temperature_history().len(), 3);
}

#[test]
fn test_report_omits_unrequested_and_records_errors() {
    let mut dash = dashboard(FakeSource::new(20.0), FakeContainers::missing());
    let selection = SectionSelection {
        cpu: true,
        docker: true,
        ..Default::default()
    };

    let report = dash.collect_report(&selection, false);
    assert!(report.cpu.is_some());
    assert!(report.memory.is_none());
    assert!(report.containers.is_empty());
    assert!(report.errors["docker"].contains("docker not installed"));

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("memory").is_none());
    assert_eq!(json["cpu"]["core_count"], 4);
}

#[test]
fn test_threshold_update_is_validated() {
    let dash = dashboard(FakeSource::new(20.0), FakeContainers::missing());
    let mut thresholds = dash.thresholds();
    thresholds.memory_warning = 99.0;
    thresholds.memory_critical = 90.0;

    dash.update_thresholds(thresholds);
    assert_eq!(dash.thresholds().memory_warning, 80.0);
    let alerts = dash.active_alerts();
    assert_eq!(alerts[0].level, AlertLevel::Info);
}

#[test]
fn test_log_created_after_start_is_shown() {
    let dir = TempDir::new().unwrap();
    let early = dir.path().join("early.log");
    let late = dir.path().join("late.log");
    std::fs::write(&early, "service started\n").unwrap();

    let mut dash = log_dashboard(&[early.clone(), late.clone()]);
    let selection = SectionSelection {
        logs: true,
        ..Default::default()
    };

    let sections = dash.build_sections(&selection, DisplayOptions::default());
    assert_eq!(field(&sections, "System Logs", "Available Logs").as_deref(), Some("1"));
    assert!(!sections.contains("Log: late.log"));

    std::fs::write(&late, "disk error on sda\n").unwrap();
    let sections = dash.build_sections(&selection, DisplayOptions::default());
    assert_eq!(field(&sections, "System Logs", "Available Logs").as_deref(), Some("2"));
    assert!(sections.contains("Log: late.log"));

    std::fs::remove_file(&early).unwrap();
    let sections = dash.build_sections(&selection, DisplayOptions::default());
    assert_eq!(field(&sections, "System Logs", "Available Logs").as_deref(), Some("1"));
    assert!(!sections.contains("Log: early.log"));
    assert_eq!(dash.watched_logs(), vec![late]);
}

#[test]
fn test_only_shown_logs_are_polled() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..5).map(|i| dir.path().join(format!("app{}.log", i))).collect();
    for path in &paths {
        std::fs::write(path, "ready\n").unwrap();
    }

    let mut dash = log_dashboard(&paths);
    let selection = SectionSelection {
        logs: true,
        ..Default::default()
    };

    let sections = dash.build_sections(&selection, DisplayOptions::default());
    assert_eq!(field(&sections, "System Logs", "Available Logs").as_deref(), Some("5"));
    assert_eq!(dash.watched_logs(), paths[..3].to_vec());

    let verbose = DisplayOptions {
        verbose: true,
        compact: false,
    };
    let sections = dash.build_sections(&selection, verbose);
    assert!(sections.contains("Log: app4.log"));
    assert_eq!(dash.watched_logs().len(), 5);
}

#[test]
fn test_battery_section_and_report() {
    let mut source = FakeSource::new(20.0);
    source.battery = Some(BatteryInfo {
        present: true,
        status: "Charging".to_string(),
        percentage: 81.0,
        health: Some("Good".to_string()),
        ..Default::default()
    });
    let mut dash = dashboard(source, FakeContainers::missing());
    let selection = SectionSelection {
        battery: true,
        ..Default::default()
    };

    let sections = dash.build_sections(&selection, DisplayOptions::default());
    assert_eq!(field(&sections, "Battery", "Status").as_deref(), Some("Charging"));
    assert_eq!(field(&sections, "Battery", "Charge").as_deref(), Some("81.0%"));

    let report = dash.collect_report(&selection, false);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["battery"]["status"], "Charging");
    assert_eq!(json["battery"]["health"], "Good");
}

#[test]
fn test_host_without_battery() {
    let mut dash = dashboard(FakeSource::new(20.0), FakeContainers::missing());
    let selection = SectionSelection {
        battery: true,
        ..Default::default()
    };
    let sections = dash.build_sections(&selection, DisplayOptions::default());
    assert_eq!(
        field(&sections, "Battery", "Status").as_deref(),
        Some("No battery detected")
    );
}

#[test]
fn test_container_logs_tail() {
    let dash = dashboard(FakeSource::new(20.0), FakeContainers::running(&["web"]));

    let logs = dash.container_logs("web", 2).unwrap();
    assert_eq!(logs.id, "web-id");
    assert_eq!(logs.lines, vec!["web line 4", "web line 5"]);
    assert_eq!(dash.container_logs("web-id", 0).unwrap().lines.len(), 5);

    let err = dash.container_logs("db", 10).unwrap_err();
    assert!(err.to_string().contains("container 'db' not found"));
}

#[test]
fn test_history_report_carries_traffic_rates() {
    let mut dash = dashboard(FakeSource::new(20.0), FakeContainers::missing());
    dash.prime();
    let selection = SectionSelection {
        traffic: true,
        history: true,
        ..Default::default()
    };

    let report = dash.collect_report(&selection, false);
    let history = report.history.unwrap();
    let rates = &history.traffic["eth0"];
    assert_eq!(rates.len(), 1);
    assert!(rates[0].rx_mbps > 0.0);
}
