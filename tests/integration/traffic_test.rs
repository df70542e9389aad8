use std::collections::HashMap;
use std::time::{Duration, Instant};

use sysglance::core::system_monitor::{rate_mbps, CounterSnapshot, TrafficMonitor};

fn counters(name: &str, rx: u64, tx: u64) -> HashMap<String, CounterSnapshot> {
    let mut map = HashMap::new();
    map.insert(
        name.to_string(),
        CounterSnapshot {
            bytes_received: rx,
            bytes_sent: tx,
            ..Default::default()
        },
    );
    map
}

#[test]
fn test_rate_formula() {
    assert!((rate_mbps(1_000, 1_001_000, 1.0) - 8.0).abs() < 1e-9);
    // elapsed below the floor is treated as 0.1s
    assert!((rate_mbps(0, 125_000, 0.0) - 10.0).abs() < 1e-9);
    // counter reset reads as idle
    assert_eq!(rate_mbps(5_000, 10, 1.0), 0.0);
}

#[test]
fn test_first_sample_is_baseline() {
    let monitor = TrafficMonitor::new();
    let start = Instant::now();

    let usage = monitor.record_at(counters("eth0", 1_000, 500), start);
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].rx_rate_mbps, 0.0);
    assert_eq!(usage[0].tx_rate_mbps, 0.0);
    assert!(monitor.history("eth0").0.is_empty());

    let usage = monitor.record_at(
        counters("eth0", 1_001_000, 250_500),
        start + Duration::from_secs(1),
    );
    assert!((usage[0].rx_rate_mbps - 8.0).abs() < 1e-9);
    assert!((usage[0].tx_rate_mbps - 2.0).abs() < 1e-9);

    let (rx, tx) = monitor.history("eth0");
    assert_eq!(rx.len(), 1);
    assert_eq!(tx.len(), 1);
}

#[test]
fn test_vanished_interface_is_forgotten() {
    let monitor = TrafficMonitor::new();
    let start = Instant::now();

    monitor.record_at(counters("eth0", 0, 0), start);
    monitor.record_at(counters("wlan0", 0, 0), start + Duration::from_secs(1));
    assert_eq!(monitor.tracked_interfaces(), vec!["wlan0".to_string()]);

    // eth0 comes back and starts over from a baseline
    let usage = monitor.record_at(
        counters("eth0", 9_000_000, 0),
        start + Duration::from_secs(2),
    );
    assert_eq!(usage[0].rx_rate_mbps, 0.0);
}
