use sysglance::core::system_monitor::{AlertLevel, AlertManager, ThresholdConfig, MAX_ALERTS};

#[test]
fn test_cpu_levels_at_boundaries() {
    let mut manager = AlertManager::default();

    manager.check_cpu(74.9);
    assert!(manager.is_empty());

    manager.check_cpu(80.0);
    let alerts = manager.active_alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Warning);
    assert_eq!(alerts[0].threshold, 75.0);
    assert!(alerts[0].message.contains("80.0"));
    assert!(alerts[0].message.contains("75.0"));

    manager.check_cpu(95.0);
    let newest = &manager.active_alerts()[0];
    assert_eq!(newest.level, AlertLevel::Critical);
    assert_eq!(newest.threshold, 90.0);
}

#[test]
fn test_disk_alert_names_mount() {
    let mut manager = AlertManager::default();
    manager.check_disk(96.0, "/srv/data");

    let alert = &manager.active_alerts()[0];
    assert_eq!(alert.resource, "Disk");
    assert_eq!(alert.level, AlertLevel::Critical);
    assert!(alert.message.contains("/srv/data"));
}

#[test]
fn test_store_is_capped_newest_kept() {
    let mut manager = AlertManager::default();
    for i in 0..(MAX_ALERTS + 5) {
        manager.add_alert(
            AlertLevel::Info,
            "Tick",
            format!("alert {}", i),
            "Test",
            i as f64,
            0.0,
        );
    }

    assert_eq!(manager.len(), MAX_ALERTS);
    let alerts = manager.active_alerts();
    assert_eq!(alerts[0].message, format!("alert {}", MAX_ALERTS + 4));
    assert_eq!(alerts[MAX_ALERTS - 1].message, "alert 5");
}

#[test]
fn test_acknowledge_all_is_idempotent() {
    let mut manager = AlertManager::default();
    manager.check_memory(97.0);
    manager.check_cpu(80.0);
    assert_eq!(manager.summary().total(), 2);

    manager.acknowledge_all();
    assert!(manager.active_alerts().is_empty());
    assert_eq!(manager.summary().total(), 0);
    let stored = manager.len();

    manager.acknowledge_all();
    assert!(manager.active_alerts().is_empty());
    assert!(manager.alerts().all(|a| a.acknowledged));
    assert!(manager.len() >= stored);
}

#[test]
fn test_misordered_thresholds_are_corrected() {
    let config = ThresholdConfig {
        cpu_warning: 95.0,
        cpu_critical: 90.0,
        ..Default::default()
    };
    let fixed = config.validated();
    assert_eq!(fixed.cpu_warning, 80.0);
    assert_eq!(fixed.cpu_critical, 90.0);

    let mut manager = AlertManager::new(config);
    manager.check_cpu(85.0);
    assert_eq!(manager.active_alerts()[0].level, AlertLevel::Warning);
}

#[test]
fn test_temperature_cutoffs() {
    let mut manager = AlertManager::default();
    manager.check_temperature("CPU", 65.0, "C");
    assert!(manager.is_empty());

    manager.check_temperature("CPU", 72.0, "C");
    manager.check_temperature("GPU", 96.0, "C");
    let alerts = manager.active_alerts();
    assert_eq!(alerts[0].resource, "GPU");
    assert_eq!(alerts[0].level, AlertLevel::Critical);
    assert_eq!(alerts[1].level, AlertLevel::Warning);
    assert!(alerts[1].message.contains("°C"));
}
