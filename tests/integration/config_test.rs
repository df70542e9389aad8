use std::fs;

use sysglance::Config;
use tempfile::TempDir;

#[test]
fn test_roundtrip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sysglance").join("config.json");

    let mut config = Config::default();
    config.thresholds.cpu_warning = 60.0;
    config.refresh_secs = 3;
    config.log_lines = 5;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_unusable_files_give_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());

    fs::write(&path, "").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());

    fs::write(&path, "[1, 2").unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_loaded_thresholds_are_validated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"thresholds": {"disk_warning": 99, "disk_critical": 95}, "log_poll_secs": 0}"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.thresholds.disk_warning, 85.0);
    assert_eq!(config.log_poll_secs, 1);
}

#[test]
fn test_empty_log_paths_use_platform_defaults() {
    let config = Config::default();
    assert!(config.log_paths.is_empty());
    let defaults = Config::default_log_paths();
    assert!(config
        .effective_log_paths()
        .iter()
        .all(|p| defaults.contains(p)));
}

#[test]
fn test_configured_log_paths_filtered_to_files() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("app.log");
    fs::write(&log, "hello\n").unwrap();

    let config = Config {
        log_paths: vec![
            log.display().to_string(),
            dir.path().display().to_string(),
            dir.path().join("gone.log").display().to_string(),
        ],
        ..Default::default()
    };
    assert_eq!(config.effective_log_paths(), vec![log]);
}
