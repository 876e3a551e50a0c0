use std::fs;

use dashtui::{DashError, DashboardBuilder, DashboardConfig};
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = DashboardConfig::default();
    assert_eq!(config.max_len, 1024);
    assert_eq!(config.window_ms, 10_000);
    assert!(config.self_metrics);
}

#[test]
fn test_config_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dashtui.json");
    fs::write(&path, r#"{"max_len": 256, "tick_ms": 50, "self_metrics": false}"#).unwrap();

    let config = DashboardConfig::load(&path).unwrap();

    assert_eq!(config.max_len, 256);
    assert_eq!(config.tick_ms, 50);
    assert!(!config.self_metrics);
    assert_eq!(config.sample_period_us, 16_667);
}

#[test]
fn test_config_load_rejects_invalid_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dashtui.json");
    fs::write(&path, r#"{"tick_ms": 0}"#).unwrap();

    assert!(matches!(
        DashboardConfig::load(&path),
        Err(DashError::Config(_))
    ));
}

#[test]
fn test_config_load_rejects_malformed_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dashtui.json");
    fs::write(&path, "{ max_len: ").unwrap();

    assert!(matches!(
        DashboardConfig::load(&path),
        Err(DashError::ConfigParse(_))
    ));
}

#[test]
fn test_config_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = DashboardConfig::load(temp_dir.path().join("absent.json"));

    assert!(matches!(result, Err(DashError::Io(_))));
}

#[test]
fn test_builder_setters_update_config() {
    use std::time::Duration;

    let builder = DashboardBuilder::new()
        .max_len(12)
        .sample_period(Duration::from_millis(5))
        .window(Duration::from_secs(3))
        .tick_interval(Duration::from_millis(40))
        .scrollback_lines(20);

    let config = builder.config();
    assert_eq!(config.max_len, 12);
    assert_eq!(config.sample_period_us, 5_000);
    assert_eq!(config.window_ms, 3_000);
    assert_eq!(config.tick_ms, 40);
    assert_eq!(config.scrollback_lines, 20);
}
