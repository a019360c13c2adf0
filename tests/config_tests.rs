use std::fs;
use std::time::Duration;

use photo_library::Error;
use photo_library::config::Configuration;
use tempfile::tempdir;

#[test]
fn loads_full_config_from_disk() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("config.yaml");
    fs::write(
        &path,
        r#"
timezone: America/New_York
recent-window: 3days
trash-retention: 90days
dataset:
  photo-count: 20
  seed: 5
  year: 2023
slideshow:
  interval: 2s
upload:
  tick: 50ms
  step: 10
"#,
    )
    .unwrap();

    let cfg = Configuration::from_yaml_file(&path)
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(cfg.timezone, chrono_tz::America::New_York);
    assert_eq!(cfg.recent_window, Duration::from_secs(3 * 86_400));
    assert_eq!(cfg.trash_retention, Duration::from_secs(90 * 86_400));
    assert_eq!(cfg.dataset.photo_count, 20);
    assert_eq!(cfg.dataset.seed, Some(5));
    assert_eq!(cfg.dataset.year, 2023);
    assert_eq!(cfg.slideshow.interval, Duration::from_secs(2));
    assert_eq!(cfg.upload.tick, Duration::from_millis(50));
    assert_eq!(cfg.upload.step, 10);
}

#[test]
fn missing_file_is_an_io_error() {
    let tmp = tempdir().unwrap();
    let err = Configuration::from_yaml_file(tmp.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn malformed_yaml_is_a_config_error() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("bad.yaml");
    fs::write(&path, "recent-window: [not, a, duration]\n").unwrap();
    let err = Configuration::from_yaml_file(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn partial_config_keeps_other_defaults() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("partial.yaml");
    fs::write(&path, "upload:\n  step: 20\n").unwrap();
    let cfg = Configuration::from_yaml_file(&path).unwrap();
    assert_eq!(cfg.upload.step, 20);
    assert_eq!(cfg.upload.tick, Duration::from_millis(200));
    assert_eq!(cfg.slideshow.interval, Duration::from_secs(3));
    assert_eq!(cfg.timezone, chrono_tz::Tz::UTC);
}

#[test]
fn zero_windows_fail_validation() {
    let cfg = Configuration::from_yaml_str("recent-window: 0s\n").unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("recent-window"));
}
