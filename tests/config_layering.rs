mod util;

use std::time::Duration;

use photo_picker::config::{ConfigError, DEFAULT_API_BASE, PickerConfig};
use serial_test::serial;
use tempfile::TempDir;
use util::EnvGuard;

const VARS: [&str; 6] = [
    "PHOTO_PICKER_API_BASE",
    "PHOTO_PICKER_ACCESS_KEY",
    "PHOTO_PICKER_APP_NAME",
    "PHOTO_PICKER_TIMEOUT_SECS",
    "PHOTO_PICKER_DEBOUNCE_MS",
    "PHOTO_PICKER_SCROLL_THRESHOLD",
];

fn clean_env() -> Vec<EnvGuard> {
    VARS.iter().map(|v| EnvGuard::unset(v)).collect()
}

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
#[serial]
fn file_values_override_defaults() {
    let _env = clean_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[provider]
access_key = "file-key"
timeout_secs = 3

[ui]
debounce_ms = 100
"#,
    );

    let config = PickerConfig::load(Some(&path)).unwrap();
    assert_eq!(config.provider.api_base, DEFAULT_API_BASE);
    assert_eq!(config.provider.access_key.as_deref(), Some("file-key"));
    assert_eq!(config.provider.timeout, Duration::from_secs(3));
    assert_eq!(config.ui.debounce, Duration::from_millis(100));
    assert_eq!(config.ui.scroll_threshold, 0.8);
}

#[test]
#[serial]
fn environment_overrides_file() {
    let _env = clean_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[provider]
access_key = "file-key"
app_name = "from-file"

[ui]
scroll_threshold = 0.5
"#,
    );
    let _key = EnvGuard::set("PHOTO_PICKER_ACCESS_KEY", "env-key");
    let _threshold = EnvGuard::set("PHOTO_PICKER_SCROLL_THRESHOLD", "0.9");

    let config = PickerConfig::load(Some(&path)).unwrap();
    assert_eq!(config.provider.access_key.as_deref(), Some("env-key"));
    assert_eq!(config.provider.app_name, "from-file");
    assert_eq!(config.ui.scroll_threshold, 0.9);
}

#[test]
#[serial]
fn invalid_environment_values_are_ignored() {
    let _env = clean_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[ui]\ndebounce_ms = 75\n");
    let _debounce = EnvGuard::set("PHOTO_PICKER_DEBOUNCE_MS", "soon");
    let _threshold = EnvGuard::set("PHOTO_PICKER_SCROLL_THRESHOLD", "2.5");

    let config = PickerConfig::load(Some(&path)).unwrap();
    assert_eq!(config.ui.debounce, Duration::from_millis(75));
    assert_eq!(config.ui.scroll_threshold, 0.8);
}

#[test]
#[serial]
fn explicit_missing_file_is_reported() {
    let _env = clean_env();
    let dir = TempDir::new().unwrap();
    let err = PickerConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
