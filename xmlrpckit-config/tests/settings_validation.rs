use std::path::PathBuf;
use xmlrpckit_config::{Mode, Settings};

fn get_test_settings_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("test_configs");
    path.push(filename);
    path
}

#[test]
fn test_full_settings_load() {
    let settings = Settings::from_file(&get_test_settings_path("test_full.yaml"))
        .expect("Failed to load full settings");

    assert_eq!(settings.mode, Mode::Omnipresent);
    assert_eq!(settings.repr_permission, "manage");
}

#[test]
fn test_minimal_settings_load() {
    let settings = Settings::from_file(&get_test_settings_path("test_minimal.yaml"))
        .expect("Failed to load minimal settings");

    // Unspecified keys fall back to defaults
    assert_eq!(settings.mode, Mode::Limited);
    assert_eq!(settings.repr_permission, "view");
}

#[test]
fn test_missing_file_errors() {
    let result = Settings::from_file(&get_test_settings_path("does_not_exist.yaml"));
    assert!(result.is_err());
}

#[test]
fn test_settings_with_defaults() {
    let settings = Settings::parse("mode: limited").expect("Failed to parse settings");
    assert_eq!(settings.mode, Mode::Limited);
    assert_eq!(settings.repr_permission, "view"); // default
}

#[test]
fn test_settings_invalid_yaml() {
    let yaml = r#"
mode: [invalid
repr_permission:
  - invalid
"#;

    let result = Settings::parse(yaml);
    assert!(result.is_err(), "Should fail on invalid YAML");
}

#[test]
fn test_settings_unknown_mode() {
    let result = Settings::parse("mode: global");
    assert!(result.is_err(), "Should fail on an unknown mode");
}
