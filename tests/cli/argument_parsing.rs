//! CLI argument parsing and configuration merging

use scenesweep::app::cli::{Args, Command};
use scenesweep::app::config::Settings;
use scenesweep::cleanup::api::ConfigError;

use crate::common::config_file;

fn parse(argv: &[&str]) -> Args {
    let mut full = vec!["scenesweep"];
    full.extend_from_slice(argv);
    Args::parse_styled_from(full, false).unwrap()
}

#[test]
fn test_status_json_flag() {
    let args = parse(&["status", "--json"]);
    assert_eq!(args.command, Command::Status { json: true });
}

#[test]
fn test_toml_values_applied_before_cli() {
    let mut settings = Settings::default();
    let config: toml::Table = toml::from_str(
        "log-format = \"ext\"\nlog-file = \"-\"\n[cleanup]\nlog_memory = false\n",
    )
    .unwrap();
    settings.apply_toml_values(&config).unwrap();
    assert_eq!(settings.log_format.as_deref(), Some("ext"));
    assert_eq!(settings.log_file, None);
    assert!(!settings.cleanup.log_memory);

    settings
        .apply_args(&parse(&["--log-format", "json", "demo"]))
        .unwrap();
    assert_eq!(settings.log_format.as_deref(), Some("json"));
    assert!(!settings.cleanup.log_memory);
}

#[tokio::test]
async fn test_unknown_cleanup_key_rejected() {
    let file = config_file("[cleanup]\nretry_count = 3\n");
    let path = file.path().to_string_lossy().to_string();

    let err = Settings::load(&parse(&["-c", &path, "status"]))
        .await
        .unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { .. }));
}
