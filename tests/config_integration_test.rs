//! Integration tests for configuration loading and validation
//!
//! Tests touching environment variables take ENV_MUTEX so they do not
//! interfere with each other.

use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use weekly_inventory::cli::Cli;
use weekly_inventory::config::{load_config, resolve_config, TOKEN_ENV};
use weekly_inventory::domain::WindowNaming;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var(TOKEN_ENV);
    std::env::remove_var("WEEKLY_API_BASE_URL");
    std::env::remove_var("WEEKLY_API_PAGE_SIZE");
    std::env::remove_var("WEEKLY_REPORT_NAMING");
    std::env::remove_var("WEEKLY_REPORT_COLUMNS");
    std::env::remove_var("WEEKLY_LOGGING_LOCAL_PATH");
    std::env::remove_var("TEST_WEEKLY_GATEWAY");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[api]
base_url = "https://gateway.qg2.apps.qualys.com/"
filter = "state:RUNNING"
page_size = 100
page_delay_ms = 50
max_pages = 20
timeout_seconds = 30
tls_verify = true

[schedule]
start_date = "2024-01-01"
end_date = "2024-03-01"
step_days = 7
lookback_weeks = 26
utc_offset = "-05:00"
end_overlap_minutes = 0

[report]
snapshot_dir = "out/json"
table_dir = "out/csv"
temp_dir = "out/tmp"
naming = "with_year"
columns = ["containerId", "imageId", "vuln_qid"]
persist_partial = false

[logging]
local_enabled = false
local_path = "/tmp/weekly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(
        config.api.listing_url(),
        "https://gateway.qg2.apps.qualys.com/csapi/v1.3/containers/list"
    );
    assert_eq!(config.api.extra_filter(), Some("state:RUNNING"));
    assert_eq!(config.api.page_size, 100);
    assert_eq!(config.api.max_pages, 20);
    assert!(config.api.tls_verify);
    assert_eq!(config.schedule.lookback_weeks, 26);
    assert_eq!(config.schedule.offset().unwrap().local_minus_utc(), -5 * 3600);
    assert_eq!(config.report.naming, WindowNaming::WithYear);
    assert_eq!(config.report.column_schema().unwrap().len(), 3);
    assert!(!config.report.persist_partial);
    assert!(!config.logging.local_enabled);

    // No token in the environment
    assert!(config.api.token.is_none());
    assert!(config.validate().is_err());
}

#[test]
fn test_token_and_overrides_from_env() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var(TOKEN_ENV, "env-token");
    std::env::set_var("WEEKLY_API_PAGE_SIZE", "500");
    std::env::set_var("WEEKLY_REPORT_NAMING", "with_year");
    std::env::set_var("WEEKLY_REPORT_COLUMNS", "containerId, vuln_qid");

    let temp_file = write_config(
        r#"
[api]
base_url = "https://gateway.example.com"
page_size = 100
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    let token = config.api.token.as_ref().expect("token from environment");
    assert_eq!(token.expose_secret().as_ref(), "env-token");
    assert_eq!(config.api.page_size, 500);
    assert_eq!(config.report.naming, WindowNaming::WithYear);
    assert_eq!(config.report.columns, vec!["containerId", "vuln_qid"]);
    assert!(config.validate().is_ok());

    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("WEEKLY_API_PAGE_SIZE", "lots");

    let temp_file = write_config("[api]\nbase_url = \"https://gateway.example.com\"\n");
    let result = load_config(temp_file.path());

    assert!(result.is_err());
    cleanup_env_vars();
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_WEEKLY_GATEWAY", "https://substituted.example.com");

    let temp_file = write_config(
        r#"
# base_url = "${NOT_SET_BUT_COMMENTED}"
[api]
base_url = "${TEST_WEEKLY_GATEWAY}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.api.base_url, "https://substituted.example.com");

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[api]\nbase_url = \"${TEST_WEEKLY_GATEWAY}\"\n");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_WEEKLY_GATEWAY"));
}

#[test]
fn test_explicit_config_must_exist() {
    let result = resolve_config(Some(std::path::Path::new("/no/such/weekly.toml")));
    assert!(result.is_err());
}

#[test]
fn test_cli_flags_override_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var(TOKEN_ENV, "t");

    let temp_file = write_config(
        r#"
[api]
base_url = "https://from-file.example.com"

[schedule]
start_date = "2023-01-01"
"#,
    );
    let mut config = load_config(temp_file.path()).unwrap();

    let cli = <Cli as clap::Parser>::parse_from([
        "weekly-inventory",
        "https://from-cli.example.com",
        "--start-date",
        "2024-01-01",
        "--end-date",
        "2024-01-20",
    ]);
    cli.apply_overrides(&mut config);

    assert_eq!(config.api.base_url, "https://from-cli.example.com");
    assert_eq!(config.schedule.start_date.as_deref(), Some("2024-01-01"));
    assert!(config.validate().is_ok());

    cleanup_env_vars();
}

#[test]
fn test_inverted_cli_dates_fail_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var(TOKEN_ENV, "t");

    let temp_file = write_config("[api]\nbase_url = \"https://gateway.example.com\"\n");
    let mut config = load_config(temp_file.path()).unwrap();

    let cli = <Cli as clap::Parser>::parse_from([
        "weekly-inventory",
        "--start-date",
        "2024-02-01",
        "--end-date",
        "2024-01-01",
    ]);
    cli.apply_overrides(&mut config);

    assert!(config.validate().is_err());
    cleanup_env_vars();
}
