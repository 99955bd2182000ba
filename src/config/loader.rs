//! Configuration loader with TOML parsing and environment variable overrides
//!
//! Layers, lowest precedence first: built-in defaults, the TOML file (with
//! `${VAR}` substitution), then `WEEKLY_*` environment variables. CLI flags
//! are applied on top by the caller, after which [`InventoryConfig::validate`]
//! runs.

use super::schema::InventoryConfig;
use super::secret::secret_string;
use crate::domain::{InventoryError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Configuration file looked up when none is named explicitly
pub const DEFAULT_CONFIG_FILE: &str = "weekly-inventory.toml";

/// Environment variable carrying the API bearer token
pub const TOKEN_ENV: &str = "QUALYS_TOKEN";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into InventoryConfig
/// 4. Applies environment variable overrides (WEEKLY_* prefix and the token)
///
/// Validation is left to the caller so CLI flags can still fill gaps.
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, a referenced
/// variable is unset, or the TOML does not parse.
///
/// # Examples
///
/// ```no_run
/// use weekly_inventory::config::loader::load_config;
///
/// let config = load_config("weekly-inventory.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<InventoryConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(InventoryError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        InventoryError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: InventoryConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Loads the named file, or the default file when present, or defaults
///
/// An explicitly named file must exist. The default file is optional.
pub fn resolve_config(explicit: Option<&Path>) -> Result<InventoryConfig> {
    match explicit {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE),
        None => {
            let mut config = InventoryConfig::default();
            apply_env_overrides(&mut config)?;
            Ok(config)
        }
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let substituted = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        lines.push(substituted.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(InventoryError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            InventoryError::Configuration(format!("Invalid value '{raw}' for {name}"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using the WEEKLY_* prefix
///
/// Variables follow the pattern WEEKLY_<SECTION>_<KEY>, for example
/// WEEKLY_API_BASE_URL or WEEKLY_REPORT_NAMING. The bearer token is read
/// from QUALYS_TOKEN.
fn apply_env_overrides(config: &mut InventoryConfig) -> Result<()> {
    if let Ok(val) = std::env::var(TOKEN_ENV) {
        config.api.token = Some(secret_string(val));
    }

    // Application overrides
    if let Ok(val) = std::env::var("WEEKLY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // API overrides
    if let Ok(val) = std::env::var("WEEKLY_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("WEEKLY_API_FILTER") {
        config.api.filter = Some(val);
    }
    if let Some(size) = env_parse("WEEKLY_API_PAGE_SIZE")? {
        config.api.page_size = size;
    }
    if let Some(delay) = env_parse("WEEKLY_API_PAGE_DELAY_MS")? {
        config.api.page_delay_ms = delay;
    }
    if let Some(pages) = env_parse("WEEKLY_API_MAX_PAGES")? {
        config.api.max_pages = pages;
    }
    if let Some(timeout) = env_parse("WEEKLY_API_TIMEOUT_SECONDS")? {
        config.api.timeout_seconds = timeout;
    }
    if let Some(verify) = env_parse("WEEKLY_API_TLS_VERIFY")? {
        config.api.tls_verify = verify;
    }

    // Schedule overrides
    if let Ok(val) = std::env::var("WEEKLY_SCHEDULE_START_DATE") {
        config.schedule.start_date = Some(val);
    }
    if let Ok(val) = std::env::var("WEEKLY_SCHEDULE_END_DATE") {
        config.schedule.end_date = Some(val);
    }
    if let Some(weeks) = env_parse("WEEKLY_SCHEDULE_LOOKBACK_WEEKS")? {
        config.schedule.lookback_weeks = weeks;
    }
    if let Ok(val) = std::env::var("WEEKLY_SCHEDULE_UTC_OFFSET") {
        config.schedule.utc_offset = val;
    }
    if let Some(minutes) = env_parse("WEEKLY_SCHEDULE_END_OVERLAP_MINUTES")? {
        config.schedule.end_overlap_minutes = minutes;
    }

    // Report overrides
    if let Ok(val) = std::env::var("WEEKLY_REPORT_SNAPSHOT_DIR") {
        config.report.snapshot_dir = val;
    }
    if let Ok(val) = std::env::var("WEEKLY_REPORT_TABLE_DIR") {
        config.report.table_dir = val;
    }
    if let Ok(val) = std::env::var("WEEKLY_REPORT_TEMP_DIR") {
        config.report.temp_dir = val;
    }
    if let Some(naming) = env_parse("WEEKLY_REPORT_NAMING")? {
        config.report.naming = naming;
    }
    if let Ok(val) = std::env::var("WEEKLY_REPORT_COLUMNS") {
        config.report.columns = split_columns(&val);
    }
    if let Some(persist) = env_parse("WEEKLY_REPORT_PERSIST_PARTIAL")? {
        config.report.persist_partial = persist;
    }

    // Logging overrides
    if let Some(enabled) = env_parse("WEEKLY_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("WEEKLY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// Splits a comma-separated column list, trimming names and dropping blanks
pub fn split_columns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("WEEKLY_TEST_SUBST_VAR", "test_value");
        let input = "base_url = \"${WEEKLY_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "base_url = \"test_value\"");
        std::env::remove_var("WEEKLY_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("WEEKLY_TEST_MISSING_VAR");
        let input = "base_url = \"${WEEKLY_TEST_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("WEEKLY_TEST_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("WEEKLY_TEST_COMMENTED_VAR");
        let input = "# base_url = \"${WEEKLY_TEST_COMMENTED_VAR}\"\n[api]";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(InventoryError::Configuration(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = resolve_config(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[api]
base_url = "https://gateway.example.com"
page_size = 500

[schedule]
utc_offset = "-05:00"

[report]
columns = ["containerId", "vuln_qid"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.api.base_url, "https://gateway.example.com");
        assert_eq!(config.api.page_size, 500);
        assert_eq!(config.schedule.utc_offset, "-05:00");
        assert_eq!(config.report.columns, vec!["containerId", "vuln_qid"]);
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[api\nbase_url = ").unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(matches!(err, InventoryError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_split_columns() {
        assert_eq!(
            split_columns("containerId, imageId ,,vuln_qid,"),
            vec!["containerId", "imageId", "vuln_qid"]
        );
    }
}
