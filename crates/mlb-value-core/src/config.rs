// Configuration loading and parsing (explorer.toml).

use crate::catalog::Population;
use crate::valuation::QueryProfile;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const CONFIG_FILE: &str = "explorer.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// explorer.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataPaths,
    pub lookup: QueryProfile,
    pub leaderboard: QueryProfile,
    pub refresh: RefreshConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub batters: String,
    pub pitchers: String,
}

impl DataPaths {
    pub fn path_for(&self, population: Population) -> &Path {
        match population {
            Population::Batter => Path::new(&self.batters),
            Population::Pitcher => Path::new(&self.pitchers),
        }
    }
}

/// Settings for regenerating the season files from the FanGraphs export.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    pub season: i32,
    pub start_date: String,
    pub user_agent: String,
    pub retries: u32,
    pub backoff_secs: f64,
    pub timeout_secs: u64,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/explorer.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// First-run bootstrap: copy `defaults/explorer.toml` to
/// `config/explorer.toml` unless a config is already there. An existing
/// config is never touched. Returns the path written, if any.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let bootstrap_err = |message: String| ConfigError::DefaultsCopyError { message };
    let text = std::fs::read(&source).map_err(|e| {
        bootstrap_err(format!(
            "no {} and cannot read {}: {e}",
            target.display(),
            source.display()
        ))
    })?;
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| bootstrap_err(format!("cannot create {}: {e}", dir.display())))?;
    }
    std::fs::write(&target, text)
        .map_err(|e| bootstrap_err(format!("cannot write {}: {e}", target.display())))?;
    info!("Created {} from defaults", target.display());
    Ok(Some(target))
}

/// Bootstrap the config from `defaults/` if needed, then load it, relative
/// to `base_dir`.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_in(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.batters.trim().is_empty() {
        return Err(invalid("data.batters", "must not be empty"));
    }
    if config.data.pitchers.trim().is_empty() {
        return Err(invalid("data.pitchers", "must not be empty"));
    }

    // A zero threshold would let rows with no playing time qualify.
    let thresholds: &[(&str, f64)] = &[
        ("lookup.min_pa", config.lookup.min_pa),
        ("lookup.min_ip", config.lookup.min_ip),
        ("leaderboard.min_pa", config.leaderboard.min_pa),
        ("leaderboard.min_ip", config.leaderboard.min_ip),
    ];
    for (name, val) in thresholds {
        if !val.is_finite() || *val <= 0.0 {
            return Err(invalid(name, format!("must be > 0, got {val}")));
        }
    }

    let refresh = &config.refresh;
    if refresh.retries == 0 {
        return Err(invalid("refresh.retries", "must be > 0"));
    }
    if !refresh.backoff_secs.is_finite() || refresh.backoff_secs < 0.0 {
        return Err(invalid(
            "refresh.backoff_secs",
            format!("must be >= 0, got {}", refresh.backoff_secs),
        ));
    }
    if refresh.timeout_secs == 0 {
        return Err(invalid("refresh.timeout_secs", "must be > 0"));
    }
    if chrono::NaiveDate::parse_from_str(&refresh.start_date, "%Y-%m-%d").is_err() {
        return Err(invalid(
            "refresh.start_date",
            format!("expected YYYY-MM-DD, got `{}`", refresh.start_date),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::score::Formula;
    use std::fs;

    /// Returns the workspace root, which holds `defaults/`.
    fn project_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    fn default_text() -> String {
        fs::read_to_string(project_root().join("defaults").join(CONFIG_FILE)).unwrap()
    }

    /// Fresh temp dir with `config/explorer.toml` holding `text`.
    fn temp_config(test_name: &str, text: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("mlb_value_{test_name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), text).unwrap();
        tmp
    }

    fn expect_validation_field(tmp: &Path, expected: &str) {
        match load_config_from(tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_default_config() {
        let tmp = temp_config("load_default", &default_text());
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.data.batters, "data/batters_2025_2025.csv");
        assert_eq!(config.data.pitchers, "data/pitchers_2025_2025.csv");
        assert_eq!(config.lookup, QueryProfile::lookup());
        assert_eq!(config.leaderboard, QueryProfile::leaderboard());
        assert_eq!(config.leaderboard.formula, Formula::LogDampened);
        assert_eq!(config.refresh.season, 2025);
        assert_eq!(config.refresh.start_date, "2025-03-27");
        assert_eq!(config.refresh.retries, 3);
        assert!((config.refresh.backoff_secs - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.refresh.timeout_secs, 60);
        assert_eq!(
            config.data.path_for(Population::Pitcher),
            Path::new("data/pitchers_2025_2025.csv")
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn formulas_are_configurable_per_profile() {
        let text = default_text().replace("formula = \"simple\"", "formula = \"log_dampened\"");
        let tmp = temp_config("formula_override", &text);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.lookup.formula, Formula::LogDampened);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_threshold() {
        let text = default_text().replace("min_pa = 50.0", "min_pa = 0.0");
        let tmp = temp_config("zero_threshold", &text);
        expect_validation_field(&tmp, "leaderboard.min_pa");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_innings_threshold() {
        let text = default_text().replace("min_ip = 5.0", "min_ip = -1.0");
        let tmp = temp_config("negative_ip", &text);
        expect_validation_field(&tmp, "lookup.min_ip");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_retries() {
        let text = default_text().replace("retries = 3", "retries = 0");
        let tmp = temp_config("zero_retries", &text);
        expect_validation_field(&tmp, "refresh.retries");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_bad_start_date() {
        let text = default_text().replace("start_date = \"2025-03-27\"", "start_date = \"March 27\"");
        let tmp = temp_config("bad_start_date", &text);
        expect_validation_field(&tmp, "refresh.start_date");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_data_path() {
        let text = default_text().replace(
            "batters = \"data/batters_2025_2025.csv\"",
            "batters = \"\"",
        );
        let tmp = temp_config("empty_data_path", &text);
        expect_validation_field(&tmp, "data.batters");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn unknown_formula_is_parse_error() {
        let text = default_text().replace("formula = \"simple\"", "formula = \"magic\"");
        let tmp = temp_config("unknown_formula", &text);
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("mlb_value_missing_config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn bootstrap_copies_defaults_once() {
        let tmp = std::env::temp_dir().join("mlb_value_bootstrap_copies");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), default_text()).unwrap();

        let written = ensure_config_file(&tmp).unwrap();
        assert_eq!(written, Some(tmp.join("config").join(CONFIG_FILE)));
        let config = load_config_in(&tmp).expect("bootstrapped config should load");
        assert_eq!(config.lookup.formula, Formula::Simple);
        assert_eq!(ensure_config_file(&tmp).unwrap(), None);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn bootstrap_keeps_existing_config() {
        let tmp = temp_config("bootstrap_keeps", "# custom\n");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), default_text()).unwrap();

        assert_eq!(ensure_config_file(&tmp).unwrap(), None);
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn bootstrap_without_defaults_is_an_error() {
        let tmp = std::env::temp_dir().join("mlb_value_bootstrap_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_file(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => assert!(message.contains(CONFIG_FILE)),
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
        assert!(!tmp.join("config").exists());

        let _ = fs::remove_dir_all(&tmp);
    }
}
