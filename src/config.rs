//! Configuration management for the Watch Later migration tool.
//!
//! Handles the required environment settings (with `.env` support) and an
//! optional JSONC file for tuning the InnerTube client.

use crate::error::MigrateError;
use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the CSV of videos to migrate.
pub const CSV_FILENAME_VAR: &str = "CSV_FILENAME";
/// Environment variable naming the CSV that receives private videos on export.
pub const CSV_FILENAME_PRIVATE_VAR: &str = "CSV_FILENAME_PRIVATE";

const DEFAULT_PRIVATE_CSV: &str = "watch_later_private.csv";

/// Client tuning loaded from the config file.
///
/// Every field has a default, so a missing file or a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// InnerTube WEB client version sent in the request context
    pub client_version: String,
    /// Interface language sent in the request context
    pub hl: String,
    /// Region sent in the request context
    pub gl: String,
    /// Pause between successful removal batches, in milliseconds
    pub removal_delay_ms: u64,
    /// Per-request HTTP timeout, in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_version: "2.20241010.00.00".to_string(),
            hl: "en".to_string(),
            gl: "US".to_string(),
            removal_delay_ms: 500,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    ///
    /// # Details
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        serde_json::from_str(&strip_line_comments(&content))
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
    }

    /// Get default configuration file path.
    ///
    /// # Details
    /// Returns `$XDG_CONFIG_HOME/wl-migrate/config.jsonc` or `~/.config/wl-migrate/config.jsonc`.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir =
            config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
        Ok(config_dir.join("wl-migrate").join("config.jsonc"))
    }

    /// Pause to wait after each successful removal batch.
    pub fn removal_delay(&self) -> Duration {
        Duration::from_millis(self.removal_delay_ms)
    }

    /// Timeout applied to every InnerTube request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Strip `//` comments that are not inside a string literal.
///
/// Escaped quotes are not handled; config values never need them.
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| match comment_start(line) {
            Some(pos) => line[..pos].trim_end(),
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte offset of the first `//` outside a string on this line.
fn comment_start(line: &str) -> Option<usize> {
    let mut in_string = false;
    let mut prev_slash = false;
    for (pos, ch) in line.char_indices() {
        match ch {
            '"' => {
                in_string = !in_string;
                prev_slash = false;
            }
            '/' if !in_string => {
                if prev_slash {
                    return Some(pos - 1);
                }
                prev_slash = true;
            }
            _ => prev_slash = false,
        }
    }
    None
}

/// File locations taken from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// CSV of videos to migrate (and the public export target)
    pub csv_path: PathBuf,
    /// CSV that receives private videos on export
    pub private_csv_path: PathBuf,
}

impl Settings {
    /// Read settings from the process environment, loading `.env` first.
    pub fn from_env() -> Result<Self, MigrateError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// `CSV_FILENAME` is required; an empty value counts as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MigrateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let csv_path = non_empty(CSV_FILENAME_VAR)
            .map(PathBuf::from)
            .ok_or(MigrateError::MissingEnv(CSV_FILENAME_VAR))?;
        let private_csv_path = non_empty(CSV_FILENAME_PRIVATE_VAR)
            .unwrap_or_else(|| DEFAULT_PRIVATE_CSV.to_string())
            .into();

        Ok(Self {
            csv_path,
            private_csv_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.removal_delay(), Duration::from_millis(500));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.hl, "en");
    }

    #[test]
    fn test_config_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(Some(&temp_dir.path().join("absent.jsonc"))).unwrap();
        assert_eq!(config.removal_delay_ms, 500);
    }

    #[test]
    fn test_config_jsonc_with_comments() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");

        let jsonc_content = r#"{
            // Slow down removals on a throttled account
            "removal_delay_ms": 1500,
            "hl": "de" // interface language
        }"#;

        fs::write(&config_path, jsonc_content).unwrap();

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.removal_delay_ms, 1500);
        assert_eq!(loaded.hl, "de");
        assert_eq!(loaded.gl, "US");
    }

    #[test]
    fn test_strip_line_comments_keeps_urls_in_strings() {
        let stripped = strip_line_comments(r#""origin": "https://www.youtube.com" // note"#);
        assert_eq!(stripped, r#""origin": "https://www.youtube.com""#);
    }

    #[test]
    fn test_strip_line_comments_scans_past_slashes_in_strings() {
        let line = r#""a": "x//y", "b": 1"#;
        assert_eq!(strip_line_comments(line), line);

        let stripped = strip_line_comments(r#""a": "x//y", "b": 1 // trailing"#);
        assert_eq!(stripped, r#""a": "x//y", "b": 1"#);

        assert_eq!(strip_line_comments("// only a comment"), "");
    }

    #[test]
    fn test_config_jsonc_with_url_value_and_comment() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.jsonc");
        fs::write(
            &config_path,
            "{\n  \"hl\": \"https://x\", // odd value\n  \"removal_delay_ms\": 10\n}",
        )
        .unwrap();

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.hl, "https://x");
        assert_eq!(loaded.removal_delay_ms, 10);
    }

    #[test]
    fn test_settings_require_csv_filename() {
        let err = Settings::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, MigrateError::MissingEnv(CSV_FILENAME_VAR)));

        let err = Settings::from_lookup(lookup_from(&[(CSV_FILENAME_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, MigrateError::MissingEnv(_)));
    }

    #[test]
    fn test_settings_private_path_defaults() {
        let settings =
            Settings::from_lookup(lookup_from(&[(CSV_FILENAME_VAR, "wl.csv")])).unwrap();
        assert_eq!(settings.csv_path, PathBuf::from("wl.csv"));
        assert_eq!(settings.private_csv_path, PathBuf::from(DEFAULT_PRIVATE_CSV));

        let settings = Settings::from_lookup(lookup_from(&[
            (CSV_FILENAME_VAR, "wl.csv"),
            (CSV_FILENAME_PRIVATE_VAR, "hidden.csv"),
        ]))
        .unwrap();
        assert_eq!(settings.private_csv_path, PathBuf::from("hidden.csv"));
    }
}
