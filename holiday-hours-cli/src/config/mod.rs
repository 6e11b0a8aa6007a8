//! Configuration loading
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables (a `.env` file is read into the environment first).
//! The variable names for credentials match what existing deployments of the
//! tool already export.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::constants::{API_BASE_URL, OAUTH_BASE_URL};
use crate::api::resilience::PacingConfig;

pub const ENV_CLIENT_ID: &str = "clientID";
pub const ENV_CLIENT_SECRET: &str = "clientSecret";
pub const ENV_ACCOUNT_ID: &str = "accountID";
pub const ENV_TESTING: &str = "TESTING";
pub const ENV_HOURS_FILE: &str = "HOURS_FILE";
pub const ENV_API_BASE: &str = "ZOOM_API_BASE";
pub const ENV_OAUTH_BASE: &str = "ZOOM_OAUTH_BASE";
pub const ENV_ACCESS_TOKEN: &str = "ZOOM_ACCESS_TOKEN";

const DEFAULT_HOURS_FILE: &str = "./hours.json";

/// Server-to-server OAuth app credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub account_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub account_id: Option<String>,
    /// Pre-issued bearer token; skips the OAuth exchange when set
    pub access_token: Option<String>,
    pub api_base_url: String,
    pub oauth_base_url: String,
    pub hours_file: PathBuf,
    /// Only the first entity of each collection is reconciled
    pub test_mode: bool,
    pub pacing: PacingConfig,
}

/// On-disk shape of `config.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub credentials: CredentialsSection,
    pub api: ApiSection,
    pub schedule: ScheduleSection,
    pub pacing: PacingSection,
    pub testing: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub account_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub oauth_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    pub hours_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PacingSection {
    pub call_delay_ms: Option<u64>,
    pub entity_delay_ms: Option<u64>,
    pub completion_delay_ms: Option<u64>,
    pub enabled: Option<bool>,
}

impl PacingSection {
    fn resolve(&self) -> PacingConfig {
        let defaults = PacingConfig::default();
        let mut builder = PacingConfig::builder()
            .call_delay_ms(
                self.call_delay_ms
                    .unwrap_or(defaults.call_delay.as_millis() as u64),
            )
            .entity_delay_ms(
                self.entity_delay_ms
                    .unwrap_or(defaults.entity_delay.as_millis() as u64),
            )
            .completion_delay_ms(
                self.completion_delay_ms
                    .unwrap_or(defaults.completion_delay.as_millis() as u64),
            );
        if let Some(enabled) = self.enabled {
            builder = builder.enabled(enabled);
        }
        builder.build()
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("holiday-hours").join("config.toml"))
    }

    /// Load configuration from `.env`, the config file and the process environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e).context("Failed to read .env file");
            }
        }

        let file = match path {
            Some(path) => Self::read_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                _ => FileConfig::default(),
            },
        };

        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    fn read_file(path: &Path) -> Result<FileConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve the final configuration; environment values win over the file
    pub fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let test_mode = match env_non_empty(ENV_TESTING) {
            Some(value) => value.trim() == "true",
            None => file.testing.unwrap_or(false),
        };

        Ok(Self {
            client_id: env_non_empty(ENV_CLIENT_ID).or(file.credentials.client_id),
            client_secret: env_non_empty(ENV_CLIENT_SECRET).or(file.credentials.client_secret),
            account_id: env_non_empty(ENV_ACCOUNT_ID).or(file.credentials.account_id),
            access_token: env_non_empty(ENV_ACCESS_TOKEN),
            api_base_url: env_non_empty(ENV_API_BASE)
                .or(file.api.base_url)
                .unwrap_or_else(|| API_BASE_URL.to_string()),
            oauth_base_url: env_non_empty(ENV_OAUTH_BASE)
                .or(file.api.oauth_base_url)
                .unwrap_or_else(|| OAUTH_BASE_URL.to_string()),
            hours_file: env_non_empty(ENV_HOURS_FILE)
                .map(PathBuf::from)
                .or(file.schedule.hours_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HOURS_FILE)),
            test_mode,
            pacing: file.pacing.resolve(),
        })
    }

    /// Complete credential set, or an error naming what is missing
    pub fn credentials(&self) -> Result<Credentials> {
        let missing: Vec<&str> = [
            (ENV_CLIENT_ID, &self.client_id),
            (ENV_CLIENT_SECRET, &self.client_secret),
            (ENV_ACCOUNT_ID, &self.account_id),
        ]
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            anyhow::bail!("Missing credentials: {}", missing.join(", "));
        }

        Ok(Credentials {
            client_id: self.client_id.clone().unwrap_or_default(),
            client_secret: self.client_secret.clone().unwrap_or_default(),
            account_id: self.account_id.clone().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Duration;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = Config::from_sources(FileConfig::default(), env_from(&[])).unwrap();

        assert_eq!(config.api_base_url, "https://api.zoom.us/v2");
        assert_eq!(config.oauth_base_url, "https://zoom.us/oauth");
        assert_eq!(config.hours_file, PathBuf::from("./hours.json"));
        assert!(!config.test_mode);
        assert_eq!(config.pacing, PacingConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig = toml::from_str(
            r#"
            testing = true

            [credentials]
            client_id = "file-client"
            client_secret = "file-secret"
            account_id = "file-account"

            [schedule]
            hours_file = "/etc/holidays.json"

            [pacing]
            call_delay_ms = 10
            completion_delay_ms = 0
            "#,
        )
        .unwrap();

        let config = Config::from_sources(
            file,
            env_from(&[("clientID", "env-client"), ("TESTING", "false")]),
        )
        .unwrap();

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.client_id, "env-client");
        assert_eq!(credentials.client_secret, "file-secret");
        assert_eq!(credentials.account_id, "file-account");
        assert!(!config.test_mode);
        assert_eq!(config.hours_file, PathBuf::from("/etc/holidays.json"));
        assert_eq!(config.pacing.call_delay, Duration::from_millis(10));
        assert_eq!(config.pacing.entity_delay, Duration::from_millis(100));
        assert!(config.pacing.completion_delay.is_zero());
    }

    #[test]
    fn test_testing_flag_must_be_literal_true() {
        let on = Config::from_sources(FileConfig::default(), env_from(&[("TESTING", "true")]))
            .unwrap();
        let off = Config::from_sources(FileConfig::default(), env_from(&[("TESTING", "yes")]))
            .unwrap();

        assert!(on.test_mode);
        assert!(!off.test_mode);
    }

    #[test]
    fn test_missing_credentials_are_named() {
        let config =
            Config::from_sources(FileConfig::default(), env_from(&[("clientID", "abc")])).unwrap();

        let err = config.credentials().unwrap_err().to_string();
        assert!(err.contains("clientSecret"));
        assert!(err.contains("accountID"));
        assert!(!err.contains("clientID"));
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let credentials = Credentials {
            client_id: "id".to_string(),
            client_secret: "super-secret".to_string(),
            account_id: "acct".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("super-secret"));
    }

    #[test]
    fn test_read_file_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pacing\ncall_delay_ms = 1").unwrap();

        let err = Config::read_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
