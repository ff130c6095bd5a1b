use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::generator::DEFAULT_RECORD_COUNT;
use crate::models::Granularity;
use crate::upstream::MovementsQuery;

pub const DEFAULT_OUTPUT: &str = "movements.csv";
pub const DEFAULT_CREDENTIAL_ENV: &str = "SECRET_ID";
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://developers.belvo.com/_mock/apis/belvopaymentsmexico";

/// Application settings, normally read from a TOML file.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub upstream: UpstreamConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub count: usize,
    /// Fixed seed for reproducible output; random when absent
    pub seed: Option<u64>,
    pub output: PathBuf,
    /// Also dump the full records as JSON here
    pub records_json: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_RECORD_COUNT,
            seed: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            records_json: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub credential_env: String,
    pub timeout_secs: u64,
    pub query: MovementsQuery,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            credential_env: DEFAULT_CREDENTIAL_ENV.to_string(),
            timeout_secs: 30,
            query: MovementsQuery::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub granularity: Granularity,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Month,
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::File(err.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| ConfigError::File(format!("{}: {}", path.display(), err)))?;
        Self::from_toml(&text)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.generator.count, 1000);
        assert_eq!(config.upstream.credential_env, "SECRET_ID");
        assert!(!config.upstream.enabled);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [generator]
            count = 250
            seed = 42

            [upstream]
            enabled = true
            query = { limit = 50, type = "debit" }

            [dashboard]
            granularity = "W"
            "#,
        )
        .unwrap();
        assert_eq!(config.generator.count, 250);
        assert_eq!(config.generator.seed, Some(42));
        assert_eq!(config.generator.output, PathBuf::from("movements.csv"));
        assert!(config.upstream.enabled);
        assert_eq!(config.upstream.query.limit, 50);
        assert_eq!(config.upstream.query.tx_type, "debit");
        assert_eq!(config.upstream.query.page, 1);
        assert_eq!(config.dashboard.granularity, Granularity::Week);
    }

    #[test]
    fn test_bad_granularity_is_config_error() {
        let err = AppConfig::from_toml("[dashboard]\ngranularity = \"Q\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::File(_)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(AppConfig::from_toml("[generator]\ncuont = 5\n").is_err());
    }
}
