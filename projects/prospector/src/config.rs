use std::num::ParseIntError;
use std::path::PathBuf;

use interfaces_github_client::ClientConfig;
use interfaces_github_stargazers::index::MAX_ENTRIES;
use thiserror::Error;
use tracing::warn;

/// Repositories watched for new stargazers, `owner/name`.
pub const DEFAULT_REPOS: &[&str] = &[
    "amplitude/Amplitude-JavaScript",
    "mixpanel/mixpanel-js",
    "segmentio/analytics.js",
];

pub const DEFAULT_MAX_PER_REPO: usize = 100;
pub const DEFAULT_SNAPSHOT_PATH: &str = "leads.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub github: ClientConfig,
    pub repositories: Vec<String>,
    /// Most recent stargazers kept per repository.
    pub max_per_repo: usize,
    pub snapshot_path: PathBuf,
    /// Delivery is skipped when unset.
    pub webhook_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: ClientConfig::default(),
            repositories: DEFAULT_REPOS.iter().map(|repo| repo.to_string()).collect(),
            max_per_repo: DEFAULT_MAX_PER_REPO,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            webhook_url: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("InvalidNumber {var}={value:?}: {source}")]
    InvalidNumber {
        var: &'static str,
        value: String,
        source: ParseIntError,
    },
}

impl Config {
    /// Reads the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_file(dotenvy::dotenv());
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Config::default();

        config.github.token = get("GITHUB_TOKEN");
        if let Some(api_base) = get("GITHUB_API_URL") {
            config.github.api_base = api_base;
        }

        config.webhook_url = get("LEADS_WEBHOOK_URL");

        if let Some(path) = get("LEADS_SNAPSHOT_PATH") {
            config.snapshot_path = PathBuf::from(path);
        }

        if let Some(value) = get("MAX_STARGAZERS_PER_REPO") {
            config.max_per_repo = value.parse().map_err(|source| ConfigError::InvalidNumber {
                var: "MAX_STARGAZERS_PER_REPO",
                value: value.clone(),
                source,
            })?;
        }

        if config.max_per_repo > MAX_ENTRIES {
            warn!(
                requested = config.max_per_repo,
                cap = MAX_ENTRIES,
                "MAX_STARGAZERS_PER_REPO above the per-repository ceiling"
            );
            config.max_per_repo = MAX_ENTRIES;
        }

        Ok(config)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum EnvFile {
    Loaded,
    Missing,
    Invalid,
}

/// A missing `.env` is normal; one that fails to parse is worth a warning.
fn load_env_file<T>(result: Result<T, dotenvy::Error>) -> EnvFile {
    match result {
        Ok(_) => EnvFile::Loaded,
        Err(error) if error.not_found() => EnvFile::Missing,
        Err(error) => {
            warn!(%error, ".env file ignored");
            EnvFile::Invalid
        }
    }
}
