use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::report::TITLE_LENGTH_LIMIT;

pub const DEFAULT_HOST: &str = "github.com";
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

/// Where the GitHub CLI keeps its credentials, relative to the home directory.
const GH_HOSTS_FILE: &str = ".config/gh/hosts.yml";

/// Shortest title budget that still leaves room for a character before `...`.
const MIN_TITLE_LIMIT: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("display.title_limit must be at least {min}, got {0}", min = MIN_TITLE_LIMIT)]
    TitleLimit(usize),

    #[error("Couldn't determine the home directory")]
    NoHomeDir,
}

/// Top-level configuration loaded from `pr-list/config.toml` in the user's
/// config directory.
///
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// Host whose entry is read from the credentials file and whose remotes
    /// identify the current repository.
    #[serde(default = "default_host")]
    pub host: String,

    /// GraphQL endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API token. If None, falls back to GITHUB_TOKEN, then the credentials file.
    pub token: Option<String>,

    /// Credentials file. Defaults to the GitHub CLI's `hosts.yml`.
    pub hosts_file: Option<PathBuf>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_url: default_api_url(),
            token: None,
            hosts_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Titles longer than this are cut and end in `...`.
    #[serde(default = "default_title_limit")]
    pub title_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title_limit: default_title_limit(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_title_limit() -> usize {
    TITLE_LENGTH_LIMIT
}

impl Config {
    /// Load configuration from `path`, or from the default location when
    /// `path` is None. A missing default file yields the default config; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => Config::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pr-list").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.display.title_limit < MIN_TITLE_LIMIT {
            return Err(ConfigError::TitleLimit(self.display.title_limit));
        }
        Ok(())
    }

    /// Resolve an explicitly supplied GitHub token: config file value takes
    /// precedence, falls back to GITHUB_TOKEN env var.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.is_empty())
    }

    /// Credentials file to read when no token was supplied explicitly.
    pub fn hosts_file(&self) -> Result<PathBuf, ConfigError> {
        match &self.github.hosts_file {
            Some(path) => Ok(path.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(GH_HOSTS_FILE))
                .ok_or(ConfigError::NoHomeDir),
        }
    }
}
