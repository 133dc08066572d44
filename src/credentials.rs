use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::error::quote;
use crate::schema::{dictionary, record, string_min_length, Schema};

/// Shortest host name, user name, or token accepted from the credentials file.
const MIN_LEN: usize = 3;

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("{}: {source}", quote_path(.path))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: Invalid YAML.", quote_path(.path))]
    InvalidYaml { path: PathBuf },

    #[error("{}: {failure}", quote_path(.path))]
    Schema { path: PathBuf, failure: String },

    #[error("{}: Missing entry for {}.", quote_path(.path), quote(.host))]
    MissingHost { path: PathBuf, host: String },
}

/// One host entry of the GitHub CLI's `hosts.yml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub oauth_token: String,
}

/// Read the credentials for `host` from a `hosts.yml` mapping of host name to
/// `{user, oauth_token}`.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load(path: &Path, host: &str) -> Result<Credentials, CredentialsError> {
    let contents = fs::read_to_string(path).map_err(|source| CredentialsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = contents.len(), "read credentials file");
    parse(&contents, path, host)
}

/// Parse the contents of a credentials file. `path` is only used in errors.
pub fn parse(contents: &str, path: &Path, host: &str) -> Result<Credentials, CredentialsError> {
    let raw: serde_json::Value =
        serde_yaml::from_str(contents).map_err(|_| CredentialsError::InvalidYaml {
            path: path.to_path_buf(),
        })?;

    let mut hosts = hosts_schema()
        .validate(&raw)
        .map_err(|failure| CredentialsError::Schema {
            path: path.to_path_buf(),
            failure: failure.render(&raw),
        })?;

    hosts.remove(host).ok_or_else(|| CredentialsError::MissingHost {
        path: path.to_path_buf(),
        host: host.to_string(),
    })
}

fn hosts_schema() -> Schema<BTreeMap<String, Credentials>> {
    let entry = record(|f| {
        Ok(Credentials {
            user: f.field("user", &string_min_length(MIN_LEN))?,
            oauth_token: f.field("oauth_token", &string_min_length(MIN_LEN))?,
        })
    });
    dictionary(string_min_length(MIN_LEN), entry)
}

fn quote_path(path: &Path) -> String {
    quote(&path.display().to_string())
}
