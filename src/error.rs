use std::process::ExitCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::credentials::CredentialsError;
use crate::pr::FetchError;
use crate::scope::ScopeError;

/// Any condition that ends a run before the summary is printed.
/// `Display` is the single line written to stderr.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}

/// JSON string literal for `s`, used to quote user- and server-supplied text
/// in messages.
pub fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}
