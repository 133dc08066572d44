use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::error::quote;

/// Scope token that stands for the repository of the working directory.
pub const CURRENT_REPO_TOKEN: &str = ".";

/// ASCII only; names made of nothing but dots are refused in `is_name`.
static ORG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-A-Za-z0-9_.]+$").expect("valid regex"));
static REPO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([-A-Za-z0-9_.]+)/([-A-Za-z0-9_.]+)$").expect("valid regex"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9](?:-?[A-Za-z0-9])*$").expect("valid regex"));

const MAX_USERNAME_LEN: usize = 39;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Not a repository (owner/name), organization, or \".\": {}", quote(.0))]
    InvalidArg(String),

    #[error("Not a well-formed GitHub username: {}", quote(.0))]
    InvalidUser(String),

    #[error("Couldn't determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("Couldn't open the current Git repository: {0}")]
    Git(#[from] git2::Error),

    #[error("Couldn't find a remote named \"origin\" in the current repo.")]
    NoOrigin,

    #[error("Couldn't parse current repo's \"origin\" remote URL: {}.", quote(.0))]
    UnparseableRemote(String),
}

/// `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A positional scope argument as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeArg {
    CurrentRepo,
    Org(String),
    Repo(RepoName),
}

/// A resolved search scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Org(String),
    Repo(RepoName),
}

impl Scope {
    /// Search qualifier, e.g. `repo:octo/widgets` or `org:octo`.
    pub fn qualifier(&self) -> String {
        match self {
            Scope::Org(org) => format!("org:{}", org),
            Scope::Repo(repo) => format!("repo:{}", repo),
        }
    }
}

/// Classify one positional argument. Used as a clap value parser, so a bad
/// token aborts before anything else runs.
pub fn parse_scope_arg(arg: &str) -> Result<ScopeArg, ScopeError> {
    if arg == CURRENT_REPO_TOKEN {
        return Ok(ScopeArg::CurrentRepo);
    }
    if ORG_RE.is_match(arg) && is_name(arg) {
        return Ok(ScopeArg::Org(arg.to_string()));
    }
    match REPO_RE.captures(arg) {
        Some(caps) if is_name(&caps[1]) && is_name(&caps[2]) => Ok(ScopeArg::Repo(RepoName {
            owner: caps[1].to_string(),
            name: caps[2].to_string(),
        })),
        _ => Err(ScopeError::InvalidArg(arg.to_string())),
    }
}

fn is_name(part: &str) -> bool {
    part.chars().any(|c| c != '.')
}

/// Validate a `--user` value as a GitHub login: alphanumerics with single
/// inner hyphens, at most 39 characters.
pub fn parse_username(user: &str) -> Result<String, ScopeError> {
    if user.len() <= MAX_USERNAME_LEN && USERNAME_RE.is_match(user) {
        Ok(user.to_string())
    } else {
        Err(ScopeError::InvalidUser(user.to_string()))
    }
}

/// Turn arguments into scopes, in order and without duplicates.
///
/// `current_repo` is called at most once, and only when `.` is among `args`.
/// No arguments means the current repository.
pub fn resolve<F>(args: &[ScopeArg], current_repo: F) -> Result<Vec<Scope>, ScopeError>
where
    F: FnOnce() -> Result<RepoName, ScopeError>,
{
    let default = [ScopeArg::CurrentRepo];
    let args = if args.is_empty() { &default[..] } else { args };

    let current = if args.contains(&ScopeArg::CurrentRepo) {
        Some(current_repo()?)
    } else {
        None
    };

    let mut scopes: Vec<Scope> = Vec::new();
    for arg in args {
        let scope = match (arg, &current) {
            (ScopeArg::Org(org), _) => Scope::Org(org.clone()),
            (ScopeArg::Repo(repo), _) | (ScopeArg::CurrentRepo, Some(repo)) => {
                Scope::Repo(repo.clone())
            }
            (ScopeArg::CurrentRepo, None) => continue,
        };
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }
    }

    Ok(scopes)
}

/// Find the `origin` remote of the repository containing `dir` and read the
/// GitHub repository it points at.
#[instrument(skip(dir), fields(dir = %dir.display()))]
pub fn current_repo(dir: &Path, host: &str) -> Result<RepoName, ScopeError> {
    let repo = git2::Repository::discover(dir)?;
    let remote = match repo.find_remote("origin") {
        Ok(remote) => remote,
        Err(e) if e.code() == git2::ErrorCode::NotFound => return Err(ScopeError::NoOrigin),
        Err(e) => return Err(e.into()),
    };
    let url = remote.url().unwrap_or_default();
    debug!(url = %url, "found origin remote");

    parse_remote_url(url, host).ok_or_else(|| ScopeError::UnparseableRemote(url.to_string()))
}

/// Read `owner/name` out of an scp-style (`git@host:owner/name.git`) or URL
/// (`https://host/owner/name`, `ssh://git@host/owner/name.git`) remote.
pub fn parse_remote_url(url: &str, host: &str) -> Option<RepoName> {
    let host = regex::escape(host);
    let patterns = [
        format!(r"^(?:[^@/]+@)?{host}:/?([\w.-]+)/([\w.-]+?)(?:\.git)?/?$"),
        format!(r"^(?:https?|ssh|git)://(?:[^@/]+@)?{host}(?::\d+)?/([\w.-]+)/([\w.-]+?)(?:\.git)?/?$"),
    ];

    patterns.iter().find_map(|pattern| {
        let caps = Regex::new(pattern).ok()?.captures(url)?;
        Some(RepoName {
            owner: caps[1].to_string(),
            name: caps[2].to_string(),
        })
    })
}
