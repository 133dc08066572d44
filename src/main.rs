mod config;
mod credentials;
mod error;
mod pr;
mod report;
mod schema;
mod scope;

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;
use crate::scope::ScopeArg;

/// PR List — shows the open GitHub Pull Requests you authored or were asked
/// to review, with a one-character CI status and review status for each.
#[derive(Parser, Debug)]
#[command(name = "pr-list", version, about)]
struct Cli {
    /// Repositories (owner/name), organizations, or "." for the current
    /// repository's "origin" remote. Default: "."
    #[arg(value_parser = scope::parse_scope_arg)]
    scopes: Vec<ScopeArg>,

    /// The GitHub username whose PRs you want to see. Default: "@me"
    #[arg(long, value_parser = scope::parse_username)]
    user: Option<String>,

    /// Config file. Default: pr-list/config.toml in the user config directory
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            err.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let _main_span = info_span!("pr_list").entered();

    info!("loading configuration");
    let config = config::Config::load(cli.config.as_deref())?;

    let token = match config.github_token() {
        Some(token) => {
            debug!("using token from config or environment");
            token
        }
        None => {
            let path = config.hosts_file()?;
            info!(path = %path.display(), "loading credentials");
            let creds = credentials::load(&path, &config.github.host)?;
            debug!(user = %creds.user, "loaded credentials");
            creds.oauth_token
        }
    };

    info!("resolving repository scope");
    let scopes = scope::resolve(&cli.scopes, || {
        let cwd = std::env::current_dir().map_err(scope::ScopeError::CurrentDir)?;
        scope::current_repo(&cwd, &config.github.host)
    })?;
    let filter = pr::query::filter_clause(&scopes);
    debug!(filter = %filter, "resolved scope");

    let user = cli.user.as_deref().unwrap_or("@me");
    let query = pr::query::build_query(user, &scopes);

    info!("fetching pull requests from GitHub");
    let transport = pr::ReqwestTransport::new(config.github.api_url.clone())?;
    let groups = pr::fetch_pr_groups(&transport, &token, &query).await?;
    info!(authored = groups.authored.len(), to_review = groups.to_review.len(), "fetched pull requests");

    let options = report::RenderOptions {
        title_limit: config.display.title_limit,
        show_repo: !matches!(scopes.as_slice(), [scope::Scope::Repo(_)]),
        hyperlinks: std::io::stdout().is_terminal(),
    };
    report::print_summary(&filter, &groups, &options)?;
    info!("done");

    Ok(())
}
