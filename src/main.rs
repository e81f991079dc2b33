//! `parkguide`: command-line tooling for the park guide site.
//!
//! - `check` validates the site's link graph and exits non-zero on defects
//! - `serve` serves the built site as static files
//! - `prefs` operates the theme/language preference store
//!
//! Logs go to stderr so `check --json` keeps stdout machine-readable.

mod check;
mod prefs_cmd;
mod serve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Site(#[from] linkgraph::LinkGraphError),
    #[error("page source: {0}")]
    Fetch(#[from] linkgraph::FetchError),
    #[error(transparent)]
    Toggle(#[from] prefs::ToggleError),
    #[error(transparent)]
    UnknownValue(#[from] prefs::UnknownValue),
    #[error("no page `{0}` in the site")]
    UnknownPage(String),
    #[error("link graph invalid: {findings} findings")]
    InvalidLinkGraph { findings: usize },
    #[error("validation aborted: {pages} pages and {retrievals} retrievals skipped")]
    Aborted { pages: usize, retrievals: usize },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "parkguide", about = "Park guide site tooling")]
struct Cli {
    /// Directory holding the built site.
    #[arg(long, env = "PARKGUIDE_SITE", default_value = "site")]
    site: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate internal links, external link safety, critical pages and anchors.
    Check(check::CheckArgs),
    /// Serve the site directory over HTTP.
    Serve(serve::ServeArgs),
    /// Read, change or apply the theme/language preferences.
    Prefs(prefs_cmd::PrefsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env loaded");
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Check(args) => check::run(&cli.site, args).await,
        Command::Serve(args) => serve::run(&cli.site, args).await,
        Command::Prefs(args) => prefs_cmd::run(&cli.site, args).map(|output| print!("{output}")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "parkguide failed");
            ExitCode::FAILURE
        }
    }
}
