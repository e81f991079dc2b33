//! `parkguide check`: validate the site's link graph.
//!
//! Pages are parsed from the site directory. Critical pages are retrieved from
//! the same directory, or from a running deployment when `--base-url` is given.
//! Ctrl-C raises the abort signal; the partial report is still printed.

use std::path::Path;
use std::time::Duration;

use clap::Args;
use linkgraph::{
    AbortSignal, DirSource, HttpSource, LinkGraphValidator, MarkupProbe, PageSource, Report, Site, ValidatorConfig,
};
use tracing::{info, warn};

use crate::CliError;

#[cfg(test)]
#[path = "check_test.rs"]
mod tests;

#[derive(Args, Debug, Default)]
pub(crate) struct CheckArgs {
    /// Retrieve critical pages from this deployment instead of the directory.
    #[arg(long, env = "PARKGUIDE_BASE_URL")]
    pub base_url: Option<String>,

    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Settle bound for anchor activation (overrides LINKGRAPH_SETTLE_MS).
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Pages checked at once (overrides LINKGRAPH_CONCURRENCY).
    #[arg(long)]
    pub concurrency: Option<usize>,
}

pub(crate) async fn run(site_root: &Path, args: CheckArgs) -> Result<(), CliError> {
    let abort = AbortSignal::new();
    let watcher = tokio::spawn({
        let abort = abort.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; stopping validation");
                abort.abort();
            }
        }
    });

    let result = validate(site_root, &args, &abort).await;
    watcher.abort();
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    verdict(&report)
}

/// Load the site and run every check.
pub(crate) async fn validate(site_root: &Path, args: &CheckArgs, abort: &AbortSignal) -> Result<Report, CliError> {
    let config = config_from(args);
    let site = Site::load(site_root)?;
    let source: Box<dyn PageSource> = match &args.base_url {
        Some(base_url) => {
            info!(%base_url, "retrieving critical pages over http");
            Box::new(HttpSource::new(base_url, config.fetch_timeout)?)
        }
        None => Box::new(DirSource::new(site_root)),
    };
    let validator = LinkGraphValidator::new(config);
    Ok(validator.validate(&site, source.as_ref(), &MarkupProbe::default(), abort).await)
}

fn config_from(args: &CheckArgs) -> ValidatorConfig {
    let mut config = ValidatorConfig::from_env();
    if let Some(ms) = args.settle_ms {
        config.settle = Duration::from_millis(ms);
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency.max(1);
    }
    config
}

/// An incomplete run fails even when what it checked was clean.
fn verdict(report: &Report) -> Result<(), CliError> {
    if !report.is_complete() {
        return Err(CliError::Aborted { pages: report.pages_skipped.len(), retrievals: report.retrievals_skipped.len() });
    }
    if !report.is_valid() {
        return Err(CliError::InvalidLinkGraph { findings: report.finding_count() });
    }
    Ok(())
}
