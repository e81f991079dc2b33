//! Link-graph validation run.
//!
//! DESIGN
//! ======
//! Pages are checked concurrently (up to `concurrency` at once). Each check
//! reads only its own page snapshot plus the immutable [`Site`], and returns
//! its findings; they are merged and sorted once at the end.
//!
//! Critical pages are retrieved through a [`PageSource`] independently of the
//! parsed site, so a page that parses fine but is not served still fails.
//!
//! ERROR HANDLING
//! ==============
//! Nothing is retried: a broken link is a defect until the content changes.
//! Raising the [`AbortSignal`] stops new work from starting; whatever already
//! ran stays in the report and the rest is listed as skipped.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, info, warn};

use crate::config::ValidatorConfig;
use crate::link::is_tracking_host;
use crate::page::{Page, has_rendered_content};
use crate::probe::ViewportProbe;
use crate::report::{
    AnchorUnreachable, Report, UnavailablePage, Unavailability, UnreachableReason, UnresolvedLink, UnsafeExternalEdge,
};
use crate::site::{Edge, Site};
use crate::source::PageSource;

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;

/// Cooperative cancellation shared between a run and whoever may stop it.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct PageFindings {
    path: String,
    edges: usize,
    unresolved: Vec<UnresolvedLink>,
    unsafe_external: Vec<UnsafeExternalEdge>,
    unreachable: Vec<AnchorUnreachable>,
}

enum PageOutcome {
    Checked(PageFindings),
    Skipped(String),
}

enum Availability {
    Available,
    Unavailable(UnavailablePage),
    Skipped(String),
}

pub struct LinkGraphValidator {
    config: ValidatorConfig,
}

impl LinkGraphValidator {
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate every page of `site` and the critical pages served by `source`.
    pub async fn validate(
        &self,
        site: &Site,
        source: &dyn PageSource,
        probe: &dyn ViewportProbe,
        abort: &AbortSignal,
    ) -> Report {
        let concurrency = self.config.concurrency.max(1);
        info!(pages = site.len(), edges = site.edge_count(), concurrency, "link graph validation started");

        let outcomes: Vec<PageOutcome> = stream::iter(site.pages())
            .map(|page| self.check_page(site, page, probe, abort))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let availability: Vec<Availability> = stream::iter(self.config.critical_pages.iter())
            .map(|path| self.check_available(source, path, abort))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut report = Report::default();
        for outcome in outcomes {
            match outcome {
                PageOutcome::Checked(findings) => {
                    report.edges_checked += findings.edges;
                    report.pages_checked.push(findings.path);
                    report.unresolved_links.extend(findings.unresolved);
                    report.unsafe_external_edges.extend(findings.unsafe_external);
                    report.unreachable_anchors.extend(findings.unreachable);
                }
                PageOutcome::Skipped(path) => report.pages_skipped.push(path),
            }
        }
        for result in availability {
            match result {
                Availability::Available => {}
                Availability::Unavailable(page) => report.unavailable_pages.push(page),
                Availability::Skipped(path) => report.retrievals_skipped.push(path),
            }
        }
        report.sort();

        if report.is_valid() {
            info!(pages = report.pages_checked.len(), edges = report.edges_checked, "link graph valid");
        } else {
            warn!(findings = report.finding_count(), "link graph has integrity failures");
        }
        if !report.is_complete() {
            warn!(
                pages_skipped = report.pages_skipped.len(),
                retrievals_skipped = report.retrievals_skipped.len(),
                "validation aborted; report is partial"
            );
        }
        report
    }

    async fn check_page(
        &self,
        site: &Site,
        page: &Page,
        probe: &dyn ViewportProbe,
        abort: &AbortSignal,
    ) -> PageOutcome {
        if abort.is_aborted() {
            return PageOutcome::Skipped(page.path.clone());
        }

        let mut findings = PageFindings { path: page.path.clone(), ..PageFindings::default() };
        let mut nav_anchors = BTreeSet::new();
        for link in &page.links {
            findings.edges += 1;
            match site.resolve(page, &link.href) {
                Edge::InPage { anchor } => {
                    if !anchor.is_empty() {
                        nav_anchors.insert(anchor);
                    }
                }
                Edge::Page { .. } | Edge::Asset { .. } | Edge::Exempt { .. } => {}
                Edge::External(url) => {
                    if link.opens_new_context() && !link.declares_opener_isolation() && !is_tracking_host(&url) {
                        findings.unsafe_external.push(UnsafeExternalEdge {
                            page: page.path.clone(),
                            line: link.line,
                            href: link.href.clone(),
                            target: link.target.clone().unwrap_or_default(),
                            rel: link.rel.clone(),
                        });
                    }
                }
                Edge::Broken(reason) => findings.unresolved.push(UnresolvedLink {
                    page: page.path.clone(),
                    line: link.line,
                    href: link.href.clone(),
                    reason,
                }),
            }
        }

        for anchor in nav_anchors {
            if let Some(reason) = self.probe_anchor(page, &anchor, probe).await {
                findings.unreachable.push(AnchorUnreachable { page: page.path.clone(), anchor, reason });
            }
        }

        debug!(
            page = %page.path,
            edges = findings.edges,
            unresolved = findings.unresolved.len(),
            unsafe_external = findings.unsafe_external.len(),
            unreachable = findings.unreachable.len(),
            "page checked"
        );
        PageOutcome::Checked(findings)
    }

    async fn probe_anchor(&self, page: &Page, anchor: &str, probe: &dyn ViewportProbe) -> Option<UnreachableReason> {
        let bound = self.config.settle;
        match tokio::time::timeout(bound, probe.activate(page, anchor)).await {
            Ok(Ok(placement)) if placement.in_viewport() => None,
            Ok(Ok(_)) => Some(UnreachableReason::OutOfViewport),
            Ok(Err(e)) => Some(UnreachableReason::Probe { message: e.to_string() }),
            Err(_) => Some(UnreachableReason::TimedOut { bound_ms: duration_ms(bound) }),
        }
    }

    async fn check_available(&self, source: &dyn PageSource, path: &str, abort: &AbortSignal) -> Availability {
        if abort.is_aborted() {
            return Availability::Skipped(path.to_owned());
        }
        let reason = match source.fetch(path).await {
            Ok(fetched) if !fetched.is_success() => Unavailability::Status { status: fetched.status },
            Ok(fetched) if !has_rendered_content(&fetched.body) => Unavailability::EmptyContent,
            Ok(_) => return Availability::Available,
            Err(e) => Unavailability::Fetch { message: e.to_string() },
        };
        debug!(path, ?reason, "critical page unavailable");
        Availability::Unavailable(UnavailablePage { path: path.to_owned(), reason })
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
