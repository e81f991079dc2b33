//! Validation report.
//!
//! Each defect class has its own list so one run enumerates everything it
//! found. The graph is valid only when all four lists are empty; an aborted
//! run additionally lists what it did not get to.

use std::fmt;

use serde::Serialize;

use crate::site::UnresolvedReason;

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;

/// Internal link whose page or anchor does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedLink {
    pub page: String,
    pub line: u64,
    pub href: String,
    pub reason: UnresolvedReason,
}

/// New-context external link without `rel="noopener"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsafeExternalEdge {
    pub page: String,
    pub line: u64,
    pub href: String,
    pub target: String,
    pub rel: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unavailability {
    Status { status: u16 },
    EmptyContent,
    Fetch { message: String },
}

/// Critical page that could not be retrieved with content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnavailablePage {
    pub path: String,
    pub reason: Unavailability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnreachableReason {
    OutOfViewport,
    TimedOut { bound_ms: u64 },
    Probe { message: String },
}

/// Navigation control that did not bring its section into view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorUnreachable {
    pub page: String,
    pub anchor: String,
    pub reason: UnreachableReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub unresolved_links: Vec<UnresolvedLink>,
    pub unsafe_external_edges: Vec<UnsafeExternalEdge>,
    pub unavailable_pages: Vec<UnavailablePage>,
    pub unreachable_anchors: Vec<AnchorUnreachable>,
    pub pages_checked: Vec<String>,
    pub edges_checked: usize,
    /// Pages not validated because the run was aborted.
    pub pages_skipped: Vec<String>,
    /// Critical retrievals not attempted because the run was aborted.
    pub retrievals_skipped: Vec<String>,
}

/// One defect, borrowed from its list in a [`Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finding<'a> {
    UnresolvedLink(&'a UnresolvedLink),
    UnsafeExternalEdge(&'a UnsafeExternalEdge),
    UnavailablePage(&'a UnavailablePage),
    AnchorUnreachable(&'a AnchorUnreachable),
}

impl Report {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.unresolved_links.is_empty()
            && self.unsafe_external_edges.is_empty()
            && self.unavailable_pages.is_empty()
            && self.unreachable_anchors.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pages_skipped.is_empty() && self.retrievals_skipped.is_empty()
    }

    /// Every finding, in list order.
    pub fn findings(&self) -> impl Iterator<Item = Finding<'_>> {
        self.unresolved_links
            .iter()
            .map(Finding::UnresolvedLink)
            .chain(self.unsafe_external_edges.iter().map(Finding::UnsafeExternalEdge))
            .chain(self.unavailable_pages.iter().map(Finding::UnavailablePage))
            .chain(self.unreachable_anchors.iter().map(Finding::AnchorUnreachable))
    }

    #[must_use]
    pub fn finding_count(&self) -> usize {
        self.unresolved_links.len()
            + self.unsafe_external_edges.len()
            + self.unavailable_pages.len()
            + self.unreachable_anchors.len()
    }

    /// Put every list into a stable order regardless of check scheduling.
    pub(crate) fn sort(&mut self) {
        self.unresolved_links.sort_by(|a, b| (&a.page, a.line, &a.href).cmp(&(&b.page, b.line, &b.href)));
        self.unsafe_external_edges.sort_by(|a, b| (&a.page, a.line, &a.href).cmp(&(&b.page, b.line, &b.href)));
        self.unavailable_pages.sort_by(|a, b| a.path.cmp(&b.path));
        self.unreachable_anchors.sort_by(|a, b| (&a.page, &a.anchor).cmp(&(&b.page, &b.anchor)));
        self.pages_checked.sort();
        self.pages_skipped.sort();
        self.retrievals_skipped.sort();
    }
}

impl fmt::Display for Finding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedLink(link) => {
                write!(f, "unresolved link {}:{} `{}`: ", link.page, link.line, link.href)?;
                match &link.reason {
                    UnresolvedReason::MissingPage { path } => write!(f, "no page `{path}`"),
                    UnresolvedReason::MissingAnchor { page, anchor } => write!(f, "no anchor `#{anchor}` on `{page}`"),
                    UnresolvedReason::EscapesSiteRoot => f.write_str("path leaves the site root"),
                }
            }
            Self::UnsafeExternalEdge(edge) => write!(
                f,
                "unsafe external link {}:{} `{}`: target=\"{}\" without rel=\"noopener\"",
                edge.page, edge.line, edge.href, edge.target
            ),
            Self::UnavailablePage(page) => {
                write!(f, "unavailable page `{}`: ", page.path)?;
                match &page.reason {
                    Unavailability::Status { status } => write!(f, "status {status}"),
                    Unavailability::EmptyContent => f.write_str("empty content"),
                    Unavailability::Fetch { message } => f.write_str(message),
                }
            }
            Self::AnchorUnreachable(anchor) => {
                write!(f, "anchor `{}#{}` not in viewport: ", anchor.page, anchor.anchor)?;
                match &anchor.reason {
                    UnreachableReason::OutOfViewport => f.write_str("section not visible after activation"),
                    UnreachableReason::TimedOut { bound_ms } => write!(f, "did not settle within {bound_ms}ms"),
                    UnreachableReason::Probe { message } => f.write_str(message),
                }
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in self.findings() {
            writeln!(f, "{finding}")?;
        }
        for page in &self.pages_skipped {
            writeln!(f, "skipped page `{page}` (aborted)")?;
        }
        for path in &self.retrievals_skipped {
            writeln!(f, "skipped retrieval `{path}` (aborted)")?;
        }
        let verdict = if self.is_valid() { "VALID" } else { "INVALID" };
        write!(
            f,
            "{verdict}: {} pages, {} links, {} findings",
            self.pages_checked.len(),
            self.edges_checked,
            self.finding_count()
        )
    }
}
