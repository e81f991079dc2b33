//! Link-integrity checks for the park guide's static pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! The site is a directory of pre-built HTML pages. This crate rebuilds the
//! link graph from that directory and checks four things:
//! - every internal link resolves to a page, and to an anchor on it when a
//!   fragment is given
//! - every external link opened in a new browsing context declares opener
//!   isolation (`rel="noopener"`)
//! - every critical page is retrievable with non-empty content
//! - every in-page navigation control brings its section into the viewport
//!   within the settle bound
//!
//! The result is a [`Report`] listing each defect separately. The graph is
//! valid only when every list is empty.

pub mod config;
pub mod link;
pub mod page;
pub mod probe;
pub mod report;
pub mod site;
pub mod source;
pub mod validator;

pub use config::{CRITICAL_PAGES, INDEX_PAGE, ValidatorConfig};
pub use link::{Link, LinkTarget, TRACKING_ALLOWLIST};
pub use page::Page;
pub use probe::{MarkupProbe, Placement, ProbeError, Rect, ViewportProbe};
pub use report::{
    AnchorUnreachable, Finding, Report, UnavailablePage, Unavailability, UnreachableReason, UnresolvedLink,
    UnsafeExternalEdge,
};
pub use site::{Edge, LinkGraphError, NavigationError, Site, UnresolvedReason};
pub use source::{DirSource, FetchError, Fetched, HttpSource, PageSource};
pub use validator::{AbortSignal, LinkGraphValidator};
