//! The page index: every page of the built site keyed by its path.
//!
//! DESIGN
//! ======
//! A [`Site`] is rebuilt from disk on every run and never mutated afterwards.
//! Resolution ([`Site::resolve`]) is pure lookups against that snapshot, so
//! pages can be checked concurrently without coordination.
//!
//! Files that are not HTML (PDFs, images, downloads) are indexed by path
//! only. A link to one resolves; a fragment on one cannot be checked and is
//! reported as unresolvable.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::INDEX_PAGE;
use crate::link::{Link, LinkTarget, classify, resolve_path};
use crate::page::Page;

#[cfg(test)]
#[path = "site_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum LinkGraphError {
    #[error("site root {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why an internal link does not resolve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnresolvedReason {
    MissingPage { path: String },
    MissingAnchor { page: String, anchor: String },
    EscapesSiteRoot,
}

/// A link after resolution against the site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Fragment on the linking page. Empty anchor for a bare `#`.
    InPage { anchor: String },
    Page { path: String, anchor: Option<String> },
    /// Existing non-HTML file.
    Asset { path: String },
    External(Url),
    Exempt { scheme: String },
    Broken(UnresolvedReason),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("no page at `{0}`")]
    UnknownPage(String),
    #[error("`{href}` leaves the site")]
    LeavesSite { href: String },
    #[error("`{href}` does not resolve: {reason:?}")]
    Broken { href: String, reason: UnresolvedReason },
    #[error("`{0}` has no breadcrumb")]
    MissingBreadcrumb(String),
    #[error("`{0}` has no link back to the index page")]
    MissingHomeLink(String),
}

#[derive(Clone, Debug, Default)]
pub struct Site {
    pages: BTreeMap<String, Page>,
    assets: BTreeSet<String>,
}

impl Site {
    pub fn from_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        Self { pages: pages.into_iter().map(|page| (page.path.clone(), page)).collect(), assets: BTreeSet::new() }
    }

    /// Add non-HTML files (site-relative paths) as link targets.
    #[must_use]
    pub fn with_assets<I, T>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.assets.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Parse every `.html`/`.htm` file under `root`.
    pub fn load(root: &Path) -> Result<Self, LinkGraphError> {
        if !root.is_dir() {
            return Err(LinkGraphError::NotADirectory(root.to_path_buf()));
        }
        let mut pages = Vec::new();
        let mut assets = Vec::new();
        collect_files(root, root, &mut pages, &mut assets)?;
        debug!(root = %root.display(), pages = pages.len(), assets = assets.len(), "site loaded");
        Ok(Self::from_pages(pages).with_assets(assets))
    }

    #[must_use]
    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.get(path)
    }

    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    #[must_use]
    pub fn has_asset(&self, path: &str) -> bool {
        self.assets.contains(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.pages.values().map(|page| page.links.len()).sum()
    }

    /// Resolve `href` as found on `from`.
    #[must_use]
    pub fn resolve(&self, from: &Page, href: &str) -> Edge {
        match classify(href) {
            LinkTarget::Fragment(anchor) => {
                if anchor.is_empty() || from.defines(anchor) {
                    Edge::InPage { anchor: anchor.to_owned() }
                } else {
                    Edge::Broken(UnresolvedReason::MissingAnchor { page: from.path.clone(), anchor: anchor.to_owned() })
                }
            }
            LinkTarget::Internal { path, fragment } => {
                let Some(resolved) = resolve_path(&from.path, path) else {
                    return Edge::Broken(UnresolvedReason::EscapesSiteRoot);
                };
                let Some(target) = self.page(&resolved) else {
                    if !self.has_asset(&resolved) {
                        return Edge::Broken(UnresolvedReason::MissingPage { path: resolved });
                    }
                    return match fragment {
                        Some(anchor) => {
                            Edge::Broken(UnresolvedReason::MissingAnchor { page: resolved, anchor: anchor.to_owned() })
                        }
                        None => Edge::Asset { path: resolved },
                    };
                };
                match fragment {
                    Some(anchor) if !target.defines(anchor) => Edge::Broken(UnresolvedReason::MissingAnchor {
                        page: resolved,
                        anchor: anchor.to_owned(),
                    }),
                    _ => Edge::Page { path: resolved, anchor: fragment.map(str::to_owned) },
                }
            }
            LinkTarget::External(url) => Edge::External(url),
            LinkTarget::Exempt(scheme) => Edge::Exempt { scheme },
        }
    }

    /// Follow `href` from the page at `from` and return the landing page path.
    pub fn follow(&self, from: &str, href: &str) -> Result<String, NavigationError> {
        let page = self.page(from).ok_or_else(|| NavigationError::UnknownPage(from.to_owned()))?;
        match self.resolve(page, href) {
            Edge::InPage { .. } => Ok(page.path.clone()),
            Edge::Page { path, .. } | Edge::Asset { path } => Ok(path),
            Edge::External(_) | Edge::Exempt { .. } => Err(NavigationError::LeavesSite { href: href.to_owned() }),
            Edge::Broken(reason) => Err(NavigationError::Broken { href: href.to_owned(), reason }),
        }
    }

    /// From a detail page, use its home-navigation link and return where it lands.
    ///
    /// The page must carry a breadcrumb and a plain link to the index page.
    pub fn return_home(&self, from: &str) -> Result<String, NavigationError> {
        let page = self.page(from).ok_or_else(|| NavigationError::UnknownPage(from.to_owned()))?;
        if !page.has_breadcrumb {
            return Err(NavigationError::MissingBreadcrumb(from.to_owned()));
        }
        let home = page
            .links
            .iter()
            .find(|link| matches!(self.resolve(page, &link.href), Edge::Page { ref path, anchor: None } if path == INDEX_PAGE))
            .ok_or_else(|| NavigationError::MissingHomeLink(from.to_owned()))?;
        self.follow(from, &home.href)
    }

    /// Links on `from` that land on the page at `path`.
    #[must_use]
    pub fn links_to(&self, from: &str, path: &str) -> Vec<&Link> {
        let Some(page) = self.page(from) else {
            return Vec::new();
        };
        page.links
            .iter()
            .filter(|link| matches!(self.resolve(page, &link.href), Edge::Page { path: ref p, .. } if p == path))
            .collect()
    }
}

fn collect_files(
    root: &Path,
    dir: &Path,
    pages: &mut Vec<Page>,
    assets: &mut Vec<String>,
) -> Result<(), LinkGraphError> {
    let entries = fs::read_dir(dir).map_err(|source| LinkGraphError::Io { path: dir.to_path_buf(), source })?;
    for entry in entries {
        let entry = entry.map_err(|source| LinkGraphError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || name == "node_modules" {
            continue;
        }
        if path.is_dir() {
            collect_files(root, &path, pages, assets)?;
        } else if path.extension().is_some_and(|ext| ext == "html" || ext == "htm") {
            let bytes = fs::read(&path).map_err(|source| LinkGraphError::Io { path: path.clone(), source })?;
            let html = String::from_utf8_lossy(&bytes);
            pages.push(Page::parse(site_path(root, &path), &html));
        } else if path.is_file() {
            assets.push(site_path(root, &path));
        }
    }
    Ok(())
}

fn site_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}
