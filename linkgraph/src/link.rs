//! Hyperlink classification and site-relative path resolution.
//!
//! DESIGN
//! ======
//! An `href` is one of:
//! - `#id`: in-page anchor on the linking page
//! - `http(s)://...` or `//host/...`: external, never resolved
//! - another scheme (`mailto:`, `tel:`, `javascript:`): exempt
//! - anything else: a path relative to the linking page, optionally with
//!   `?query` (ignored) and `#fragment`

use serde::Serialize;
use url::Url;

#[cfg(test)]
#[path = "link_test.rs"]
mod tests;

/// Host label prefixes of third-party tracking/ad services whose markup the site does not control.
///
/// A label matches when it starts with one of these, so `google` also covers
/// `googleapis` and `googleusercontent`.
pub const TRACKING_ALLOWLIST: &[&str] = &["google", "doubleclick"];

/// A hyperlink element (`<a href>` / `<area href>`) as found in page markup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub target: Option<String>,
    /// Lowercased `rel` tokens.
    pub rel: Vec<String>,
    pub line: u64,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into(), target: None, rel: Vec::new(), line: 0 }
    }

    #[must_use]
    pub fn with_target(mut self, target: &str) -> Self {
        self.target = Some(target.to_owned());
        self
    }

    #[must_use]
    pub fn with_rel(mut self, rel: &str) -> Self {
        self.rel = parse_rel(rel);
        self
    }

    /// Whether following the link opens a new browsing context.
    ///
    /// Only the empty target and the `_self`/`_parent`/`_top` keywords stay in an
    /// existing context; `_blank` and named targets open a new one.
    #[must_use]
    pub fn opens_new_context(&self) -> bool {
        match self.target.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(target) => {
                !["_self", "_parent", "_top"].iter().any(|kw| target.eq_ignore_ascii_case(kw))
            }
        }
    }

    /// `noreferrer` implies `noopener`, so either token isolates the opener.
    #[must_use]
    pub fn declares_opener_isolation(&self) -> bool {
        self.rel.iter().any(|token| token == "noopener" || token == "noreferrer")
    }
}

pub(crate) fn parse_rel(raw: &str) -> Vec<String> {
    raw.split_ascii_whitespace().map(str::to_ascii_lowercase).collect()
}

/// Where an `href` points, before looking anything up in the site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// `#id` on the linking page. Empty for a bare `#`.
    Fragment(&'a str),
    /// Relative or root-absolute path, with optional fragment.
    Internal { path: &'a str, fragment: Option<&'a str> },
    External(Url),
    /// Non-navigable scheme such as `mailto` or `tel`.
    Exempt(String),
}

#[must_use]
pub fn classify(href: &str) -> LinkTarget<'_> {
    let href = href.trim();
    if let Some(fragment) = href.strip_prefix('#') {
        return LinkTarget::Fragment(fragment);
    }
    if href.starts_with("//") {
        if let Ok(url) = Url::parse(&format!("https:{href}")) {
            return LinkTarget::External(url);
        }
    }
    match Url::parse(href) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => LinkTarget::External(url),
        Ok(url) => LinkTarget::Exempt(url.scheme().to_owned()),
        Err(_) => {
            let (path, fragment) = match href.split_once('#') {
                Some((path, "")) => (path, None),
                Some((path, fragment)) => (path, Some(fragment)),
                None => (href, None),
            };
            LinkTarget::Internal { path, fragment }
        }
    }
}

/// Resolve `path` as linked from the page at `from` to a site-relative page path.
///
/// Returns `None` when the path climbs above the site root.
#[must_use]
pub fn resolve_path(from: &str, path: &str) -> Option<String> {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    if path.is_empty() {
        return Some(from.to_owned());
    }

    let mut segments: Vec<&str> = if path.starts_with('/') {
        Vec::new()
    } else {
        from.rsplit_once('/').map(|(dir, _)| dir.split('/').collect()).unwrap_or_default()
    };
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => segments.push(name),
        }
    }

    let last = path.rsplit('/').next().unwrap_or(path);
    if segments.is_empty() || path.ends_with('/') || last == "." || last == ".." {
        segments.push("index.html");
    }
    Some(segments.join("/"))
}

/// Whether the URL's host belongs to an allow-listed tracking/ad service.
#[must_use]
pub fn is_tracking_host(url: &Url) -> bool {
    url.host_str().is_some_and(|host| {
        host.split('.').any(|label| {
            let label = label.to_ascii_lowercase();
            TRACKING_ALLOWLIST.iter().any(|prefix| label.starts_with(*prefix))
        })
    })
}
