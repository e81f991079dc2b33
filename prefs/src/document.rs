//! Document-root hooks consumed by the toggle controller.
//!
//! The live page exposes a root element carrying `data-theme` and `lang`
//! and a set of control elements found by id. [`RootDocument`] is the
//! smallest surface over that; [`MemoryDocument`] is the in-process
//! implementation used by the CLI and tests.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;

/// Root attribute carrying the active theme.
pub const THEME_ATTR: &str = "data-theme";
/// Root attribute carrying the active language code.
pub const LANG_ATTR: &str = "lang";
/// Id of the theme toggle control. Present on every page.
pub const THEME_TOGGLE_ID: &str = "theme-toggle";
/// Id of the language toggle control. Optional per page.
pub const LANG_TOGGLE_ID: &str = "lang-toggle";

/// Attribute access on the document root plus control discovery.
pub trait RootDocument {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&mut self, name: &str, value: &str);
    /// Whether an element with `id` exists on the page.
    fn has_control(&self, id: &str) -> bool;
}

/// In-memory root element and control set for one loaded page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    attributes: BTreeMap<String, String>,
    controls: BTreeSet<String>,
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Page exposing the given element ids (typically a parsed page's anchors).
    pub fn with_controls<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self { attributes: BTreeMap::new(), controls: ids.into_iter().map(Into::into).collect() }
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

impl RootDocument for MemoryDocument {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_owned(), value.to_owned());
    }

    fn has_control(&self, id: &str) -> bool {
        self.controls.contains(id)
    }
}
