//! Theme and language toggle controls.
//!
//! Reads preferences from the [`PreferenceStore`] and applies them to the
//! document root: `data-theme` carries `light`/`dark`, `lang` carries
//! `de`/`en`. Activating a control flips the stored preference and writes
//! the new value back to the root attribute.
//!
//! DESIGN
//! ======
//! Value propagation is synchronous: each activation returns the new value
//! and publishes the full [`Preference`] on a `watch` channel, so observers
//! never poll the document to learn what changed. After writing an attribute
//! the controller reads it back; a document that did not take the value is a
//! [`ToggleError::PreferenceNotApplied`] and the stored preference is left as
//! it was, so store and document never disagree about what the user chose.
//!
//! The language control is optional per page. Activating it where it does not
//! exist is a no-op and leaves the stored preference untouched.

use tokio::sync::watch;
use tracing::{debug, info};

use crate::document::{LANG_ATTR, LANG_TOGGLE_ID, RootDocument, THEME_ATTR, THEME_TOGGLE_ID};
use crate::preference::{Language, Preference, Theme};
use crate::storage::Storage;
use crate::store::PreferenceStore;

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToggleError {
    /// A required control is not present on the page.
    #[error("page has no `#{0}` control")]
    MissingControl(&'static str),
    /// The root attribute did not take the value that was written.
    #[error("`{attribute}` expected `{expected}` after toggle, observed {observed:?}")]
    PreferenceNotApplied { attribute: &'static str, expected: &'static str, observed: Option<String> },
}

/// Binds the page's toggle controls to a preference store.
pub struct ToggleController<S, D> {
    store: PreferenceStore<S>,
    document: D,
    changes: watch::Sender<Preference>,
}

impl<S: Storage, D: RootDocument> ToggleController<S, D> {
    pub fn new(store: PreferenceStore<S>, document: D) -> Self {
        let (changes, _) = watch::channel(store.preference());
        Self { store, document, changes }
    }

    /// Apply stored preferences to the root before the page is used.
    pub fn on_ready(&mut self) -> Result<Preference, ToggleError> {
        let pref = self.store.preference();
        self.apply_theme(pref.theme)?;
        self.apply_language(pref.language)?;
        self.changes.send_replace(pref);
        debug!(theme = %pref.theme, language = %pref.language, "preferences applied on ready");
        Ok(pref)
    }

    /// Handle activation of `#theme-toggle`.
    pub fn activate_theme(&mut self) -> Result<Theme, ToggleError> {
        if !self.document.has_control(THEME_TOGGLE_ID) {
            return Err(ToggleError::MissingControl(THEME_TOGGLE_ID));
        }
        let theme = self.store.theme().flipped();
        self.apply_theme(theme)?;
        self.store.set(theme);
        self.publish();
        info!(%theme, "theme toggled");
        Ok(theme)
    }

    /// Handle activation of `#lang-toggle`. `Ok(None)` when the page has no such control.
    pub fn activate_language(&mut self) -> Result<Option<Language>, ToggleError> {
        if !self.document.has_control(LANG_TOGGLE_ID) {
            debug!("page has no language control; toggle skipped");
            return Ok(None);
        }
        let language = self.store.language().flipped();
        self.apply_language(language)?;
        self.store.set(language);
        self.publish();
        info!(%language, "language toggled");
        Ok(Some(language))
    }

    /// Subscribe to preference changes made through this controller.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Preference> {
        self.changes.subscribe()
    }

    #[must_use]
    pub fn preference(&self) -> Preference {
        self.store.preference()
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    #[must_use]
    pub fn store(&self) -> &PreferenceStore<S> {
        &self.store
    }

    /// Tear down at navigation; the store outlives the page's document.
    pub fn into_parts(self) -> (PreferenceStore<S>, D) {
        (self.store, self.document)
    }

    fn apply_theme(&mut self, theme: Theme) -> Result<(), ToggleError> {
        self.write_root(THEME_ATTR, theme.as_str())
    }

    fn apply_language(&mut self, language: Language) -> Result<(), ToggleError> {
        self.write_root(LANG_ATTR, language.code())
    }

    fn write_root(&mut self, attribute: &'static str, value: &'static str) -> Result<(), ToggleError> {
        self.document.set_attribute(attribute, value);
        let observed = self.document.attribute(attribute);
        if observed.as_deref() == Some(value) {
            Ok(())
        } else {
            Err(ToggleError::PreferenceNotApplied { attribute, expected: value, observed })
        }
    }

    fn publish(&self) {
        self.changes.send_replace(self.store.preference());
    }
}
