//! Preference store with default resolution and best-effort persistence.
//!
//! DESIGN
//! ======
//! The store keeps an in-memory copy of every value written this session on
//! top of the backing [`Storage`]. Reads prefer the in-memory copy, then the
//! persisted value, then the default policy:
//! - theme: the environment's color-scheme signal, light when there is none
//! - language: German
//!
//! ERROR HANDLING
//! ==============
//! Storage failures never reach the caller. The first failure is logged and
//! the store keeps working from memory for the rest of the session.

use std::cell::Cell;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::preference::{Language, Preference, PreferenceKey, PreferenceValue, Theme};
use crate::storage::{Storage, StorageError};

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

/// The operating environment's `prefers-color-scheme` signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SystemScheme {
    #[default]
    NoPreference,
    Light,
    Dark,
}

impl SystemScheme {
    /// Map an optional "prefers dark" flag (env var, CLI switch) to a signal.
    #[must_use]
    pub fn from_prefers_dark(prefers_dark: Option<bool>) -> Self {
        match prefers_dark {
            Some(true) => Self::Dark,
            Some(false) => Self::Light,
            None => Self::NoPreference,
        }
    }

    #[must_use]
    pub fn default_theme(self) -> Theme {
        match self {
            Self::Dark => Theme::Dark,
            Self::Light | Self::NoPreference => Theme::Light,
        }
    }
}

/// Owner of the persisted theme/language preferences.
pub struct PreferenceStore<S> {
    storage: S,
    system: SystemScheme,
    session: HashMap<PreferenceKey, PreferenceValue>,
    degraded: Cell<bool>,
}

impl<S: Storage> PreferenceStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage, system: SystemScheme::NoPreference, session: HashMap::new(), degraded: Cell::new(false) }
    }

    #[must_use]
    pub fn with_system_scheme(mut self, system: SystemScheme) -> Self {
        self.system = system;
        self
    }

    /// Value used when nothing was ever stored for `key`.
    #[must_use]
    pub fn default_for(&self, key: PreferenceKey) -> PreferenceValue {
        match key {
            PreferenceKey::Theme => PreferenceValue::Theme(self.system.default_theme()),
            PreferenceKey::Language => PreferenceValue::Language(Language::default()),
        }
    }

    /// Current value for `key`. Never fails.
    #[must_use]
    pub fn get(&self, key: PreferenceKey) -> PreferenceValue {
        if let Some(value) = self.session.get(&key) {
            return *value;
        }
        self.read_persisted(key).unwrap_or_else(|| self.default_for(key))
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        match self.get(PreferenceKey::Theme) {
            PreferenceValue::Theme(theme) => theme,
            PreferenceValue::Language(_) => self.system.default_theme(),
        }
    }

    #[must_use]
    pub fn language(&self) -> Language {
        match self.get(PreferenceKey::Language) {
            PreferenceValue::Language(language) => language,
            PreferenceValue::Theme(_) => Language::default(),
        }
    }

    #[must_use]
    pub fn preference(&self) -> Preference {
        Preference { theme: self.theme(), language: self.language() }
    }

    /// Persist `value` under its key. Setting the current value again is a no-op.
    pub fn set(&mut self, value: impl Into<PreferenceValue>) {
        let value = value.into();
        let key = value.key();
        if self.session.get(&key) == Some(&value) {
            return;
        }
        self.session.insert(key, value);

        let storage_key = key.storage_key();
        match self.storage.get_item(storage_key) {
            Ok(Some(raw)) if raw == value.as_str() => return,
            Ok(_) => {}
            Err(e) => {
                self.degrade(&e);
                return;
            }
        }
        match self.storage.set_item(storage_key, value.as_str()) {
            Ok(()) => debug!(key = storage_key, value = value.as_str(), "preference persisted"),
            Err(e) => self.degrade(&e),
        }
    }

    /// Flip the preference for `key`, persist it, and return the new value.
    pub fn toggle(&mut self, key: PreferenceKey) -> PreferenceValue {
        match key {
            PreferenceKey::Theme => self.toggle_theme().into(),
            PreferenceKey::Language => self.toggle_language().into(),
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme().flipped();
        self.set(next);
        next
    }

    pub fn toggle_language(&mut self) -> Language {
        let next = self.language().flipped();
        self.set(next);
        next
    }

    /// `false` once the backing storage has failed this session.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        !self.degraded.get()
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn read_persisted(&self, key: PreferenceKey) -> Option<PreferenceValue> {
        let raw = match self.storage.get_item(key.storage_key()) {
            Ok(raw) => raw?,
            Err(e) => {
                self.degrade(&e);
                return None;
            }
        };
        match PreferenceValue::parse(key, &raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, key = key.storage_key(), "ignoring unrecognized stored preference");
                None
            }
        }
    }

    fn degrade(&self, error: &StorageError) {
        if !self.degraded.replace(true) {
            warn!(error = %error, "preference storage unavailable; keeping preferences for this session only");
        }
    }
}
