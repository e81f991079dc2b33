//! Persisted theme/language preferences and the toggle controls bound to them.
//!
//! SYSTEM CONTEXT
//! ==============
//! The park guide pages share two user preferences: color theme and language.
//! [`PreferenceStore`] owns the persisted copy and its default policy;
//! [`ToggleController`] projects it onto the document root (`data-theme`,
//! `lang`) and defines what activating a toggle control means.
//!
//! Browser concerns are kept behind two small traits, [`Storage`] and
//! [`RootDocument`], so the same logic runs against `localStorage`/DOM glue,
//! a JSON file, or in-memory test doubles.

pub mod controller;
pub mod document;
pub mod preference;
pub mod storage;
pub mod store;

pub use controller::{ToggleController, ToggleError};
pub use document::{LANG_ATTR, LANG_TOGGLE_ID, MemoryDocument, RootDocument, THEME_ATTR, THEME_TOGGLE_ID};
pub use preference::{Language, Preference, PreferenceKey, PreferenceValue, Theme, UnknownValue};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, UnavailableStorage};
pub use store::{PreferenceStore, SystemScheme};
