use super::*;
use crate::document::MemoryDocument;
use crate::storage::{MemoryStorage, UnavailableStorage};
use crate::store::SystemScheme;

fn page_with_both_controls() -> MemoryDocument {
    MemoryDocument::with_controls([THEME_TOGGLE_ID, LANG_TOGGLE_ID])
}

fn page_without_language_control() -> MemoryDocument {
    MemoryDocument::with_controls([THEME_TOGGLE_ID])
}

/// Document whose root never takes attribute writes.
struct FrozenDocument;

impl RootDocument for FrozenDocument {
    fn attribute(&self, _name: &str) -> Option<String> {
        None
    }

    fn set_attribute(&mut self, _name: &str, _value: &str) {}

    fn has_control(&self, _id: &str) -> bool {
        true
    }
}

// =============================================================
// Page ready
// =============================================================

#[test]
fn on_ready_applies_defaults_to_root() {
    let mut ctrl = ToggleController::new(PreferenceStore::new(MemoryStorage::new()), page_with_both_controls());
    let pref = ctrl.on_ready().unwrap();
    assert_eq!(pref, Preference { theme: Theme::Light, language: Language::De });
    assert_eq!(ctrl.document().attribute(THEME_ATTR).as_deref(), Some("light"));
    assert_eq!(ctrl.document().attribute(LANG_ATTR).as_deref(), Some("de"));
}

#[test]
fn on_ready_uses_system_scheme_when_unset() {
    let store = PreferenceStore::new(MemoryStorage::new()).with_system_scheme(SystemScheme::Dark);
    let mut ctrl = ToggleController::new(store, page_with_both_controls());
    ctrl.on_ready().unwrap();
    assert_eq!(ctrl.document().attribute(THEME_ATTR).as_deref(), Some("dark"));
}

#[test]
fn preference_carries_over_to_next_page() {
    let mut storage = MemoryStorage::new();
    {
        let mut index = ToggleController::new(PreferenceStore::new(&mut storage), page_with_both_controls());
        index.on_ready().unwrap();
        index.activate_theme().unwrap();
        index.activate_language().unwrap();
    }

    let mut detail = ToggleController::new(PreferenceStore::new(&mut storage), page_without_language_control());
    detail.on_ready().unwrap();
    assert_eq!(detail.document().attribute(THEME_ATTR).as_deref(), Some("dark"));
    assert_eq!(detail.document().attribute(LANG_ATTR).as_deref(), Some("en"));
}

// =============================================================
// Theme control
// =============================================================

#[test]
fn theme_toggle_changes_root_attribute() {
    let mut ctrl = ToggleController::new(PreferenceStore::new(MemoryStorage::new()), page_with_both_controls());
    ctrl.on_ready().unwrap();
    let initial = ctrl.document().attribute(THEME_ATTR);

    assert_eq!(ctrl.activate_theme().unwrap(), Theme::Dark);
    assert_ne!(ctrl.document().attribute(THEME_ATTR), initial);
}

#[test]
fn theme_toggle_twice_round_trips() {
    for scheme in [SystemScheme::Light, SystemScheme::Dark, SystemScheme::NoPreference] {
        let store = PreferenceStore::new(MemoryStorage::new()).with_system_scheme(scheme);
        let mut ctrl = ToggleController::new(store, page_with_both_controls());
        ctrl.on_ready().unwrap();
        let initial = ctrl.document().clone();

        ctrl.activate_theme().unwrap();
        ctrl.activate_theme().unwrap();

        assert_eq!(ctrl.document(), &initial, "scheme {scheme:?}");
    }
}

#[test]
fn theme_toggle_requires_control() {
    let mut ctrl = ToggleController::new(PreferenceStore::new(MemoryStorage::new()), MemoryDocument::new());
    assert_eq!(ctrl.activate_theme(), Err(ToggleError::MissingControl(THEME_TOGGLE_ID)));
    assert_eq!(ctrl.preference().theme, Theme::Light);
}

#[test]
fn frozen_root_reports_preference_not_applied() {
    let mut ctrl = ToggleController::new(PreferenceStore::new(MemoryStorage::new()), FrozenDocument);
    let err = ctrl.activate_theme().unwrap_err();
    assert_eq!(
        err,
        ToggleError::PreferenceNotApplied { attribute: THEME_ATTR, expected: "dark", observed: None }
    );
    assert_eq!(ctrl.preference().theme, Theme::Light, "failed toggle must not change the store");
}

#[test]
fn failed_toggle_leaves_storage_and_subscribers_untouched() {
    let mut storage = MemoryStorage::new();
    {
        let mut ctrl = ToggleController::new(PreferenceStore::new(&mut storage), FrozenDocument);
        let rx = ctrl.subscribe();

        assert!(ctrl.activate_theme().is_err());
        assert!(ctrl.activate_language().is_err());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(ctrl.preference(), Preference { theme: Theme::Light, language: Language::De });
    }
    assert_eq!(storage.writes(), 0);

    // The next page load still sees the old values.
    let store = PreferenceStore::new(&mut storage);
    assert_eq!(store.preference(), Preference::default());
}

// =============================================================
// Language control
// =============================================================

#[test]
fn language_toggle_only_yields_supported_codes() {
    let mut ctrl = ToggleController::new(PreferenceStore::new(MemoryStorage::new()), page_with_both_controls());
    ctrl.on_ready().unwrap();
    for _ in 0..4 {
        let language = ctrl.activate_language().unwrap().unwrap();
        let lang = ctrl.document().attribute(LANG_ATTR).unwrap();
        assert!(["de", "en"].contains(&lang.as_str()));
        assert_eq!(lang, language.code());
    }
}

#[test]
fn selecting_each_language_sets_exact_code() {
    for target in [Language::De, Language::En] {
        let mut ctrl = ToggleController::new(PreferenceStore::new(MemoryStorage::new()), page_with_both_controls());
        ctrl.on_ready().unwrap();
        if ctrl.preference().language != target {
            ctrl.activate_language().unwrap();
        }
        assert_eq!(ctrl.document().attribute(LANG_ATTR).as_deref(), Some(target.code()));
    }
}

#[test]
fn missing_language_control_is_a_noop() {
    let mut ctrl = ToggleController::new(PreferenceStore::new(MemoryStorage::new()), page_without_language_control());
    ctrl.on_ready().unwrap();
    let before = ctrl.document().clone();

    assert_eq!(ctrl.activate_language(), Ok(None));
    assert_eq!(ctrl.document(), &before);
    assert_eq!(ctrl.preference().language, Language::De);
}

// =============================================================
// Notification
// =============================================================

#[test]
fn subscribers_see_new_value_synchronously() {
    let mut ctrl = ToggleController::new(PreferenceStore::new(MemoryStorage::new()), page_with_both_controls());
    let mut rx = ctrl.subscribe();
    ctrl.on_ready().unwrap();

    ctrl.activate_theme().unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().theme, Theme::Dark);

    ctrl.activate_language().unwrap();
    assert_eq!(rx.borrow_and_update().language, Language::En);
}

#[test]
fn toggles_work_without_persistent_storage() {
    let mut ctrl = ToggleController::new(PreferenceStore::new(UnavailableStorage), page_with_both_controls());
    ctrl.on_ready().unwrap();
    assert_eq!(ctrl.activate_theme().unwrap(), Theme::Dark);
    assert_eq!(ctrl.document().attribute(THEME_ATTR).as_deref(), Some("dark"));
    assert!(!ctrl.store().is_persistent());

    let (store, document) = ctrl.into_parts();
    assert_eq!(store.theme(), Theme::Dark);
    assert_eq!(document.attribute(THEME_ATTR).as_deref(), Some("dark"));
}
