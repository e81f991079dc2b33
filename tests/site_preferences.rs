//! Preferences carried across page loads of the fixture site.
//!
//! Each "page load" parses a page, exposes its ids as controls and builds a
//! fresh controller over the same storage, the way a browser keeps
//! `localStorage` while replacing the document.

use std::path::Path;

use linkgraph::{INDEX_PAGE, Site};
use prefs::{
    LANG_ATTR, Language, MemoryDocument, MemoryStorage, PreferenceStore, RootDocument, SystemScheme, THEME_ATTR, Theme,
    ToggleController, ToggleError,
};

fn fixture_site() -> Site {
    Site::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("linkgraph/tests/fixtures/site")).unwrap()
}

fn load<'a>(
    site: &Site,
    path: &str,
    storage: &'a mut MemoryStorage,
    system: SystemScheme,
) -> ToggleController<&'a mut MemoryStorage, MemoryDocument> {
    let page = site.page(path).unwrap();
    let document = MemoryDocument::with_controls(page.anchors.iter().cloned());
    let mut controller = ToggleController::new(PreferenceStore::new(storage).with_system_scheme(system), document);
    controller.on_ready().unwrap();
    controller
}

#[test]
fn theme_chosen_on_index_survives_navigation() {
    let site = fixture_site();
    let mut storage = MemoryStorage::new();

    let mut index = load(&site, INDEX_PAGE, &mut storage, SystemScheme::NoPreference);
    assert_eq!(index.activate_theme().unwrap(), Theme::Dark);
    drop(index);

    let destination = site.follow(INDEX_PAGE, "fotografie.html").unwrap();
    let detail = load(&site, &destination, &mut storage, SystemScheme::NoPreference);
    assert_eq!(detail.document().attribute(THEME_ATTR).as_deref(), Some("dark"));
}

#[test]
fn first_visit_follows_system_scheme() {
    let site = fixture_site();
    let mut storage = MemoryStorage::new();
    let index = load(&site, INDEX_PAGE, &mut storage, SystemScheme::Dark);
    assert_eq!(index.document().attribute(THEME_ATTR).as_deref(), Some("dark"));
    assert_eq!(index.document().attribute(LANG_ATTR).as_deref(), Some("de"));
    drop(index);
    assert_eq!(storage.writes(), 0, "defaults are not persisted");
}

#[test]
fn theme_toggle_twice_restores_document() {
    let site = fixture_site();
    let mut storage = MemoryStorage::new();
    let mut page = load(&site, "yoga.html", &mut storage, SystemScheme::Light);
    let before = page.document().clone();

    page.activate_theme().unwrap();
    assert_ne!(page.document(), &before);
    page.activate_theme().unwrap();
    assert_eq!(page.document(), &before);
}

#[test]
fn each_language_is_reflected_exactly() {
    let site = fixture_site();
    let mut storage = MemoryStorage::new();
    let mut index = load(&site, INDEX_PAGE, &mut storage, SystemScheme::NoPreference);

    assert_eq!(index.activate_language().unwrap(), Some(Language::En));
    assert_eq!(index.document().attribute(LANG_ATTR).as_deref(), Some("en"));
    assert_eq!(index.activate_language().unwrap(), Some(Language::De));
    assert_eq!(index.document().attribute(LANG_ATTR).as_deref(), Some("de"));
}

#[test]
fn language_toggle_is_noop_on_pages_without_control() {
    let site = fixture_site();
    let mut storage = MemoryStorage::new();
    let mut page = load(&site, "soziale-treffpunkte.html", &mut storage, SystemScheme::NoPreference);
    let before = page.document().clone();

    assert_eq!(page.activate_language().unwrap(), None);
    assert_eq!(page.document(), &before);
    assert_eq!(page.preference().language, Language::De);
    drop(page);
    assert_eq!(storage.writes(), 0);
}

#[test]
fn page_without_theme_control_reports_it() {
    let site = Site::from_pages([linkgraph::Page::parse("impressum.html", "<p>Impressum</p>")]);
    let mut storage = MemoryStorage::new();
    let mut page = load(&site, "impressum.html", &mut storage, SystemScheme::NoPreference);
    assert_eq!(page.activate_theme(), Err(ToggleError::MissingControl("theme-toggle")));
}
