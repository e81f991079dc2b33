use super::*;

#[test]
fn empty_document_has_no_attributes_or_controls() {
    let doc = MemoryDocument::new();
    assert_eq!(doc.attribute(THEME_ATTR), None);
    assert!(!doc.has_control(THEME_TOGGLE_ID));
    assert!(doc.attributes().is_empty());
}

#[test]
fn set_attribute_overwrites() {
    let mut doc = MemoryDocument::new();
    doc.set_attribute(LANG_ATTR, "de");
    doc.set_attribute(LANG_ATTR, "en");
    assert_eq!(doc.attribute(LANG_ATTR).as_deref(), Some("en"));
    assert_eq!(doc.attributes().len(), 1);
}

#[test]
fn with_controls_probes_by_id() {
    let doc = MemoryDocument::with_controls(["theme-toggle", "faq"]);
    assert!(doc.has_control(THEME_TOGGLE_ID));
    assert!(doc.has_control("faq"));
    assert!(!doc.has_control(LANG_TOGGLE_ID));
}
