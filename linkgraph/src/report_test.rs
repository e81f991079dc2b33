use super::*;

fn broken_report() -> Report {
    Report {
        unresolved_links: vec![UnresolvedLink {
            page: "index.html".to_owned(),
            line: 12,
            href: "geocaching.html".to_owned(),
            reason: UnresolvedReason::MissingPage { path: "geocaching.html".to_owned() },
        }],
        unsafe_external_edges: vec![UnsafeExternalEdge {
            page: "laufen.html".to_owned(),
            line: 40,
            href: "https://www.strava.com".to_owned(),
            target: "_blank".to_owned(),
            rel: Vec::new(),
        }],
        unavailable_pages: vec![UnavailablePage {
            path: "yoga.html".to_owned(),
            reason: Unavailability::Status { status: 404 },
        }],
        unreachable_anchors: vec![AnchorUnreachable {
            page: "index.html".to_owned(),
            anchor: "faq".to_owned(),
            reason: UnreachableReason::TimedOut { bound_ms: 500 },
        }],
        pages_checked: vec!["index.html".to_owned(), "laufen.html".to_owned()],
        edges_checked: 20,
        ..Report::default()
    }
}

#[test]
fn empty_report_is_valid_and_complete() {
    let report = Report::default();
    assert!(report.is_valid());
    assert!(report.is_complete());
    assert_eq!(report.finding_count(), 0);
    assert_eq!(report.findings().count(), 0);
}

#[test]
fn any_finding_invalidates() {
    let mut report = Report::default();
    report.unavailable_pages.push(UnavailablePage { path: "index.html".to_owned(), reason: Unavailability::EmptyContent });
    assert!(!report.is_valid());
}

#[test]
fn findings_enumerate_every_list_separately() {
    let report = broken_report();
    let findings: Vec<Finding<'_>> = report.findings().collect();
    assert_eq!(findings.len(), 4);
    assert!(matches!(findings[0], Finding::UnresolvedLink(_)));
    assert!(matches!(findings[1], Finding::UnsafeExternalEdge(_)));
    assert!(matches!(findings[2], Finding::UnavailablePage(_)));
    assert!(matches!(findings[3], Finding::AnchorUnreachable(_)));
}

#[test]
fn skipped_pages_make_report_incomplete_not_invalid() {
    let report = Report { pages_skipped: vec!["yoga.html".to_owned()], ..Report::default() };
    assert!(report.is_valid());
    assert!(!report.is_complete());
}

#[test]
fn display_lists_findings_and_verdict() {
    let text = broken_report().to_string();
    assert!(text.contains("unresolved link index.html:12 `geocaching.html`: no page `geocaching.html`"));
    assert!(text.contains("unsafe external link laufen.html:40"));
    assert!(text.contains("unavailable page `yoga.html`: status 404"));
    assert!(text.contains("anchor `index.html#faq` not in viewport: did not settle within 500ms"));
    assert!(text.ends_with("INVALID: 2 pages, 20 links, 4 findings"));
}

#[test]
fn json_tags_reasons() {
    let json = serde_json::to_value(broken_report()).unwrap();
    assert_eq!(json["unresolved_links"][0]["reason"]["kind"], "missing_page");
    assert_eq!(json["unavailable_pages"][0]["reason"], serde_json::json!({ "kind": "status", "status": 404 }));
    assert_eq!(json["unreachable_anchors"][0]["reason"]["kind"], "timed_out");
}

#[test]
fn sort_orders_lists_deterministically() {
    let mut report = Report {
        unavailable_pages: vec![
            UnavailablePage { path: "yoga.html".to_owned(), reason: Unavailability::EmptyContent },
            UnavailablePage { path: "fotografie.html".to_owned(), reason: Unavailability::EmptyContent },
        ],
        pages_checked: vec!["yoga.html".to_owned(), "index.html".to_owned()],
        ..Report::default()
    };
    report.sort();
    assert_eq!(report.unavailable_pages[0].path, "fotografie.html");
    assert_eq!(report.pages_checked, ["index.html", "yoga.html"]);
}
