use std::path::PathBuf;

use super::*;

fn fixture_site() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/linkgraph/tests/fixtures/site"))
}

#[tokio::test]
async fn fixture_site_passes() {
    let report = validate(&fixture_site(), &CheckArgs::default(), &AbortSignal::new()).await.unwrap();
    assert!(report.is_valid(), "{report}");
    assert!(verdict(&report).is_ok());
}

#[tokio::test]
async fn missing_site_directory_is_an_error() {
    let err = validate(&fixture_site().join("nope"), &CheckArgs::default(), &AbortSignal::new()).await.unwrap_err();
    assert!(matches!(err, CliError::Site(linkgraph::LinkGraphError::NotADirectory(_))));
}

#[tokio::test]
async fn invalid_base_url_is_an_error() {
    let args = CheckArgs { base_url: Some("ftp://example.org".to_owned()), ..CheckArgs::default() };
    let err = validate(&fixture_site(), &args, &AbortSignal::new()).await.unwrap_err();
    assert!(matches!(err, CliError::Fetch(_)));
}

#[tokio::test]
async fn aborted_run_fails_verdict() {
    let abort = AbortSignal::new();
    abort.abort();
    let report = validate(&fixture_site(), &CheckArgs::default(), &abort).await.unwrap();
    assert!(matches!(verdict(&report), Err(CliError::Aborted { pages: 7, retrievals: 7 })));
}

#[test]
fn findings_fail_verdict() {
    let report = Report {
        unavailable_pages: vec![linkgraph::UnavailablePage {
            path: "yoga.html".to_owned(),
            reason: linkgraph::Unavailability::EmptyContent,
        }],
        ..Report::default()
    };
    assert!(matches!(verdict(&report), Err(CliError::InvalidLinkGraph { findings: 1 })));
}

#[test]
fn flags_override_config() {
    let args = CheckArgs { settle_ms: Some(120), concurrency: Some(0), ..CheckArgs::default() };
    let config = config_from(&args);
    assert_eq!(config.settle, Duration::from_millis(120));
    assert_eq!(config.concurrency, 1);
}
