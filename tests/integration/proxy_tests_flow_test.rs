//! Proxy smoke tests against a fake proxy, through to the published report

mod common;

use serde_json::json;
use vidpipe_proxy_tests::{
    parse_selection, ProxyTestError, ReportPublisher, SmokeFixture, TestCaseName, TestOutcome,
    TestRunner,
};

use common::{status_body, FakeVideoApi};

async fn healthy_proxy() -> FakeVideoApi {
    let proxy = FakeVideoApi::start().await;
    proxy
        .serve_templates(json!({"data": {"templates": [
            {"template_id": "tpl-1", "name": "Intro"},
            {"template_id": "tpl-2", "name": "Outro"}
        ]}}))
        .await;
    proxy.accept_creation("vid-smoke").await;
    proxy
        .script_statuses("vid-smoke", vec![status_body("pending", None)])
        .await;
    proxy
}

#[tokio::test]
async fn test_healthy_proxy_passes_and_publishes() {
    let proxy = healthy_proxy().await;
    let runner = TestRunner::new(proxy.client(), SmokeFixture::default());

    let report = runner.run(&parse_selection("run-all").unwrap()).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test-results/proxy-tests.xml");
    let published = ReportPublisher::new(&path).publish(Ok(report)).unwrap();

    assert!(published.all_passed());
    let xml = std::fs::read_to_string(&path).unwrap();
    assert!(xml.contains(r#"tests="3" failures="0" errors="0""#));
    for case in TestCaseName::ALL {
        assert!(xml.contains(&format!(r#"<testcase name="{}""#, case)));
    }

    let outputs = published.step_outputs();
    assert_eq!(outputs.get("total"), Some("3"));
    assert_eq!(outputs.get("passed"), Some("3"));
    assert_eq!(outputs.get("report_path"), Some(path.display().to_string().as_str()));
}

#[tokio::test]
async fn test_broken_endpoint_is_isolated() {
    let proxy = FakeVideoApi::start().await;
    proxy.fail_path("GET", "/v2/templates", 502).await;
    proxy.accept_creation("vid-smoke").await;
    proxy
        .script_statuses("vid-smoke", vec![status_body("processing", None)])
        .await;
    let runner = TestRunner::new(proxy.client(), SmokeFixture::default());

    let report = runner.run(&TestCaseName::ALL).await;

    let outcomes: Vec<TestOutcome> = report.results.iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![TestOutcome::Error, TestOutcome::Pass, TestOutcome::Pass]
    );

    let dir = tempfile::tempdir().unwrap();
    let published = ReportPublisher::new(dir.path().join("report.xml"))
        .publish(Ok(report))
        .unwrap();
    assert!(!published.all_passed());
    assert!(published.annotations[0].starts_with("::error title=proxy-tests list-templates::"));
}

#[tokio::test]
async fn test_rejected_generation_cascades_to_check_status() {
    let proxy = FakeVideoApi::start().await;
    proxy.serve_templates(json!({"templates": []})).await;
    proxy.reject_creation(403).await;
    let runner = TestRunner::new(proxy.client(), SmokeFixture::default());

    let report = runner.run(&TestCaseName::ALL).await;

    assert_eq!(report.passed(), 1);
    assert_eq!(report.errors(), 2);
    assert!(!report.all_passed());
}

#[tokio::test]
async fn test_unrecognised_status_is_contract_failure() {
    let proxy = FakeVideoApi::start().await;
    proxy.accept_creation("vid-odd").await;
    proxy
        .script_statuses("vid-odd", vec![json!({"data": {"state": "done"}})])
        .await;
    let runner = TestRunner::new(proxy.client(), SmokeFixture::default());

    let report = runner
        .run(&[TestCaseName::GenerateVideo, TestCaseName::CheckStatus])
        .await;

    assert_eq!(report.results[1].outcome, TestOutcome::Fail);
    assert_eq!(report.failed(), 1);
}

#[test]
fn test_unknown_case_rejected_before_running() {
    let err = parse_selection("list-templates,smoke-everything").unwrap_err();
    assert!(matches!(err, ProxyTestError::UnknownCase(_)));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.xml");
    let publish = ReportPublisher::new(&path).publish(Err(err));

    assert!(matches!(publish, Err(ProxyTestError::ReportUnavailable(_))));
    assert!(!path.exists());
}
