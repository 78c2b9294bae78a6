//! Integration tests for the API client and report builder using wiremock.

use serde_json::json;
use sonar_report::api::{ApiClient, Target};
use sonar_report::config::Config;
use sonar_report::report::{ReportBuilder, Severity, json as json_output};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    Config::new(
        &server.uri(),
        Some("test-token".to_string()),
        Some("my-org_my-project".to_string()),
        Some("my-org".to_string()),
    )
    .expect("test config must be valid")
}

async fn mount_quality_gate(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/qualitygates/project_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projectStatus": {
                "status": "ERROR",
                "conditions": [
                    {
                        "status": "ERROR",
                        "metricKey": "new_coverage",
                        "comparator": "LT",
                        "errorThreshold": "80",
                        "actualValue": "62.5"
                    }
                ]
            }
        })))
        .mount(server)
        .await;
}

async fn mount_issues(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/issues/search"))
        .and(query_param("resolved", "false"))
        .and(query_param("ps", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "issues": [
                {
                    "key": "issue-1",
                    "rule": "rust:S1135",
                    "severity": "MAJOR",
                    "component": "my-org_my-project:src/lib.rs",
                    "message": "Refactor this function.",
                    "type": "CODE_SMELL",
                    "status": "OPEN",
                    "line": 12,
                    "effort": "10min",
                    "tags": ["refactor"]
                },
                {
                    "key": "issue-2",
                    "rule": "rust:S2187",
                    "severity": "EXOTIC_NEW_LEVEL",
                    "component": "my-org_my-project:src/main.rs",
                    "message": "Add a test.",
                    "type": "CODE_SMELL",
                    "status": "OPEN"
                }
            ],
            "components": [
                { "key": "my-org_my-project:src/lib.rs", "path": "src/lib.rs", "qualifier": "FIL" }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_hotspots(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/hotspots/search"))
        .and(query_param("pullRequest", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paging": { "pageIndex": 1, "pageSize": 500, "total": 1 },
            "hotspots": [
                {
                    "key": "hotspot-1",
                    "component": "my-org_my-project:src/auth.rs",
                    "securityCategory": "auth",
                    "vulnerabilityProbability": "HIGH",
                    "status": "TO_REVIEW",
                    "message": "Review this hard-coded credential.",
                    "ruleKey": "secrets:S6703",
                    "line": 8
                }
            ],
            "components": []
        })))
        .mount(server)
        .await;
}

async fn mount_measures(server: &MockServer, metric_keys: &str, measures: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/measures/component"))
        .and(query_param("metricKeys", metric_keys))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "component": { "key": "my-org_my-project", "measures": measures }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn pr_report_aggregate() {
    let server = MockServer::start().await;

    mount_quality_gate(&server).await;
    mount_issues(&server).await;
    mount_hotspots(&server).await;
    mount_measures(
        &server,
        "new_duplicated_lines_density,new_duplicated_lines,new_duplicated_blocks",
        json!([
            { "metric": "new_duplicated_lines_density", "periods": [{ "index": 1, "value": "1.5" }] },
            { "metric": "new_duplicated_lines", "periods": [{ "index": 1, "value": "9" }] }
        ]),
    )
    .await;
    mount_measures(
        &server,
        "new_coverage,new_lines_to_cover,new_uncovered_lines",
        json!([
            { "metric": "new_coverage", "periods": [{ "index": 1, "value": "62.5" }] },
            { "metric": "new_lines_to_cover", "periods": [{ "index": 1, "value": "40" }] },
            { "metric": "new_uncovered_lines", "periods": [{ "index": 1, "value": "15" }] }
        ]),
    )
    .await;

    let client = ApiClient::new(&test_config(&server)).expect("client must build");
    let builder = ReportBuilder::new(&client, Target::PullRequest("42".to_string()));

    let report = builder.pr_report("42").await.expect("report must build");

    assert_eq!(report.meta.project_key, "my-org_my-project");
    assert_eq!(report.meta.pull_request.as_deref(), Some("42"));
    assert!(report.meta.branch.is_none());

    assert_eq!(report.quality_gate.status, "ERROR");
    assert!(!report.quality_gate.passed());

    assert_eq!(report.issues.len(), 2);
    assert_eq!(report.issues[0].file, "src/lib.rs");
    assert_eq!(report.issues[0].severity, Severity::Major);
    // Unrecognized severity buckets to INFO, and the path falls back to key stripping.
    assert_eq!(report.issues[1].severity, Severity::Info);
    assert_eq!(report.issues[1].file, "src/main.rs");
    assert_eq!(report.issues_summary.total, 2);
    assert_eq!(report.issues_summary.major, 1);
    assert_eq!(report.issues_summary.info, 1);

    assert_eq!(report.security_hotspots.count, 1);
    assert_eq!(report.security_hotspots.hotspots[0].file, "src/auth.rs");

    // A metric the service did not return stays null, not zero.
    assert_eq!(report.duplication["new_duplicated_lines_density"], Some(1.5));
    assert_eq!(report.duplication["new_duplicated_blocks"], None);
    assert_eq!(report.coverage["new_coverage"], Some(62.5));

    let document = serde_json::to_value(&report).expect("report must serialize");
    for key in ["meta", "qualityGate", "issues", "issuesSummary", "securityHotspots", "duplication", "coverage", "metrics"] {
        assert!(document.get(key).is_some(), "missing top-level key '{key}'");
    }
    assert!(document["metrics"].is_null());
    assert_eq!(document["duplication"]["new_duplicated_blocks"], serde_json::Value::Null);
    assert_eq!(document["issues"][1]["severity"], "INFO");
}

#[tokio::test]
async fn coverage_detail_ranking_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/measures/component_tree"))
        .and(query_param("qualifiers", "FIL"))
        .and(query_param("ps", "500"))
        .and(query_param("pullRequest", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paging": { "pageIndex": 1, "pageSize": 500, "total": 3 },
            "components": [
                {
                    "key": "my-org_my-project:src/file_a.rs",
                    "path": "src/file_a.rs",
                    "qualifier": "FIL",
                    "measures": [
                        { "metric": "new_uncovered_lines", "periods": [{ "index": 1, "value": "2" }] },
                        { "metric": "new_lines_to_cover", "periods": [{ "index": 1, "value": "10" }] },
                        { "metric": "new_coverage", "periods": [{ "index": 1, "value": "80" }] }
                    ]
                },
                {
                    "key": "my-org_my-project:src/file_b.rs",
                    "path": "src/file_b.rs",
                    "qualifier": "FIL",
                    "measures": [
                        { "metric": "new_uncovered_lines", "periods": [{ "index": 1, "value": "0" }] }
                    ]
                },
                {
                    "key": "my-org_my-project:src/file_c.rs",
                    "path": "src/file_c.rs",
                    "qualifier": "FIL",
                    "measures": [
                        { "metric": "new_uncovered_lines", "periods": [{ "index": 1, "value": "1" }] }
                    ]
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&test_config(&server)).expect("client must build");
    let builder = ReportBuilder::new(&client, Target::PullRequest("42".to_string()));

    let ranked = builder.coverage_detail("42").await.expect("coverage detail must build");

    assert_eq!(ranked.len(), 2);

    assert_eq!(ranked[0].path, "src/file_a.rs");
    assert_eq!(ranked[0].uncovered_lines, 2);
    assert_eq!(ranked[0].lines_to_cover, Some(10.0));
    assert_eq!(ranked[0].coverage, Some(80.0));

    assert_eq!(ranked[1].path, "src/file_c.rs");
    assert_eq!(ranked[1].uncovered_lines, 1);
    assert_eq!(ranked[1].lines_to_cover, None);
    assert_eq!(ranked[1].coverage, None);
}

#[tokio::test]
async fn upstream_404_produces_error_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/issues/search"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{ "msg": "not found" }]
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&test_config(&server)).expect("client must build");
    let builder = ReportBuilder::new(&client, Target::Branch("main".to_string()));

    let error = builder.issues_report().await.expect_err("request must fail");
    assert_eq!(error.status_code(), Some(404));

    let document = json_output::error_document(&error);
    assert_eq!(
        document,
        json!({
            "error": {
                "message": "issues API returned 404",
                "statusCode": 404,
                "details": { "errors": [{ "msg": "not found" }] }
            }
        })
    );
}

#[tokio::test]
async fn branch_metrics_report() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/qualitygates/project_status"))
        .and(query_param("branch", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projectStatus": { "status": "OK", "conditions": [] }
        })))
        .mount(&server)
        .await;

    mount_measures(
        &server,
        "bugs,vulnerabilities,code_smells,coverage,line_coverage,duplicated_lines_density,complexity,cognitive_complexity,reliability_rating,security_rating,sqale_rating,ncloc,sqale_index",
        json!([
            { "metric": "bugs", "value": "3" },
            { "metric": "coverage", "value": "87.3" },
            { "metric": "reliability_rating", "value": "2.0" },
            { "metric": "ncloc", "value": "12345" }
        ]),
    )
    .await;

    let client = ApiClient::new(&test_config(&server)).expect("client must build");
    let builder = ReportBuilder::new(&client, Target::Branch("main".to_string()));

    let report = builder.metrics_report().await.expect("report must build");

    assert!(report.quality_gate.passed());
    assert_eq!(report.meta.branch.as_deref(), Some("main"));
    assert!(report.meta.pull_request.is_none());

    assert_eq!(report.metrics["bugs"], Some(3.0));
    assert_eq!(report.metrics["coverage"], Some(87.3));
    assert_eq!(report.metrics["reliability_rating"], Some(2.0));
    // Metrics the service omitted are present as null, never defaulted to zero.
    assert_eq!(report.metrics["sqale_index"], None);
    assert_eq!(report.metrics.len(), 13);
}
