//! Summary and license finding tests.
//!
//! Uses wiremock to mock the FOSSology API and test actual execution flow.

mod common;

use std::time::Duration;

use common::{client, info_json, upload_json};
use fossology::{FossologyError, LicenseQuery, Upload};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn upload() -> Upload {
    serde_json::from_value(upload_json(2, "base-files_11.tar.xz")).unwrap()
}

fn summary_json() -> serde_json::Value {
    serde_json::json!({
        "id": 2,
        "uploadName": "base-files_11.tar.xz",
        "mainLicense": "GPL-2.0-or-later",
        "uniqueLicenses": 5,
        "totalLicenses": 24,
        "uniqueConcludedLicenses": 1,
        "totalConcludedLicenses": 2,
        "filesToBeCleared": 22,
        "filesCleared": 2,
        "clearingStatus": "Open",
        "copyrightCount": 44
    })
}

fn findings_json() -> serde_json::Value {
    serde_json::json!([
        {
            "filePath": "base-files_11.tar.xz/base-files_11.tar/base-files-11/licenses/GPL-2",
            "findings": {"scanner": ["GPL-2.0-only"], "conclusion": null}
        }
    ])
}

// =============================================================================
// Summary
// =============================================================================

#[tokio::test]
async fn test_summary_ready() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, sleeper) = client(&mock_server.uri());
    let summary = upload().summary(&client).await.unwrap();

    assert_eq!(summary.main_license.as_deref(), Some("GPL-2.0-or-later"));
    assert_eq!(summary.files_cleared, 2);
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn test_summary_polls_while_scanning() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/summary"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, sleeper) = client(&mock_server.uri());
    let summary = upload().summary(&client).await.unwrap();

    assert_eq!(summary.id, 2);
    assert_eq!(sleeper.delays(), vec![Duration::from_secs(3); 2]);
}

#[tokio::test]
async fn test_summary_gives_up_after_three_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/summary"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let (client, sleeper) = client(&mock_server.uri());
    let err = upload().summary(&client).await.unwrap_err();

    assert!(matches!(err, FossologyError::Api { response: None, .. }));
    assert_eq!(sleeper.delays().len(), 2);
}

#[tokio::test]
async fn test_summary_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/summary"))
        .and(header("groupName", "test"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let err = upload()
        .summary(&client.for_group("test"))
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .contains("Getting summary of upload 2 for group test not authorized"));
}

#[tokio::test]
async fn test_summary_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/summary"))
        .respond_with(ResponseTemplate::new(404).set_body_json(info_json(404, "Upload does not exist")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let err = upload().summary(&client).await.unwrap_err();

    assert!(err
        .to_string()
        .contains("No summary for upload base-files_11.tar.xz (id=2)"));
}

// =============================================================================
// Licenses
// =============================================================================

#[tokio::test]
async fn test_licenses_default_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/licenses"))
        .and(query_param("agent", "nomos"))
        .and(|request: &Request| !request.url.query().unwrap_or_default().contains("containers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(findings_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let findings = upload()
        .licenses(&client, &LicenseQuery::default())
        .await
        .unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].scanner(), ["GPL-2.0-only"]);
}

#[tokio::test]
async fn test_licenses_with_containers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/licenses"))
        .and(query_param("agent", "ojo"))
        .and(query_param("containers", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(findings_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let query = LicenseQuery {
        agent: Some("ojo".to_string()),
        containers: true,
    };
    let findings = upload().licenses(&client, &query).await.unwrap();

    assert_eq!(findings.len(), 1);
}

#[tokio::test]
async fn test_licenses_agent_not_scheduled_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/licenses"))
        .respond_with(
            ResponseTemplate::new(412)
                .set_body_json(info_json(412, "Agent monk not scheduled for the upload")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, sleeper) = client(&mock_server.uri());
    let err = upload()
        .licenses(&client, &LicenseQuery::agent("monk"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(412));
    assert!(err
        .to_string()
        .contains("Unable to get licenses from monk for base-files_11.tar.xz (id=2)"));
    assert!(sleeper.delays().is_empty());
}

#[tokio::test]
async fn test_licenses_polls_while_scanning() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/licenses"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/licenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(findings_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, sleeper) = client(&mock_server.uri());
    let findings = upload()
        .licenses(&client, &LicenseQuery::default())
        .await
        .unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(sleeper.delays(), vec![Duration::from_secs(3)]);
}

#[tokio::test]
async fn test_licenses_unexpected_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/uploads/2/licenses"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let err = upload()
        .licenses(&client, &LicenseQuery::default())
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .contains("No licenses for upload base-files_11.tar.xz (id=2)"));
}
