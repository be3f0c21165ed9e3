//! Folder management and group tests.
//!
//! Uses wiremock to mock the FOSSology API and test actual execution flow.

mod common;

use common::{client, info_json};
use fossology::{Folder, FossologyError, Group};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn root() -> Folder {
    Folder::new(1, "Software Repository")
}

fn folder_json(id: u64, name: &str, parent: u64) -> serde_json::Value {
    serde_json::json!({"id": id, "name": name, "description": "", "parent": parent})
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_folder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/folders"))
        .and(header("parentFolder", "1"))
        .and(header("folderName", "Drop"))
        .and(header("folderDescription", "incoming"))
        .respond_with(ResponseTemplate::new(201).set_body_json(info_json(201, 4)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/folders/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json(4, "Drop", 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let folder = Folder::create(&client, &root(), "Drop", Some("incoming"))
        .await
        .unwrap();

    assert_eq!(folder.id, 4);
    assert_eq!(folder.parent, Some(1));
}

#[tokio::test]
async fn test_create_existing_folder_returns_it() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/folders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_json(200, "4")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/folders/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json(4, "Drop", 1)))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let folder = Folder::create(&client, &root(), "Drop", None).await.unwrap();

    assert_eq!(folder.name, "Drop");
}

#[tokio::test]
async fn test_create_folder_without_description_omits_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/folders"))
        .and(|request: &Request| !request.headers.contains_key("folderDescription"))
        .respond_with(ResponseTemplate::new(201).set_body_json(info_json(201, 5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/folders/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json(5, "Plain", 1)))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    Folder::create(&client, &root(), "Plain", None).await.unwrap();
}

#[tokio::test]
async fn test_create_folder_forbidden_names_scope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/folders"))
        .and(header("groupName", "test"))
        .respond_with(ResponseTemplate::new(403).set_body_json(info_json(403, "Not allowed")))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let client = client.for_group("test");
    let err = Folder::create(&client, &root(), "Drop", None)
        .await
        .unwrap_err();

    assert!(matches!(err, FossologyError::Authorization { .. }));
    assert!(err
        .to_string()
        .contains("Folder creation for group test in folder 1 not authorized"));
}

#[tokio::test]
async fn test_create_folder_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/folders"))
        .respond_with(ResponseTemplate::new(404).set_body_json(info_json(404, "Parent folder not found")))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let err = Folder::create(&client, &Folder::new(99, "Gone"), "Drop", None)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("Unable to create folder Drop under Gone"));
    assert!(err.to_string().contains("Parent folder not found"));
}

// =============================================================================
// Update and delete
// =============================================================================

#[tokio::test]
async fn test_update_folder_sends_changed_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/folders/4"))
        .and(header("name", "Renamed"))
        .and(|request: &Request| !request.headers.contains_key("description"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_json(200, "Folder updated")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/folders/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json(4, "Renamed", 1)))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let folder = Folder::new(4, "Drop")
        .update(&client, Some("Renamed"), None)
        .await
        .unwrap();

    assert_eq!(folder.name, "Renamed");
}

#[tokio::test]
async fn test_update_folder_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/folders/4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let err = Folder::new(4, "Drop")
        .update(&client, None, Some("x"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Unable to update folder 4"));
}

#[tokio::test]
async fn test_delete_folder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/folders/4"))
        .respond_with(ResponseTemplate::new(202).set_body_json(info_json(202, "Folder scheduled")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/folders/1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(info_json(400, "Can not delete root folder")))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    Folder::new(4, "Drop").delete(&client).await.unwrap();

    let err = root().delete(&client).await.unwrap_err();
    assert_eq!(err.status_code(), Some(400));
    assert!(err.to_string().contains("Unable to delete folder 1"));
}

// =============================================================================
// Move and copy
// =============================================================================

#[tokio::test]
async fn test_move_folder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/folders/4"))
        .and(header("action", "move"))
        .and(header("parent", "2"))
        .respond_with(ResponseTemplate::new(202).set_body_json(info_json(202, "Moved")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/folders/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folder_json(4, "Drop", 2)))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let moved = Folder::new(4, "Drop")
        .move_to(&client, &Folder::new(2, "Archive"))
        .await
        .unwrap();

    assert_eq!(moved.parent, Some(2));
}

#[tokio::test]
async fn test_move_folder_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/folders/4"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let err = Folder::new(4, "Drop")
        .move_to(&client, &Folder::new(2, "Archive"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Unable to move folder Drop to Archive"));
}

#[tokio::test]
async fn test_copy_folder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/folders/4"))
        .and(header("action", "copy"))
        .and(header("parent", "2"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    Folder::new(4, "Drop")
        .copy_to(&client, &Folder::new(2, "Archive"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_copy_folder_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/folders/4"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let err = Folder::new(4, "Drop")
        .copy_to(&client, &Folder::new(2, "Archive"))
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .contains("Copying folder 4 in folder 2 not authorized"));
}

// =============================================================================
// Groups
// =============================================================================

#[tokio::test]
async fn test_list_groups() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 2, "name": "Default User"},
            {"id": 3, "name": "fossy"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let groups = Group::list(&client).await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].name, "fossy");
}

#[tokio::test]
async fn test_list_groups_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/groups"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let err = Group::list(&client).await.unwrap_err();

    assert!(err.to_string().contains("Unable to get a list of groups from"));
}

#[tokio::test]
async fn test_create_group() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/groups"))
        .and(header("name", "qa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_json(200, "Group qa added")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    Group::create(&client, "qa").await.unwrap();
}

#[tokio::test]
async fn test_create_group_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/groups"))
        .respond_with(ResponseTemplate::new(400).set_body_json(info_json(400, "Group qa already exists")))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let err = Group::create(&client, "qa").await.unwrap_err();

    assert_eq!(err.status_code(), Some(400));
    assert!(err.to_string().contains("Group qa already exists"));
}

#[tokio::test]
async fn test_create_group_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/groups"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let (client, _) = client(&mock_server.uri());
    let err = Group::create(&client, "qa").await.unwrap_err();

    assert!(matches!(err, FossologyError::Authorization { .. }));
    assert!(err.to_string().contains("Creating group qa not authorized"));
}
