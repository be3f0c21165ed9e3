//! Upload endpoint handlers.

use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{check_access, header_u64, info, paginate};
use crate::mock_server::state::MockState;
use crate::{Folder, Upload, TOTAL_PAGES_HEADER};

/// Query parameters for listing uploads.
#[derive(Debug, Default, Deserialize)]
pub struct ListUploadsQuery {
    #[serde(rename = "folderId")]
    pub folder_id: Option<u64>,
    pub recursive: Option<bool>,
}

/// Query parameters for license findings.
#[derive(Debug, Default, Deserialize)]
pub struct LicensesQuery {
    pub agent: Option<String>,
    #[allow(dead_code)] // Accepted by FOSSology; container entries are not modelled
    pub containers: Option<bool>,
}

fn not_found(id: u64) -> Response {
    info(StatusCode::NOT_FOUND, format!("Upload {id} does not exist"))
}

fn destination(state: &MockState, headers: &HeaderMap) -> Result<Folder, Response> {
    let folder_id = header_u64(headers, "folderId")
        .ok_or_else(|| info(StatusCode::BAD_REQUEST, "folderId header should be an integer"))?;
    state
        .folders
        .get(&folder_id)
        .cloned()
        .ok_or_else(|| info(StatusCode::NOT_FOUND, format!("Folder {folder_id} does not exist")))
}

/// GET /api/v1/uploads
pub async fn list_uploads(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<ListUploadsQuery>,
) -> Response {
    let state = state.read().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    let all_uploads = state.list_uploads(query.folder_id, query.recursive.unwrap_or(true));
    let (page, total_pages) = paginate(&all_uploads, &headers);
    let uploads: Vec<Upload> = page.into_iter().cloned().collect();

    (
        StatusCode::OK,
        [(TOTAL_PAGES_HEADER, total_pages.to_string())],
        Json(uploads),
    )
        .into_response()
}

/// GET /api/v1/uploads/{id}
pub async fn get_upload(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }
    if !state.uploads.contains_key(&id) {
        return not_found(id);
    }
    if state.poll_unpack(id) {
        return info(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Ununpack job not started. Please check job status at /api/v1/jobs?upload={id}"),
        );
    }

    match state.uploads.get(&id) {
        Some(upload) => (StatusCode::OK, Json(upload.clone())).into_response(),
        None => not_found(id),
    }
}

/// POST /api/v1/uploads
pub async fn create_upload(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    request: Request,
) -> Response {
    let folder = {
        let state = state.read().await;
        if let Some(rejection) = check_access(&state, &headers) {
            return rejection;
        }
        match destination(&state, &headers) {
            Ok(folder) => folder,
            Err(rejection) => return rejection,
        }
    };

    let upload_type = headers
        .get("uploadType")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("server");
    let name = match upload_type {
        "vcs" => json_field(request, "vcsName").await,
        "url" => json_field(request, "name").await,
        _ => multipart_file_name(request).await,
    };
    let Some(name) = name else {
        return info(StatusCode::BAD_REQUEST, "Upload source is missing or malformed");
    };

    let description = headers
        .get("uploadDescription")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let id = state.write().await.create_upload(&name, &folder, description);
    info(StatusCode::CREATED, id)
}

async fn json_field(request: Request, field: &str) -> Option<String> {
    let bytes = to_bytes(request.into_body(), usize::MAX).await.ok()?;
    let body: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    body.get(field)?.as_str().map(str::to_string)
}

async fn multipart_file_name(request: Request) -> Option<String> {
    let mut multipart = Multipart::from_request(request, &()).await.ok()?;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("fileInput") {
            return field.file_name().map(str::to_string);
        }
    }
    None
}

/// DELETE /api/v1/uploads/{id}
pub async fn delete_upload(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }

    match state.uploads.remove(&id) {
        Some(_) => info(StatusCode::ACCEPTED, format!("Delete Job for file with id {id}")),
        None => not_found(id),
    }
}

/// PATCH /api/v1/uploads/{id}
pub async fn move_upload(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }
    let folder = match destination(&state, &headers) {
        Ok(folder) => folder,
        Err(rejection) => return rejection,
    };

    if state.move_upload(id, &folder) {
        info(StatusCode::ACCEPTED, format!("Upload {id} will be moved to folder {}", folder.id))
    } else {
        not_found(id)
    }
}

/// PUT /api/v1/uploads/{id}
pub async fn copy_upload(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }
    let folder = match destination(&state, &headers) {
        Ok(folder) => folder,
        Err(rejection) => return rejection,
    };

    match state.copy_upload(id, &folder) {
        Some(_) => info(StatusCode::ACCEPTED, format!("Upload {id} will be copied to folder {}", folder.id)),
        None => not_found(id),
    }
}

/// GET /api/v1/uploads/{id}/summary
pub async fn get_summary(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }
    if !state.uploads.contains_key(&id) {
        return not_found(id);
    }
    if state.poll_scan(id) {
        return info(StatusCode::SERVICE_UNAVAILABLE, "Scan is still running");
    }

    match state.summaries.get(&id) {
        Some(summary) => (StatusCode::OK, Json(summary.clone())).into_response(),
        None => info(StatusCode::NOT_FOUND, format!("No summary for upload {id}")),
    }
}

/// GET /api/v1/uploads/{id}/licenses
pub async fn get_licenses(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(query): Query<LicensesQuery>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers) {
        return rejection;
    }
    if !state.uploads.contains_key(&id) {
        return not_found(id);
    }
    if state.poll_scan(id) {
        return info(StatusCode::SERVICE_UNAVAILABLE, "Scan is still running");
    }

    let agent = query
        .agent
        .unwrap_or_else(|| crate::DEFAULT_AGENT.to_string());
    match state.licenses.get(&(id, agent.clone())) {
        Some(findings) => (StatusCode::OK, Json(findings.clone())).into_response(),
        None => info(
            StatusCode::PRECONDITION_FAILED,
            format!("Agent {agent} not scheduled for the upload"),
        ),
    }
}
